use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::animation::ease::Ease;
use crate::animation::property::props;
use crate::animation::timeline::StepSpec;

fn fade(engine: &mut TimelineEngine) -> TimelineId {
    let spec = TimelineSpec::new().step(
        StepSpec::from_to(
            [ElementId(1)],
            props([(Property::Opacity, 0.0)]),
            props([(Property::Opacity, 1.0)]),
        )
        .duration(1.0)
        .ease(Ease::Linear),
    );
    engine.build(&spec, |_, p| p.default_value()).unwrap()
}

fn opacity(engine: &TimelineEngine, id: TimelineId) -> f64 {
    engine
        .sample(id)
        .unwrap()
        .get(ElementId(1), Property::Opacity)
        .unwrap()
}

#[test]
fn play_runs_to_completion_under_clock() {
    let mut engine = TimelineEngine::new();
    let id = fade(&mut engine);
    assert_eq!(
        engine.play(id).unwrap(),
        Some(TimelineEvent::Started {
            id,
            direction: PlayDirection::Forward
        })
    );
    assert!(engine.advance(0.25).is_empty());
    assert_eq!(opacity(&engine, id), 0.25);
    let events = engine.advance(1.0);
    assert_eq!(
        events,
        vec![TimelineEvent::Completed {
            id,
            direction: PlayDirection::Forward
        }]
    );
    assert_eq!(opacity(&engine, id), 1.0);
    assert_eq!(engine.state(id).unwrap(), PlayState::Idle);
}

#[test]
fn play_at_end_is_noop() {
    let mut engine = TimelineEngine::new();
    let id = fade(&mut engine);
    engine.complete(id).unwrap();
    assert_eq!(engine.play(id).unwrap(), None);
    assert_eq!(engine.state(id).unwrap(), PlayState::Idle);
}

#[test]
fn reverse_returns_to_start_exactly() {
    let mut engine = TimelineEngine::new();
    let id = fade(&mut engine);
    engine.play(id).unwrap();
    engine.advance(0.6);
    engine.reverse(id).unwrap();
    let events = engine.advance(5.0);
    assert_eq!(
        events,
        vec![TimelineEvent::Completed {
            id,
            direction: PlayDirection::Backward
        }]
    );
    assert_eq!(opacity(&engine, id), 0.0);
    assert_eq!(engine.time(id).unwrap(), 0.0);
}

#[test]
fn pause_and_resume_keep_direction() {
    let mut engine = TimelineEngine::new();
    let id = fade(&mut engine);
    engine.play(id).unwrap();
    engine.advance(0.2);
    engine.pause(id).unwrap();
    engine.advance(0.5);
    assert_eq!(engine.time(id).unwrap(), 0.2);
    assert!(engine.resume(id).unwrap().is_some());
    engine.advance(0.3);
    assert!((engine.time(id).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn evaluate_halts_clock_and_is_idempotent() {
    let mut engine = TimelineEngine::new();
    let id = fade(&mut engine);
    engine.play(id).unwrap();
    let a = engine.evaluate(id, 0.4).unwrap();
    let b = engine.evaluate(id, 0.4).unwrap();
    assert_eq!(a, b);
    assert_eq!(engine.state(id).unwrap(), PlayState::Idle);
    assert!(engine.advance(1.0).is_empty());
}

#[test]
fn completion_callback_fires() {
    let mut engine = TimelineEngine::new();
    let id = fade(&mut engine);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.on_complete(move |id, dir| sink.borrow_mut().push((id, dir)));
    engine.restart(id).unwrap();
    engine.advance(2.0);
    assert_eq!(*seen.borrow(), vec![(id, PlayDirection::Forward)]);
}

#[test]
fn unknown_handles_are_evaluation_errors() {
    let mut engine = TimelineEngine::new();
    let id = fade(&mut engine);
    assert!(engine.dispose(id));
    assert!(!engine.dispose(id));
    assert!(matches!(
        engine.evaluate(id, 0.5),
        Err(ScrollweaveError::Evaluation(_))
    ));
}

#[test]
fn replace_keeps_playhead_fraction() {
    let mut engine = TimelineEngine::new();
    let id = fade(&mut engine);
    engine.evaluate(id, 0.5).unwrap();
    let longer = TimelineSpec::new()
        .step(
            StepSpec::from_to(
                [ElementId(1)],
                props([(Property::Opacity, 0.0)]),
                props([(Property::Opacity, 1.0)]),
            )
            .duration(4.0)
            .ease(Ease::Linear),
        )
        .build(|_, p| p.default_value())
        .unwrap();
    engine.replace(id, longer).unwrap();
    assert_eq!(engine.time(id).unwrap(), 2.0);
    assert_eq!(opacity(&engine, id), 0.5);
}
