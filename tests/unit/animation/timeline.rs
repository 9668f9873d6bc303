use super::*;
use crate::animation::property::props;

fn el(n: u64) -> ElementId {
    ElementId(n)
}

fn defaults(_: ElementId, p: Property) -> f64 {
    p.default_value()
}

fn reveal() -> Timeline {
    TimelineSpec::new()
        .step(
            StepSpec::from_to(
                [el(1)],
                props([(Property::Opacity, 0.0), (Property::X, -100.0)]),
                props([(Property::Opacity, 1.0), (Property::X, 0.0)]),
            )
            .duration(1.0)
            .ease(Ease::Linear),
        )
        .build(defaults)
        .unwrap()
}

#[test]
fn position_parses_relative_forms() {
    assert_eq!("<".parse::<Position>().unwrap(), Position::WithPrevious(0.0));
    assert_eq!("<0.4".parse::<Position>().unwrap(), Position::WithPrevious(0.4));
    assert_eq!(">-0.05".parse::<Position>().unwrap(), Position::AfterPrevious(-0.05));
    assert_eq!("-=0.6".parse::<Position>().unwrap(), Position::Append(-0.6));
    assert_eq!("+=0.2".parse::<Position>().unwrap(), Position::Append(0.2));
    assert_eq!("1.5".parse::<Position>().unwrap(), Position::Absolute(1.5));
    assert_eq!(
        "zoom+=0.3".parse::<Position>().unwrap(),
        Position::AnchorStart {
            label: "zoom".to_string(),
            delta: 0.3
        }
    );
    assert!("<abc".parse::<Position>().is_err());
    assert!("a b".parse::<Position>().is_err());
}

#[test]
fn position_serde_accepts_numbers_strings_and_anchors() {
    let ps: Vec<Position> =
        serde_json::from_str(r#"[0.5, "<0.4", {"anchor": "zoom", "edge": "end", "delta": 0.1}]"#)
            .unwrap();
    assert_eq!(ps[0], Position::Absolute(0.5));
    assert_eq!(ps[1], Position::WithPrevious(0.4));
    assert_eq!(
        ps[2],
        Position::AnchorEnd {
            label: "zoom".to_string(),
            delta: 0.1
        }
    );
    let back: Vec<Position> = serde_json::from_str(&serde_json::to_string(&ps).unwrap()).unwrap();
    assert_eq!(back, ps);
}

#[test]
fn relative_offsets_resolve_like_an_intro_sequence() {
    let tl = TimelineSpec::new()
        .step(
            StepSpec::from_to(
                [el(1)],
                props([(Property::Opacity, 0.0)]),
                props([(Property::Opacity, 1.0)]),
            )
            .duration(1.2)
            .at(Position::Absolute(0.5)),
        )
        .step(
            StepSpec::to([el(2)], props([(Property::Y, 0.0)]))
                .duration(0.9)
                .at_str("<0.4")
                .unwrap(),
        )
        .step(
            StepSpec::to([el(3)], props([(Property::Y, 0.0)]))
                .duration(0.7)
                .at_str("-=0.6")
                .unwrap(),
        )
        .build(defaults)
        .unwrap();

    let start_of = |id: u64| {
        tl.tweens()
            .iter()
            .find(|t| t.target == el(id))
            .unwrap()
            .start
    };
    assert!((start_of(1) - 0.5).abs() < 1e-12);
    assert!((start_of(2) - 0.9).abs() < 1e-12);
    assert!((start_of(3) - 1.2).abs() < 1e-12);
    assert!((tl.duration() - 1.9).abs() < 1e-12);
}

#[test]
fn resolved_starts_are_monotonic() {
    let tl = TimelineSpec::new()
        .step(StepSpec::to([el(1)], props([(Property::X, 10.0)])).at(Position::Absolute(2.0)))
        .step(StepSpec::to([el(2)], props([(Property::X, 10.0)])).at(Position::Absolute(0.0)))
        .step(StepSpec::to([el(3)], props([(Property::X, 10.0)])).at_str("<0.1").unwrap())
        .build(defaults)
        .unwrap();
    assert!(tl.tweens().windows(2).all(|w| w[0].start <= w[1].start));
}

#[test]
fn cyclic_anchors_are_rejected() {
    let err = TimelineSpec::new()
        .step(
            StepSpec::to([el(1)], props([(Property::X, 1.0)]))
                .label("a")
                .at(Position::AnchorStart {
                    label: "b".to_string(),
                    delta: 0.0,
                }),
        )
        .step(
            StepSpec::to([el(2)], props([(Property::X, 1.0)]))
                .label("b")
                .at(Position::AnchorEnd {
                    label: "a".to_string(),
                    delta: 0.1,
                }),
        )
        .build(defaults)
        .unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("cyclic relative offsets"), "{err}");
}

#[test]
fn forward_anchor_without_cycle_resolves() {
    let tl = TimelineSpec::new()
        .step(
            StepSpec::to([el(1)], props([(Property::X, 1.0)])).at(Position::AnchorEnd {
                label: "late".to_string(),
                delta: 0.0,
            }),
        )
        .step(
            StepSpec::to([el(2)], props([(Property::X, 1.0)]))
                .duration(1.0)
                .label("late")
                .at(Position::Absolute(2.0)),
        )
        .build(defaults)
        .unwrap();
    let first = tl.tweens().iter().find(|t| t.target == el(1)).unwrap();
    assert_eq!(first.start, 3.0);
}

#[test]
fn unknown_label_and_empty_steps_are_config_errors() {
    let bad_label = TimelineSpec::new().step(
        StepSpec::to([el(1)], props([(Property::X, 1.0)])).at_str("nowhere").unwrap(),
    );
    assert!(bad_label.build(defaults).unwrap_err().is_config());

    let no_targets = TimelineSpec::new().step(StepSpec::to(Vec::<ElementId>::new(), props([(Property::X, 1.0)])));
    assert!(no_targets.build(defaults).is_err());

    let negative = TimelineSpec::new()
        .step(StepSpec::to([el(1)], props([(Property::X, 1.0)])).duration(-1.0));
    assert!(negative.build(defaults).is_err());
}

#[test]
fn stagger_offsets_each_target_by_interval() {
    let targets: Vec<ElementId> = (10..15).map(el).collect();
    let tl = TimelineSpec::new()
        .step(
            StepSpec::from_to(
                targets.clone(),
                props([(Property::Opacity, 0.0)]),
                props([(Property::Opacity, 1.0)]),
            )
            .duration(1.0)
            .stagger(0.1),
        )
        .build(defaults)
        .unwrap();

    let start = |id: ElementId| tl.tweens().iter().find(|t| t.target == id).unwrap().start;
    let s0 = start(targets[0]);
    for (i, &t) in targets.iter().enumerate() {
        assert_eq!(start(t), s0 + i as f64 * 0.1);
    }
    assert!((tl.duration() - 1.4).abs() < 1e-12);
}

#[test]
fn stagger_from_end_reverses_order() {
    let tl = TimelineSpec::new()
        .step(
            StepSpec::to([el(1), el(2), el(3)], props([(Property::Y, 0.0)])).stagger_with(
                Stagger {
                    each: 0.2,
                    from: StaggerFrom::End,
                },
            ),
        )
        .build(defaults)
        .unwrap();
    let start = |id: u64| tl.tweens().iter().find(|t| t.target == el(id)).unwrap().start;
    assert!(start(3) < start(2) && start(2) < start(1));
}

#[test]
fn scrub_scenario_interpolates_linearly() {
    let tl = reveal();
    let s0 = tl.sample_progress(0.0);
    assert_eq!(s0.get(el(1), Property::Opacity), Some(0.0));
    assert_eq!(s0.get(el(1), Property::X), Some(-100.0));

    let mid = tl.sample_progress(0.5);
    assert_eq!(mid.get(el(1), Property::Opacity), Some(0.5));
    assert_eq!(mid.get(el(1), Property::X), Some(-50.0));

    let end = tl.sample_progress(1.0);
    assert_eq!(end.get(el(1), Property::Opacity), Some(1.0));
    assert_eq!(end.get(el(1), Property::X), Some(0.0));
}

#[test]
fn sampling_is_idempotent_and_reversible() {
    let tl = TimelineSpec::new()
        .step(
            StepSpec::from_to(
                [el(1), el(2)],
                props([(Property::Y, 80.0), (Property::Scale, 0.5)]),
                props([(Property::Y, 0.0), (Property::Scale, 1.0)]),
            )
            .ease("expo.out".parse().unwrap())
            .stagger(0.07),
        )
        .step(StepSpec::to([el(1)], props([(Property::Scale, 4.5)])).at_str("-=0.2").unwrap())
        .build(defaults)
        .unwrap();

    let initial = tl.sample_progress(0.0);
    for i in 0..=40 {
        let p = f64::from(i) / 40.0;
        assert_eq!(tl.sample_progress(p), tl.sample_progress(p));
        // Scrub forward to p, then back down to 0.
        for j in (0..=i).rev() {
            let _ = tl.sample_progress(f64::from(j) / 40.0);
        }
        let back = tl.sample_progress(0.0);
        for (id, m) in &initial.values {
            for (p, v) in m {
                assert_eq!(back.values[id][p].to_bits(), v.to_bits());
            }
        }
    }
}

#[test]
fn to_steps_inherit_previous_channel_state() {
    let tl = TimelineSpec::new()
        .step(StepSpec::to([el(1)], props([(Property::X, 50.0)])).duration(1.0).ease(Ease::Linear))
        .step(StepSpec::to([el(1)], props([(Property::X, 10.0)])).duration(1.0).ease(Ease::Linear))
        .build(|_, _| 7.0)
        .unwrap();
    let tw = tl.tweens();
    assert_eq!(tw[0].from, 7.0);
    assert_eq!(tw[1].from, 50.0);
    assert_eq!(tl.sample(1.5).get(el(1), Property::X), Some(30.0));
}

#[test]
fn later_step_wins_shared_channel() {
    let tl = TimelineSpec::new()
        .step(
            StepSpec::to([el(1)], props([(Property::Opacity, 0.2)]))
                .duration(2.0)
                .at(Position::Absolute(0.0)),
        )
        .step(
            StepSpec::to([el(1)], props([(Property::Opacity, 0.9)]))
                .duration(0.0)
                .at(Position::Absolute(1.0)),
        )
        .build(defaults)
        .unwrap();
    assert_eq!(tl.sample(1.5).get(el(1), Property::Opacity), Some(0.9));
    assert_eq!(tl.end_state().get(el(1), Property::Opacity), Some(0.9));
}

#[test]
fn delay_shifts_everything() {
    let tl = TimelineSpec::new()
        .delay(0.5)
        .step(StepSpec::to([el(1)], props([(Property::X, 1.0)])).duration(1.0))
        .build(defaults)
        .unwrap();
    assert_eq!(tl.tweens()[0].start, 0.5);
    assert_eq!(tl.duration(), 1.5);
    assert_eq!(tl.sample(0.25).get(el(1), Property::X), Some(0.0));
}

#[test]
fn to_channels_are_dormant_until_their_first_tween_starts() {
    let tl = TimelineSpec::new()
        .step(
            StepSpec::from_to(
                [el(1)],
                props([(Property::Opacity, 0.0)]),
                props([(Property::Opacity, 1.0)]),
            )
            .duration(1.0),
        )
        .step(StepSpec::to([el(2)], props([(Property::Scale, 4.5)])).duration(1.0))
        .build(defaults)
        .unwrap();

    let early = tl.sample(0.5);
    assert!(!early.is_dormant(el(1), Property::Opacity));
    assert!(early.is_dormant(el(2), Property::Scale));
    assert_eq!(early.get(el(2), Property::Scale), Some(1.0));

    let late = tl.sample(1.5);
    assert!(late.dormant.is_empty());
    assert_eq!(late.iter().count(), 2);
}
