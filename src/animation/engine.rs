use std::collections::BTreeMap;

use crate::{
    animation::property::Property,
    animation::timeline::{Timeline, TimelineSpec, TimelineState},
    foundation::core::{ElementId, IdGen, TimelineId},
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    foundation::math::clamp01,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlayDirection {
    Forward,
    Backward,
}

/// Clock state of one timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlayState {
    /// Not running; the playhead sits wherever it was left.
    Idle,
    Playing(PlayDirection),
    Paused(PlayDirection),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum TimelineEvent {
    Started {
        id: TimelineId,
        direction: PlayDirection,
    },
    Completed {
        id: TimelineId,
        direction: PlayDirection,
    },
}

struct Entry {
    timeline: Timeline,
    time: f64,
    state: PlayState,
}

impl Entry {
    fn at_end(&self, dir: PlayDirection) -> bool {
        match dir {
            PlayDirection::Forward => self.time >= self.timeline.duration(),
            PlayDirection::Backward => self.time <= 0.0,
        }
    }
}

type CompletionCallback = Box<dyn FnMut(TimelineId, PlayDirection)>;

/// Owns built timelines and their playheads.
///
/// Scrub-bound timelines are positioned with [`TimelineEngine::evaluate`];
/// triggered timelines run under the engine clock via [`TimelineEngine::advance`].
#[derive(Default)]
pub struct TimelineEngine {
    entries: BTreeMap<TimelineId, Entry>,
    ids: IdGen,
    on_complete: Option<CompletionCallback>,
}

impl std::fmt::Debug for TimelineEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineEngine")
            .field("timelines", &self.entries.len())
            .finish()
    }
}

impl TimelineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `spec` and register the result. Cyclic offsets are rejected here.
    pub fn build(
        &mut self,
        spec: &TimelineSpec,
        base: impl Fn(ElementId, Property) -> f64,
    ) -> ScrollweaveResult<TimelineId> {
        let timeline = spec.build(base)?;
        Ok(self.insert(timeline))
    }

    pub fn insert(&mut self, timeline: Timeline) -> TimelineId {
        let id = TimelineId(self.ids.next());
        tracing::debug!(%id, duration = timeline.duration(), "timeline built");
        self.entries.insert(
            id,
            Entry {
                timeline,
                time: 0.0,
                state: PlayState::Idle,
            },
        );
        id
    }

    /// Swap in a rebuilt timeline. The playhead keeps its fraction of the duration.
    pub fn replace(&mut self, id: TimelineId, timeline: Timeline) -> ScrollweaveResult<()> {
        let e = self.entry_mut(id)?;
        let old = e.timeline.duration();
        let fraction = if old > 0.0 { e.time / old } else { 0.0 };
        e.time = clamp01(fraction) * timeline.duration();
        e.timeline = timeline;
        Ok(())
    }

    pub fn dispose(&mut self, id: TimelineId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn contains(&self, id: TimelineId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TimelineId> + '_ {
        self.entries.keys().copied()
    }

    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.entries.get(&id).map(|e| &e.timeline)
    }

    /// Register a callback invoked whenever a clock-driven run reaches its end.
    pub fn on_complete(&mut self, f: impl FnMut(TimelineId, PlayDirection) + 'static) {
        self.on_complete = Some(Box::new(f));
    }

    fn entry(&self, id: TimelineId) -> ScrollweaveResult<&Entry> {
        self.entries
            .get(&id)
            .ok_or_else(|| ScrollweaveError::evaluation(format!("unknown {id}")))
    }

    fn entry_mut(&mut self, id: TimelineId) -> ScrollweaveResult<&mut Entry> {
        self.entries
            .get_mut(&id)
            .ok_or_else(|| ScrollweaveError::evaluation(format!("unknown {id}")))
    }

    /// Scrub: place the playhead at `progress` and return the state there.
    ///
    /// Any clock-driven run is halted; the result depends on `progress` alone.
    pub fn evaluate(&mut self, id: TimelineId, progress: f64) -> ScrollweaveResult<TimelineState> {
        let e = self.entry_mut(id)?;
        e.state = PlayState::Idle;
        e.time = clamp01(progress) * e.timeline.duration();
        Ok(e.timeline.sample(e.time))
    }

    /// State at the current playhead.
    pub fn sample(&self, id: TimelineId) -> ScrollweaveResult<TimelineState> {
        let e = self.entry(id)?;
        Ok(e.timeline.sample(e.time))
    }

    pub fn time(&self, id: TimelineId) -> ScrollweaveResult<f64> {
        Ok(self.entry(id)?.time)
    }

    pub fn progress(&self, id: TimelineId) -> ScrollweaveResult<f64> {
        let e = self.entry(id)?;
        let d = e.timeline.duration();
        Ok(if d <= 0.0 {
            if e.time > 0.0 { 1.0 } else { 0.0 }
        } else {
            e.time / d
        })
    }

    pub fn state(&self, id: TimelineId) -> ScrollweaveResult<PlayState> {
        Ok(self.entry(id)?.state)
    }

    fn run(
        &mut self,
        id: TimelineId,
        dir: PlayDirection,
    ) -> ScrollweaveResult<Option<TimelineEvent>> {
        let e = self.entry_mut(id)?;
        if e.state == PlayState::Playing(dir) {
            return Ok(None);
        }
        if e.at_end(dir) {
            e.state = PlayState::Idle;
            return Ok(None);
        }
        e.state = PlayState::Playing(dir);
        Ok(Some(TimelineEvent::Started { id, direction: dir }))
    }

    /// Run forward from the current position. A timeline already at its end stays put.
    pub fn play(&mut self, id: TimelineId) -> ScrollweaveResult<Option<TimelineEvent>> {
        self.run(id, PlayDirection::Forward)
    }

    /// Run backward toward the start.
    pub fn reverse(&mut self, id: TimelineId) -> ScrollweaveResult<Option<TimelineEvent>> {
        self.run(id, PlayDirection::Backward)
    }

    pub fn restart(&mut self, id: TimelineId) -> ScrollweaveResult<Option<TimelineEvent>> {
        let e = self.entry_mut(id)?;
        e.time = 0.0;
        e.state = PlayState::Idle;
        self.play(id)
    }

    pub fn pause(&mut self, id: TimelineId) -> ScrollweaveResult<()> {
        let e = self.entry_mut(id)?;
        if let PlayState::Playing(dir) = e.state {
            e.state = PlayState::Paused(dir);
        }
        Ok(())
    }

    pub fn resume(&mut self, id: TimelineId) -> ScrollweaveResult<Option<TimelineEvent>> {
        let state = self.entry(id)?.state;
        match state {
            PlayState::Paused(dir) => self.run(id, dir),
            _ => Ok(None),
        }
    }

    /// Jump to the start and stop.
    pub fn reset(&mut self, id: TimelineId) -> ScrollweaveResult<()> {
        let e = self.entry_mut(id)?;
        e.time = 0.0;
        e.state = PlayState::Idle;
        Ok(())
    }

    /// Jump to the end and stop.
    pub fn complete(&mut self, id: TimelineId) -> ScrollweaveResult<()> {
        let e = self.entry_mut(id)?;
        e.time = e.timeline.duration();
        e.state = PlayState::Idle;
        Ok(())
    }

    /// Advance every running timeline by `dt` seconds.
    pub fn advance(&mut self, dt: f64) -> Vec<TimelineEvent> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut events = Vec::new();
        for (&id, e) in self.entries.iter_mut() {
            let PlayState::Playing(dir) = e.state else {
                continue;
            };
            let d = e.timeline.duration();
            e.time = match dir {
                PlayDirection::Forward => (e.time + dt).min(d),
                PlayDirection::Backward => (e.time - dt).max(0.0),
            };
            if e.at_end(dir) {
                e.state = PlayState::Idle;
                events.push(TimelineEvent::Completed { id, direction: dir });
            }
        }
        if let Some(cb) = self.on_complete.as_mut() {
            for ev in &events {
                if let TimelineEvent::Completed { id, direction } = *ev {
                    cb(id, direction);
                }
            }
        }
        events
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/engine.rs"]
mod tests;
