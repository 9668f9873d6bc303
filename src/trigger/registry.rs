use std::collections::BTreeMap;

use crate::{
    document::model::Document,
    foundation::core::{IdGen, ZoneId},
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scroll::boundary::{EndBoundary, ZoneWindow, resolve_window, resolve_window_checked},
    trigger::config::TriggerConfig,
    trigger::phase::{PhaseTransition, PhaseWalk, ZonePhase, walk},
    trigger::toggle::ActivationPolicy,
};

/// Called once per transition, in order.
pub type ZoneListener = Box<dyn FnMut(ZoneId, PhaseTransition)>;

struct Zone {
    config: TriggerConfig,
    window: ZoneWindow,
    phase: ZonePhase,
    progress: f64,
    listener: Option<ZoneListener>,
}

/// Result of ticking one zone.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneTick {
    pub zone: ZoneId,
    pub phase: ZonePhase,
    pub progress: f64,
    pub transitions: PhaseWalk,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegistryTick {
    /// One entry per live zone, in registration order.
    pub zones: Vec<ZoneTick>,
    /// Zones dropped because their element left the document.
    pub removed: Vec<ZoneId>,
}

/// Scroll-bound activation windows and their phase state.
#[derive(Default)]
pub struct TriggerRegistry {
    zones: BTreeMap<ZoneId, Zone>,
    ids: IdGen,
}

impl std::fmt::Debug for TriggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerRegistry")
            .field("zones", &self.zones.len())
            .finish()
    }
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the window against the current layout and start tracking it.
    ///
    /// The zone starts in [`ZonePhase::Before`]; the first tick walks it to
    /// wherever the page currently is.
    pub fn register(&mut self, config: TriggerConfig, doc: &Document) -> ScrollweaveResult<ZoneId> {
        let window = resolve_window_checked(doc, config.trigger, &config.start, &config.end)?
            .ok_or_else(|| {
                ScrollweaveError::config(format!(
                    "trigger {} is not in the document",
                    config.trigger
                ))
            })?;
        let id = ZoneId(self.ids.next());
        tracing::debug!(%id, trigger = %config.trigger, start = window.start, end = window.end, "zone registered");
        self.zones.insert(
            id,
            Zone {
                config,
                window,
                phase: ZonePhase::Before,
                progress: 0.0,
                listener: None,
            },
        );
        Ok(id)
    }

    pub fn unregister(&mut self, id: ZoneId) -> Option<TriggerConfig> {
        self.zones.remove(&id).map(|z| z.config)
    }

    pub fn contains(&self, id: ZoneId) -> bool {
        self.zones.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.keys().copied()
    }

    fn zone(&self, id: ZoneId) -> ScrollweaveResult<&Zone> {
        self.zones
            .get(&id)
            .ok_or_else(|| ScrollweaveError::evaluation(format!("unknown {id}")))
    }

    fn zone_mut(&mut self, id: ZoneId) -> ScrollweaveResult<&mut Zone> {
        self.zones
            .get_mut(&id)
            .ok_or_else(|| ScrollweaveError::evaluation(format!("unknown {id}")))
    }

    pub fn set_listener(
        &mut self,
        id: ZoneId,
        f: impl FnMut(ZoneId, PhaseTransition) + 'static,
    ) -> ScrollweaveResult<()> {
        self.zone_mut(id)?.listener = Some(Box::new(f));
        Ok(())
    }

    pub fn config(&self, id: ZoneId) -> ScrollweaveResult<&TriggerConfig> {
        Ok(&self.zone(id)?.config)
    }

    pub fn policy(&self, id: ZoneId) -> ScrollweaveResult<ActivationPolicy> {
        Ok(self.zone(id)?.config.policy())
    }

    pub fn window(&self, id: ZoneId) -> ScrollweaveResult<ZoneWindow> {
        Ok(self.zone(id)?.window)
    }

    pub fn phase(&self, id: ZoneId) -> ScrollweaveResult<ZonePhase> {
        Ok(self.zone(id)?.phase)
    }

    pub fn progress(&self, id: ZoneId) -> ScrollweaveResult<f64> {
        Ok(self.zone(id)?.progress)
    }

    pub fn set_end(&mut self, id: ZoneId, end: EndBoundary) -> ScrollweaveResult<()> {
        self.zone_mut(id)?.config.end = end;
        Ok(())
    }

    /// Re-resolve the window after a layout change. Phase is left alone until the next tick.
    ///
    /// Returns `None` when the trigger element is gone.
    pub fn refresh(&mut self, id: ZoneId, doc: &Document) -> ScrollweaveResult<Option<ZoneWindow>> {
        let z = self.zone_mut(id)?;
        let Some(mut w) = resolve_window(doc, z.config.trigger, &z.config.start, &z.config.end)
        else {
            return Ok(None);
        };
        if w.end < w.start {
            tracing::warn!(%id, start = w.start, end = w.end, "zone window inverted after refresh; collapsing");
            w.end = w.start;
        }
        z.window = w;
        Ok(Some(w))
    }

    /// Move one zone to the phase for `scroll_y`, firing every skipped transition in order.
    pub fn tick(&mut self, id: ZoneId, scroll_y: f64) -> ScrollweaveResult<ZoneTick> {
        let z = self.zone_mut(id)?;
        let target = ZonePhase::settled_at(&z.window, scroll_y);
        let transitions = walk(z.phase, target);
        for &tr in &transitions {
            tracing::debug!(%id, ?tr, "zone transition");
            if let Some(cb) = z.listener.as_mut() {
                cb(id, tr);
            }
        }
        z.phase = target;
        z.progress = z.window.progress(scroll_y);
        Ok(ZoneTick {
            zone: id,
            phase: target,
            progress: z.progress,
            transitions,
        })
    }

    /// Tick every zone; zones whose trigger element left the document are dropped first.
    pub fn tick_all(&mut self, doc: &Document, scroll_y: f64) -> RegistryTick {
        let removed: Vec<ZoneId> = self
            .zones
            .iter()
            .filter(|(_, z)| !doc.contains(z.config.trigger))
            .map(|(&id, _)| id)
            .collect();
        for id in &removed {
            tracing::debug!(%id, "zone dropped: trigger element left the document");
            self.zones.remove(id);
        }

        let ids: Vec<ZoneId> = self.zones.keys().copied().collect();
        let zones = ids
            .into_iter()
            .filter_map(|id| self.tick(id, scroll_y).ok())
            .collect();
        RegistryTick { zones, removed }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/registry.rs"]
mod tests;
