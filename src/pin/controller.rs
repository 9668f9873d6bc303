use std::collections::BTreeMap;

use crate::{
    document::model::{Document, LayoutState},
    foundation::core::{ElementId, PlaceholderId, ZoneId},
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scroll::boundary::ZoneWindow,
};

/// Pin lifecycle. `Pinning` and `Unpinning` only exist inside a single
/// [`PinController::pin`] / [`PinController::unpin`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum PinState {
    #[default]
    Unpinned,
    Pinning,
    Pinned,
    Unpinning,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PinEvent {
    pub zone: ZoneId,
    pub element: ElementId,
    pub pinned: bool,
}

#[derive(Clone, Debug)]
struct PinRegion {
    element: ElementId,
    window: ZoneWindow,
    spacing: bool,
    state: PinState,
    placeholder: Option<PlaceholderId>,
}

/// Owns every layout-affecting write: placeholders, pin spacing and pin offsets.
///
/// At most one region is pinned at a time. Regions whose windows overlap are
/// rejected when added; nested pins are not supported.
#[derive(Clone, Debug, Default)]
pub struct PinController {
    regions: BTreeMap<ZoneId, PinRegion>,
    active: Option<ZoneId>,
}

impl PinController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        zone: ZoneId,
        element: ElementId,
        window: ZoneWindow,
        spacing: bool,
        doc: &mut Document,
    ) -> ScrollweaveResult<()> {
        // Regions below the new element move down by its spacing once it is reserved.
        let shift = if spacing { window.len() } else { 0.0 };
        if let Some((other, _)) = self.regions.iter().find(|(z, r)| {
            let mut w = r.window;
            if doc.pushes(element, r.element) {
                w.start += shift;
                w.end += shift;
            }
            **z != zone && w.overlaps(&window)
        }) {
            return Err(ScrollweaveError::config(format!(
                "pin region {zone} ({}..{}) overlaps pin region {other}; nested pins are not supported",
                window.start, window.end
            )));
        }
        if spacing {
            doc.set_spacing(element, window.len());
        }
        self.regions.insert(
            zone,
            PinRegion {
                element,
                window,
                spacing,
                state: PinState::Unpinned,
                placeholder: None,
            },
        );
        Ok(())
    }

    pub fn contains(&self, zone: ZoneId) -> bool {
        self.regions.contains_key(&zone)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn active(&self) -> Option<ZoneId> {
        self.active
    }

    pub fn state(&self, zone: ZoneId) -> Option<PinState> {
        self.regions.get(&zone).map(|r| r.state)
    }

    /// Pin distance in scroll pixels.
    pub fn distance(&self, zone: ZoneId) -> Option<f64> {
        self.regions.get(&zone).map(|r| r.window.len())
    }

    /// New window after a refresh. A pinned region stays pinned; its spacing and
    /// placeholder follow the new geometry.
    pub fn update(
        &mut self,
        zone: ZoneId,
        window: ZoneWindow,
        doc: &mut Document,
    ) -> ScrollweaveResult<()> {
        let r = self
            .regions
            .get_mut(&zone)
            .ok_or_else(|| ScrollweaveError::evaluation(format!("{zone} has no pin region")))?;
        r.window = window;
        if r.spacing {
            doc.set_spacing(r.element, window.len());
        }
        if let (Some(ph), Some(rect)) = (r.placeholder, doc.rect(r.element)) {
            doc.resize_placeholder(ph, rect.height())?;
        }
        Ok(())
    }

    /// Unpin if needed and drop every trace of the region from the document.
    pub fn remove(&mut self, zone: ZoneId, doc: &mut Document) -> bool {
        if !self.regions.contains_key(&zone) {
            return false;
        }
        if let Err(e) = self.unpin(zone, doc) {
            tracing::warn!(%zone, error = %e, "unpin during removal failed");
        }
        let Some(r) = self.regions.remove(&zone) else {
            return false;
        };
        doc.set_spacing(r.element, 0.0);
        doc.set_layout(r.element, LayoutState::default());
        true
    }

    /// Freeze the region's element where it is. Re-pinning is a no-op.
    ///
    /// Returns whether the element is newly pinned. A request while another
    /// region holds the pin is deferred.
    pub fn pin(&mut self, zone: ZoneId, doc: &mut Document) -> ScrollweaveResult<bool> {
        let active = self.active;
        let r = self
            .regions
            .get_mut(&zone)
            .ok_or_else(|| ScrollweaveError::evaluation(format!("{zone} has no pin region")))?;
        if r.state == PinState::Pinned {
            return Ok(false);
        }
        if let Some(other) = active
            && other != zone
        {
            tracing::warn!(%zone, %other, "pin deferred: another region is pinned");
            return Ok(false);
        }
        let Some(rect) = doc.rect(r.element) else {
            tracing::debug!(%zone, element = %r.element, "pin skipped: element not in document");
            return Ok(false);
        };
        let offset = doc.layout(r.element).map_or(0.0, |l| l.pin_offset);

        r.state = PinState::Pinning;
        r.placeholder = Some(doc.insert_placeholder(r.element, rect.height()));
        doc.set_layout(
            r.element,
            LayoutState {
                pinned: true,
                pin_offset: offset,
            },
        );
        r.state = PinState::Pinned;
        self.active = Some(zone);
        tracing::debug!(%zone, element = %r.element, height = rect.height(), "pinned");
        Ok(true)
    }

    /// Return the element to normal flow and remove its placeholder.
    ///
    /// Spacing reserved by [`PinController::add`] stays until
    /// [`PinController::remove`], so content below does not jump back.
    pub fn unpin(&mut self, zone: ZoneId, doc: &mut Document) -> ScrollweaveResult<bool> {
        let r = self
            .regions
            .get_mut(&zone)
            .ok_or_else(|| ScrollweaveError::evaluation(format!("{zone} has no pin region")))?;
        if r.state != PinState::Pinned {
            return Ok(false);
        }
        r.state = PinState::Unpinning;
        let removed = match r.placeholder.take() {
            Some(ph) => doc.remove_placeholder(ph).map(|_| ()),
            None => Ok(()),
        };
        let offset = doc.layout(r.element).map_or(0.0, |l| l.pin_offset);
        doc.set_layout(
            r.element,
            LayoutState {
                pinned: false,
                pin_offset: offset,
            },
        );
        r.state = PinState::Unpinned;
        if self.active == Some(zone) {
            self.active = None;
        }
        tracing::debug!(%zone, "unpinned");
        removed.map(|_| true)
    }

    /// Pin or unpin every region for `scroll_y` and update pin offsets.
    pub fn tick(&mut self, scroll_y: f64, doc: &mut Document) -> Vec<PinEvent> {
        let inside = |w: &ZoneWindow| scroll_y >= w.start && scroll_y <= w.end;
        let mut events = Vec::new();
        let zones: Vec<ZoneId> = self.regions.keys().copied().collect();

        // Release before acquiring so a hand-off between adjacent regions lands in one frame.
        for &zone in &zones {
            let Some(r) = self.regions.get(&zone) else {
                continue;
            };
            if r.state == PinState::Pinned && !inside(&r.window) {
                let element = r.element;
                match self.unpin(zone, doc) {
                    Ok(true) => events.push(PinEvent {
                        zone,
                        element,
                        pinned: false,
                    }),
                    Ok(false) => {}
                    Err(e) => tracing::warn!(%zone, error = %e, "unpin failed"),
                }
            }
        }
        for &zone in &zones {
            let Some(r) = self.regions.get(&zone) else {
                continue;
            };
            let (element, window) = (r.element, r.window);
            let offset = (scroll_y - window.start).clamp(0.0, window.len());
            if let Some(mut layout) = doc.layout(element) {
                layout.pin_offset = offset;
                doc.set_layout(element, layout);
            }
            if r.state == PinState::Unpinned && inside(&window) {
                match self.pin(zone, doc) {
                    Ok(true) => events.push(PinEvent {
                        zone,
                        element,
                        pinned: true,
                    }),
                    Ok(false) => {}
                    Err(e) => tracing::warn!(%zone, error = %e, "pin failed"),
                }
            }
        }
        events
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pin/controller.rs"]
mod tests;
