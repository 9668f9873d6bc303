use std::collections::BTreeMap;

use crate::{
    document::model::{Document, ParallaxOffset, StyleBatch},
    foundation::core::{BindingId, ElementId, IdGen, Vec2, ZoneId},
};

/// What a binding measures its offset against.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParallaxSource {
    /// Pixels scrolled past `origin`.
    Scroll {
        #[serde(default)]
        origin: f64,
    },
    /// Progress `0..=1` through a zone's window.
    Zone { zone: ZoneId },
}

impl Default for ParallaxSource {
    fn default() -> Self {
        Self::Scroll { origin: 0.0 }
    }
}

/// `offset = delta × depth`, recomputed from scratch every tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParallaxBinding {
    pub element: ElementId,
    /// Per-axis factor applied to the source delta.
    pub depth: Vec2,
    /// Degrees per unit of source delta.
    #[serde(default)]
    pub rotate: f64,
    #[serde(default)]
    pub source: ParallaxSource,
}

impl ParallaxBinding {
    pub fn new(element: ElementId, depth: Vec2) -> Self {
        Self {
            element,
            depth,
            rotate: 0.0,
            source: ParallaxSource::default(),
        }
    }

    pub fn rotate(mut self, per_unit: f64) -> Self {
        self.rotate = per_unit;
        self
    }

    pub fn source(mut self, source: ParallaxSource) -> Self {
        self.source = source;
        self
    }

    fn offset(&self, delta: f64) -> ParallaxOffset {
        ParallaxOffset {
            x: delta * self.depth.x,
            y: delta * self.depth.y,
            rotate: delta * self.rotate,
        }
    }
}

/// Decorative scroll-proportional offsets, kept apart from timeline state.
#[derive(Clone, Debug, Default)]
pub struct ParallaxMapper {
    bindings: BTreeMap<BindingId, ParallaxBinding>,
    ids: IdGen,
}

impl ParallaxMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll-delta binding from the top of the page.
    pub fn bind(&mut self, element: ElementId, depth: Vec2) -> BindingId {
        self.bind_with(ParallaxBinding::new(element, depth))
    }

    pub fn bind_with(&mut self, binding: ParallaxBinding) -> BindingId {
        let id = BindingId(self.ids.next());
        self.bindings.insert(id, binding);
        id
    }

    pub fn remove(&mut self, id: BindingId) -> Option<ParallaxBinding> {
        self.bindings.remove(&id)
    }

    /// Drop every binding on `element`.
    pub fn unbind(&mut self, element: ElementId) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|_, b| b.element != element);
        before - self.bindings.len()
    }

    /// Drop every binding measured against `zone`.
    pub fn unbind_zone(&mut self, zone: ZoneId) -> Vec<BindingId> {
        let ids: Vec<BindingId> = self
            .bindings
            .iter()
            .filter(|(_, b)| b.source == ParallaxSource::Zone { zone })
            .map(|(&id, _)| id)
            .collect();
        for id in &ids {
            self.bindings.remove(id);
        }
        ids
    }

    pub fn get(&self, id: BindingId) -> Option<&ParallaxBinding> {
        self.bindings.get(&id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Queue this frame's offsets. Bindings on the same element add up.
    ///
    /// `zone_progress` returns `None` for zones that no longer exist; such
    /// bindings are skipped along with those whose element is gone.
    pub fn tick(
        &self,
        scroll_y: f64,
        zone_progress: impl Fn(ZoneId) -> Option<f64>,
        doc: &Document,
        batch: &mut StyleBatch,
    ) -> usize {
        let mut sums: BTreeMap<ElementId, ParallaxOffset> = BTreeMap::new();
        for (id, b) in &self.bindings {
            if !doc.contains(b.element) {
                tracing::debug!(%id, element = %b.element, "parallax skipped: element not in document");
                continue;
            }
            let delta = match b.source {
                ParallaxSource::Scroll { origin } => scroll_y - origin,
                ParallaxSource::Zone { zone } => match zone_progress(zone) {
                    Some(p) => p,
                    None => {
                        tracing::debug!(%id, %zone, "parallax skipped: zone not registered");
                        continue;
                    }
                },
            };
            let o = b.offset(delta);
            let acc = sums.entry(b.element).or_default();
            acc.x += o.x;
            acc.y += o.y;
            acc.rotate += o.rotate;
        }
        let n = sums.len();
        for (el, o) in sums {
            batch.write_parallax(el, o);
        }
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/parallax/mapper.rs"]
mod tests;
