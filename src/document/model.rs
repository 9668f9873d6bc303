use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::property::{ElementStyle, Property},
    foundation::core::{ElementId, IdGen, PlaceholderId, Rect, Vec2, Viewport},
    foundation::error::{ScrollweaveError, ScrollweaveResult},
};

/// Additive decorative offset written by the parallax mapper.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParallaxOffset {
    pub x: f64,
    pub y: f64,
    /// Degrees.
    pub rotate: f64,
}

/// Layout-affecting state. Only the pin controller writes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct LayoutState {
    /// Taken out of normal flow (fixed to the viewport).
    pub pinned: bool,
    /// Vertical offset that keeps a pinned element still while the page scrolls.
    pub pin_offset: f64,
}

#[derive(Clone, Debug)]
struct ElementNode {
    name: String,
    parent: Option<ElementId>,
    rect: Rect,
    style: ElementStyle,
    parallax: ParallaxOffset,
    layout: LayoutState,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Placeholder {
    pub anchor: ElementId,
    pub height: f64,
}

/// One pending compositor write produced during evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleWrite {
    pub target: ElementId,
    pub property: Property,
    pub value: f64,
}

/// Writes collected during a frame's evaluation phase, committed in order.
#[derive(Clone, Debug, Default)]
pub struct StyleBatch {
    writes: Vec<StyleWrite>,
    parallax: BTreeMap<ElementId, ParallaxOffset>,
}

impl StyleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, target: ElementId, property: Property, value: f64) {
        self.writes.push(StyleWrite {
            target,
            property,
            value,
        });
    }

    pub fn write_parallax(&mut self, target: ElementId, offset: ParallaxOffset) {
        self.parallax.insert(target, offset);
    }

    pub fn len(&self) -> usize {
        self.writes.len() + self.parallax.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.parallax.is_empty()
    }
}

/// What the renderer paints for one element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderedElement {
    pub id: ElementId,
    pub name: String,
    pub translate: Vec2,
    pub scale: Vec2,
    pub rotate: f64,
    pub skew_x: f64,
    pub opacity: f64,
    pub blur: f64,
    pub pinned: bool,
}

/// In-memory stand-in for the hosting page: element boxes in document space,
/// their rendered styles, and the layout compensation the pin controller owns.
#[derive(Clone, Debug)]
pub struct Document {
    viewport: Viewport,
    scroll_y: f64,
    content_height: f64,
    elements: BTreeMap<ElementId, ElementNode>,
    placeholders: BTreeMap<PlaceholderId, Placeholder>,
    spacing: BTreeMap<ElementId, f64>,
    ids: IdGen,
    placeholder_ids: IdGen,
}

impl Document {
    pub fn new(viewport: Viewport, content_height: f64) -> Self {
        Self {
            viewport,
            scroll_y: 0.0,
            content_height: content_height.max(0.0),
            elements: BTreeMap::new(),
            placeholders: BTreeMap::new(),
            spacing: BTreeMap::new(),
            ids: IdGen::default(),
            placeholder_ids: IdGen::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Clamp and store the container's scroll offset.
    pub fn set_scroll_y(&mut self, y: f64) -> f64 {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
        self.scroll_y
    }

    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    pub fn set_content_height(&mut self, h: f64) {
        self.content_height = h.max(0.0);
    }

    pub fn insert(&mut self, name: impl Into<String>, rect: Rect) -> ElementId {
        self.insert_node(name.into(), None, rect)
    }

    pub fn insert_child(
        &mut self,
        parent: ElementId,
        name: impl Into<String>,
        rect: Rect,
    ) -> ScrollweaveResult<ElementId> {
        if !self.contains(parent) {
            return Err(ScrollweaveError::config(format!(
                "parent {parent} is not in the document"
            )));
        }
        Ok(self.insert_node(name.into(), Some(parent), rect))
    }

    /// Insert with a caller-chosen id; used when loading a scene description.
    pub fn insert_with_id(
        &mut self,
        id: ElementId,
        name: impl Into<String>,
        parent: Option<ElementId>,
        rect: Rect,
    ) -> ScrollweaveResult<()> {
        if self.elements.contains_key(&id) {
            return Err(ScrollweaveError::config(format!("duplicate {id}")));
        }
        self.elements.insert(id, node(name.into(), parent, rect));
        self.ids.reserve(id.0);
        Ok(())
    }

    fn insert_node(&mut self, name: String, parent: Option<ElementId>, rect: Rect) -> ElementId {
        let id = ElementId(self.ids.next());
        self.elements.insert(id, node(name, parent, rect));
        id
    }

    /// Detach an element (and its descendants) from the document.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if self.elements.remove(&id).is_none() {
            return false;
        }
        let orphans: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|(_, n)| n.parent == Some(id))
            .map(|(&c, _)| c)
            .collect();
        for c in orphans {
            self.remove(c);
        }
        true
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|(_, n)| n.name == name)
            .map(|(&id, _)| id)
    }

    pub fn name(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|n| n.name.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(&id).map(|n| n.rect)
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) -> bool {
        match self.elements.get_mut(&id) {
            Some(n) => {
                n.rect = rect;
                true
            }
            None => false,
        }
    }

    fn is_ancestor_or_self(&self, anchor: ElementId, id: ElementId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == anchor {
                return true;
            }
            cur = self.elements.get(&c).and_then(|n| n.parent);
        }
        false
    }

    /// Whether spacing reserved on `anchor` moves `id` down the page.
    pub fn pushes(&self, anchor: ElementId, id: ElementId) -> bool {
        match (self.rect(anchor), self.rect(id)) {
            (Some(a), Some(r)) => a.y0 < r.y0 && !self.is_ancestor_or_self(anchor, id),
            _ => false,
        }
    }

    /// Top edge in document space, including pin spacing reserved above it.
    pub fn layout_top(&self, id: ElementId) -> Option<f64> {
        let rect = self.rect(id)?;
        let pushed: f64 = self
            .spacing
            .iter()
            .filter(|&(&anchor, _)| self.pushes(anchor, id))
            .map(|(_, &px)| px)
            .sum();
        Some(rect.y0 + pushed)
    }

    pub fn style(&self, id: ElementId) -> Option<ElementStyle> {
        self.elements.get(&id).map(|n| n.style)
    }

    pub fn set_style(&mut self, id: ElementId, style: ElementStyle) -> bool {
        match self.elements.get_mut(&id) {
            Some(n) => {
                n.style = style;
                true
            }
            None => false,
        }
    }

    /// Current value of one channel, or its default for unknown elements.
    pub fn property(&self, id: ElementId, p: Property) -> f64 {
        self.style(id).map_or(p.default_value(), |s| s.get(p))
    }

    pub fn parallax(&self, id: ElementId) -> Option<ParallaxOffset> {
        self.elements.get(&id).map(|n| n.parallax)
    }

    pub fn layout(&self, id: ElementId) -> Option<LayoutState> {
        self.elements.get(&id).map(|n| n.layout)
    }

    /// Apply a frame's writes in order. Returns the targets that were missing.
    pub fn commit(&mut self, batch: StyleBatch) -> BTreeSet<ElementId> {
        let mut skipped = BTreeSet::new();
        for w in batch.writes {
            match self.elements.get_mut(&w.target) {
                Some(n) => n.style.set(w.property, w.value),
                None => {
                    skipped.insert(w.target);
                }
            }
        }
        for (id, offset) in batch.parallax {
            match self.elements.get_mut(&id) {
                Some(n) => n.parallax = offset,
                None => {
                    skipped.insert(id);
                }
            }
        }
        for id in &skipped {
            tracing::debug!(%id, "write skipped: element not in document");
        }
        skipped
    }

    /// Scrollable content height: normal flow minus pinned boxes plus placeholders and spacing.
    pub fn scroll_height(&self) -> f64 {
        let out_of_flow: f64 = self
            .elements
            .values()
            .filter(|n| n.layout.pinned)
            .map(|n| n.rect.height())
            .sum();
        let placeholders: f64 = self.placeholders.values().map(|p| p.height).sum();
        let spacing: f64 = self.spacing.values().sum();
        self.content_height - out_of_flow + placeholders + spacing
    }

    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height() - self.viewport.height).max(0.0)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = (PlaceholderId, &Placeholder)> + '_ {
        self.placeholders.iter().map(|(&id, p)| (id, p))
    }

    pub fn spacing(&self, anchor: ElementId) -> f64 {
        self.spacing.get(&anchor).copied().unwrap_or(0.0)
    }

    pub(crate) fn insert_placeholder(&mut self, anchor: ElementId, height: f64) -> PlaceholderId {
        let id = PlaceholderId(self.placeholder_ids.next());
        self.placeholders.insert(id, Placeholder { anchor, height });
        id
    }

    pub(crate) fn resize_placeholder(
        &mut self,
        id: PlaceholderId,
        height: f64,
    ) -> ScrollweaveResult<()> {
        let p = self
            .placeholders
            .get_mut(&id)
            .ok_or_else(|| ScrollweaveError::layout(format!("unknown {id}")))?;
        p.height = height;
        Ok(())
    }

    pub(crate) fn remove_placeholder(&mut self, id: PlaceholderId) -> ScrollweaveResult<Placeholder> {
        self.placeholders
            .remove(&id)
            .ok_or_else(|| ScrollweaveError::layout(format!("unknown {id}")))
    }

    pub(crate) fn set_spacing(&mut self, anchor: ElementId, px: f64) {
        if px > 0.0 {
            self.spacing.insert(anchor, px);
        } else {
            self.spacing.remove(&anchor);
        }
    }

    pub(crate) fn set_layout(&mut self, id: ElementId, layout: LayoutState) -> bool {
        match self.elements.get_mut(&id) {
            Some(n) => {
                n.layout = layout;
                true
            }
            None => false,
        }
    }

    fn pin_offset_chain(&self, id: ElementId) -> f64 {
        let mut total = 0.0;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(n) = self.elements.get(&c) else {
                break;
            };
            total += n.layout.pin_offset;
            cur = n.parent;
        }
        total
    }

    pub fn rendered(&self, id: ElementId) -> Option<RenderedElement> {
        let n = self.elements.get(&id)?;
        let s = n.style;
        let tx = s.x + s.x_percent / 100.0 * n.rect.width() + n.parallax.x;
        let ty = s.y + s.y_percent / 100.0 * n.rect.height() + n.parallax.y;
        Some(RenderedElement {
            id,
            name: n.name.clone(),
            translate: Vec2::new(tx, ty + self.pin_offset_chain(id)),
            scale: Vec2::new(s.scale * s.scale_x, s.scale * s.scale_y),
            rotate: s.rotate + n.parallax.rotate,
            skew_x: s.skew_x,
            opacity: s.opacity,
            blur: s.blur,
            pinned: n.layout.pinned,
        })
    }

    pub fn rendered_all(&self) -> Vec<RenderedElement> {
        self.elements
            .keys()
            .filter_map(|&id| self.rendered(id))
            .collect()
    }
}

fn node(name: String, parent: Option<ElementId>, rect: Rect) -> ElementNode {
    ElementNode {
        name,
        parent,
        rect,
        style: ElementStyle::default(),
        parallax: ParallaxOffset::default(),
        layout: LayoutState::default(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
