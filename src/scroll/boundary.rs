use std::fmt;
use std::str::FromStr;

use crate::{
    document::model::Document,
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    foundation::math::progress_between,
};

/// A point along one axis of a box: a keyword edge, a percentage, or pixels from the top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    Percent(f64),
    Pixels(f64),
}

impl Edge {
    /// Distance from the box's top edge for a box of height `size`.
    pub fn resolve(self, size: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => size * 0.5,
            Self::Bottom => size,
            Self::Percent(p) => size * p / 100.0,
            Self::Pixels(px) => px,
        }
    }
}

fn number(s: &str, whole: &str) -> ScrollweaveResult<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScrollweaveError::config(format!("malformed boundary '{whole}'")))
}

impl Edge {
    fn parse(s: &str, whole: &str) -> ScrollweaveResult<Self> {
        Ok(match s {
            "top" => Self::Top,
            "center" => Self::Center,
            "bottom" => Self::Bottom,
            _ => {
                if let Some(p) = s.strip_suffix('%') {
                    Self::Percent(number(p, whole)?)
                } else if let Some(px) = s.strip_suffix("px") {
                    Self::Pixels(number(px, whole)?)
                } else {
                    Self::Pixels(number(s, whole)?)
                }
            }
        })
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Pixels(px) => write!(f, "{px}px"),
        }
    }
}

/// An [`Edge`] nudged by a pixel offset (`"top+=20"`, `"80%-=10"`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub edge: Edge,
    pub offset: f64,
}

impl Anchor {
    pub fn new(edge: Edge) -> Self {
        Self { edge, offset: 0.0 }
    }

    pub fn resolve(self, size: f64) -> f64 {
        self.edge.resolve(size) + self.offset
    }

    fn parse(token: &str, whole: &str) -> ScrollweaveResult<Self> {
        // Skip the first char so a leading sign stays part of a pixel edge.
        let split = token
            .char_indices()
            .skip(1)
            .find(|&(i, _)| token[i..].starts_with("+=") || token[i..].starts_with("-="))
            .map(|(i, _)| i);
        let Some(i) = split else {
            return Ok(Self::new(Edge::parse(token, whole)?));
        };
        let magnitude = number(&token[i + 2..], whole)?;
        let offset = if token[i..].starts_with('-') {
            -magnitude
        } else {
            magnitude
        };
        Ok(Self {
            edge: Edge::parse(&token[..i], whole)?,
            offset,
        })
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.edge)?;
        if self.offset > 0.0 {
            write!(f, "+={}", self.offset)
        } else if self.offset < 0.0 {
            write!(f, "-={}", -self.offset)
        } else {
            Ok(())
        }
    }
}

/// "When `element` edge meets `viewport` edge", e.g. `"top 80%"`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Boundary {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl Boundary {
    pub fn new(element: Edge, viewport: Edge) -> Self {
        Self {
            element: Anchor::new(element),
            viewport: Anchor::new(viewport),
        }
    }

    /// Scroll offset at which this boundary is crossed.
    pub fn scroll_offset(&self, element_top: f64, element_height: f64, viewport_height: f64) -> f64 {
        element_top + self.element.resolve(element_height) - self.viewport.resolve(viewport_height)
    }

    /// `"top bottom"`: the element starts entering the viewport.
    pub fn default_start() -> Self {
        Self::new(Edge::Top, Edge::Bottom)
    }

    /// `"bottom top"`: the element has fully left the viewport.
    pub fn default_end() -> Self {
        Self::new(Edge::Bottom, Edge::Top)
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::default_start()
    }
}

impl FromStr for Boundary {
    type Err = ScrollweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [element, viewport] = tokens.as_slice() else {
            return Err(ScrollweaveError::config(format!(
                "malformed boundary '{s}': expected '<element-edge> <viewport-edge>'"
            )));
        };
        Ok(Self {
            element: Anchor::parse(element, s)?,
            viewport: Anchor::parse(viewport, s)?,
        })
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl TryFrom<String> for Boundary {
    type Error = ScrollweaveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Boundary> for String {
    fn from(b: Boundary) -> Self {
        b.to_string()
    }
}

/// Length of an end boundary relative to the start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Pixels(f64),
    /// Percent of the viewport height.
    ViewportPercent(f64),
}

impl Length {
    pub fn resolve(self, viewport_height: f64) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::ViewportPercent(p) => viewport_height * p / 100.0,
        }
    }
}

/// Where a zone ends.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "EndRepr", into = "EndRepr")]
pub enum EndBoundary {
    Edge(Boundary),
    /// `"+=3500"` or `"+=150%"`.
    Relative(Length),
    /// Pixel distance past the start that callers recompute on refresh.
    Distance(f64),
}

impl Default for EndBoundary {
    fn default() -> Self {
        Self::Edge(Boundary::default_end())
    }
}

impl FromStr for EndBoundary {
    type Err = ScrollweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let Some(rest) = t.strip_prefix("+=") else {
            if t.starts_with("-=") {
                return Err(ScrollweaveError::config(format!(
                    "end boundary '{s}' must lie after the start"
                )));
            }
            return Ok(Self::Edge(t.parse()?));
        };
        let len = if let Some(p) = rest.strip_suffix('%') {
            Length::ViewportPercent(number(p, s)?)
        } else {
            Length::Pixels(number(rest.strip_suffix("px").unwrap_or(rest), s)?)
        };
        Ok(Self::Relative(len))
    }
}

impl fmt::Display for EndBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge(b) => write!(f, "{b}"),
            Self::Relative(Length::Pixels(px)) => write!(f, "+={px}"),
            Self::Relative(Length::ViewportPercent(p)) => write!(f, "+={p}%"),
            Self::Distance(px) => write!(f, "+={px}"),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum EndRepr {
    Text(String),
    Distance { distance: f64 },
}

impl TryFrom<EndRepr> for EndBoundary {
    type Error = ScrollweaveError;

    fn try_from(r: EndRepr) -> Result<Self, Self::Error> {
        match r {
            EndRepr::Text(s) => s.parse(),
            EndRepr::Distance { distance } => Ok(Self::Distance(distance)),
        }
    }
}

impl From<EndBoundary> for EndRepr {
    fn from(e: EndBoundary) -> Self {
        match e {
            EndBoundary::Distance(distance) => Self::Distance { distance },
            other => Self::Text(other.to_string()),
        }
    }
}

/// Resolved scroll window of a zone, in container scroll pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct ZoneWindow {
    pub start: f64,
    pub end: f64,
}

impl ZoneWindow {
    pub fn len(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0.0
    }

    pub fn progress(&self, scroll_y: f64) -> f64 {
        progress_between(scroll_y, self.start, self.end)
    }

    pub fn overlaps(&self, other: &ZoneWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Resolve `start`/`end` for `element` against the current layout.
///
/// Returns `None` when the element is not in the document.
pub fn resolve_window(
    doc: &Document,
    element: ElementId,
    start: &Boundary,
    end: &EndBoundary,
) -> Option<ZoneWindow> {
    let rect = doc.rect(element)?;
    let top = doc.layout_top(element)?;
    let vh = doc.viewport().height;
    let s = start.scroll_offset(top, rect.height(), vh);
    let e = match end {
        EndBoundary::Edge(b) => b.scroll_offset(top, rect.height(), vh),
        EndBoundary::Relative(len) => s + len.resolve(vh),
        EndBoundary::Distance(px) => s + px,
    };
    Some(ZoneWindow { start: s, end: e })
}

/// Like [`resolve_window`], but a window that does not end after it starts is a
/// configuration error.
pub fn resolve_window_checked(
    doc: &Document,
    element: ElementId,
    start: &Boundary,
    end: &EndBoundary,
) -> ScrollweaveResult<Option<ZoneWindow>> {
    let Some(w) = resolve_window(doc, element, start, end) else {
        return Ok(None);
    };
    if w.end <= w.start {
        return Err(ScrollweaveError::config(format!(
            "zone on {element} ends before it starts: start '{start}' at {} >= end '{end}' at {}",
            w.start, w.end
        )));
    }
    Ok(Some(w))
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/boundary.rs"]
mod tests;
