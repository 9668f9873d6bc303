use crate::foundation::error::{ScrollweaveError, ScrollweaveResult};

pub use kurbo::{Rect, Vec2};

macro_rules! handle_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

handle_id!(
    /// Opaque handle to a renderable node in the [`crate::Document`].
    ElementId,
    "element"
);
handle_id!(
    /// Handle returned by [`crate::TriggerRegistry::register`].
    ZoneId,
    "zone"
);
handle_id!(
    /// Handle returned by [`crate::TimelineEngine::build`].
    TimelineId,
    "timeline"
);
handle_id!(
    /// Handle for a parallax binding.
    BindingId,
    "binding"
);
handle_id!(
    /// Handle for a placeholder spacer inserted by the pin controller.
    PlaceholderId,
    "placeholder"
);

handle_id!(
    /// Handle for a breakpoint rule in a [`crate::ResponsiveGate`].
    RuleId,
    "rule"
);
handle_id!(
    /// Handle for a mounted section.
    MountId,
    "mount"
);

/// Monotonic id source shared by the registries.
#[derive(Clone, Debug)]
pub(crate) struct IdGen(u64);

impl Default for IdGen {
    fn default() -> Self {
        Self(1)
    }
}

impl IdGen {
    pub(crate) fn next(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }

    /// Largest id handed out so far (0 if none).
    pub(crate) fn peek_last(&self) -> u64 {
        self.0 - 1
    }

    /// Make sure ids handed out later never collide with `used`.
    pub(crate) fn reserve(&mut self, used: u64) {
        self.0 = self.0.max(used.saturating_add(1));
    }
}

/// Size of the visible scroll viewport in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> ScrollweaveResult<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(ScrollweaveError::config("viewport width must be > 0"));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(ScrollweaveError::config("viewport height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// A point in scroll space together with the viewport that produced it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollSample {
    /// Vertical scroll offset of the container, in pixels.
    pub scroll_y: f64,
    pub viewport: Viewport,
    /// Monotonic frame counter assigned by [`crate::ScrollSignal`].
    pub frame: u64,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
