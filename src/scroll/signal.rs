use crate::{
    foundation::core::{ScrollSample, Viewport},
    scroll::boundary::ZoneWindow,
};

/// Coalesces raw scroll and resize input into at most one sample per frame.
///
/// Hosts call [`ScrollSignal::on_scroll`] / [`ScrollSignal::on_resize`] as often
/// as events arrive; the frame loop calls [`ScrollSignal::flush`] once per frame.
#[derive(Clone, Debug)]
pub struct ScrollSignal {
    current: ScrollSample,
    pending_scroll: Option<f64>,
    pending_viewport: Option<Viewport>,
    coalesced: u64,
}

/// What changed since the previous frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalFlush {
    pub sample: ScrollSample,
    pub scrolled: bool,
    pub resized: bool,
}

impl ScrollSignal {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            current: ScrollSample {
                scroll_y: 0.0,
                viewport,
                frame: 0,
            },
            pending_scroll: None,
            pending_viewport: None,
            coalesced: 0,
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        if !scroll_y.is_finite() {
            tracing::debug!(scroll_y, "non-finite scroll offset ignored");
            return;
        }
        if self.pending_scroll.replace(scroll_y).is_some() {
            self.coalesced += 1;
        }
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.pending_viewport.replace(viewport).is_some() {
            self.coalesced += 1;
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending_scroll.is_some() || self.pending_viewport.is_some()
    }

    /// Events folded into a later one of the same frame, since creation.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Close the current frame: fold pending input into one sample.
    ///
    /// `clamp` receives the requested scroll offset and the new viewport and
    /// returns the offset the container actually settles on.
    pub fn flush(&mut self, clamp: impl FnOnce(f64, Viewport) -> f64) -> SignalFlush {
        let resized = match self.pending_viewport.take() {
            Some(v) if v != self.current.viewport => {
                self.current.viewport = v;
                true
            }
            _ => false,
        };
        let requested = self.pending_scroll.take().unwrap_or(self.current.scroll_y);
        let settled = clamp(requested, self.current.viewport);
        let scrolled = settled != self.current.scroll_y;
        self.current.scroll_y = settled;
        self.current.frame += 1;
        SignalFlush {
            sample: self.current,
            scrolled,
            resized,
        }
    }

    /// Overwrite the flushed offset with where the container finally landed.
    ///
    /// The page can shrink between flush and layout, e.g. when a breakpoint
    /// switch releases pin spacing.
    pub fn settle(&mut self, scroll_y: f64) {
        self.current.scroll_y = scroll_y;
    }

    /// Last flushed sample.
    pub fn current(&self) -> ScrollSample {
        self.current
    }

    /// Progress of the last flushed scroll offset through `window`.
    pub fn progress(&self, window: &ZoneWindow) -> f64 {
        window.progress(self.current.scroll_y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/signal.rs"]
mod tests;
