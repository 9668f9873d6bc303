use crate::{
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scroll::boundary::{Boundary, EndBoundary},
    trigger::toggle::{ActivationPolicy, ToggleActions},
};

/// How zone progress reaches a scrubbed timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ScrubRepr", into = "ScrubRepr")]
pub enum Scrub {
    /// Not scrubbed; the zone drives its timeline through toggle actions.
    #[default]
    Off,
    /// Timeline progress equals zone progress.
    Immediate,
    /// Timeline progress catches up with zone progress over roughly this many seconds.
    Lag(f64),
}

impl Scrub {
    pub fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum ScrubRepr {
    Flag(bool),
    Seconds(f64),
}

impl TryFrom<ScrubRepr> for Scrub {
    type Error = ScrollweaveError;

    fn try_from(r: ScrubRepr) -> Result<Self, Self::Error> {
        Ok(match r {
            ScrubRepr::Flag(false) => Self::Off,
            ScrubRepr::Flag(true) => Self::Immediate,
            ScrubRepr::Seconds(s) if s == 0.0 => Self::Off,
            ScrubRepr::Seconds(s) if s.is_finite() && s > 0.0 => Self::Lag(s),
            ScrubRepr::Seconds(s) => {
                return Err(ScrollweaveError::config(format!(
                    "scrub lag must be a positive number of seconds, got {s}"
                )));
            }
        })
    }
}

impl From<Scrub> for ScrubRepr {
    fn from(s: Scrub) -> Self {
        match s {
            Scrub::Off => Self::Flag(false),
            Scrub::Immediate => Self::Flag(true),
            Scrub::Lag(v) => Self::Seconds(v),
        }
    }
}

/// Per-animation scroll binding: which element, which window, and how it drives.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    pub trigger: ElementId,
    #[serde(default)]
    pub start: Boundary,
    #[serde(default)]
    pub end: EndBoundary,
    #[serde(default)]
    pub scrub: Scrub,
    /// Freeze the trigger element on screen for the length of the window.
    #[serde(default)]
    pub pin: bool,
    /// Reserve the pin distance in the page so following content waits for the unpin.
    #[serde(default = "default_pin_spacing")]
    pub pin_spacing: bool,
    #[serde(default)]
    pub toggle_actions: ToggleActions,
}

fn default_pin_spacing() -> bool {
    true
}

impl TriggerConfig {
    pub fn new(trigger: ElementId) -> Self {
        Self {
            trigger,
            start: Boundary::default_start(),
            end: EndBoundary::default(),
            scrub: Scrub::Off,
            pin: false,
            pin_spacing: true,
            toggle_actions: ToggleActions::default(),
        }
    }

    pub fn start(mut self, start: Boundary) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: EndBoundary) -> Self {
        self.end = end;
        self
    }

    /// Parse-and-set both window edges.
    pub fn window(self, start: &str, end: &str) -> ScrollweaveResult<Self> {
        Ok(self.start(start.parse()?).end(end.parse()?))
    }

    pub fn scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    pub fn pin(mut self) -> Self {
        self.pin = true;
        self
    }

    pub fn pin_spacing(mut self, on: bool) -> Self {
        self.pin_spacing = on;
        self
    }

    pub fn toggle_actions(mut self, actions: ToggleActions) -> Self {
        self.toggle_actions = actions;
        self
    }

    pub fn policy(&self) -> ActivationPolicy {
        if self.scrub.is_on() {
            ActivationPolicy::Scrub
        } else if self.toggle_actions.rearms() {
            ActivationPolicy::ReplayOnReentry
        } else {
            ActivationPolicy::PlayOnce
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/config.rs"]
mod tests;
