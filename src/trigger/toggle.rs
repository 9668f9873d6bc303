use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{ScrollweaveError, ScrollweaveResult};

/// What a zone's timeline does when a toggle slot fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    #[default]
    None,
}

impl ToggleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reverse => "reverse",
            Self::Restart => "restart",
            Self::Reset => "reset",
            Self::Complete => "complete",
            Self::None => "none",
        }
    }
}

impl FromStr for ToggleAction {
    type Err = ScrollweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "reverse" => Self::Reverse,
            "restart" => Self::Restart,
            "reset" => Self::Reset,
            "complete" => Self::Complete,
            "none" => Self::None,
            other => {
                return Err(ScrollweaveError::config(format!(
                    "unknown toggle action '{other}'"
                )));
            }
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ToggleSlot {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
}

/// Actions for the four boundary crossings, written `"enter leave enterBack leaveBack"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    pub enter: ToggleAction,
    pub leave: ToggleAction,
    pub enter_back: ToggleAction,
    pub leave_back: ToggleAction,
}

impl Default for ToggleActions {
    /// `play none none none`
    fn default() -> Self {
        Self {
            enter: ToggleAction::Play,
            leave: ToggleAction::None,
            enter_back: ToggleAction::None,
            leave_back: ToggleAction::None,
        }
    }
}

impl ToggleActions {
    /// `play none none reset`: replays every time the zone is entered from above.
    pub fn replay() -> Self {
        Self {
            leave_back: ToggleAction::Reset,
            ..Self::default()
        }
    }

    pub fn action(&self, slot: ToggleSlot) -> ToggleAction {
        match slot {
            ToggleSlot::Enter => self.enter,
            ToggleSlot::Leave => self.leave,
            ToggleSlot::EnterBack => self.enter_back,
            ToggleSlot::LeaveBack => self.leave_back,
        }
    }

    fn slots(&self) -> [ToggleAction; 4] {
        [self.enter, self.leave, self.enter_back, self.leave_back]
    }

    /// True when some slot rewinds the timeline so it can run again.
    pub fn rearms(&self) -> bool {
        self.slots()
            .iter()
            .any(|a| matches!(a, ToggleAction::Reset | ToggleAction::Restart))
    }
}

impl FromStr for ToggleActions {
    type Err = ScrollweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .split_whitespace()
            .map(str::parse)
            .collect::<ScrollweaveResult<Vec<ToggleAction>>>()?;
        let [enter, leave, enter_back, leave_back] = parsed.as_slice() else {
            return Err(ScrollweaveError::config(format!(
                "toggle actions '{s}' must name exactly four actions"
            )));
        };
        Ok(Self {
            enter: *enter,
            leave: *leave,
            enter_back: *enter_back,
            leave_back: *leave_back,
        })
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.slots();
        write!(f, "{} {} {} {}", a.as_str(), b.as_str(), c.as_str(), d.as_str())
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = ScrollweaveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(t: ToggleActions) -> Self {
        t.to_string()
    }
}

/// How a zone drives its timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ActivationPolicy {
    /// Runs under its own clock once; re-entry finds it finished.
    PlayOnce,
    /// Progress follows scroll position.
    Scrub,
    /// Runs under its own clock and is rewound so it replays on re-entry.
    ReplayOnReentry,
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/toggle.rs"]
mod tests;
