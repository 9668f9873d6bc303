use smallvec::SmallVec;

use crate::{scroll::boundary::ZoneWindow, trigger::toggle::ToggleSlot};

/// Where the scroll position sits relative to a zone's window.
///
/// `Entering` and `Leaving` are transient: a tick always settles in `Before`,
/// `Active` or `After`, passing through the transient phases on the way.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
pub enum ZonePhase {
    #[default]
    Before,
    Entering,
    Active,
    Leaving,
    After,
}

impl ZonePhase {
    const ORDER: [ZonePhase; 5] = [
        ZonePhase::Before,
        ZonePhase::Entering,
        ZonePhase::Active,
        ZonePhase::Leaving,
        ZonePhase::After,
    ];

    fn rank(self) -> usize {
        self as usize
    }

    pub fn is_settled(self) -> bool {
        matches!(self, Self::Before | Self::Active | Self::After)
    }

    /// Settled phase for `scroll_y`. Both window edges count as inside.
    pub fn settled_at(window: &ZoneWindow, scroll_y: f64) -> Self {
        if scroll_y < window.start {
            Self::Before
        } else if scroll_y > window.end {
            Self::After
        } else {
            Self::Active
        }
    }
}

/// One legal edge of the zone state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PhaseTransition {
    /// Before → Entering, scrolling down across the start.
    Enter,
    /// Entering → Active.
    Activate,
    /// Active → Leaving, scrolling down across the end.
    Leave,
    /// Leaving → After.
    Exit,
    /// After → Leaving, scrolling up across the end.
    EnterBack,
    /// Leaving → Active.
    Reactivate,
    /// Active → Entering, scrolling up across the start.
    LeaveBack,
    /// Entering → Before.
    Rewind,
}

/// Transitions produced by one tick; a full jump is four steps.
pub type PhaseWalk = SmallVec<[PhaseTransition; 4]>;

impl PhaseTransition {
    const TABLE: [(ZonePhase, ZonePhase, PhaseTransition); 8] = [
        (ZonePhase::Before, ZonePhase::Entering, PhaseTransition::Enter),
        (ZonePhase::Entering, ZonePhase::Active, PhaseTransition::Activate),
        (ZonePhase::Active, ZonePhase::Leaving, PhaseTransition::Leave),
        (ZonePhase::Leaving, ZonePhase::After, PhaseTransition::Exit),
        (ZonePhase::After, ZonePhase::Leaving, PhaseTransition::EnterBack),
        (ZonePhase::Leaving, ZonePhase::Active, PhaseTransition::Reactivate),
        (ZonePhase::Active, ZonePhase::Entering, PhaseTransition::LeaveBack),
        (ZonePhase::Entering, ZonePhase::Before, PhaseTransition::Rewind),
    ];

    /// The transition from `from` to `to`, if that edge exists.
    pub fn between(from: ZonePhase, to: ZonePhase) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(f, t, _)| *f == from && *t == to)
            .map(|(_, _, tr)| *tr)
    }

    fn edge(self) -> (ZonePhase, ZonePhase) {
        Self::TABLE
            .iter()
            .find(|(_, _, tr)| *tr == self)
            .map(|(f, t, _)| (*f, *t))
            .unwrap_or((ZonePhase::Before, ZonePhase::Before))
    }

    pub fn from(self) -> ZonePhase {
        self.edge().0
    }

    pub fn to(self) -> ZonePhase {
        self.edge().1
    }

    pub fn is_forward(self) -> bool {
        self.to() > self.from()
    }

    /// Toggle-action slot this transition fires, if any.
    pub fn slot(self) -> Option<ToggleSlot> {
        match self {
            Self::Enter => Some(ToggleSlot::Enter),
            Self::Leave => Some(ToggleSlot::Leave),
            Self::EnterBack => Some(ToggleSlot::EnterBack),
            Self::LeaveBack => Some(ToggleSlot::LeaveBack),
            Self::Activate | Self::Exit | Self::Reactivate | Self::Rewind => None,
        }
    }
}

/// Every transition between `from` and `to`, in order.
pub fn walk(from: ZonePhase, to: ZonePhase) -> PhaseWalk {
    let mut out = PhaseWalk::new();
    let (mut i, target) = (from.rank(), to.rank());
    while i != target {
        let next = if target > i { i + 1 } else { i - 1 };
        if let Some(tr) = PhaseTransition::between(ZonePhase::ORDER[i], ZonePhase::ORDER[next]) {
            out.push(tr);
        }
        i = next;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/phase.rs"]
mod tests;
