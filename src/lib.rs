//! Scrollweave orchestrates scroll-synchronized animation for a single page.
//!
//! A [`ScrollScene`] owns the page [`Document`] and everything bound to it:
//!
//! - trigger zones in a [`TriggerRegistry`] that turn scroll position into
//!   phase transitions and progress
//! - timelines in a [`TimelineEngine`], either clock-driven by toggle actions
//!   or scrubbed by zone progress
//! - pinned regions ([`PinController`]) and parallax bindings ([`ParallaxMapper`])
//! - breakpoint rules in a [`ResponsiveGate`]
//!
//! Input is queued through [`ScrollScene::scroll_to`] / [`ScrollScene::resize`]
//! and applied once per [`ScrollScene::frame`]. Whole page sections implement
//! [`Section`] and are mounted and unmounted as a unit.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod document;
pub(crate) mod parallax;
pub(crate) mod pin;
pub(crate) mod responsive;
pub(crate) mod scene;
pub(crate) mod scroll;
pub(crate) mod sections;
pub(crate) mod trigger;

pub use crate::foundation::core::{
    BindingId, ElementId, MountId, PlaceholderId, Rect, RuleId, ScrollSample, TimelineId, Vec2,
    Viewport, ZoneId,
};
pub use crate::foundation::error::{ScrollweaveError, ScrollweaveResult};

pub use crate::animation::ease::{Ease, EaseDir};
pub use crate::animation::engine::{PlayDirection, PlayState, TimelineEngine, TimelineEvent};
pub use crate::animation::property::{ElementStyle, Property, PropertyMap, props};
pub use crate::animation::timeline::{
    Position, ResolvedTween, Stagger, StaggerFrom, StepSpec, Timeline, TimelineSpec,
    TimelineState,
};
pub use crate::document::model::{
    Document, LayoutState, ParallaxOffset, Placeholder, RenderedElement, StyleBatch, StyleWrite,
};
pub use crate::parallax::mapper::{ParallaxBinding, ParallaxMapper, ParallaxSource};
pub use crate::pin::controller::{PinController, PinEvent, PinState};
pub use crate::responsive::gate::{
    Branch, BranchHost, BreakpointChange, GateEvaluation, ResponsiveGate,
};
pub use crate::responsive::media::MediaQuery;
pub use crate::scene::scroll_scene::{
    AnimationHandle, FrameReport, MeasureFn, Measured, Scope, ScrollScene, ZoneEvent,
};
pub use crate::scene::section::{MountCtx, Section};
pub use crate::scene::spec::{
    AnimationSpec, BranchSpec, BreakpointSpec, ElementSpec, ParallaxSpec, SceneSpec, SectionSpec,
    SetSpec, SpecIssue,
};
pub use crate::scroll::boundary::{
    Anchor, Boundary, Edge, EndBoundary, Length, ZoneWindow, resolve_window,
    resolve_window_checked,
};
pub use crate::scroll::signal::{ScrollSignal, SignalFlush};
pub use crate::sections::deco::Deco;
pub use crate::sections::education::EducationSection;
pub use crate::sections::hero::HeroSection;
pub use crate::sections::projects::{ProjectsSection, strip_distance};
pub use crate::sections::reveal::RevealSection;
pub use crate::sections::skills::{PortalGeometry, SkillCard, SkillsSection};
pub use crate::trigger::config::{Scrub, TriggerConfig};
pub use crate::trigger::phase::{PhaseTransition, PhaseWalk, ZonePhase, walk};
pub use crate::trigger::registry::{RegistryTick, TriggerRegistry, ZoneListener, ZoneTick};
pub use crate::trigger::toggle::{ActivationPolicy, ToggleAction, ToggleActions, ToggleSlot};
