use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::engine::{PlayState, TimelineEngine, TimelineEvent},
    animation::property::{Property, PropertyMap},
    animation::timeline::{TimelineSpec, TimelineState},
    document::model::{Document, RenderedElement, StyleBatch},
    foundation::core::{
        BindingId, ElementId, IdGen, MountId, Rect, RuleId, TimelineId, Viewport, ZoneId,
    },
    foundation::error::ScrollweaveResult,
    parallax::mapper::{ParallaxBinding, ParallaxMapper},
    pin::controller::{PinController, PinEvent},
    responsive::gate::{BranchHost, BreakpointChange, ResponsiveGate},
    responsive::media::MediaQuery,
    scene::section::{MountCtx, Section},
    scroll::boundary::EndBoundary,
    scroll::signal::ScrollSignal,
    trigger::config::{Scrub, TriggerConfig},
    trigger::phase::PhaseTransition,
    trigger::registry::TriggerRegistry,
    trigger::toggle::{ActivationPolicy, ToggleAction, ToggleActions, ToggleSlot},
};

/// Exponential catch-up rate for lagged scrub; ~95% of the gap closes in `lag` seconds.
const SCRUB_RATE: f64 = 3.0;
const SCRUB_SNAP: f64 = 1e-4;
/// Upper bound on refresh passes while pin spacing settles.
const REFRESH_PASSES: usize = 4;

/// Output of a layout-dependent animation builder.
#[derive(Clone, Debug, PartialEq)]
pub struct Measured {
    pub timeline: TimelineSpec,
    /// Replaces the zone end with [`EndBoundary::Distance`] when set.
    pub end_distance: Option<f64>,
}

/// Rebuilds an animation from the current layout on every refresh.
pub type MeasureFn = Box<dyn Fn(&Document) -> ScrollweaveResult<Measured>>;

/// Everything one mount (or one breakpoint branch) registered.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Scope {
    pub zones: Vec<ZoneId>,
    pub timelines: Vec<TimelineId>,
    pub bindings: Vec<BindingId>,
    pub rules: Vec<RuleId>,
}

impl Scope {
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
            && self.timelines.is_empty()
            && self.bindings.is_empty()
            && self.rules.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AnimationHandle {
    pub timeline: TimelineId,
    /// `None` when the trigger was missing and the end state was applied instead.
    pub zone: Option<ZoneId>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ZoneEvent {
    pub zone: ZoneId,
    pub transition: PhaseTransition,
}

/// What happened during one [`ScrollScene::frame`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub scroll_y: f64,
    pub resized: bool,
    pub breakpoints: Vec<BreakpointChange>,
    /// Breakpoint rules whose branch failed to build this frame.
    pub failed_rules: Vec<RuleId>,
    pub transitions: Vec<ZoneEvent>,
    pub timeline_events: Vec<TimelineEvent>,
    pub pins: Vec<PinEvent>,
    /// Zones dropped because their trigger element left the document.
    pub dropped_zones: Vec<ZoneId>,
    /// Elements whose writes were skipped because they are gone.
    pub skipped: Vec<ElementId>,
}

struct Driver {
    zone: Option<ZoneId>,
    policy: ActivationPolicy,
    scrub: Scrub,
    actions: ToggleActions,
    applied: Option<f64>,
    /// Channels this timeline has written since they last went dormant.
    live: BTreeSet<(ElementId, Property)>,
}

impl Driver {
    /// Runs on its own clock with no zone attached.
    fn clock() -> Self {
        Self {
            zone: None,
            policy: ActivationPolicy::PlayOnce,
            scrub: Scrub::Off,
            actions: ToggleActions::default(),
            applied: None,
            live: BTreeSet::new(),
        }
    }

    fn zone(zone: ZoneId, policy: ActivationPolicy, config: &TriggerConfig) -> Self {
        Self {
            zone: Some(zone),
            policy,
            scrub: config.scrub,
            actions: config.toggle_actions,
            ..Self::clock()
        }
    }

    fn is_scrubbed(&self) -> bool {
        self.zone.is_some() && self.policy == ActivationPolicy::Scrub
    }
}

struct Measurer {
    measure: MeasureFn,
    bases: BTreeMap<(ElementId, Property), f64>,
}

impl Measurer {
    fn base(&self, el: ElementId, p: Property) -> f64 {
        self.bases
            .get(&(el, p))
            .copied()
            .unwrap_or(p.default_value())
    }
}

struct Mounted {
    name: String,
    scope: Scope,
}

/// Scheduler context owned by the page: one document, one scroll container,
/// and every zone, timeline, pin, parallax binding and breakpoint rule
/// registered against them.
///
/// Each [`ScrollScene::frame`] runs three strict phases: input sampling, then
/// evaluation into a write batch, then document mutation.
pub struct ScrollScene {
    doc: Document,
    signal: ScrollSignal,
    registry: TriggerRegistry,
    engine: TimelineEngine,
    pins: PinController,
    parallax: ParallaxMapper,
    gate: ResponsiveGate<ScrollScene>,
    drivers: BTreeMap<TimelineId, Driver>,
    measured: BTreeMap<TimelineId, Measurer>,
    recording: Vec<Scope>,
    mounts: BTreeMap<MountId, Mounted>,
    mount_ids: IdGen,
    gate_busy: bool,
    orphan_rules: Vec<RuleId>,
    pending_events: Vec<TimelineEvent>,
    needs_refresh: bool,
}

impl std::fmt::Debug for ScrollScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollScene")
            .field("zones", &self.registry.len())
            .field("timelines", &self.engine.len())
            .field("pins", &self.pins.len())
            .field("bindings", &self.parallax.len())
            .field("rules", &self.gate.len())
            .field("mounts", &self.mounts.len())
            .finish()
    }
}

impl ScrollScene {
    pub fn new(viewport: Viewport, content_height: f64) -> Self {
        Self::with_document(Document::new(viewport, content_height))
    }

    pub fn with_document(doc: Document) -> Self {
        Self {
            signal: ScrollSignal::new(doc.viewport()),
            doc,
            registry: TriggerRegistry::new(),
            engine: TimelineEngine::new(),
            pins: PinController::new(),
            parallax: ParallaxMapper::new(),
            gate: ResponsiveGate::new(),
            drivers: BTreeMap::new(),
            measured: BTreeMap::new(),
            recording: Vec::new(),
            mounts: BTreeMap::new(),
            mount_ids: IdGen::default(),
            gate_busy: false,
            orphan_rules: Vec::new(),
            pending_events: Vec::new(),
            needs_refresh: true,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &TimelineEngine {
        &self.engine
    }

    pub fn pins(&self) -> &PinController {
        &self.pins
    }

    pub fn parallax(&self) -> &ParallaxMapper {
        &self.parallax
    }

    pub fn gate(&self) -> &ResponsiveGate<ScrollScene> {
        &self.gate
    }

    pub fn signal(&self) -> &ScrollSignal {
        &self.signal
    }

    pub fn scroll_y(&self) -> f64 {
        self.doc.scroll_y()
    }

    pub fn rendered(&self, id: ElementId) -> Option<RenderedElement> {
        self.doc.rendered(id)
    }

    // ---- host input -------------------------------------------------------

    /// Queue a scroll offset; applied by the next frame.
    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.signal.on_scroll(scroll_y);
    }

    /// Queue a viewport change; applied by the next frame.
    pub fn resize(&mut self, viewport: Viewport) {
        self.signal.on_resize(viewport);
    }

    pub fn insert_element(&mut self, name: impl Into<String>, rect: Rect) -> ElementId {
        self.needs_refresh = true;
        self.doc.insert(name, rect)
    }

    pub fn insert_child(
        &mut self,
        parent: ElementId,
        name: impl Into<String>,
        rect: Rect,
    ) -> ScrollweaveResult<ElementId> {
        self.needs_refresh = true;
        self.doc.insert_child(parent, name, rect)
    }

    /// Detach an element. Zones it triggers are dropped on the next frame.
    pub fn remove_element(&mut self, id: ElementId) -> bool {
        self.needs_refresh = true;
        self.doc.remove(id)
    }

    pub fn resize_element(&mut self, id: ElementId, rect: Rect) -> bool {
        self.needs_refresh = true;
        self.doc.set_rect(id, rect)
    }

    pub fn set_content_height(&mut self, h: f64) {
        self.needs_refresh = true;
        self.doc.set_content_height(h);
    }

    /// Write values straight to an element's style.
    pub fn set(&mut self, element: ElementId, values: &PropertyMap) -> bool {
        let Some(mut style) = self.doc.style(element) else {
            tracing::debug!(%element, "set skipped: element not in document");
            return false;
        };
        style.apply(values);
        self.doc.set_style(element, style)
    }

    // ---- registration -----------------------------------------------------

    fn record(&mut self, f: impl FnOnce(&mut Scope)) {
        if let Some(scope) = self.recording.last_mut() {
            f(scope);
        }
    }

    /// Bind a timeline to a trigger zone.
    ///
    /// A trigger that is not in the document degrades to the timeline's end
    /// state with no zone.
    #[tracing::instrument(skip_all, fields(trigger = %config.trigger))]
    pub fn animate(
        &mut self,
        config: TriggerConfig,
        spec: &TimelineSpec,
    ) -> ScrollweaveResult<AnimationHandle> {
        let timeline = spec.build(|el, p| self.doc.property(el, p))?;
        if !self.doc.contains(config.trigger) {
            tracing::warn!("trigger element missing; showing end state");
            let tid = self.engine.insert(timeline);
            self.engine.complete(tid)?;
            self.drivers.insert(tid, Driver::clock());
            self.record(|s| s.timelines.push(tid));
            return Ok(AnimationHandle {
                timeline: tid,
                zone: None,
            });
        }

        let zone = self.track(config.clone())?;
        let policy = self.registry.policy(zone)?;
        let tid = self.engine.insert(timeline);
        self.drivers.insert(tid, Driver::zone(zone, policy, &config));
        self.record(|s| s.timelines.push(tid));
        Ok(AnimationHandle {
            timeline: tid,
            zone: Some(zone),
        })
    }

    /// Like [`ScrollScene::animate`], but the timeline (and optionally the zone
    /// length) is rebuilt from the layout on every refresh.
    pub fn animate_measured(
        &mut self,
        mut config: TriggerConfig,
        measure: impl Fn(&Document) -> ScrollweaveResult<Measured> + 'static,
    ) -> ScrollweaveResult<AnimationHandle> {
        let first = measure(&self.doc)?;
        if let Some(d) = first.end_distance {
            config.end = EndBoundary::Distance(d);
        }
        let mut bases = BTreeMap::new();
        for step in &first.timeline.steps {
            for &el in &step.targets {
                for p in Property::ALL {
                    bases.insert((el, p), self.doc.property(el, p));
                }
            }
        }
        let handle = self.animate(config, &first.timeline)?;
        if handle.zone.is_some() {
            self.measured.insert(
                handle.timeline,
                Measurer {
                    measure: Box::new(measure),
                    bases,
                },
            );
        }
        Ok(handle)
    }

    /// Register a zone with no timeline of its own (parallax source, listeners, pins).
    pub fn track(&mut self, config: TriggerConfig) -> ScrollweaveResult<ZoneId> {
        let zone = self.registry.register(config.clone(), &self.doc)?;
        if config.pin {
            let window = self.registry.window(zone)?;
            if let Err(e) =
                self.pins
                    .add(zone, config.trigger, window, config.pin_spacing, &mut self.doc)
            {
                self.registry.unregister(zone);
                return Err(e);
            }
            self.needs_refresh = true;
        }
        self.record(|s| s.zones.push(zone));
        Ok(zone)
    }

    /// A timeline that starts playing immediately and is not bound to scroll.
    pub fn intro(&mut self, spec: &TimelineSpec) -> ScrollweaveResult<TimelineId> {
        let tid = self.engine.build(spec, |el, p| self.doc.property(el, p))?;
        if let Some(ev) = self.engine.play(tid)? {
            self.pending_events.push(ev);
        }
        self.drivers.insert(tid, Driver::clock());
        self.record(|s| s.timelines.push(tid));
        Ok(tid)
    }

    pub fn bind_parallax(&mut self, binding: ParallaxBinding) -> BindingId {
        let id = self.parallax.bind_with(binding);
        self.record(|s| s.bindings.push(id));
        id
    }

    /// Exactly one of `enable`/`disable` is live for `query` at a time.
    /// Handles created inside a branch are disposed when it switches.
    pub fn on_breakpoint_change(
        &mut self,
        query: MediaQuery,
        enable: impl FnMut(&mut ScrollScene) -> ScrollweaveResult<()> + 'static,
        disable: impl FnMut(&mut ScrollScene) -> ScrollweaveResult<()> + 'static,
    ) -> RuleId {
        let id = self.gate.on_breakpoint_change(query, enable, disable);
        self.record(|s| s.rules.push(id));
        id
    }

    pub fn on_transition(
        &mut self,
        zone: ZoneId,
        f: impl FnMut(ZoneId, PhaseTransition) + 'static,
    ) -> ScrollweaveResult<()> {
        self.registry.set_listener(zone, f)
    }

    #[tracing::instrument(skip_all, fields(section = section.name()))]
    pub fn mount(&mut self, section: &dyn Section) -> ScrollweaveResult<MountId> {
        self.open_scope();
        let built = section.mount(&mut MountCtx::new(self));
        let scope = self.close_scope();
        if let Err(e) = built {
            self.dispose(scope);
            return Err(e);
        }
        let id = MountId(self.mount_ids.next());
        tracing::debug!(%id, ?scope, "section mounted");
        self.mounts.insert(
            id,
            Mounted {
                name: section.name().to_string(),
                scope,
            },
        );
        Ok(id)
    }

    /// Dispose everything the mount registered, synchronously.
    pub fn unmount(&mut self, id: MountId) -> bool {
        let Some(m) = self.mounts.remove(&id) else {
            return false;
        };
        tracing::debug!(%id, name = %m.name, "section unmounted");
        self.dispose(m.scope);
        true
    }

    pub fn mounted(&self, id: MountId) -> Option<&Scope> {
        self.mounts.get(&id).map(|m| &m.scope)
    }

    pub fn mount_ids(&self) -> impl Iterator<Item = MountId> + '_ {
        self.mounts.keys().copied()
    }

    pub fn dispose_animation(&mut self, handle: AnimationHandle) {
        self.dispose_timeline(handle.timeline);
        if let Some(zone) = handle.zone {
            self.dispose_zone(zone);
        }
    }

    pub fn dispose_zone(&mut self, zone: ZoneId) {
        self.registry.unregister(zone);
        self.drop_zone_dependents(zone);
    }

    fn dispose_timeline(&mut self, tid: TimelineId) {
        self.engine.dispose(tid);
        self.drivers.remove(&tid);
        self.measured.remove(&tid);
    }

    fn drop_zone_dependents(&mut self, zone: ZoneId) {
        if self.pins.remove(zone, &mut self.doc) {
            self.needs_refresh = true;
        }
        self.parallax.unbind_zone(zone);
        let owned: Vec<TimelineId> = self
            .drivers
            .iter()
            .filter(|(_, d)| d.zone == Some(zone))
            .map(|(&tid, _)| tid)
            .collect();
        for tid in owned {
            self.dispose_timeline(tid);
        }
    }

    fn dispose(&mut self, scope: Scope) {
        for rule in scope.rules {
            if self.gate.contains(rule) {
                if let Some(inner) = self.gate.remove(rule) {
                    self.dispose(inner);
                }
            } else if self.gate_busy {
                self.orphan_rules.push(rule);
            }
        }
        for tid in scope.timelines {
            self.dispose_timeline(tid);
        }
        for zone in scope.zones {
            self.dispose_zone(zone);
        }
        for b in scope.bindings {
            self.parallax.remove(b);
        }
    }

    // ---- frame loop -------------------------------------------------------

    /// Force window re-resolution on the next frame.
    pub fn invalidate(&mut self) {
        self.needs_refresh = true;
    }

    fn refresh(&mut self) {
        self.needs_refresh = false;
        for (&tid, m) in &self.measured {
            let zone = self.drivers.get(&tid).and_then(|d| d.zone);
            let rebuilt = (m.measure)(&self.doc).and_then(|out| {
                let tl = out.timeline.build(|el, p| m.base(el, p))?;
                Ok((tl, out.end_distance))
            });
            match rebuilt {
                Ok((tl, end)) => {
                    if let Err(e) = self.engine.replace(tid, tl) {
                        tracing::warn!(%tid, error = %e, "measured timeline replace failed");
                    }
                    if let (Some(d), Some(zone)) = (end, zone)
                        && let Err(e) = self.registry.set_end(zone, EndBoundary::Distance(d))
                    {
                        tracing::warn!(%zone, error = %e, "measured zone end update failed");
                    }
                }
                Err(e) => tracing::warn!(%tid, error = %e, "measure failed; keeping previous timeline"),
            }
        }

        let zones: Vec<ZoneId> = self.registry.ids().collect();
        for pass in 0..REFRESH_PASSES {
            let mut changed = false;
            for &zone in &zones {
                let before = self.registry.window(zone).ok();
                match self.registry.refresh(zone, &self.doc) {
                    Ok(Some(w)) => {
                        changed |= before != Some(w);
                        if self.pins.contains(zone)
                            && let Err(e) = self.pins.update(zone, w, &mut self.doc)
                        {
                            tracing::warn!(%zone, error = %e, "pin update failed");
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(%zone, error = %e, "zone refresh failed"),
                }
            }
            if !changed {
                tracing::debug!(passes = pass + 1, "refresh settled");
                break;
            }
        }
    }

    fn evaluate_gate(&mut self, report: &mut FrameReport) {
        let width = self.doc.viewport().width;
        // Branches may register further rules; give them a chance to run this frame too.
        for _ in 0..REFRESH_PASSES {
            if self.gate.is_empty() {
                return;
            }
            let successor = self.gate.successor();
            let mut gate = std::mem::replace(&mut self.gate, successor);
            self.gate_busy = true;
            let result = gate.evaluate(width, self);
            self.gate_busy = false;
            let added = std::mem::replace(&mut self.gate, gate);
            let more = !added.is_empty();
            self.gate.absorb(added);
            for rule in std::mem::take(&mut self.orphan_rules) {
                if let Some(scope) = self.gate.remove(rule) {
                    self.dispose(scope);
                }
            }
            if !result.changes.is_empty() {
                self.needs_refresh = true;
            }
            report.breakpoints.extend(result.changes);
            for (rule, e) in result.failures {
                tracing::warn!(%rule, error = %e, "breakpoint branch failed");
                report.failed_rules.push(rule);
            }
            if !more {
                break;
            }
        }
    }

    fn dispatch_toggle(&mut self, zone: ZoneId, slot: ToggleSlot, report: &mut FrameReport) {
        let targets: Vec<(TimelineId, ToggleAction)> = self
            .drivers
            .iter()
            .filter(|(_, d)| d.zone == Some(zone) && d.policy != ActivationPolicy::Scrub)
            .map(|(&tid, d)| (tid, d.actions.action(slot)))
            .collect();
        for (tid, action) in targets {
            let engine = &mut self.engine;
            let outcome = match action {
                ToggleAction::Play => engine.play(tid),
                ToggleAction::Pause => engine.pause(tid).map(|_| None),
                ToggleAction::Resume => engine.resume(tid),
                ToggleAction::Reverse => engine.reverse(tid),
                ToggleAction::Restart => engine.restart(tid),
                ToggleAction::Reset => engine.reset(tid).map(|_| None),
                ToggleAction::Complete => engine.complete(tid).map(|_| None),
                ToggleAction::None => Ok(None),
            };
            match outcome {
                Ok(Some(ev)) => report.timeline_events.push(ev),
                Ok(None) => {}
                Err(e) => tracing::warn!(%tid, error = %e, "toggle action failed"),
            }
        }
    }

    /// Advance the scene by one animation frame of `dt` seconds.
    ///
    /// Never fails: per-frame problems are logged and reported, not raised.
    #[tracing::instrument(skip(self))]
    pub fn frame(&mut self, dt: f64) -> FrameReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut report = FrameReport {
            timeline_events: std::mem::take(&mut self.pending_events),
            ..FrameReport::default()
        };

        // Input sampling.
        let height = self.doc.scroll_height();
        let flush = self
            .signal
            .flush(|y, vp| y.clamp(0.0, (height - vp.height).max(0.0)));
        report.frame = flush.sample.frame;
        report.resized = flush.resized;
        if flush.resized {
            self.doc.set_viewport(flush.sample.viewport);
            self.needs_refresh = true;
        }
        self.evaluate_gate(&mut report);
        if self.needs_refresh {
            self.refresh();
        }
        let scroll = self.doc.set_scroll_y(flush.sample.scroll_y);
        self.signal.settle(scroll);
        report.scroll_y = scroll;

        // Evaluation.
        let tick = self.registry.tick_all(&self.doc, scroll);
        for zone in tick.removed {
            self.drop_zone_dependents(zone);
            report.dropped_zones.push(zone);
        }
        for zt in &tick.zones {
            for &transition in &zt.transitions {
                report.transitions.push(ZoneEvent {
                    zone: zt.zone,
                    transition,
                });
                if let Some(slot) = transition.slot() {
                    self.dispatch_toggle(zt.zone, slot, &mut report);
                }
            }
        }
        report.timeline_events.extend(self.engine.advance(dt));

        let progress: BTreeMap<ZoneId, f64> =
            tick.zones.iter().map(|z| (z.zone, z.progress)).collect();
        let mut reverts = StyleBatch::new();
        let mut batch = StyleBatch::new();
        for (&tid, d) in self.drivers.iter_mut() {
            let state = if d.is_scrubbed() {
                let Some(&target) = d.zone.and_then(|z| progress.get(&z)) else {
                    continue;
                };
                let applied = smooth(d.applied, target, dt, d.scrub);
                d.applied = Some(applied);
                self.engine.evaluate(tid, applied)
            } else {
                self.engine.sample(tid)
            };
            match state {
                Ok(state) => queue_state(&state, &mut d.live, &mut reverts, &mut batch),
                Err(e) => tracing::warn!(%tid, error = %e, "timeline evaluation failed"),
            }
        }
        self.parallax
            .tick(scroll, |z| progress.get(&z).copied(), &self.doc, &mut batch);

        // Mutation.
        report.pins = self.pins.tick(scroll, &mut self.doc);
        let mut skipped = self.doc.commit(reverts);
        skipped.extend(self.doc.commit(batch));
        report.skipped = skipped.into_iter().collect();
        report
    }

    /// Run frames until lagged scrubs and clock-driven timelines settle, up to `max_frames`.
    pub fn settle(&mut self, dt: f64, max_frames: usize) -> Vec<FrameReport> {
        let mut reports = Vec::new();
        for _ in 0..max_frames {
            let r = self.frame(dt);
            reports.push(r);
            if self.is_settled() {
                break;
            }
        }
        reports
    }

    /// No clock running and every scrub caught up with its zone.
    pub fn is_settled(&self) -> bool {
        let clocks_idle = self.engine.ids().all(|id| {
            !matches!(self.engine.state(id), Ok(PlayState::Playing(_)))
        });
        let scrubs_caught_up = self.drivers.values().all(|d| {
            !d.is_scrubbed()
                || match (d.zone.and_then(|z| self.registry.progress(z).ok()), d.applied) {
                    (Some(target), Some(applied)) => target == applied,
                    _ => true,
                }
        });
        clocks_idle && scrubs_caught_up
    }
}

fn smooth(prev: Option<f64>, target: f64, dt: f64, scrub: Scrub) -> f64 {
    let Some(prev) = prev else {
        return target;
    };
    match scrub {
        Scrub::Lag(lag) if dt > 0.0 => {
            let k = 1.0 - (-dt * SCRUB_RATE / lag).exp();
            let v = prev + (target - prev) * k;
            if (target - v).abs() < SCRUB_SNAP {
                target
            } else {
                v
            }
        }
        Scrub::Lag(_) => prev,
        Scrub::Immediate | Scrub::Off => target,
    }
}

fn queue_state(
    state: &TimelineState,
    live: &mut BTreeSet<(ElementId, Property)>,
    reverts: &mut StyleBatch,
    batch: &mut StyleBatch,
) {
    for (el, p, v, dormant) in state.iter() {
        if dormant {
            // Undo an earlier write once; any live writer this frame lands on top.
            if live.remove(&(el, p)) {
                reverts.write(el, p, v);
            }
        } else {
            live.insert((el, p));
            batch.write(el, p, v);
        }
    }
}

impl BranchHost for ScrollScene {
    type Scope = Scope;

    fn open_scope(&mut self) {
        self.recording.push(Scope::default());
    }

    fn close_scope(&mut self) -> Scope {
        self.recording.pop().unwrap_or_default()
    }

    fn dispose_scope(&mut self, scope: Scope) {
        self.dispose(scope);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scroll_scene.rs"]
mod tests;
