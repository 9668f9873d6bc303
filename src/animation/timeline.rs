use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::{
    animation::ease::Ease,
    animation::property::{Property, PropertyMap},
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    foundation::math::{clamp01, lerp},
};

const DEFAULT_STEP_DURATION: f64 = 0.5;

/// Where a step starts on its timeline.
///
/// Textual forms: `1.2` (absolute seconds), `"+=0.2"` / `"-=0.6"` (current end of
/// the timeline ± δ), `"<"` / `"<0.4"` (previous step's start ± δ), `">"` / `">-0.05"`
/// (previous step's end ± δ), `"intro"` / `"intro+=0.3"` (start of the step labelled
/// `intro` ± δ). [`Position::AnchorEnd`] is only reachable through the object form
/// `{ "anchor": "intro", "edge": "end", "delta": 0.1 }`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "PositionRepr", into = "PositionRepr")]
pub enum Position {
    Absolute(f64),
    Append(f64),
    WithPrevious(f64),
    AfterPrevious(f64),
    AnchorStart { label: String, delta: f64 },
    AnchorEnd { label: String, delta: f64 },
}

impl Default for Position {
    fn default() -> Self {
        Self::Append(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
enum AnchorEdge {
    #[default]
    Start,
    End,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum PositionRepr {
    Seconds(f64),
    Text(String),
    Anchor {
        anchor: String,
        #[serde(default)]
        edge: AnchorEdge,
        #[serde(default)]
        delta: f64,
    },
}

fn parse_delta(s: &str, whole: &str) -> ScrollweaveResult<f64> {
    if s.is_empty() {
        return Ok(0.0);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ScrollweaveError::config(format!("invalid timeline position '{whole}'")))
}

impl FromStr for Position {
    type Err = ScrollweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        if let Some(rest) = s.strip_prefix("+=") {
            return Ok(Self::Append(parse_delta(rest, s)?));
        }
        if let Some(rest) = s.strip_prefix("-=") {
            return Ok(Self::Append(-parse_delta(rest, s)?));
        }
        if let Some(rest) = s.strip_prefix('<') {
            return Ok(Self::WithPrevious(parse_delta(rest, s)?));
        }
        if let Some(rest) = s.strip_prefix('>') {
            return Ok(Self::AfterPrevious(parse_delta(rest, s)?));
        }
        if s.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-') {
            return Ok(Self::Absolute(parse_delta(s, s)?));
        }

        let (label, delta) = match (s.find("+="), s.find("-=")) {
            (Some(i), _) => (&s[..i], parse_delta(&s[i + 2..], s)?),
            (None, Some(i)) => (&s[..i], -parse_delta(&s[i + 2..], s)?),
            (None, None) => (s, 0.0),
        };
        if label.is_empty() || !label.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ScrollweaveError::config(format!(
                "invalid timeline position '{s}'"
            )));
        }
        Ok(Self::AnchorStart {
            label: label.to_string(),
            delta,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn signed(f: &mut fmt::Formatter<'_>, d: f64) -> fmt::Result {
            if d < 0.0 {
                write!(f, "-={}", -d)
            } else {
                write!(f, "+={d}")
            }
        }
        match self {
            Self::Absolute(v) => write!(f, "{v}"),
            Self::Append(d) => signed(f, *d),
            Self::WithPrevious(d) if *d == 0.0 => f.write_str("<"),
            Self::WithPrevious(d) => write!(f, "<{d}"),
            Self::AfterPrevious(d) if *d == 0.0 => f.write_str(">"),
            Self::AfterPrevious(d) => write!(f, ">{d}"),
            Self::AnchorStart { label, delta } => {
                f.write_str(label)?;
                if *delta != 0.0 {
                    signed(f, *delta)?;
                }
                Ok(())
            }
            Self::AnchorEnd { label, delta } => write!(f, "{label}(end){delta:+}"),
        }
    }
}

impl TryFrom<PositionRepr> for Position {
    type Error = ScrollweaveError;

    fn try_from(r: PositionRepr) -> Result<Self, Self::Error> {
        match r {
            PositionRepr::Seconds(v) => Ok(Self::Absolute(v)),
            PositionRepr::Text(s) => s.parse(),
            PositionRepr::Anchor {
                anchor,
                edge,
                delta,
            } => Ok(match edge {
                AnchorEdge::Start => Self::AnchorStart {
                    label: anchor,
                    delta,
                },
                AnchorEdge::End => Self::AnchorEnd {
                    label: anchor,
                    delta,
                },
            }),
        }
    }
}

impl From<Position> for PositionRepr {
    fn from(p: Position) -> Self {
        match p {
            Position::Absolute(v) => Self::Seconds(v),
            Position::AnchorEnd { label, delta } => Self::Anchor {
                anchor: label,
                edge: AnchorEdge::End,
                delta,
            },
            other => Self::Text(other.to_string()),
        }
    }
}

/// Which element of a staggered step starts first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerFrom {
    #[default]
    Start,
    End,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stagger {
    /// Seconds between consecutive element starts.
    pub each: f64,
    #[serde(default)]
    pub from: StaggerFrom,
}

impl Stagger {
    pub fn each(each: f64) -> Self {
        Self {
            each,
            from: StaggerFrom::Start,
        }
    }

    /// Delay multiplier for target `index` out of `count`.
    fn slot(self, index: usize, count: usize) -> f64 {
        match self.from {
            StaggerFrom::Start => index as f64,
            StaggerFrom::End => (count - 1 - index) as f64,
            StaggerFrom::Center => (index as f64 - (count - 1) as f64 / 2.0).abs(),
        }
    }

    fn span_slots(self, count: usize) -> f64 {
        (0..count).map(|i| self.slot(i, count)).fold(0.0, f64::max)
    }
}

/// One declarative tween: `targets` move from `from` (or their inherited state) to `to`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepSpec {
    pub targets: Vec<ElementId>,
    #[serde(default)]
    pub from: Option<PropertyMap>,
    pub to: PropertyMap,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub ease: Ease,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub stagger: Option<Stagger>,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_duration() -> f64 {
    DEFAULT_STEP_DURATION
}

impl StepSpec {
    /// Tween from the channel's inherited state to `to`.
    pub fn to(targets: impl IntoIterator<Item = ElementId>, to: PropertyMap) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            from: None,
            to,
            duration: DEFAULT_STEP_DURATION,
            ease: Ease::default(),
            position: Position::default(),
            stagger: None,
            label: None,
        }
    }

    /// Tween with an explicit start state.
    pub fn from_to(
        targets: impl IntoIterator<Item = ElementId>,
        from: PropertyMap,
        to: PropertyMap,
    ) -> Self {
        Self {
            from: Some(from),
            ..Self::to(targets, to)
        }
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Parse-and-set shorthand for [`StepSpec::at`].
    pub fn at_str(self, position: &str) -> ScrollweaveResult<Self> {
        Ok(self.at(position.parse()?))
    }

    pub fn stagger(mut self, each: f64) -> Self {
        self.stagger = Some(Stagger::each(each));
        self
    }

    pub fn stagger_with(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn span(&self) -> f64 {
        let slots = match self.stagger {
            Some(st) if self.targets.len() > 1 => st.span_slots(self.targets.len()) * st.each,
            _ => 0.0,
        };
        slots + self.duration
    }

    fn name(&self, index: usize) -> String {
        match &self.label {
            Some(l) => format!("'{l}'"),
            None => format!("#{index}"),
        }
    }
}

/// Immutable timeline descriptor: an ordered list of steps plus an optional lead-in.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineSpec {
    pub steps: Vec<StepSpec>,
    /// Seconds added before every step.
    #[serde(default)]
    pub delay: f64,
}

impl TimelineSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(mut self, secs: f64) -> Self {
        self.delay = secs;
        self
    }

    pub fn step(mut self, step: StepSpec) -> Self {
        self.steps.push(step);
        self
    }

    pub fn validate(&self) -> ScrollweaveResult<()> {
        if !(self.delay.is_finite() && self.delay >= 0.0) {
            return Err(ScrollweaveError::config("timeline delay must be >= 0"));
        }
        let mut labels = BTreeSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            let name = step.name(i);
            if step.targets.is_empty() {
                return Err(ScrollweaveError::config(format!(
                    "step {name} has no targets"
                )));
            }
            if step.to.is_empty() {
                return Err(ScrollweaveError::config(format!(
                    "step {name} animates no properties"
                )));
            }
            if !(step.duration.is_finite() && step.duration >= 0.0) {
                return Err(ScrollweaveError::config(format!(
                    "step {name} duration must be >= 0"
                )));
            }
            if let Some(st) = step.stagger
                && !(st.each.is_finite() && st.each >= 0.0)
            {
                return Err(ScrollweaveError::config(format!(
                    "step {name} stagger must be >= 0"
                )));
            }
            if let Some(l) = &step.label
                && !labels.insert(l.as_str())
            {
                return Err(ScrollweaveError::config(format!(
                    "duplicate step label '{l}'"
                )));
            }
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let Position::AnchorStart { label, .. } | Position::AnchorEnd { label, .. } =
                &step.position
                && !labels.contains(label.as_str())
            {
                return Err(ScrollweaveError::config(format!(
                    "step {} anchors to unknown label '{label}'",
                    step.name(i)
                )));
            }
        }
        Ok(())
    }

    /// Resolve relative offsets and expand staggers into a sampled [`Timeline`].
    ///
    /// `base` supplies the value a channel has before any tween touches it; it is
    /// consulted only for steps without an explicit start state.
    pub fn build(&self, base: impl Fn(ElementId, Property) -> f64) -> ScrollweaveResult<Timeline> {
        self.validate()?;
        let starts = resolve_step_starts(&self.steps)?;

        let mut tweens = Vec::new();
        for (step_index, (step, &start)) in self.steps.iter().zip(&starts).enumerate() {
            let count = step.targets.len();
            for (k, &target) in step.targets.iter().enumerate() {
                let offset = step
                    .stagger
                    .map_or(0.0, |st| st.slot(k, count) * st.each);
                for (&property, &to) in &step.to {
                    tweens.push(Tween {
                        target,
                        property,
                        from: step.from.as_ref().and_then(|m| m.get(&property).copied()),
                        to,
                        start: self.delay + start + offset,
                        duration: step.duration,
                        ease: step.ease,
                        step: step_index,
                    });
                }
            }
        }

        // Stable: ties keep declaration order, so a later declaration wins a shared start.
        tweens.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut channels: BTreeMap<(ElementId, Property), Vec<usize>> = BTreeMap::new();
        for (i, t) in tweens.iter().enumerate() {
            channels.entry((t.target, t.property)).or_default().push(i);
        }

        let mut resolved = Vec::with_capacity(tweens.len());
        let mut from_values = vec![0.0; tweens.len()];
        for (&(el, prop), idxs) in &channels {
            let mut carry = base(el, prop);
            for &i in idxs {
                from_values[i] = tweens[i].from.unwrap_or(carry);
                carry = tweens[i].to;
            }
        }
        for (i, t) in tweens.into_iter().enumerate() {
            resolved.push(ResolvedTween {
                target: t.target,
                property: t.property,
                from: from_values[i],
                to: t.to,
                start: t.start,
                duration: t.duration,
                ease: t.ease,
                step: t.step,
                explicit_from: t.from.is_some(),
            });
        }

        let steps_end = self
            .steps
            .iter()
            .zip(&starts)
            .map(|(s, &st)| self.delay + st + s.span())
            .fold(self.delay, f64::max);

        Ok(Timeline {
            tweens: resolved,
            channels,
            duration: steps_end,
        })
    }
}

struct Tween {
    target: ElementId,
    property: Property,
    from: Option<f64>,
    to: f64,
    start: f64,
    duration: f64,
    ease: Ease,
    step: usize,
}

/// Resolve every step's start time; relative positions become absolute seconds.
fn resolve_step_starts(steps: &[StepSpec]) -> ScrollweaveResult<Vec<f64>> {
    let n = steps.len();
    let by_label: HashMap<&str, usize> = steps
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.label.as_deref().map(|l| (l, i)))
        .collect();

    let mut deps: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, step) in steps.iter().enumerate() {
        deps[i] = match &step.position {
            Position::Absolute(_) => Vec::new(),
            Position::Append(_) => (0..i).collect(),
            Position::WithPrevious(_) | Position::AfterPrevious(_) => {
                if i == 0 {
                    Vec::new()
                } else {
                    vec![i - 1]
                }
            }
            Position::AnchorStart { label, .. } | Position::AnchorEnd { label, .. } => {
                let Some(&j) = by_label.get(label.as_str()) else {
                    return Err(ScrollweaveError::config(format!(
                        "unknown anchor label '{label}'"
                    )));
                };
                vec![j]
            }
        };
    }

    let mut outs: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indeg = vec![0usize; n];
    for (i, ds) in deps.iter().enumerate() {
        for &d in ds {
            outs[d].push(i);
            indeg[i] += 1;
        }
    }

    // Kahn topo with deterministic tie-break on declaration index.
    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| indeg[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &j in &outs[i] {
            indeg[j] -= 1;
            if indeg[j] == 0 {
                ready.insert(j);
            }
        }
    }

    if order.len() != n {
        let cycle = find_cycle(&outs);
        let path = cycle
            .iter()
            .map(|&i| steps[i].name(i))
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(ScrollweaveError::config(format!(
            "cyclic relative offsets: {path}"
        )));
    }

    let mut starts = vec![0.0f64; n];
    for &i in &order {
        let step = &steps[i];
        let end_of = |j: usize, starts: &[f64]| starts[j] + steps[j].span();
        let start = match &step.position {
            Position::Absolute(v) => *v,
            Position::Append(d) => (0..i).map(|j| end_of(j, &starts)).fold(0.0, f64::max) + d,
            Position::WithPrevious(d) => {
                if i == 0 {
                    *d
                } else {
                    starts[i - 1] + d
                }
            }
            Position::AfterPrevious(d) => {
                if i == 0 {
                    *d
                } else {
                    end_of(i - 1, &starts) + d
                }
            }
            Position::AnchorStart { label, delta } => starts[by_label[label.as_str()]] + delta,
            Position::AnchorEnd { label, delta } => {
                end_of(by_label[label.as_str()], &starts) + delta
            }
        };
        if start < 0.0 {
            tracing::debug!(step = %step.name(i), start, "negative step start clamped to 0");
        }
        starts[i] = start.max(0.0);
    }
    Ok(starts)
}

fn find_cycle(outs: &[Vec<usize>]) -> Vec<usize> {
    let n = outs.len();
    let mut state = vec![0u8; n]; // 0=unvisited,1=visiting,2=done
    let mut stack: Vec<usize> = Vec::new();

    fn dfs(
        v: usize,
        outs: &[Vec<usize>],
        state: &mut [u8],
        stack: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        state[v] = 1;
        stack.push(v);
        for &to in &outs[v] {
            match state[to] {
                0 => {
                    if let Some(c) = dfs(to, outs, state, stack) {
                        return Some(c);
                    }
                }
                1 => {
                    let pos = stack.iter().position(|&x| x == to).unwrap_or(0);
                    let mut cycle = stack[pos..].to_vec();
                    cycle.push(to);
                    return Some(cycle);
                }
                _ => {}
            }
        }
        stack.pop();
        state[v] = 2;
        None
    }

    for i in 0..n {
        if state[i] == 0
            && let Some(c) = dfs(i, outs, &mut state, &mut stack)
        {
            return c;
        }
    }
    Vec::new()
}

/// A single-channel tween with absolute timing.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedTween {
    pub target: ElementId,
    pub property: Property,
    pub from: f64,
    pub to: f64,
    /// Absolute start in seconds from the timeline origin.
    pub start: f64,
    pub duration: f64,
    pub ease: Ease,
    /// Index of the declaring step.
    pub step: usize,
    /// Declared with a start state, so it renders before it begins.
    pub explicit_from: bool,
}

impl ResolvedTween {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn value_at(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return if time >= self.start { self.to } else { self.from };
        }
        let t = clamp01((time - self.start) / self.duration);
        lerp(self.from, self.to, self.ease.apply(t))
    }
}

/// Property values of every channel a timeline drives, at one instant.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TimelineState {
    pub values: BTreeMap<ElementId, PropertyMap>,
    /// Channels whose first tween has not started and has no declared start
    /// state. Their value is the inherited one; drivers write it only to undo
    /// an earlier live write.
    #[serde(skip)]
    pub dormant: BTreeSet<(ElementId, Property)>,
}

impl TimelineState {
    pub fn get(&self, el: ElementId, p: Property) -> Option<f64> {
        self.values.get(&el).and_then(|m| m.get(&p)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_dormant(&self, el: ElementId, p: Property) -> bool {
        self.dormant.contains(&(el, p))
    }

    /// `(element, property, value, dormant)` in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, Property, f64, bool)> + '_ {
        self.values.iter().flat_map(move |(&el, m)| {
            m.iter()
                .map(move |(&p, &v)| (el, p, v, self.dormant.contains(&(el, p))))
        })
    }
}

/// A built timeline: tweens sorted by absolute start, grouped into channels.
///
/// Sampling is a pure function of time. For each channel the tween that started
/// most recently is authoritative; before any tween starts the channel shows the
/// first tween's start value.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    tweens: Vec<ResolvedTween>,
    channels: BTreeMap<(ElementId, Property), Vec<usize>>,
    duration: f64,
}

impl Timeline {
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Tweens ordered by non-decreasing start time.
    pub fn tweens(&self) -> &[ResolvedTween] {
        &self.tweens
    }

    pub fn targets(&self) -> BTreeSet<ElementId> {
        self.channels.keys().map(|(el, _)| *el).collect()
    }

    pub fn sample(&self, time: f64) -> TimelineState {
        let mut state = TimelineState::default();
        for (&(el, prop), idxs) in &self.channels {
            let active = idxs
                .iter()
                .rev()
                .map(|&i| &self.tweens[i])
                .find(|t| t.start <= time);
            let v = match active {
                Some(t) => t.value_at(time),
                None => {
                    let first = &self.tweens[idxs[0]];
                    if !first.explicit_from {
                        state.dormant.insert((el, prop));
                    }
                    first.from
                }
            };
            state.values.entry(el).or_default().insert(prop, v);
        }
        state
    }

    /// Sample at `progress ∈ [0, 1]` of the full duration.
    pub fn sample_progress(&self, progress: f64) -> TimelineState {
        self.sample(clamp01(progress) * self.duration)
    }

    /// State after every tween has finished.
    pub fn end_state(&self) -> TimelineState {
        self.sample(f64::INFINITY)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
