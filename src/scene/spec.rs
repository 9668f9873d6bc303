use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::{
    animation::property::PropertyMap,
    animation::timeline::TimelineSpec,
    document::model::Document,
    foundation::core::{ElementId, Rect, Vec2, Viewport},
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    parallax::mapper::{ParallaxBinding, ParallaxSource},
    responsive::media::MediaQuery,
    scene::scroll_scene::{AnimationHandle, ScrollScene},
    scene::section::Section,
    scroll::boundary::resolve_window_checked,
    sections::education::EducationSection,
    sections::hero::HeroSection,
    sections::projects::ProjectsSection,
    sections::reveal::RevealSection,
    sections::skills::SkillsSection,
    trigger::config::TriggerConfig,
};

/// JSON description of a page and everything animated on it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SceneSpec {
    pub viewport: Viewport,
    pub content_height: f64,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
    #[serde(default)]
    pub animations: Vec<AnimationSpec>,
    #[serde(default)]
    pub intros: Vec<TimelineSpec>,
    #[serde(default)]
    pub parallax: Vec<ParallaxSpec>,
    #[serde(default)]
    pub breakpoints: Vec<BreakpointSpec>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

/// Elements are inserted in order; a parent must come before its children.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSpec {
    pub id: ElementId,
    pub name: String,
    #[serde(default)]
    pub parent: Option<ElementId>,
    pub rect: Rect,
    /// Initial style values.
    #[serde(default)]
    pub style: PropertyMap,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSpec {
    pub trigger: TriggerConfig,
    pub timeline: TimelineSpec,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParallaxSpec {
    pub element: ElementId,
    pub depth: Vec2,
    #[serde(default)]
    pub rotate: f64,
    /// Scroll offset the delta is measured from.
    #[serde(default)]
    pub origin: f64,
    /// Drive from the zone of `animations[i]` instead of raw scroll.
    #[serde(default)]
    pub animation: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BranchSpec {
    #[serde(default)]
    pub animations: Vec<AnimationSpec>,
    #[serde(default)]
    pub set: Vec<SetSpec>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SetSpec {
    pub element: ElementId,
    pub props: PropertyMap,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BreakpointSpec {
    pub query: MediaQuery,
    #[serde(default)]
    pub enable: BranchSpec,
    #[serde(default)]
    pub disable: BranchSpec,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SectionSpec {
    Hero(HeroSection),
    Reveal(RevealSection),
    Projects(ProjectsSection),
    Skills(SkillsSection),
    Education(EducationSection),
}

impl SectionSpec {
    pub fn as_section(&self) -> &dyn Section {
        match self {
            Self::Hero(s) => s,
            Self::Reveal(s) => s,
            Self::Projects(s) => s,
            Self::Skills(s) => s,
            Self::Education(s) => s,
        }
    }
}

impl BranchSpec {
    fn apply(&self, scene: &mut ScrollScene) -> ScrollweaveResult<()> {
        for a in &self.animations {
            scene.animate(a.trigger.clone(), &a.timeline)?;
        }
        for s in &self.set {
            scene.set(s.element, &s.props);
        }
        Ok(())
    }
}

/// One problem found by [`SceneSpec::issues`], located by a JSON path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecIssue {
    pub path: String,
    pub message: String,
}

impl SpecIssue {
    fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SpecIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

struct Checker<'a> {
    known: BTreeSet<ElementId>,
    doc: Option<&'a Document>,
    issues: Vec<SpecIssue>,
}

impl Checker<'_> {
    fn element(&mut self, path: &str, id: ElementId) {
        if !self.known.contains(&id) {
            self.issues
                .push(SpecIssue::at(path, format!("{id} is not declared in $.elements")));
        }
    }

    fn timeline(&mut self, path: &str, t: &TimelineSpec) {
        for (i, step) in t.steps.iter().enumerate() {
            for (j, &target) in step.targets.iter().enumerate() {
                self.element(&format!("{path}.steps[{i}].targets[{j}]"), target);
            }
        }
        if let Err(e) = t.build(|_, p| p.default_value()) {
            self.issues.push(SpecIssue::at(path, e.to_string()));
        }
    }

    fn animation(&mut self, path: &str, a: &AnimationSpec) {
        let trigger = a.trigger.trigger;
        self.element(&format!("{path}.trigger.trigger"), trigger);
        self.timeline(&format!("{path}.timeline"), &a.timeline);
        if let Some(doc) = self.doc
            && let Err(e) = resolve_window_checked(doc, trigger, &a.trigger.start, &a.trigger.end)
        {
            self.issues
                .push(SpecIssue::at(format!("{path}.trigger"), e.to_string()));
        }
    }
}

impl SceneSpec {
    pub fn from_json(s: &str) -> ScrollweaveResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ScrollweaveResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScrollweaveError::config(format!("read scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// The document described by `elements`, without any animation.
    pub fn document(&self) -> ScrollweaveResult<Document> {
        let viewport = Viewport::new(self.viewport.width, self.viewport.height)?;
        let mut doc = Document::new(viewport, self.content_height);
        for e in &self.elements {
            if let Some(parent) = e.parent
                && !doc.contains(parent)
            {
                return Err(ScrollweaveError::config(format!(
                    "parent {parent} of {} must be declared before it",
                    e.id
                )));
            }
            doc.insert_with_id(e.id, e.name.clone(), e.parent, e.rect)?;
            if !e.style.is_empty()
                && let Some(mut style) = doc.style(e.id)
            {
                style.apply(&e.style);
                doc.set_style(e.id, style);
            }
        }
        Ok(doc)
    }

    /// Every problem in the description, in document order.
    pub fn issues(&self) -> Vec<SpecIssue> {
        let mut issues = Vec::new();
        if Viewport::new(self.viewport.width, self.viewport.height).is_err() {
            issues.push(SpecIssue::at("$.viewport", "width and height must be > 0"));
        }
        if !(self.content_height.is_finite() && self.content_height >= 0.0) {
            issues.push(SpecIssue::at("$.contentHeight", "must be >= 0"));
        }

        let mut known = BTreeSet::new();
        for (i, e) in self.elements.iter().enumerate() {
            let path = format!("$.elements[{i}]");
            if !known.insert(e.id) {
                issues.push(SpecIssue::at(&path, format!("duplicate {}", e.id)));
            }
            if let Some(parent) = e.parent
                && (parent == e.id || !known.contains(&parent))
            {
                issues.push(SpecIssue::at(
                    format!("{path}.parent"),
                    format!("{parent} must be declared before its children"),
                ));
            }
            let r = e.rect;
            if ![r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite()) || r.x1 < r.x0 || r.y1 < r.y0
            {
                issues.push(SpecIssue::at(format!("{path}.rect"), "rect must be finite and non-negative"));
            }
        }

        // Window checks need a document; skip them if the element table is broken.
        let doc = if issues.is_empty() { self.document().ok() } else { None };
        let mut c = Checker {
            known,
            doc: doc.as_ref(),
            issues,
        };

        for (i, a) in self.animations.iter().enumerate() {
            c.animation(&format!("$.animations[{i}]"), a);
        }
        for (i, t) in self.intros.iter().enumerate() {
            c.timeline(&format!("$.intros[{i}]"), t);
        }
        for (i, p) in self.parallax.iter().enumerate() {
            let path = format!("$.parallax[{i}]");
            c.element(&format!("{path}.element"), p.element);
            if let Some(a) = p.animation
                && a >= self.animations.len()
            {
                c.issues.push(SpecIssue::at(
                    format!("{path}.animation"),
                    format!("index {a} out of range ({} animations)", self.animations.len()),
                ));
            }
        }
        for (i, b) in self.breakpoints.iter().enumerate() {
            for (branch, spec) in [("enable", &b.enable), ("disable", &b.disable)] {
                let path = format!("$.breakpoints[{i}].{branch}");
                for (j, a) in spec.animations.iter().enumerate() {
                    c.animation(&format!("{path}.animations[{j}]"), a);
                }
                for (j, s) in spec.set.iter().enumerate() {
                    c.element(&format!("{path}.set[{j}].element"), s.element);
                }
            }
        }
        for (i, s) in self.sections.iter().enumerate() {
            let path = format!("$.sections[{i}]");
            for id in s.as_section().elements() {
                c.element(&path, id);
            }
        }
        c.issues
    }

    pub fn validate(&self) -> ScrollweaveResult<()> {
        let issues = self.issues();
        if issues.is_empty() {
            return Ok(());
        }
        let lines: Vec<String> = issues.iter().map(ToString::to_string).collect();
        Err(ScrollweaveError::config(format!(
            "scene validation failed:\n{}",
            lines.join("\n")
        )))
    }
}

impl ScrollScene {
    /// Validate `spec` and register everything it describes.
    #[tracing::instrument(skip_all, fields(elements = spec.elements.len()))]
    pub fn from_spec(spec: &SceneSpec) -> ScrollweaveResult<Self> {
        spec.validate()?;
        let mut scene = ScrollScene::with_document(spec.document()?);

        let mut handles: Vec<AnimationHandle> = Vec::with_capacity(spec.animations.len());
        for a in &spec.animations {
            handles.push(scene.animate(a.trigger.clone(), &a.timeline)?);
        }
        for t in &spec.intros {
            scene.intro(t)?;
        }
        for p in &spec.parallax {
            let source = match p.animation {
                None => ParallaxSource::Scroll { origin: p.origin },
                Some(i) => match handles.get(i).and_then(|h| h.zone) {
                    Some(zone) => ParallaxSource::Zone { zone },
                    None => {
                        tracing::warn!(element = %p.element, animation = i, "parallax source has no zone; skipped");
                        continue;
                    }
                },
            };
            scene.bind_parallax(
                ParallaxBinding::new(p.element, p.depth)
                    .rotate(p.rotate)
                    .source(source),
            );
        }
        for b in &spec.breakpoints {
            let (enable, disable) = (b.enable.clone(), b.disable.clone());
            scene.on_breakpoint_change(
                b.query,
                move |s| enable.apply(s),
                move |s| disable.apply(s),
            );
        }
        for s in &spec.sections {
            scene.mount(s.as_section())?;
        }
        tracing::info!(
            zones = scene.registry().len(),
            timelines = scene.engine().len(),
            "scene loaded"
        );
        Ok(scene)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/spec.rs"]
mod tests;
