use crate::{
    animation::ease::{Ease, EaseDir},
    animation::property::PropertyMap,
    animation::timeline::{StepSpec, TimelineSpec},
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scene::section::{MountCtx, Section},
    scroll::boundary::{Boundary, Edge},
    trigger::config::TriggerConfig,
    trigger::toggle::ToggleActions,
};

/// `fromTo` reveal played when a trigger crosses into view.
///
/// With an explicit `trigger` all targets share one zone and are staggered.
/// Without one, every target gets its own zone on itself.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealSection {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub trigger: Option<ElementId>,
    pub targets: Vec<ElementId>,
    pub from: PropertyMap,
    pub to: PropertyMap,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_ease")]
    pub ease: Ease,
    #[serde(default)]
    pub stagger: f64,
    #[serde(default)]
    pub delay: f64,
    #[serde(default = "default_start")]
    pub start: Boundary,
    #[serde(default = "ToggleActions::replay")]
    pub toggle_actions: ToggleActions,
}

fn default_name() -> String {
    "reveal".to_string()
}

fn default_duration() -> f64 {
    1.0
}

fn default_ease() -> Ease {
    Ease::Power {
        power: 3,
        dir: EaseDir::Out,
    }
}

fn default_start() -> Boundary {
    Boundary::new(Edge::Top, Edge::Percent(85.0))
}

impl RevealSection {
    pub fn new(
        name: impl Into<String>,
        targets: impl IntoIterator<Item = ElementId>,
        from: PropertyMap,
        to: PropertyMap,
    ) -> Self {
        Self {
            name: name.into(),
            trigger: None,
            targets: targets.into_iter().collect(),
            from,
            to,
            duration: default_duration(),
            ease: default_ease(),
            stagger: 0.0,
            delay: 0.0,
            start: default_start(),
            toggle_actions: ToggleActions::replay(),
        }
    }

    pub fn trigger(mut self, trigger: ElementId) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn stagger(mut self, each: f64) -> Self {
        self.stagger = each;
        self
    }

    pub fn delay(mut self, secs: f64) -> Self {
        self.delay = secs;
        self
    }

    pub fn start(mut self, start: Boundary) -> Self {
        self.start = start;
        self
    }

    pub fn toggle_actions(mut self, actions: ToggleActions) -> Self {
        self.toggle_actions = actions;
        self
    }

    fn timeline(&self, targets: Vec<ElementId>) -> TimelineSpec {
        let mut step = StepSpec::from_to(targets, self.from.clone(), self.to.clone())
            .duration(self.duration)
            .ease(self.ease);
        if self.stagger > 0.0 {
            step = step.stagger(self.stagger);
        }
        TimelineSpec::new().delay(self.delay).step(step)
    }

    fn zone(&self, trigger: ElementId) -> TriggerConfig {
        TriggerConfig::new(trigger)
            .start(self.start)
            .toggle_actions(self.toggle_actions)
    }
}

impl Section for RevealSection {
    fn name(&self) -> &str {
        &self.name
    }

    fn elements(&self) -> Vec<ElementId> {
        self.trigger.iter().chain(&self.targets).copied().collect()
    }

    fn mount(&self, ctx: &mut MountCtx<'_>) -> ScrollweaveResult<()> {
        if self.targets.is_empty() {
            return Err(ScrollweaveError::config(format!(
                "reveal '{}' has no targets",
                self.name
            )));
        }
        match self.trigger {
            Some(trigger) => {
                ctx.animate(self.zone(trigger), &self.timeline(self.targets.clone()))?;
            }
            None => {
                for &target in &self.targets {
                    ctx.animate(self.zone(target), &self.timeline(vec![target]))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sections/reveal.rs"]
mod tests;
