use crate::{
    animation::ease::{Ease, EaseDir},
    animation::property::{Property, props},
    animation::timeline::{Position, StepSpec, TimelineSpec},
    document::model::Document,
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scene::scroll_scene::Measured,
    scene::section::{MountCtx, Section},
    scroll::boundary::{Boundary, Edge},
    sections::reveal::RevealSection,
    trigger::config::{Scrub, TriggerConfig},
    trigger::toggle::ToggleActions,
};

const TITLE_ZOOM: f64 = 4.5;
const MASTER_SCRUB: f64 = 1.2;
const CARD_DELAY_STEP: f64 = 0.04;

fn default_pin_distance() -> f64 {
    3500.0
}

const fn ease(power: u8, dir: EaseDir) -> Ease {
    Ease::Power { power, dir }
}

/// One skill card with its level bar.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkillCard {
    pub card: ElementId,
    pub bar: ElementId,
    /// 0..=100
    pub level: f64,
}

/// Title that zooms into its "I", which opens into a viewport-filling portal
/// revealing the skill grid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsSection {
    pub section: ElementId,
    pub title: ElementId,
    pub letters: Vec<ElementId>,
    /// The letter the camera zooms into; must be one of `letters`.
    pub focus: ElementId,
    pub portal: ElementId,
    pub content: ElementId,
    #[serde(default)]
    pub cards: Vec<SkillCard>,
    #[serde(default = "default_pin_distance")]
    pub pin_distance: f64,
}

/// Geometry the master timeline is built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalGeometry {
    /// Title translation that centers the focus letter.
    pub target_x: f64,
    pub target_y: f64,
    /// Portal transform that lays it over the focus letter.
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl PortalGeometry {
    /// Focus letter relative to a section pinned at the top of the viewport.
    pub fn measure(doc: &Document, section: ElementId, focus: ElementId) -> ScrollweaveResult<Self> {
        let missing = |what: &str, id: ElementId| {
            ScrollweaveError::layout(format!("{what} ({id}) is not in the document"))
        };
        let s = doc.rect(section).ok_or_else(|| missing("skills section", section))?;
        let f = doc.rect(focus).ok_or_else(|| missing("focus letter", focus))?;
        let vp = doc.viewport();
        let c = f.center();
        let cx = c.x;
        let cy = c.y - s.y0;
        Ok(Self {
            target_x: vp.width / 2.0 - cx,
            target_y: vp.height / 2.0 - cy,
            scale_x: f.width() / vp.width,
            scale_y: f.height() / vp.height,
            offset_x: cx - vp.width / 2.0,
            offset_y: cy - vp.height / 2.0,
        })
    }
}

impl SkillsSection {
    fn others(&self) -> Vec<ElementId> {
        self.letters
            .iter()
            .copied()
            .filter(|&l| l != self.focus)
            .collect()
    }

    /// Zoom, fade, portal open, content in, portal out. Runs 1.25s of timeline time.
    pub fn master(&self, g: &PortalGeometry) -> ScrollweaveResult<TimelineSpec> {
        let in1 = ease(1, EaseDir::In);
        let over_focus = props([
            (Property::ScaleX, g.scale_x),
            (Property::ScaleY, g.scale_y),
            (Property::X, g.offset_x),
            (Property::Y, g.offset_y),
        ]);
        let mut portal_from = over_focus.clone();
        portal_from.insert(Property::Opacity, 0.0);
        let mut portal_to = over_focus;
        portal_to.insert(Property::Opacity, 1.0);

        let mut spec = TimelineSpec::new().step(
            StepSpec::to(
                [self.title],
                props([
                    (Property::X, g.target_x),
                    (Property::Y, g.target_y),
                    (Property::Scale, TITLE_ZOOM),
                ]),
            )
            .duration(0.5)
            .ease(ease(2, EaseDir::InOut))
            .at(Position::Absolute(0.0)),
        );
        let others = self.others();
        if !others.is_empty() {
            spec = spec.step(
                StepSpec::to(others, props([(Property::Opacity, 0.0)]))
                    .duration(0.25)
                    .ease(in1)
                    .at_str("<0.15")?,
            );
        }
        Ok(spec
            .step(
                StepSpec::to([self.focus], props([(Property::Opacity, 0.0)]))
                    .duration(0.2)
                    .ease(in1)
                    .at_str("<0.1")?,
            )
            .step(
                StepSpec::from_to([self.portal], portal_from, portal_to)
                    .duration(0.05)
                    .at_str("<")?,
            )
            .step(
                StepSpec::to(
                    [self.portal],
                    props([
                        (Property::ScaleX, 1.0),
                        (Property::ScaleY, 1.0),
                        (Property::X, 0.0),
                        (Property::Y, 0.0),
                    ]),
                )
                .duration(0.7)
                .ease(Ease::Expo(EaseDir::InOut))
                .at_str(">-0.05")?,
            )
            .step(
                StepSpec::to([self.title], props([(Property::Opacity, 0.0)]))
                    .duration(0.3)
                    .ease(in1)
                    .at_str("<0.2")?,
            )
            .step(
                StepSpec::from_to(
                    [self.content],
                    props([(Property::Opacity, 0.0), (Property::Scale, 0.9)]),
                    props([(Property::Opacity, 1.0), (Property::Scale, 1.0)]),
                )
                .duration(0.6)
                .ease(ease(3, EaseDir::Out))
                .at_str(">-0.4")?,
            )
            .step(
                StepSpec::to([self.portal], props([(Property::Opacity, 0.0)]))
                    .duration(0.5)
                    .ease(ease(1, EaseDir::InOut))
                    .at_str(">-0.2")?,
            ))
    }

    fn title_reveal(&self) -> RevealSection {
        RevealSection::new(
            "skills-title",
            self.letters.clone(),
            props([
                (Property::Opacity, 0.0),
                (Property::Y, 80.0),
                (Property::Scale, 0.5),
            ]),
            props([
                (Property::Opacity, 1.0),
                (Property::Y, 0.0),
                (Property::Scale, 1.0),
            ]),
        )
        .trigger(self.section)
        .stagger(0.07)
        .ease(Ease::Expo(EaseDir::Out))
        .start(Boundary::new(Edge::Top, Edge::Percent(80.0)))
    }

    fn card(&self, index: usize, c: &SkillCard) -> TimelineSpec {
        let delay = index as f64 * CARD_DELAY_STEP;
        TimelineSpec::new()
            .step(
                StepSpec::from_to(
                    [c.card],
                    props([
                        (Property::Opacity, 0.0),
                        (Property::Y, 50.0),
                        (Property::Scale, 0.9),
                    ]),
                    props([
                        (Property::Opacity, 1.0),
                        (Property::Y, 0.0),
                        (Property::Scale, 1.0),
                    ]),
                )
                .duration(0.8)
                .ease(ease(3, EaseDir::Out))
                .at(Position::Absolute(delay)),
            )
            .step(
                StepSpec::from_to(
                    [c.bar],
                    props([(Property::ScaleX, 0.0)]),
                    props([(Property::ScaleX, (c.level / 100.0).clamp(0.0, 1.0))]),
                )
                .duration(1.5)
                .ease(ease(2, EaseDir::InOut))
                .at(Position::Absolute(delay + 0.3)),
            )
    }
}

impl Section for SkillsSection {
    fn name(&self) -> &str {
        "skills"
    }

    fn elements(&self) -> Vec<ElementId> {
        let mut ids = vec![self.section, self.title, self.focus, self.portal, self.content];
        ids.extend(&self.letters);
        for c in &self.cards {
            ids.extend([c.card, c.bar]);
        }
        ids
    }

    fn mount(&self, ctx: &mut MountCtx<'_>) -> ScrollweaveResult<()> {
        if !self.letters.contains(&self.focus) {
            return Err(ScrollweaveError::config(format!(
                "focus letter {} is not one of the title letters",
                self.focus
            )));
        }
        self.title_reveal().mount(ctx)?;

        let config = TriggerConfig::new(self.section)
            .start(Boundary::new(Edge::Top, Edge::Top))
            .scrub(Scrub::Lag(MASTER_SCRUB))
            .pin();
        let this = self.clone();
        let distance = self.pin_distance;
        ctx.animate_measured(config, move |doc| {
            let g = PortalGeometry::measure(doc, this.section, this.focus)?;
            Ok(Measured {
                timeline: this.master(&g)?,
                end_distance: Some(distance),
            })
        })?;

        for (i, c) in self.cards.iter().enumerate() {
            let zone = TriggerConfig::new(c.card)
                .start(Boundary::new(Edge::Top, Edge::Percent(90.0)))
                .toggle_actions(ToggleActions::replay());
            ctx.animate(zone, &self.card(i, c))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sections/skills.rs"]
mod tests;
