use crate::{
    animation::ease::{Ease, EaseDir},
    animation::property::{Property, props},
    animation::timeline::{StepSpec, TimelineSpec},
    foundation::core::ElementId,
    foundation::error::ScrollweaveResult,
    scene::section::{MountCtx, Section},
    scroll::boundary::{Boundary, Edge, EndBoundary},
    sections::deco::{Deco, Scatter},
    sections::reveal::RevealSection,
    trigger::config::{Scrub, TriggerConfig},
};

const LINE_SCRUB: f64 = 1.5;
const CARD_SHIFT: f64 = 80.0;

const DECO_SCATTER: Scatter = Scatter {
    x: 30.0,
    y: 45.0,
    scale: 0.7,
    duration: 1.5,
    delay: 0.2,
    delay_step: 0.03,
};

/// Vertical timeline of education entries with alternating cards.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationSection {
    pub section: ElementId,
    pub title: ElementId,
    /// Grows from nothing to full height as the section scrolls past.
    pub line: ElementId,
    pub cards: Vec<ElementId>,
    #[serde(default)]
    pub decos: Vec<Deco>,
}

impl EducationSection {
    fn title_reveal(&self) -> RevealSection {
        RevealSection::new(
            "education-title",
            [self.title],
            props([
                (Property::Opacity, 0.0),
                (Property::Y, 60.0),
                (Property::Scale, 0.9),
            ]),
            props([
                (Property::Opacity, 1.0),
                (Property::Y, 0.0),
                (Property::Scale, 1.0),
            ]),
        )
        .ease(Ease::Expo(EaseDir::Out))
    }

    /// Cards alternate sides; even ones come in from the left.
    fn card_reveal(&self, index: usize, card: ElementId) -> RevealSection {
        let x = if index % 2 == 0 { -CARD_SHIFT } else { CARD_SHIFT };
        RevealSection::new(
            format!("education-card-{index}"),
            [card],
            props([
                (Property::Opacity, 0.0),
                (Property::X, x),
                (Property::Y, 50.0),
                (Property::Scale, 0.95),
            ]),
            props([
                (Property::Opacity, 1.0),
                (Property::X, 0.0),
                (Property::Y, 0.0),
                (Property::Scale, 1.0),
            ]),
        )
    }

    fn line_zone(&self) -> TriggerConfig {
        TriggerConfig::new(self.section)
            .start(Boundary::new(Edge::Top, Edge::Percent(50.0)))
            .end(EndBoundary::Edge(Boundary::new(
                Edge::Bottom,
                Edge::Percent(70.0),
            )))
            .scrub(Scrub::Lag(LINE_SCRUB))
    }

    fn line_timeline(&self) -> TimelineSpec {
        TimelineSpec::new().step(
            StepSpec::from_to(
                [self.line],
                props([(Property::ScaleY, 0.0), (Property::Opacity, 0.0)]),
                props([(Property::ScaleY, 1.0), (Property::Opacity, 1.0)]),
            )
            .ease(Ease::Linear),
        )
    }

    /// Depth drift: up to `depth × 20%` of the decoration's own height over the
    /// whole pass of the section, with deeper decorations lagging more.
    fn deco_drift(&self, deco: &Deco) -> Option<(TriggerConfig, TimelineSpec)> {
        if deco.depth == 0.0 {
            return None;
        }
        let zone = TriggerConfig::new(self.section)
            .start(Boundary::default_start())
            .end(EndBoundary::Edge(Boundary::default_end()))
            .scrub(Scrub::Lag(LINE_SCRUB + deco.depth.abs()));
        let mut to = props([(Property::YPercent, -deco.depth * 20.0)]);
        if deco.drift.x != 0.0 {
            to.insert(Property::XPercent, deco.drift.x * deco.depth);
        }
        let timeline = TimelineSpec::new()
            .step(StepSpec::to([deco.element], to).ease(Ease::Linear));
        Some((zone, timeline))
    }
}

impl Section for EducationSection {
    fn name(&self) -> &str {
        "education"
    }

    fn elements(&self) -> Vec<ElementId> {
        let mut ids = vec![self.section, self.title, self.line];
        ids.extend(&self.cards);
        ids.extend(self.decos.iter().map(|d| d.element));
        ids
    }

    fn mount(&self, ctx: &mut MountCtx<'_>) -> ScrollweaveResult<()> {
        self.title_reveal().mount(ctx)?;
        ctx.animate(self.line_zone(), &self.line_timeline())?;
        for (i, &card) in self.cards.iter().enumerate() {
            self.card_reveal(i, card).mount(ctx)?;
        }
        for (i, deco) in self.decos.iter().enumerate() {
            deco.reveal(i, &DECO_SCATTER).mount(ctx)?;
            if let Some((zone, timeline)) = self.deco_drift(deco) {
                ctx.animate(zone, &timeline)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sections/education.rs"]
mod tests;
