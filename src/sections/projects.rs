use crate::{
    animation::ease::{Ease, EaseDir},
    animation::property::{Property, props},
    animation::timeline::{StepSpec, TimelineSpec},
    document::model::Document,
    foundation::core::ElementId,
    foundation::error::ScrollweaveResult,
    responsive::media::MediaQuery,
    scene::scroll_scene::{Measured, ScrollScene},
    scene::section::{MountCtx, Section},
    scroll::boundary::{Boundary, Edge},
    sections::deco::{Deco, Scatter},
    sections::reveal::RevealSection,
    trigger::config::{Scrub, TriggerConfig},
};

/// The pin lasts this much longer than the horizontal travel.
const PIN_STRETCH: f64 = 1.2;
const STRIP_SCRUB: f64 = 1.5;
const DESKTOP_MIN_WIDTH: f64 = 768.0;

const DECO_SCATTER: Scatter = Scatter {
    x: 35.0,
    y: 60.0,
    scale: 0.6,
    duration: 1.2,
    delay: 0.5,
    delay_step: 0.05,
};

fn default_breakpoint() -> MediaQuery {
    MediaQuery::min_width(DESKTOP_MIN_WIDTH)
}

/// Project cards on a horizontal strip, scrolled sideways while the section is pinned.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsSection {
    pub section: ElementId,
    pub title: ElementId,
    /// Pinned while the strip travels.
    pub wrapper: ElementId,
    pub strip: ElementId,
    pub cards: Vec<ElementId>,
    #[serde(default)]
    pub decos: Vec<Deco>,
    /// Horizontal scrolling only runs while this matches.
    #[serde(default = "default_breakpoint")]
    pub breakpoint: MediaQuery,
}

/// Horizontal distance the strip travels so the last card ends up centered.
///
/// `max(0, content − viewport + viewport/2 − last/2)`; zero when everything fits.
pub fn strip_distance(doc: &Document, cards: &[ElementId]) -> f64 {
    let widths: Vec<f64> = cards
        .iter()
        .filter_map(|&c| doc.rect(c).map(|r| r.width()))
        .collect();
    let Some(&last) = widths.last() else {
        return 0.0;
    };
    let content: f64 = widths.iter().sum();
    let vw = doc.viewport().width;
    (content - vw + vw * 0.5 - last * 0.5).max(0.0)
}

fn strip_timeline(strip: ElementId, distance: f64) -> TimelineSpec {
    TimelineSpec::new().step(
        StepSpec::to([strip], props([(Property::X, -distance)]))
            .duration(1.0)
            .ease(Ease::Linear),
    )
}

#[derive(Clone, Debug)]
struct Strip {
    wrapper: ElementId,
    strip: ElementId,
    cards: Vec<ElementId>,
    decos: Vec<Deco>,
}

impl Strip {
    fn enable(&self, scene: &mut ScrollScene) -> ScrollweaveResult<()> {
        let distance = strip_distance(scene.document(), &self.cards);
        if distance <= 0.0 {
            tracing::debug!("project cards fit the viewport; no horizontal scroll");
            scene.set(self.strip, &props([(Property::X, 0.0)]));
            return Ok(());
        }
        let config = TriggerConfig::new(self.wrapper)
            .start(Boundary::new(Edge::Top, Edge::Top))
            .scrub(Scrub::Lag(STRIP_SCRUB))
            .pin();
        let (strip, cards) = (self.strip, self.cards.clone());
        let handle = scene.animate_measured(config, move |doc| {
            let d = strip_distance(doc, &cards);
            Ok(Measured {
                timeline: strip_timeline(strip, d),
                end_distance: Some((d * PIN_STRETCH).max(1.0)),
            })
        })?;
        if let Some(zone) = handle.zone {
            for deco in &self.decos {
                scene.bind_parallax(deco.binding(deco.drift, zone));
            }
        }
        Ok(())
    }

    fn disable(&self, scene: &mut ScrollScene) -> ScrollweaveResult<()> {
        scene.set(self.strip, &props([(Property::X, 0.0)]));
        Ok(())
    }
}

impl ProjectsSection {
    fn title_reveal(&self) -> RevealSection {
        RevealSection::new(
            "projects-title",
            [self.title],
            props([
                (Property::Opacity, 0.0),
                (Property::Y, 80.0),
                (Property::Scale, 0.8),
            ]),
            props([
                (Property::Opacity, 1.0),
                (Property::Y, 0.0),
                (Property::Scale, 1.0),
            ]),
        )
        .trigger(self.section)
        .duration(1.2)
        .ease(Ease::Expo(EaseDir::Out))
        .start(Boundary::new(Edge::Top, Edge::Percent(75.0)))
    }
}

impl Section for ProjectsSection {
    fn name(&self) -> &str {
        "projects"
    }

    fn elements(&self) -> Vec<ElementId> {
        let mut ids = vec![self.section, self.title, self.wrapper, self.strip];
        ids.extend(&self.cards);
        ids.extend(self.decos.iter().map(|d| d.element));
        ids
    }

    fn mount(&self, ctx: &mut MountCtx<'_>) -> ScrollweaveResult<()> {
        self.title_reveal().mount(ctx)?;
        for (i, deco) in self.decos.iter().enumerate() {
            deco.reveal(i, &DECO_SCATTER).mount(ctx)?;
        }

        let strip = Strip {
            wrapper: ctx.require(self.wrapper, "projects wrapper")?,
            strip: ctx.require(self.strip, "project strip")?,
            cards: self.cards.clone(),
            decos: self.decos.clone(),
        };
        let off = strip.clone();
        ctx.on_breakpoint_change(
            self.breakpoint,
            move |scene| strip.enable(scene),
            move |scene| off.disable(scene),
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sections/projects.rs"]
mod tests;
