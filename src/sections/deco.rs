use crate::{
    animation::ease::{Ease, EaseDir},
    animation::property::{Property, props},
    foundation::core::{ElementId, Vec2, ZoneId},
    parallax::mapper::{ParallaxBinding, ParallaxSource},
    scroll::boundary::{Boundary, Edge},
    sections::reveal::RevealSection,
};

/// Decorative asset scattered around a section.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deco {
    pub element: ElementId,
    /// Resting opacity once revealed.
    #[serde(default = "full")]
    pub opacity: f64,
    /// Offset reached at the end of the driving zone.
    #[serde(default)]
    pub drift: Vec2,
    /// Also rotate by a tenth of the horizontal drift, in degrees.
    #[serde(default)]
    pub spin: bool,
    /// Depth factor for sections that derive the drift from the element height.
    #[serde(default)]
    pub depth: f64,
}

fn full() -> f64 {
    1.0
}

/// How far decorations are thrown before they settle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Scatter {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub duration: f64,
    pub delay: f64,
    pub delay_step: f64,
}

impl Deco {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            opacity: 1.0,
            drift: Vec2::ZERO,
            spin: false,
            depth: 0.0,
        }
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn drift(mut self, drift: Vec2) -> Self {
        self.drift = drift;
        self
    }

    pub fn spin(mut self) -> Self {
        self.spin = true;
        self
    }

    pub fn depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    /// Reveal from a scattered offset whose direction alternates with `index`.
    pub(crate) fn reveal(&self, index: usize, scatter: &Scatter) -> RevealSection {
        let y = if index % 2 == 0 { scatter.y } else { -scatter.y };
        let x = if index % 3 == 0 { scatter.x } else { -scatter.x };
        RevealSection::new(
            format!("deco-{index}"),
            [self.element],
            props([
                (Property::Opacity, 0.0),
                (Property::Scale, scatter.scale),
                (Property::X, x),
                (Property::Y, y),
            ]),
            props([
                (Property::Opacity, self.opacity),
                (Property::Scale, 1.0),
                (Property::X, 0.0),
                (Property::Y, 0.0),
            ]),
        )
        .duration(scatter.duration)
        .ease(Ease::Expo(EaseDir::Out))
        .delay(scatter.delay + index as f64 * scatter.delay_step)
        .start(Boundary::new(Edge::Top, Edge::Percent(95.0)))
    }

    /// Zone-progress parallax moving the decoration by `drift` across the zone.
    pub(crate) fn binding(&self, drift: Vec2, zone: ZoneId) -> ParallaxBinding {
        let spin = if self.spin { drift.x / 10.0 } else { 0.0 };
        ParallaxBinding::new(self.element, drift)
            .rotate(spin)
            .source(ParallaxSource::Zone { zone })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sections/deco.rs"]
mod tests;
