use crate::{
    animation::ease::{Ease, EaseDir},
    animation::property::{Property, PropertyMap},
    animation::timeline::{Position, StepSpec, TimelineSpec},
    foundation::core::ElementId,
    foundation::error::ScrollweaveResult,
    scene::section::{MountCtx, Section},
};

const POWER3_OUT: Ease = Ease::Power {
    power: 3,
    dir: EaseDir::Out,
};
const SHAPE_DURATION: f64 = 1.3;

struct ShapeReveal {
    delay: f64,
    from: &'static [(Property, f64)],
    to: &'static [(Property, f64)],
    ease: Ease,
}

const fn elastic(amplitude: f64, period: f64) -> Ease {
    Ease::Elastic {
        dir: EaseDir::Out,
        amplitude,
        period,
    }
}

/// Entrance of the floating shapes, one per slot; extra shapes reuse the table cyclically.
const SHAPES: [ShapeReveal; 5] = [
    ShapeReveal {
        delay: 0.7,
        from: &[
            (Property::Opacity, 0.0),
            (Property::X, -60.0),
            (Property::Rotate, -45.0),
            (Property::Scale, 0.5),
        ],
        to: &[
            (Property::Opacity, 1.0),
            (Property::X, 0.0),
            (Property::Rotate, -15.0),
            (Property::Scale, 1.0),
        ],
        ease: elastic(1.0, 0.6),
    },
    ShapeReveal {
        delay: 0.8,
        from: &[
            (Property::Opacity, 0.0),
            (Property::Y, 50.0),
            (Property::Scale, 0.3),
        ],
        to: &[
            (Property::Opacity, 1.0),
            (Property::Y, 0.0),
            (Property::Scale, 1.0),
        ],
        ease: elastic(1.0, 0.7),
    },
    ShapeReveal {
        delay: 0.9,
        from: &[
            (Property::Opacity, 0.0),
            (Property::X, 70.0),
            (Property::Rotate, 30.0),
            (Property::Scale, 0.6),
        ],
        to: &[
            (Property::Opacity, 1.0),
            (Property::X, 0.0),
            (Property::Rotate, 10.0),
            (Property::Scale, 1.0),
        ],
        ease: Ease::Back {
            dir: EaseDir::Out,
            overshoot: 1.4,
        },
    },
    ShapeReveal {
        delay: 1.0,
        from: &[
            (Property::Opacity, 0.0),
            (Property::Y, -50.0),
            (Property::Scale, 0.4),
        ],
        to: &[
            (Property::Opacity, 1.0),
            (Property::Y, 0.0),
            (Property::Scale, 1.0),
        ],
        ease: elastic(1.0, 0.5),
    },
    ShapeReveal {
        delay: 1.1,
        from: &[(Property::Opacity, 0.0), (Property::Scale, 0.2)],
        to: &[(Property::Opacity, 1.0), (Property::Scale, 1.0)],
        ease: elastic(1.0, 0.5),
    },
];

fn map(pairs: &[(Property, f64)]) -> PropertyMap {
    pairs.iter().copied().collect()
}

fn step(
    target: ElementId,
    from: &[(Property, f64)],
    to: &[(Property, f64)],
    secs: f64,
) -> StepSpec {
    StepSpec::from_to([target], map(from), map(to))
        .duration(secs)
        .ease(POWER3_OUT)
}

/// Landing block: a page-load intro for the text panel plus the floating shapes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub panel: ElementId,
    pub name: ElementId,
    pub title: ElementId,
    pub subtitle: ElementId,
    pub cta: ElementId,
    #[serde(default)]
    pub shapes: Vec<ElementId>,
}

impl HeroSection {
    /// The text intro: panel fades up, then name, title, subtitle and button overlap in.
    pub fn intro(&self) -> ScrollweaveResult<TimelineSpec> {
        Ok(TimelineSpec::new()
            .step(
                step(
                    self.panel,
                    &[
                        (Property::Opacity, 0.0),
                        (Property::Y, 30.0),
                        (Property::Scale, 0.95),
                        (Property::Blur, 8.0),
                    ],
                    &[
                        (Property::Opacity, 1.0),
                        (Property::Y, 0.0),
                        (Property::Scale, 1.0),
                        (Property::Blur, 0.0),
                    ],
                    1.2,
                )
                .at(Position::Absolute(0.5)),
            )
            .step(
                step(
                    self.name,
                    &[
                        (Property::Opacity, 0.0),
                        (Property::Y, 60.0),
                        (Property::SkewX, -8.0),
                    ],
                    &[
                        (Property::Opacity, 1.0),
                        (Property::Y, 0.0),
                        (Property::SkewX, 0.0),
                    ],
                    0.9,
                )
                .at_str("<0.4")?,
            )
            .step(
                step(
                    self.title,
                    &[(Property::Opacity, 0.0), (Property::Y, 40.0)],
                    &[(Property::Opacity, 1.0), (Property::Y, 0.0)],
                    0.7,
                )
                .at_str("-=0.6")?,
            )
            .step(
                step(
                    self.subtitle,
                    &[(Property::Opacity, 0.0), (Property::Y, 30.0)],
                    &[(Property::Opacity, 1.0), (Property::Y, 0.0)],
                    0.6,
                )
                .at_str("-=0.5")?,
            )
            .step(
                step(
                    self.cta,
                    &[(Property::Opacity, 0.0), (Property::Scale, 0.8)],
                    &[(Property::Opacity, 1.0), (Property::Scale, 1.0)],
                    0.5,
                )
                .at_str("-=0.4")?,
            ))
    }

    pub fn shape_intros(&self) -> Vec<TimelineSpec> {
        self.shapes
            .iter()
            .zip(SHAPES.iter().cycle())
            .map(|(&shape, r)| {
                TimelineSpec::new().delay(r.delay).step(
                    StepSpec::from_to([shape], map(r.from), map(r.to))
                        .duration(SHAPE_DURATION)
                        .ease(r.ease),
                )
            })
            .collect()
    }
}

impl Section for HeroSection {
    fn name(&self) -> &str {
        "hero"
    }

    fn elements(&self) -> Vec<ElementId> {
        let mut ids = vec![self.panel, self.name, self.title, self.subtitle, self.cta];
        ids.extend(&self.shapes);
        ids
    }

    fn mount(&self, ctx: &mut MountCtx<'_>) -> ScrollweaveResult<()> {
        ctx.intro(&self.intro()?)?;
        for spec in self.shape_intros() {
            ctx.intro(&spec)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sections/hero.rs"]
mod tests;
