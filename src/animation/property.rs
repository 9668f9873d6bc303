use std::collections::BTreeMap;

/// Animatable channel of an element.
///
/// Only compositor-level properties are exposed (transform, opacity, filter).
/// Nothing here can move sibling content; layout belongs to the pin controller.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    X,
    Y,
    XPercent,
    YPercent,
    Scale,
    ScaleX,
    ScaleY,
    /// Degrees.
    Rotate,
    /// Degrees.
    SkewX,
    Opacity,
    /// Blur radius in pixels.
    Blur,
}

impl Property {
    pub const ALL: [Property; 11] = [
        Property::X,
        Property::Y,
        Property::XPercent,
        Property::YPercent,
        Property::Scale,
        Property::ScaleX,
        Property::ScaleY,
        Property::Rotate,
        Property::SkewX,
        Property::Opacity,
        Property::Blur,
    ];

    /// Value an untouched element reports for this channel.
    pub fn default_value(self) -> f64 {
        match self {
            Self::Scale | Self::ScaleX | Self::ScaleY | Self::Opacity => 1.0,
            _ => 0.0,
        }
    }

    pub fn clamp(self, v: f64) -> f64 {
        match self {
            Self::Opacity => v.clamp(0.0, 1.0),
            Self::Blur => v.max(0.0),
            _ => v,
        }
    }
}

/// Property values keyed by channel; ordered for deterministic iteration.
pub type PropertyMap = BTreeMap<Property, f64>;

/// Build a [`PropertyMap`] from `(property, value)` pairs.
pub fn props<const N: usize>(pairs: [(Property, f64); N]) -> PropertyMap {
    pairs.into_iter().collect()
}

/// Transform/opacity/filter state an element currently renders with.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementStyle {
    pub x: f64,
    pub y: f64,
    pub x_percent: f64,
    pub y_percent: f64,
    pub scale: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotate: f64,
    pub skew_x: f64,
    pub opacity: f64,
    pub blur: f64,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            x_percent: 0.0,
            y_percent: 0.0,
            scale: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
            skew_x: 0.0,
            opacity: 1.0,
            blur: 0.0,
        }
    }
}

impl ElementStyle {
    pub fn get(&self, p: Property) -> f64 {
        match p {
            Property::X => self.x,
            Property::Y => self.y,
            Property::XPercent => self.x_percent,
            Property::YPercent => self.y_percent,
            Property::Scale => self.scale,
            Property::ScaleX => self.scale_x,
            Property::ScaleY => self.scale_y,
            Property::Rotate => self.rotate,
            Property::SkewX => self.skew_x,
            Property::Opacity => self.opacity,
            Property::Blur => self.blur,
        }
    }

    pub fn set(&mut self, p: Property, v: f64) {
        let v = p.clamp(v);
        let slot = match p {
            Property::X => &mut self.x,
            Property::Y => &mut self.y,
            Property::XPercent => &mut self.x_percent,
            Property::YPercent => &mut self.y_percent,
            Property::Scale => &mut self.scale,
            Property::ScaleX => &mut self.scale_x,
            Property::ScaleY => &mut self.scale_y,
            Property::Rotate => &mut self.rotate,
            Property::SkewX => &mut self.skew_x,
            Property::Opacity => &mut self.opacity,
            Property::Blur => &mut self.blur,
        };
        *slot = v;
    }

    pub fn apply(&mut self, values: &PropertyMap) {
        for (&p, &v) in values {
            self.set(p, v);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/property.rs"]
mod tests;
