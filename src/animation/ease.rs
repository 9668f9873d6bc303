use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{ScrollweaveError, ScrollweaveResult};

const BACK_OVERSHOOT: f64 = 1.70158;
const ELASTIC_AMPLITUDE: f64 = 1.0;
const ELASTIC_PERIOD: f64 = 0.3;

/// Which end of the curve is shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EaseDir {
    In,
    Out,
    InOut,
}

/// Remapping of a normalized tween parameter `t ∈ [0, 1]`.
///
/// Serialized in its textual form (`"power3.out"`, `"back.out(1.4)"`, `"none"`).
/// Every variant maps `0 → 0` and `1 → 1` exactly. [`Ease::Back`] and
/// [`Ease::Elastic`] overshoot in between; all other curves are monotonic.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    /// `power` is 1..=4; the in-curve is `t^(power + 1)`.
    Power { power: u8, dir: EaseDir },
    Sine(EaseDir),
    Expo(EaseDir),
    Back { dir: EaseDir, overshoot: f64 },
    Elastic { dir: EaseDir, amplitude: f64, period: f64 },
}

impl Default for Ease {
    fn default() -> Self {
        Self::Power {
            power: 1,
            dir: EaseDir::Out,
        }
    }
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let dir = match self {
            Self::Linear => return t,
            Self::Power { dir, .. }
            | Self::Sine(dir)
            | Self::Expo(dir)
            | Self::Back { dir, .. }
            | Self::Elastic { dir, .. } => dir,
        };
        match dir {
            EaseDir::In => self.ease_in(t),
            EaseDir::Out => 1.0 - self.ease_in(1.0 - t),
            EaseDir::InOut => {
                if t < 0.5 {
                    self.ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - self.ease_in(2.0 - 2.0 * t) / 2.0
                }
            }
        }
    }

    pub fn is_monotonic(self) -> bool {
        !matches!(self, Self::Back { .. } | Self::Elastic { .. })
    }

    fn ease_in(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::Power { power, .. } => t.powi(i32::from(power) + 1),
            Self::Sine(_) => 1.0 - (t * PI / 2.0).cos(),
            Self::Expo(_) => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Self::Back { overshoot, .. } => t * t * ((overshoot + 1.0) * t - overshoot),
            Self::Elastic {
                amplitude, period, ..
            } => {
                let a = amplitude.max(1.0);
                let s = period / (2.0 * PI) * (1.0 / a).asin();
                let u = t - 1.0;
                -(a * 2f64.powf(10.0 * u) * ((u - s) * 2.0 * PI / period).sin())
            }
        }
    }
}

fn parse_dir(s: &str) -> ScrollweaveResult<EaseDir> {
    match s {
        "in" => Ok(EaseDir::In),
        "out" => Ok(EaseDir::Out),
        "inOut" | "inout" => Ok(EaseDir::InOut),
        other => Err(ScrollweaveError::config(format!(
            "unknown ease direction '{other}'"
        ))),
    }
}

fn parse_args(s: &str) -> ScrollweaveResult<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| {
            a.parse::<f64>()
                .map_err(|_| ScrollweaveError::config(format!("invalid ease argument '{a}'")))
        })
        .collect()
}

impl FromStr for Ease {
    type Err = ScrollweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, args) = match s.find('(') {
            Some(open) => {
                let Some(inner) = s[open + 1..].strip_suffix(')') else {
                    return Err(ScrollweaveError::config(format!(
                        "unbalanced parentheses in ease '{s}'"
                    )));
                };
                (&s[..open], parse_args(inner)?)
            }
            None => (s, Vec::new()),
        };
        let (family, dir) = match head.split_once('.') {
            Some((family, dir)) => (family, parse_dir(dir)?),
            None => (head, EaseDir::Out),
        };

        let power = |power: u8| Ease::Power { power, dir };
        let ease = match family {
            "none" | "linear" | "power0" => Self::Linear,
            "power1" | "quad" => power(1),
            "power2" | "cubic" => power(2),
            "power3" | "quart" => power(3),
            "power4" | "quint" | "strong" => power(4),
            "sine" => Self::Sine(dir),
            "expo" => Self::Expo(dir),
            "back" => Self::Back {
                dir,
                overshoot: args.first().copied().unwrap_or(BACK_OVERSHOOT),
            },
            "elastic" => {
                let amplitude = args.first().copied().unwrap_or(ELASTIC_AMPLITUDE);
                let period = args.get(1).copied().unwrap_or(ELASTIC_PERIOD);
                if period <= 0.0 {
                    return Err(ScrollweaveError::config("elastic period must be > 0"));
                }
                Self::Elastic {
                    dir,
                    amplitude,
                    period,
                }
            }
            other => {
                return Err(ScrollweaveError::config(format!("unknown ease '{other}'")));
            }
        };
        Ok(ease)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dir(d: EaseDir) -> &'static str {
            match d {
                EaseDir::In => "in",
                EaseDir::Out => "out",
                EaseDir::InOut => "inOut",
            }
        }
        match *self {
            Self::Linear => f.write_str("none"),
            Self::Power { power, dir: d } => write!(f, "power{power}.{}", dir(d)),
            Self::Sine(d) => write!(f, "sine.{}", dir(d)),
            Self::Expo(d) => write!(f, "expo.{}", dir(d)),
            Self::Back { dir: d, overshoot } => write!(f, "back.{}({overshoot})", dir(d)),
            Self::Elastic {
                dir: d,
                amplitude,
                period,
            } => write!(f, "elastic.{}({amplitude}, {period})", dir(d)),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = ScrollweaveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
