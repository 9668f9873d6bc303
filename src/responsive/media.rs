use std::fmt;
use std::str::FromStr;

use crate::foundation::error::ScrollweaveError;

/// Width-only media query: `"(min-width: 768px)"`, `"(max-width: 767px)"`,
/// both joined with `and`, or `"all"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaQuery {
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
}

impl MediaQuery {
    pub fn min_width(px: f64) -> Self {
        Self {
            min_width: Some(px),
            max_width: None,
        }
    }

    pub fn max_width(px: f64) -> Self {
        Self {
            min_width: None,
            max_width: Some(px),
        }
    }

    /// Inclusive on both ends, like CSS.
    pub fn matches(&self, width: f64) -> bool {
        self.min_width.is_none_or(|m| width >= m) && self.max_width.is_none_or(|m| width <= m)
    }
}

fn feature(clause: &str, whole: &str) -> Result<(bool, f64), ScrollweaveError> {
    let bad = || ScrollweaveError::config(format!("unsupported media query '{whole}'"));
    let inner = clause
        .trim()
        .strip_prefix('(')
        .and_then(|c| c.strip_suffix(')'))
        .ok_or_else(bad)?;
    let (name, value) = inner.split_once(':').ok_or_else(bad)?;
    let value = value.trim();
    let px = value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(bad)?;
    match name.trim() {
        "min-width" => Ok((true, px)),
        "max-width" => Ok((false, px)),
        _ => Err(bad()),
    }
}

impl FromStr for MediaQuery {
    type Err = ScrollweaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t == "all" {
            return Ok(Self::default());
        }
        let mut q = Self::default();
        for clause in t.split(" and ") {
            let (is_min, px) = feature(clause, s)?;
            let slot = if is_min {
                &mut q.min_width
            } else {
                &mut q.max_width
            };
            if slot.replace(px).is_some() {
                return Err(ScrollweaveError::config(format!(
                    "media query '{s}' repeats a feature"
                )));
            }
        }
        if let (Some(lo), Some(hi)) = (q.min_width, q.max_width)
            && lo > hi
        {
            return Err(ScrollweaveError::config(format!(
                "media query '{s}' can never match"
            )));
        }
        Ok(q)
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min_width, self.max_width) {
            (None, None) => f.write_str("all"),
            (Some(lo), None) => write!(f, "(min-width: {lo}px)"),
            (None, Some(hi)) => write!(f, "(max-width: {hi}px)"),
            (Some(lo), Some(hi)) => write!(f, "(min-width: {lo}px) and (max-width: {hi}px)"),
        }
    }
}

impl TryFrom<String> for MediaQuery {
    type Error = ScrollweaveError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MediaQuery> for String {
    fn from(q: MediaQuery) -> Self {
        q.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/responsive/media.rs"]
mod tests;
