/// Linear interpolation that returns the endpoints bit-exactly at `t == 0` and `t == 1`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    a + (b - a) * t
}

pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Position of `v` inside `[start, end]` as a fraction, clamped to `[0, 1]`.
pub(crate) fn progress_between(v: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if span <= 0.0 {
        return if v >= end { 1.0 } else { 0.0 };
    }
    clamp01((v - start) / span)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
