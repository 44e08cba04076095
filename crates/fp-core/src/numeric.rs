//! Size arithmetic shared by the scaling and styling code.

use crate::FpError;

/// Pass `value` through if finite, otherwise name the offending quantity.
pub fn ensure_finite(value: f64, what: &'static str) -> Result<f64, FpError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FpError::NonFinite { what, value })
    }
}

/// Round to the nearest multiple of `step` (half away from zero).
///
/// A non-positive step rounds to whole units.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if step <= 0.0 || !step.is_finite() {
        return value.round();
    }
    // Dividing by an integral reciprocal keeps 0.1-steps exact (0.8, not 0.8000000000000002).
    let inv = 1.0 / step;
    if inv.fract() == 0.0 {
        (value * inv).round() / inv
    } else {
        (value / step).round() * step
    }
}

/// `round(base * scale)` to `step`, never below `floor`.
///
/// This is the sizing rule for every density-scaled quantity (fonts, line
/// widths, marker sizes).
pub fn scaled_with_floor(base: f64, scale: f64, step: f64, floor: f64) -> f64 {
    round_to_step(base * scale, step).max(floor)
}
