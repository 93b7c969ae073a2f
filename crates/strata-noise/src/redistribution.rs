//! Value redistribution: reshapes a raw noise sample and optionally quantizes it into terraces.

use serde::{Deserialize, Serialize};

/// Transform applied to a raw noise value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedistributionKind {
    /// Pass the value through.
    #[default]
    None,
    /// `value^k`.
    Power,
    /// `sin(value * k)`.
    Sin,
    /// `cos(value * k)`.
    Cos,
    /// `atan(value * k)`.
    Atan,
    /// `1 / (value * k)`.
    OneOver,
    /// `k^value`.
    ExpGrowth,
    /// `k^-value`.
    ExpDecay,
}

/// A redistribution transform with its parameter and terrace step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedistributionConfig {
    /// Which transform to apply.
    pub kind: RedistributionKind,
    /// Exponent or multiplier `k` used by the transform.
    pub exponent_or_value: f64,
    /// Terrace quantization step applied after the transform. `0` disables terracing.
    pub terrace_step: f64,
}

/// Quantize `value` onto steps of `1 / step`: `round(value * step) / step`.
///
/// Rounds half to even. A zero or non-finite `step` leaves the value untouched.
/// Applying the same step twice gives the same result as applying it once.
#[inline]
pub fn terrace(value: f64, step: f64) -> f64 {
    if step == 0.0 || !step.is_finite() {
        return value;
    }
    (value * step).round_ties_even() / step
}

/// Apply the configured transform, then the terrace step.
///
/// `OneOver` with `value * k == 0` returns `value` unchanged, as does any transform
/// whose result is non-finite (for example a fractional power of a negative sample).
pub fn apply(value: f64, config: &RedistributionConfig) -> f64 {
    let k = config.exponent_or_value;
    let shaped = match config.kind {
        RedistributionKind::None => value,
        RedistributionKind::Power => libm::pow(value, k),
        RedistributionKind::Sin => libm::sin(value * k),
        RedistributionKind::Cos => libm::cos(value * k),
        RedistributionKind::Atan => libm::atan(value * k),
        RedistributionKind::OneOver => {
            let product = value * k;
            if product == 0.0 { value } else { 1.0 / product }
        }
        RedistributionKind::ExpGrowth => libm::pow(k, value),
        RedistributionKind::ExpDecay => libm::pow(k, -value),
    };
    let shaped = if shaped.is_finite() { shaped } else { value };

    terrace(shaped, config.terrace_step)
}
