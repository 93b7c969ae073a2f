//! Multi-octave fractal combination of a noise source with per-octave redistribution.
//!
//! Each octave samples the noise at a growing frequency, reshapes the sample, terraces
//! it, and accumulates it with an amplitude whose sign alternates every octave
//! (`amplitude *= -persistence`). The sum is normalized by the signed amplitude total.

use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::redistribution::{RedistributionConfig, apply, terrace};

/// Octave count range accepted by [`FractalParams::normalized`].
pub const OCTAVE_RANGE: (u32, u32) = (2, 16);
/// Persistence range accepted by [`FractalParams::normalized`].
pub const PERSISTENCE_RANGE: (f64, f64) = (0.01, 0.99);
/// Lacunarity range accepted by [`FractalParams::normalized`].
pub const LACUNARITY_RANGE: (f64, f64) = (0.01, 1.0);

/// Parameters of one fractal layer stack.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalParams {
    /// Number of octaves. Expected to be even; see [`normalized`](Self::normalized).
    pub octaves: u32,
    /// Amplitude factor between octaves. The sign flips every octave.
    pub persistence: f64,
    /// Starting frequency and frequency factor between octaves.
    pub lacunarity: f64,
    /// Per-octave terrace step. `0` disables it.
    pub terrace_value: f64,
    /// Transform applied to every octave's sample before accumulation.
    pub redistribution: RedistributionConfig,
    /// Optional `(min, max)` clamp applied to the normalized height.
    pub clamp: Option<(f64, f64)>,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 2,
            persistence: 0.01,
            lacunarity: 0.8,
            terrace_value: 0.0,
            redistribution: RedistributionConfig::default(),
            clamp: None,
        }
    }
}

impl FractalParams {
    /// Clamp every field to its accepted range and round odd octave counts up to even.
    pub fn normalized(mut self) -> Self {
        self.octaves = self.octaves.clamp(OCTAVE_RANGE.0, OCTAVE_RANGE.1);
        if self.octaves % 2 != 0 {
            self.octaves += 1;
        }
        self.persistence = self
            .persistence
            .clamp(PERSISTENCE_RANGE.0, PERSISTENCE_RANGE.1);
        self.lacunarity = self
            .lacunarity
            .clamp(LACUNARITY_RANGE.0, LACUNARITY_RANGE.1);
        self
    }

    /// Signed sum of all octave amplitudes, the divisor used to normalize heights.
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..self.octaves {
            sum += amplitude;
            amplitude *= -self.persistence;
        }
        sum
    }
}

/// Fractal height at `(x, z)` for any 2D noise source.
///
/// Octave counts are used as given; callers normalize them beforehand. A zero amplitude
/// total (no octaves) yields `0.0`.
pub fn fbm_height(noise: &impl NoiseFn<f64, 2>, x: f64, z: f64, params: &FractalParams) -> f64 {
    let mut total = 0.0;
    let mut max_amplitude = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = params.lacunarity;

    for _ in 0..params.octaves {
        let sample = noise.get([x * frequency, z * frequency]);
        let sample = apply(sample, &params.redistribution);
        let sample = terrace(sample, params.terrace_value);

        total += sample * amplitude;
        max_amplitude += amplitude;

        amplitude *= -params.persistence;
        frequency *= params.lacunarity;
    }

    if max_amplitude == 0.0 {
        return 0.0;
    }

    let height = total / max_amplitude;
    match params.clamp {
        Some((lo, hi)) if lo <= hi => height.clamp(lo, hi),
        _ => height,
    }
}

/// Borrowing wrapper pairing a noise source with fixed fractal parameters.
pub struct FractalSynthesizer<'a, N> {
    noise: &'a N,
    params: FractalParams,
}

impl<'a, N: NoiseFn<f64, 2>> FractalSynthesizer<'a, N> {
    /// Create a synthesizer over `noise`.
    pub fn new(noise: &'a N, params: FractalParams) -> Self {
        Self { noise, params }
    }

    /// Fractal height at `(x, z)`.
    #[inline]
    pub fn height(&self, x: f64, z: f64) -> f64 {
        fbm_height(self.noise, x, z, &self.params)
    }

    /// The parameters in use.
    pub fn params(&self) -> &FractalParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NoiseConfig, NoiseField, NoiseKind, RedistributionKind};

    const EPSILON: f64 = 1e-12;

    /// Returns the x coordinate it is sampled at, exposing the per-octave frequency.
    struct EchoX;

    impl NoiseFn<f64, 2> for EchoX {
        fn get(&self, point: [f64; 2]) -> f64 {
            point[0]
        }
    }

    #[test]
    fn test_constant_noise_normalizes_to_itself() {
        let noise = noise::Constant::new(0.5);
        let params = FractalParams {
            octaves: 6,
            persistence: 0.4,
            ..Default::default()
        };
        let h = fbm_height(&noise, 12.0, -3.0, &params);
        assert!((h - 0.5).abs() < EPSILON, "Expected 0.5, got {h}");
    }

    #[test]
    fn test_amplitude_sign_alternates() {
        let params = FractalParams {
            octaves: 2,
            persistence: 0.5,
            lacunarity: 0.8,
            ..Default::default()
        };
        // Octave 0 samples x * 0.8, octave 1 samples x * 0.64 with amplitude -0.5.
        let expected = (0.8 - 0.5 * 0.64) / (1.0 - 0.5);
        let h = fbm_height(&EchoX, 1.0, 0.0, &params);
        assert!((h - expected).abs() < EPSILON, "Expected {expected}, got {h}");
    }

    #[test]
    fn test_zero_octaves_yields_zero() {
        let params = FractalParams {
            octaves: 0,
            ..Default::default()
        };
        assert_eq!(fbm_height(&noise::Constant::new(0.9), 1.0, 1.0, &params), 0.0);
    }

    #[test]
    fn test_per_octave_terrace_applied() {
        let params = FractalParams {
            octaves: 2,
            persistence: 0.5,
            terrace_value: 2.0,
            ..Default::default()
        };
        // Every octave samples 0.7, terraced to 0.5.
        let h = fbm_height(&noise::Constant::new(0.7), 0.0, 0.0, &params);
        assert!((h - 0.5).abs() < EPSILON, "Expected 0.5, got {h}");
    }

    #[test]
    fn test_redistribution_applied_per_octave() {
        let params = FractalParams {
            octaves: 4,
            persistence: 0.3,
            redistribution: RedistributionConfig {
                kind: RedistributionKind::Power,
                exponent_or_value: 2.0,
                terrace_step: 0.0,
            },
            ..Default::default()
        };
        let h = fbm_height(&noise::Constant::new(0.6), 5.0, 5.0, &params);
        assert!((h - 0.36).abs() < EPSILON, "Expected 0.36, got {h}");
    }

    #[test]
    fn test_clamp_applied_after_normalization() {
        let params = FractalParams {
            clamp: Some((0.0, 0.25)),
            ..Default::default()
        };
        let h = fbm_height(&noise::Constant::new(0.8), 0.0, 0.0, &params);
        assert_eq!(h, 0.25);
    }

    #[test]
    fn test_normalized_forces_even_octaves_and_ranges() {
        let params = FractalParams {
            octaves: 3,
            persistence: 1.5,
            lacunarity: -2.0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(params.octaves, 4);
        assert_eq!(params.persistence, 0.99);
        assert_eq!(params.lacunarity, 0.01);

        assert_eq!(FractalParams { octaves: 1, ..Default::default() }.normalized().octaves, 2);
        assert_eq!(FractalParams { octaves: 15, ..Default::default() }.normalized().octaves, 16);
        assert_eq!(FractalParams { octaves: 40, ..Default::default() }.normalized().octaves, 16);
    }

    #[test]
    fn test_max_amplitude_signed_sum() {
        let params = FractalParams {
            octaves: 4,
            persistence: 0.5,
            ..Default::default()
        };
        assert!((params.max_amplitude() - (1.0 - 0.5 + 0.25 - 0.125)).abs() < EPSILON);
    }

    #[test]
    fn test_synthesizer_matches_free_function() {
        for kind in NoiseKind::ALL {
            let field = NoiseField::new(NoiseConfig {
                kind,
                ..Default::default()
            });
            let params = FractalParams {
                octaves: 8,
                persistence: 0.45,
                lacunarity: 0.9,
                ..Default::default()
            };
            let synth = FractalSynthesizer::new(&field, params);
            for i in 0..20 {
                let x = i as f64 * 3.1;
                let h = synth.height(x, -x);
                assert!(h.is_finite(), "{kind:?} height not finite at {x}");
                assert_eq!(h.to_bits(), fbm_height(&field, x, -x, &params).to_bits());
            }
        }
    }
}
