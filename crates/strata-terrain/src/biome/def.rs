//! Biome definition: the fractal shape and presentation of one terrain type.

use serde::{Deserialize, Serialize};
use strata_noise::FractalParams;

/// Opaque reference to a host-side material. The pipeline never interprets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialHandle(pub u32);

/// Largest accepted spawn weight.
pub const MAX_SPAWN_WEIGHT: u8 = 100;

/// Full descriptor for a biome type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biome {
    /// Human-readable biome name (e.g., "rolling_hills").
    pub name: String,
    /// Relative selection weight in `[0, 100]`.
    pub spawn_weight: u8,
    /// Material the host assigns to this biome's chunks.
    pub material: MaterialHandle,
    /// Octave stack that shapes the height field.
    pub fractal: FractalParams,
}

impl Default for Biome {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            spawn_weight: MAX_SPAWN_WEIGHT,
            material: MaterialHandle::default(),
            fractal: FractalParams::default(),
        }
    }
}

impl Biome {
    /// Create a biome with default fractal parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Clamp the spawn weight and normalize the fractal parameters, rounding odd octave
    /// counts up to even.
    pub fn normalized(mut self) -> Self {
        self.spawn_weight = self.spawn_weight.min(MAX_SPAWN_WEIGHT);
        self.fractal = self.fractal.normalized();
        self
    }
}
