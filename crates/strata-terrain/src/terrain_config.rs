//! Terrain generation parameters shared by every chunk of one pass.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use strata_noise::NoiseConfig;

/// Configuration for one terrain generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Noise kind and permutation table parameters.
    pub noise: NoiseConfig,
    /// World-space sampling offset. Moving it scrolls the terrain.
    pub seed: DVec2,
    /// Replace the seed with a random one when a session starts.
    pub randomize_at_start: bool,
    /// Chunks per side of the square chunk grid. Non-positive values generate nothing.
    pub chunk_count: i32,
    /// Quads per side of each chunk. Non-positive values generate nothing.
    pub detail_level: i32,
    /// Compute per-vertex normals for generated chunks.
    pub recalculate_normals: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            noise: NoiseConfig::default(),
            seed: DVec2::ZERO,
            randomize_at_start: false,
            chunk_count: 4,
            detail_level: 16,
            recalculate_normals: true,
        }
    }
}

impl TerrainConfig {
    /// Quads per chunk side, with non-positive values mapped to zero.
    pub fn detail(&self) -> u32 {
        u32::try_from(self.detail_level).unwrap_or(0)
    }

    /// Chunks per grid side, with non-positive values mapped to zero.
    pub fn chunks_per_side(&self) -> u32 {
        u32::try_from(self.chunk_count).unwrap_or(0)
    }

    /// Returns `true` if a generation pass would produce no geometry.
    pub fn is_empty(&self) -> bool {
        self.detail() == 0 || self.chunks_per_side() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_sizes_are_empty() {
        for (chunks, detail) in [(0, 4), (4, 0), (-3, 4), (4, -1)] {
            let config = TerrainConfig {
                chunk_count: chunks,
                detail_level: detail,
                ..Default::default()
            };
            assert!(config.is_empty(), "({chunks}, {detail}) should be empty");
        }
        assert!(!TerrainConfig::default().is_empty());
    }

    #[test]
    fn test_ron_round_trip() {
        let config = TerrainConfig {
            seed: DVec2::new(12.5, -3.0),
            chunk_count: 3,
            ..Default::default()
        };
        let text = ron::to_string(&config).unwrap();
        let back: TerrainConfig = ron::from_str(&text).unwrap();
        assert_eq!(config, back);
    }
}
