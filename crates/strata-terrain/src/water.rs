//! Animated water plane displaced by a single noise layer.

use glam::DVec2;
use noise::NoiseFn;
use serde::{Deserialize, Serialize};
use strata_mesh::GridMesh;

/// Parameters of a water plane. The host owns the clock and the scroll offset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSurface {
    /// Quads per side of the water grid.
    pub detail_level: u32,
    /// Per-axis frequency of the wave pattern, scaled by `0.1`.
    pub displacement: DVec2,
    /// Offset scroll speed in units per second.
    pub speed: DVec2,
    /// Wave height scale.
    pub height_multiplier: f64,
    /// When `false` the surface stays flat.
    pub use_waves: bool,
}

impl Default for WaterSurface {
    fn default() -> Self {
        Self {
            detail_level: 10,
            displacement: DVec2::new(1.0, 1.0),
            speed: DVec2::new(0.5, 0.5),
            height_multiplier: 1.0,
            use_waves: true,
        }
    }
}

impl WaterSurface {
    /// Scroll `offset` by `delta_time * speed` on both axes.
    #[inline]
    pub fn advance_offset(&self, offset: DVec2, delta_time: f64) -> DVec2 {
        offset + self.speed * delta_time
    }

    /// Flat grid with normals.
    pub fn build_flat(&self) -> GridMesh {
        GridMesh::build_grid(self.detail_level).with_normals()
    }

    /// Grid displaced by `noise` sampled at `vertex * displacement * 0.1 + offset`.
    pub fn build_displaced(&self, noise: &impl NoiseFn<f64, 2>, offset: DVec2) -> GridMesh {
        if !self.use_waves {
            return self.build_flat();
        }
        let frequency = self.displacement * 0.1;
        let mut mesh = GridMesh::build_grid(self.detail_level);
        for vertex in &mut mesh.vertices {
            let x = vertex.x as f64 * frequency.x + offset.x;
            let z = vertex.z as f64 * frequency.y + offset.y;
            vertex.y = (noise.get([x, z]) * self.height_multiplier) as f32;
        }
        mesh.with_normals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Constant;
    use strata_noise::NoiseField;

    #[test]
    fn test_advance_offset_scales_by_speed() {
        let water = WaterSurface {
            speed: DVec2::new(2.0, -1.0),
            ..Default::default()
        };
        assert_eq!(
            water.advance_offset(DVec2::new(1.0, 1.0), 0.5),
            DVec2::new(2.0, 0.5)
        );
    }

    #[test]
    fn test_flat_surface_has_zero_heights_and_normals() {
        let mesh = WaterSurface::default().build_flat();
        assert_eq!(mesh.vertex_count(), 6 * 10 * 10);
        assert!(mesh.vertices.iter().all(|v| v.y == 0.0));
        assert!(mesh.normals.is_some());
    }

    #[test]
    fn test_waves_disabled_returns_flat() {
        let water = WaterSurface {
            use_waves: false,
            ..Default::default()
        };
        let mesh = water.build_displaced(&Constant::new(0.7), DVec2::ZERO);
        assert_eq!(mesh, water.build_flat());
    }

    #[test]
    fn test_displacement_applies_height_multiplier() {
        let water = WaterSurface {
            detail_level: 3,
            height_multiplier: 4.0,
            ..Default::default()
        };
        let mesh = water.build_displaced(&Constant::new(0.25), DVec2::ZERO);
        assert!(mesh.vertices.iter().all(|v| v.y == 1.0));
    }

    #[test]
    fn test_offset_moves_wave_pattern() {
        let water = WaterSurface {
            detail_level: 4,
            displacement: DVec2::new(3.0, 3.0),
            ..Default::default()
        };
        let field = NoiseField::default();
        let a = water.build_displaced(&field, DVec2::ZERO);
        let b = water.build_displaced(&field, DVec2::new(0.37, 0.81));
        assert_ne!(a.vertices, b.vertices);
        for v in &b.vertices {
            assert!((0.0..=1.0).contains(&v.y), "Perlin wave {} out of range", v.y);
        }
    }
}
