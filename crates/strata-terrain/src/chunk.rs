//! A generated terrain tile.

use glam::{IVec2, Vec3};
use strata_mesh::GridMesh;

/// One tile of terrain: its lattice position, world offset and local-space mesh.
///
/// Vertex x/z stay in chunk-local grid units; the host places the mesh at
/// [`world_offset`](Self::world_offset).
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Position on the chunk lattice, `[0, chunk_count)` on each axis.
    pub grid_position: IVec2,
    /// World-space translation of the chunk origin.
    pub world_offset: Vec3,
    /// Height-displaced grid geometry.
    pub mesh: GridMesh,
}

impl Chunk {
    /// Vertex positions in chunk-local space.
    pub fn vertices(&self) -> &[Vec3] {
        &self.mesh.vertices
    }

    /// Triangle indices.
    pub fn triangles(&self) -> &[u32] {
        &self.mesh.triangles
    }

    /// Lowest vertex height, `None` for an empty chunk.
    pub fn min_height(&self) -> Option<f32> {
        self.mesh.vertices.iter().map(|v| v.y).reduce(f32::min)
    }

    /// Highest vertex height, `None` for an empty chunk.
    pub fn max_height(&self) -> Option<f32> {
        self.mesh.vertices.iter().map(|v| v.y).reduce(f32::max)
    }
}
