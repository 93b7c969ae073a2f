//! Grid mesh construction: unit quads, tiled grids, cubes, and normal recalculation.

pub mod grid_mesh;
pub mod normals;

pub use grid_mesh::{GridMesh, Winding};
pub use normals::compute_vertex_normals;
