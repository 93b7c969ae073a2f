//! Indexed triangle geometry built from unit quads on the XZ plane.

use glam::Vec3;

use crate::normals::compute_vertex_normals;

/// Triangle winding order for emitted quads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Winding {
    /// Front faces point up (+Y) for a quad on the XZ plane.
    #[default]
    Clockwise,
    /// Reversed winding, used for undersides.
    CounterClockwise,
}

impl Winding {
    /// Index order of the six quad corners for this winding.
    const fn order(self) -> [u32; 6] {
        match self {
            Winding::Clockwise => [2, 1, 0, 5, 4, 3],
            Winding::CounterClockwise => [0, 1, 2, 3, 4, 5],
        }
    }
}

const RIGHT: Vec3 = Vec3::X;
const FORWARD: Vec3 = Vec3::Z;
const DOWN: Vec3 = Vec3::NEG_Y;

/// Corners of a unit quad as two triangles sharing the `(0,0)-(1,1)` diagonal.
const QUAD_CORNERS: [Vec3; 6] = [
    Vec3::ZERO,
    RIGHT,
    Vec3::new(1.0, 0.0, 1.0),
    FORWARD,
    Vec3::ZERO,
    Vec3::new(1.0, 0.0, 1.0),
];

/// Vertex and triangle-index buffers for grid-like geometry.
///
/// Quads do not share vertices: every quad appends six vertices and six indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Triangle list, three indices per triangle.
    pub triangles: Vec<u32>,
    /// Per-vertex normals, present after [`recalculate_normals`](Self::recalculate_normals).
    pub normals: Option<Vec<Vec3>>,
}

impl GridMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `quads` quads.
    pub fn with_quad_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 6),
            triangles: Vec::with_capacity(quads * 6),
            normals: None,
        }
    }

    /// An `n` x `n` grid of unit quads starting at the origin, clockwise winding.
    pub fn build_grid(detail_level: u32) -> Self {
        let n = detail_level as usize;
        let mut mesh = Self::with_quad_capacity(n * n);
        for x in 0..detail_level {
            for z in 0..detail_level {
                mesh.push_quad(Vec3::new(x as f32, 0.0, z as f32), Winding::Clockwise);
            }
        }
        mesh
    }

    /// A single clockwise quad at `position`.
    pub fn build_quad(position: Vec3) -> Self {
        let mut mesh = Self::with_quad_capacity(1);
        mesh.push_quad(position, Winding::Clockwise);
        mesh
    }

    /// A unit cube whose top face sits at `position`.
    pub fn build_cube(position: Vec3) -> Self {
        let mut mesh = Self::with_quad_capacity(6);
        mesh.push_cube(position);
        mesh
    }

    /// Append six corners as two triangles, indexed from the current vertex count.
    fn push_face(&mut self, corners: [Vec3; 6], position: Vec3, winding: Winding) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.iter().map(|&corner| corner + position));
        self.triangles
            .extend(winding.order().iter().map(|&i| base + i));
        self.normals = None;
    }

    /// Append one unit quad on the XZ plane at `position`.
    pub fn push_quad(&mut self, position: Vec3, winding: Winding) {
        self.push_face(QUAD_CORNERS, position, winding);
    }

    /// Append the six faces of a unit cube hanging below `position`.
    ///
    /// Top, right and back faces use clockwise winding; bottom, left and front use
    /// counter-clockwise, so every face's front side points outward.
    pub fn push_cube(&mut self, position: Vec3) {
        self.push_quad(position, Winding::Clockwise);
        self.push_quad(position + DOWN, Winding::CounterClockwise);

        let side_x = |x: Vec3| {
            [
                x,
                x + DOWN,
                x + DOWN + FORWARD,
                x + FORWARD,
                x,
                x + DOWN + FORWARD,
            ]
        };
        let side_z = |z: Vec3| [z, z + DOWN, z + RIGHT + DOWN, z + RIGHT, z, z + RIGHT + DOWN];

        self.push_face(side_x(RIGHT), position, Winding::Clockwise);
        self.push_face(side_x(Vec3::ZERO), position, Winding::CounterClockwise);
        self.push_face(side_z(Vec3::ZERO), position, Winding::Clockwise);
        self.push_face(side_z(FORWARD), position, Winding::CounterClockwise);
    }

    /// Recompute per-vertex normals from the current triangles.
    pub fn recalculate_normals(&mut self) {
        self.normals = Some(compute_vertex_normals(&self.vertices, &self.triangles));
    }

    /// Builder-style [`recalculate_normals`](Self::recalculate_normals).
    pub fn with_normals(mut self) -> Self {
        self.recalculate_normals();
        self
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles (index count / 3).
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Returns `true` if the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Remove all geometry.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
        self.normals = None;
    }

    /// Vertex positions as raw bytes for upload.
    pub fn positions_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Triangle indices as raw bytes for upload.
    pub fn indices_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(mesh: &GridMesh, tri: usize) -> Vec3 {
        let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[mesh.triangles[tri * 3 + k] as usize]);
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = GridMesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn test_grid_topology_counts() {
        for n in 0..8_u32 {
            let mesh = GridMesh::build_grid(n);
            let cells = (n * n) as usize;
            assert_eq!(mesh.vertex_count(), 6 * cells, "vertex count for n={n}");
            assert_eq!(mesh.triangles.len(), 6 * cells, "index count for n={n}");
            assert_eq!(mesh.triangle_count(), 2 * cells);
        }
    }

    #[test]
    fn test_grid_indices_in_range() {
        let mesh = GridMesh::build_grid(5);
        assert!(
            mesh.triangles
                .iter()
                .all(|&i| (i as usize) < mesh.vertex_count())
        );
    }

    #[test]
    fn test_grid_covers_extent() {
        let mesh = GridMesh::build_grid(3);
        let max = mesh.vertices.iter().fold(Vec3::ZERO, |acc, v| acc.max(*v));
        let min = mesh.vertices.iter().fold(Vec3::ZERO, |acc, v| acc.min(*v));
        assert_eq!(max, Vec3::new(3.0, 0.0, 3.0));
        assert_eq!(min, Vec3::ZERO);
    }

    #[test]
    fn test_clockwise_quad_faces_up() {
        let mesh = GridMesh::build_quad(Vec3::ZERO);
        for tri in 0..2 {
            assert!(
                face_normal(&mesh, tri).abs_diff_eq(Vec3::Y, 1e-6),
                "Clockwise triangle {tri} should face +Y"
            );
        }
    }

    #[test]
    fn test_counter_clockwise_quad_faces_down() {
        let mut mesh = GridMesh::new();
        mesh.push_quad(Vec3::ZERO, Winding::CounterClockwise);
        for tri in 0..2 {
            assert!(face_normal(&mesh, tri).abs_diff_eq(Vec3::NEG_Y, 1e-6));
        }
    }

    #[test]
    fn test_quad_shares_diagonal() {
        let mesh = GridMesh::build_quad(Vec3::new(2.0, 0.0, 5.0));
        let first: Vec<Vec3> = mesh.triangles[..3].iter().map(|&i| mesh.vertices[i as usize]).collect();
        let second: Vec<Vec3> = mesh.triangles[3..].iter().map(|&i| mesh.vertices[i as usize]).collect();
        for corner in [Vec3::new(2.0, 0.0, 5.0), Vec3::new(3.0, 0.0, 6.0)] {
            assert!(first.contains(&corner) && second.contains(&corner));
        }
    }

    #[test]
    fn test_repeated_pushes_offset_indices() {
        let mut mesh = GridMesh::new();
        mesh.push_quad(Vec3::ZERO, Winding::Clockwise);
        mesh.push_quad(Vec3::X, Winding::CounterClockwise);
        assert_eq!(&mesh.triangles[..6], &[2, 1, 0, 5, 4, 3]);
        assert_eq!(&mesh.triangles[6..], &[6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let position = Vec3::new(4.0, 2.0, -1.0);
        let mesh = GridMesh::build_cube(position);
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.triangle_count(), 12);

        let center = position + Vec3::new(0.5, -0.5, 0.5);
        for tri in 0..mesh.triangle_count() {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[mesh.triangles[tri * 3 + k] as usize]);
            let centroid = (a + b + c) / 3.0;
            assert!(
                face_normal(&mesh, tri).dot(centroid - center) > 0.0,
                "Cube triangle {tri} faces inward"
            );
        }
    }

    #[test]
    fn test_recalculate_normals_flat_grid() {
        let mesh = GridMesh::build_grid(4).with_normals();
        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(normals.len(), mesh.vertex_count());
        assert!(normals.iter().all(|n| n.abs_diff_eq(Vec3::Y, 1e-6)));
    }

    #[test]
    fn test_push_invalidates_normals() {
        let mut mesh = GridMesh::build_quad(Vec3::ZERO).with_normals();
        mesh.push_quad(Vec3::X, Winding::Clockwise);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn test_byte_views() {
        let mesh = GridMesh::build_grid(2);
        assert_eq!(mesh.positions_as_bytes().len(), mesh.vertex_count() * 12);
        assert_eq!(mesh.indices_as_bytes().len(), mesh.triangles.len() * 4);
    }

    #[test]
    fn test_clear() {
        let mut mesh = GridMesh::build_grid(3).with_normals();
        mesh.clear();
        assert!(mesh.is_empty());
        assert!(mesh.triangles.is_empty());
        assert!(mesh.normals.is_none());
    }
}
