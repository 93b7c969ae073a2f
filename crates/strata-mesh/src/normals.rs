//! Per-vertex normal recalculation.

use glam::Vec3;

/// Accumulate triangle face normals onto their vertices and normalize.
///
/// Triangles referencing out-of-range vertices and degenerate triangles contribute
/// nothing. Vertices without any contribution get `+Y`.
pub fn compute_vertex_normals(vertices: &[Vec3], triangles: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    for tri in triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let face = (vertices[b] - vertices[a]).cross(vertices[c] - vertices[a]);
        if let Some(unit) = face.try_normalize() {
            normals[a] += unit;
            normals[b] += unit;
            normals[c] += unit;
        }
    }

    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_triangle() {
        let vertices = [Vec3::ZERO, Vec3::Z, Vec3::X];
        let normals = compute_vertex_normals(&vertices, &[0, 1, 2]);
        assert!(normals.iter().all(|n| n.abs_diff_eq(Vec3::Y, 1e-6)));
    }

    #[test]
    fn test_degenerate_triangle_defaults_to_up() {
        let vertices = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let normals = compute_vertex_normals(&vertices, &[0, 1, 2]);
        assert_eq!(normals, vec![Vec3::Y; 3]);
    }

    #[test]
    fn test_out_of_range_indices_ignored() {
        let vertices = [Vec3::ZERO, Vec3::Z];
        let normals = compute_vertex_normals(&vertices, &[0, 1, 7]);
        assert_eq!(normals, vec![Vec3::Y; 2]);
    }

    #[test]
    fn test_shared_vertex_averages() {
        // Two triangles meeting at vertex 0, one facing +Y and one facing +X.
        let vertices = [
            Vec3::ZERO,
            Vec3::Z,
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
        ];
        let normals = compute_vertex_normals(&vertices, &[0, 1, 2, 0, 3, 4]);
        let expected = (Vec3::Y + Vec3::X).normalize();
        assert!(normals[0].abs_diff_eq(expected, 1e-6), "got {:?}", normals[0]);
    }
}
