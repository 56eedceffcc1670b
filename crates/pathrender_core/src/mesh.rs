//! Indexed triangle mesh data.
//!
//! This is the loader-side representation: shared vertex positions plus a
//! flat index buffer. The renderer expands it into flat-shaded triangles.

use pathrender_math::{Point3, Vec3};

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (one Point3 per vertex)
    pub positions: Vec<Point3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Point3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.len() < 3
    }

    /// Index of the first face referencing a vertex that does not exist.
    pub fn first_invalid_face(&self) -> Option<usize> {
        let count = self.positions.len();
        self.indices
            .chunks(3)
            .position(|face| face.len() < 3 || face.iter().any(|&i| i as usize >= count))
    }

    /// Average of all vertex positions.
    ///
    /// Used as the representative position of the mesh when it is sampled as
    /// a light. An empty mesh sits at the origin.
    pub fn centroid(&self) -> Point3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self.positions.iter().copied().sum();
        sum / self.positions.len() as f32
    }

    /// Append another mesh, rebasing its indices after our vertices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Extract triangle vertices as `[a, b, c]` triplets.
    ///
    /// Faces with out-of-range indices are skipped with a warning.
    pub fn extract_triangle_vertices(&self) -> Vec<[Point3; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for chunk in self.indices.chunks_exact(3) {
            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            match (
                self.positions.get(i0),
                self.positions.get(i1),
                self.positions.get(i2),
            ) {
                (Some(a), Some(b), Some(c)) => triangles.push([*a, *b, *c]),
                _ => log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                ),
            }
        }

        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 1, 3, 2],
        )
    }

    #[test]
    fn test_mesh_counts() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.is_empty());
        assert!(Mesh::default().is_empty());
    }

    #[test]
    fn test_centroid() {
        let c = quad().centroid();
        assert!((c - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-6);
        assert_eq!(Mesh::default().centroid(), Vec3::ZERO);
    }

    #[test]
    fn test_first_invalid_face() {
        let mut mesh = quad();
        assert_eq!(mesh.first_invalid_face(), None);

        mesh.indices.extend([0, 1, 9]);
        assert_eq!(mesh.first_invalid_face(), Some(2));
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut mesh = quad();
        mesh.append(&quad());

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 5, 7, 6]);
        assert_eq!(mesh.first_invalid_face(), None);
    }

    #[test]
    fn test_extract_triangle_vertices() {
        let mesh = quad();
        let triangles = mesh.extract_triangle_vertices();

        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[1], [mesh.positions[1], mesh.positions[3], mesh.positions[2]]);
    }

    #[test]
    fn test_extract_skips_out_of_range_faces() {
        let mut mesh = quad();
        mesh.indices.extend([0, 1, 42]);
        assert_eq!(mesh.extract_triangle_vertices().len(), 2);
    }
}
