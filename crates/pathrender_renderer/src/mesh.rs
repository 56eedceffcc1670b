//! Triangle mesh object.

use crate::hittable::{HitRecord, MaterialId};
use crate::triangle::Triangle;
use pathrender_math::{Interval, Point3, Ray, Vec3};

/// A set of flat-shaded triangles sharing one material.
///
/// Intersection is a linear closest-hit scan over the triangles.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    centroid: Point3,
    material: MaterialId,
}

impl TriangleMesh {
    /// Build from loader-side mesh data. Faces with out-of-range indices are
    /// skipped.
    pub fn from_mesh(mesh: &pathrender_core::Mesh, material: MaterialId) -> Self {
        let triangles = mesh
            .extract_triangle_vertices()
            .into_iter()
            .map(|[a, b, c]| Triangle::new(a, b, c, material))
            .collect();

        Self {
            triangles,
            centroid: mesh.centroid(),
            material,
        }
    }

    /// Build from explicit vertex triplets. The centroid is the mean of all
    /// listed vertices.
    pub fn from_triangles(vertices: &[[Point3; 3]], material: MaterialId) -> Self {
        let centroid = if vertices.is_empty() {
            Vec3::ZERO
        } else {
            vertices.iter().flatten().copied().sum::<Vec3>() / (vertices.len() * 3) as f32
        };

        Self {
            triangles: vertices
                .iter()
                .map(|[a, b, c]| Triangle::new(*a, *b, *c, material))
                .collect(),
            centroid,
            material,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Representative position used when the mesh is sampled as a light.
    pub fn centroid(&self) -> Point3 {
        self.centroid
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for triangle in &self.triangles {
            if triangle.intersect(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit quad in the plane z = `z`, facing +Z.
    fn quad(z: f32) -> [[Point3; 3]; 2] {
        let a = Vec3::new(-1.0, -1.0, z);
        let b = Vec3::new(1.0, -1.0, z);
        let c = Vec3::new(1.0, 1.0, z);
        let d = Vec3::new(-1.0, 1.0, z);
        [[a, b, c], [a, c, d]]
    }

    #[test]
    fn test_mesh_hits_closest_triangle() {
        let mut triangles = quad(-5.0).to_vec();
        triangles.extend(quad(-2.0));
        let mesh = TriangleMesh::from_triangles(&triangles, MaterialId(4));

        let ray = Ray::new(Vec3::new(0.2, 0.3, 0.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(mesh.intersect(&ray, Interval::from_min(0.001), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert_eq!(rec.material, MaterialId(4));
        assert_eq!(mesh.len(), 4);
    }

    #[test]
    fn test_mesh_from_core_mesh() {
        let core = pathrender_core::Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(0.0, 3.0, 0.0),
            ],
            vec![0, 1, 2, 0, 1, 7],
        );
        let mesh = TriangleMesh::from_mesh(&core, MaterialId(0));

        assert_eq!(mesh.len(), 1);
        assert!((mesh.centroid() - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_empty_mesh_never_hits() {
        let mesh = TriangleMesh::from_triangles(&[], MaterialId(0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(mesh.is_empty());
        assert!(!mesh.intersect(&ray, Interval::from_min(0.001), &mut rec));
        assert_eq!(mesh.centroid(), Vec3::ZERO);
    }
}
