//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{HitRecord, MaterialId};
use pathrender_math::{Interval, Point3, Ray, Vec3};

/// A flat-shaded triangle.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Vertices
    v0: Point3,
    v1: Point3,
    v2: Point3,
    /// Pre-computed face normal (unit length, zero if degenerate)
    normal: Vec3,
    material: MaterialId,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal follows the winding `(v1 - v0) x (v2 - v0)`.
    pub fn new(v0: Point3, v1: Point3, v2: Point3, material: MaterialId) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        Self {
            v0,
            v1,
            v2,
            normal,
            material,
        }
    }

    pub fn vertices(&self) -> [Point3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn centroid(&self) -> Point3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Möller-Trumbore intersection.
    ///
    /// The lower bound of `ray_t` doubles as the tolerance for the
    /// determinant and the barycentric edges, so hits that graze an edge
    /// shared by two triangles are not lost.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let epsilon = ray_t.min.max(0.0);

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle, or triangle is degenerate
        if a.abs() < epsilon || a == 0.0 {
            return false;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);

        if !(u >= -epsilon && u <= 1.0 + epsilon) {
            return false;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);

        if !(v >= -epsilon && u + v <= 1.0 + epsilon) {
            return false;
        }

        let t = f * edge2.dot(q);
        if !ray_t.contains(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.normal);
        rec.material = self.material;

        true
    }
}
