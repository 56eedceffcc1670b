//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, MaterialId};
use pathrender_math::{Interval, Point3, Ray};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Nearest root of the ray/sphere quadratic inside `ray_t`.
    ///
    /// Leaves `rec` untouched on a miss.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.contains(root) {
            root = (h + sqrtd) / a;
            if !ray_t.contains(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(root);
        let outward_normal = (rec.p - self.center).normalize_or_zero();
        rec.set_face_normal(ray, outward_normal);
        rec.material = self.material;

        true
    }
}
