//! Infinite plane primitive.

use crate::hittable::{HitRecord, MaterialId};
use pathrender_math::{Interval, Point3, Ray, Vec3};

/// Rays closer to parallel than this never hit a plane.
const PARALLEL_EPSILON: f32 = 1e-6;

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Point3,
    normal: Vec3,
    material: MaterialId,
}

impl Plane {
    /// Create a plane. The normal is normalized; a zero normal yields a
    /// plane that no ray can hit.
    pub fn new(point: Point3, normal: Vec3, material: MaterialId) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            material,
        }
    }

    pub fn point(&self) -> Point3 {
        self.point
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn intersect(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let denom = ray.direction().dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.point - ray.origin()).dot(self.normal) / denom;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Plane {
        Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 2.0, 0.0), MaterialId(1))
    }

    #[test]
    fn test_normal_is_normalized() {
        assert!((floor().normal() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(floor().intersect(&ray, Interval::from_min(0.001), &mut rec));
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!((rec.p - Vec3::new(0.0, -1.0, -1.0)).length() < 1e-5);
        assert_eq!(rec.normal, Vec3::Y);
        assert!(rec.front_face);
    }

    #[test]
    fn test_plane_from_below() {
        let ray = Ray::new(Vec3::new(0.0, -3.0, 0.0), Vec3::Y);
        let mut rec = HitRecord::default();

        assert!(floor().intersect(&ray, Interval::from_min(0.001), &mut rec));
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_Y);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let mut rec = HitRecord::default();
        assert!(!floor().intersect(&ray, Interval::from_min(0.001), &mut rec));
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let mut rec = HitRecord::default();
        assert!(!floor().intersect(&ray, Interval::from_min(0.001), &mut rec));
    }

    #[test]
    fn test_zero_normal_never_hits() {
        let plane = Plane::new(Vec3::ZERO, Vec3::ZERO, MaterialId(0));
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);
        let mut rec = HitRecord::default();
        assert!(!plane.intersect(&ray, Interval::from_min(0.001), &mut rec));
    }
}
