//! Hit records and arena handles for ray-object intersection.

use pathrender_math::{Point3, Ray, Vec3};

/// Handle of an object in a `Scene`'s object arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a material in a `Scene`'s material arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Object that was hit; filled in by the scene
    pub object: ObjectId,
    /// Material at the intersection point
    pub material: MaterialId,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_normal_against_ray() {
        let mut rec = HitRecord::default();

        let incoming = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        rec.set_face_normal(&incoming, Vec3::Y);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Y);

        let from_inside = Ray::new(Vec3::ZERO, Vec3::Y);
        rec.set_face_normal(&from_inside, Vec3::Y);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_Y);
        assert!(rec.normal.dot(from_inside.direction()) <= 0.0);
    }
}
