use crate::{Point3, Vec3};

/// A ray in 3D space with an origin and a direction.
///
/// The direction is treated as a velocity: `P(t) = origin + t * direction`.
/// It is not required to be unit length, so `t` is only a distance when the
/// producer normalized it. Camera and scattered rays are always normalized.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}
