//! Pinhole camera for ray generation.

use pathrender_core::CameraDesc;
use pathrender_math::{Point3, Ray, Vec3};

/// Camera for generating rays into the scene.
///
/// Everything is derived once at construction; `get_ray` is pure, so a
/// single camera is shared by every render worker.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Create a camera at `look_from` aimed at `look_at`.
    ///
    /// `vfov` is the vertical field of view in degrees, `aspect_ratio` is
    /// width over height. An `up` vector parallel to the view direction
    /// gives a degenerate basis and zero-width viewport.
    pub fn new(look_from: Point3, look_at: Point3, vup: Vec3, vfov: f32, aspect_ratio: f32) -> Self {
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        let w = (look_from - look_at).normalize_or_zero();
        let u = vup.cross(w).normalize_or_zero();
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = look_from - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal,
            vertical,
        }
    }

    pub fn from_desc(desc: &CameraDesc, aspect_ratio: f32) -> Self {
        Self::new(desc.position, desc.look_at, desc.up, desc.fov, aspect_ratio)
    }

    /// Ray through viewport coordinate `(s, t)`, both in [0, 1] with the
    /// origin at the lower-left corner. The direction is unit length.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin, (target - self.origin).normalize_or_zero())
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }
}
