//! The closed set of renderable objects.

use crate::hittable::{HitRecord, MaterialId};
use crate::mesh::TriangleMesh;
use crate::plane::Plane;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use pathrender_math::{Interval, Point3, Ray};

/// A renderable object.
///
/// Every variant carries its own material handle; the scene fills in the
/// object handle after a hit.
#[derive(Debug, Clone)]
pub enum Object {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
    Mesh(TriangleMesh),
}

impl Object {
    /// Closest intersection inside `ray_t`. On a miss `rec` is not modified.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        match self {
            Object::Sphere(s) => s.intersect(ray, ray_t, rec),
            Object::Plane(p) => p.intersect(ray, ray_t, rec),
            Object::Triangle(t) => t.intersect(ray, ray_t, rec),
            Object::Mesh(m) => m.intersect(ray, ray_t, rec),
        }
    }

    pub fn material(&self) -> MaterialId {
        match self {
            Object::Sphere(s) => s.material(),
            Object::Plane(p) => p.material(),
            Object::Triangle(t) => t.material(),
            Object::Mesh(m) => m.material(),
        }
    }

    /// Representative point, used as the light position for emitters.
    ///
    /// Sphere center, plane reference point, triangle centroid, or mesh
    /// vertex centroid.
    pub fn position(&self) -> Point3 {
        match self {
            Object::Sphere(s) => s.center(),
            Object::Plane(p) => p.point(),
            Object::Triangle(t) => t.centroid(),
            Object::Mesh(m) => m.centroid(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Object::Sphere(_) => "sphere",
            Object::Plane(_) => "plane",
            Object::Triangle(_) => "triangle",
            Object::Mesh(_) => "mesh",
        }
    }
}

impl From<Sphere> for Object {
    fn from(sphere: Sphere) -> Self {
        Object::Sphere(sphere)
    }
}

impl From<Plane> for Object {
    fn from(plane: Plane) -> Self {
        Object::Plane(plane)
    }
}

impl From<Triangle> for Object {
    fn from(triangle: Triangle) -> Self {
        Object::Triangle(triangle)
    }
}

impl From<TriangleMesh> for Object {
    fn from(mesh: TriangleMesh) -> Self {
        Object::Mesh(mesh)
    }
}
