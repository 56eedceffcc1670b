//! Materials and their scattering models.
//!
//! A material pairs a base color with one of a closed set of BRDFs. Each
//! BRDF picks a lobe at random, weighted by its own coefficients, and
//! either produces a scattered ray or reports absorption.

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use pathrender_core::{BrdfDesc, MaterialDesc};
use pathrender_math::{build_orthonormal_basis, reflect, refract, Color, Point3, Ray, Vec3};
use rand::RngCore;

/// Distance scattered rays are pushed off the surface to avoid self-hits.
pub const SURFACE_EPSILON: f32 = 0.01;

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    /// The outgoing ray
    pub ray: Ray,
    /// Color filter applied to everything the outgoing ray gathers
    pub attenuation: Color,
}

/// Scattering model of a material.
#[derive(Debug, Clone, PartialEq)]
pub enum Brdf {
    /// Diffuse lobe plus a fuzzy mirror lobe.
    Phong { ka: f32, kd: f32, ks: f32, n: f32 },

    /// Mirror reflection blurred independently along the two tangent axes.
    Anisotropic { nu: f32, nv: f32 },

    /// Diffuse lobe plus refraction with Fresnel-weighted reflection.
    Dielectric { kd: f32, kt: f32, ior: f32 },
}

impl Default for Brdf {
    fn default() -> Self {
        Brdf::Phong {
            ka: 0.3,
            kd: 0.7,
            ks: 0.0,
            n: 5.0,
        }
    }
}

impl From<&BrdfDesc> for Brdf {
    fn from(desc: &BrdfDesc) -> Self {
        match *desc {
            BrdfDesc::Phong { ka, kd, ks, n } => Brdf::Phong { ka, kd, ks, n },
            BrdfDesc::Anisotropic { nu, nv } => Brdf::Anisotropic { nu, nv },
            BrdfDesc::Dielectric { kd, kt, ior } => Brdf::Dielectric { kd, kt, ior },
        }
    }
}

impl Brdf {
    /// Scatter `ray_in` at `rec`, tinting by `color`.
    ///
    /// Returns `None` when the ray is absorbed.
    pub fn scatter(
        &self,
        color: Color,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        match *self {
            Brdf::Phong { kd, ks, n, .. } => {
                let total = kd + ks;
                if !(total > 0.0) {
                    return None;
                }

                if gen_f32(rng) * total < kd {
                    return Some(diffuse(color, rec, rng));
                }

                let reflected = reflect(ray_in.direction().normalize_or_zero(), rec.normal);
                let fuzz = if n > 0.0 { (2.0 / n).clamp(0.0, 1.0) } else { 1.0 };
                let direction = (reflected + fuzz * random_unit_vector(rng)).normalize_or_zero();

                if direction.dot(rec.normal) <= 0.0 {
                    return None;
                }

                Some(ScatterRecord {
                    ray: Ray::new(offset_origin(rec.p, rec.normal, direction), direction),
                    attenuation: color,
                })
            }

            Brdf::Anisotropic { nu, nv } => {
                let reflected = reflect(ray_in.direction().normalize_or_zero(), rec.normal);

                // First axis of the reflection frame follows the surface tangent, so
                // `nu` blurs along the tangent and `nv` along the bitangent
                let (tangent, _) = build_orthonormal_basis(rec.normal);
                let projected = tangent - reflected * tangent.dot(reflected);
                let axis_u = if projected.length_squared() > 1e-8 {
                    projected.normalize()
                } else {
                    build_orthonormal_basis(reflected).0
                };
                let axis_v = reflected.cross(axis_u);

                let p = random_in_unit_sphere(rng);
                let perturbed =
                    (reflected + axis_u * (p.x * nu) + axis_v * (p.y * nv)).normalize_or_zero();
                let direction = if perturbed.dot(rec.normal) > 0.0 {
                    perturbed
                } else {
                    reflected
                };

                Some(ScatterRecord {
                    ray: Ray::new(offset_origin(rec.p, rec.normal, direction), direction),
                    attenuation: color,
                })
            }

            Brdf::Dielectric { kd, kt, ior } => {
                let total = kd + kt;
                if !(total > 0.0) {
                    return None;
                }

                if gen_f32(rng) * total < kd {
                    return Some(diffuse(color, rec, rng));
                }

                let ratio = if rec.front_face { 1.0 / ior } else { ior };
                let unit_direction = ray_in.direction().normalize_or_zero();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

                let cannot_refract = ratio * sin_theta > 1.0;
                let direction = if cannot_refract || reflectance(cos_theta, ratio) > gen_f32(rng) {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, ratio)
                };

                Some(ScatterRecord {
                    ray: Ray::new(offset_origin(rec.p, rec.normal, direction), direction),
                    attenuation: Color::ONE,
                })
            }
        }
    }

    pub fn is_transmissive(&self) -> bool {
        matches!(self, Brdf::Dielectric { .. })
    }
}

/// Cosine-weighted bounce around the normal.
fn diffuse(color: Color, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterRecord {
    let direction = (rec.normal + random_unit_vector(rng)).normalize_or_zero();
    let direction = if direction == Vec3::ZERO {
        rec.normal
    } else {
        direction
    };

    ScatterRecord {
        ray: Ray::new(offset_origin(rec.p, rec.normal, direction), direction),
        attenuation: color,
    }
}

/// Push `p` off the surface on the side `direction` leaves from.
#[inline]
fn offset_origin(p: Point3, normal: Vec3, direction: Vec3) -> Point3 {
    if direction.dot(normal) >= 0.0 {
        p + normal * SURFACE_EPSILON
    } else {
        p - normal * SURFACE_EPSILON
    }
}

/// Schlick's approximation for reflectance.
pub fn reflectance(cosine: f32, ref_idx: f32) -> f32 {
    let r0 = (1.0 - ref_idx) / (1.0 + ref_idx);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// A named material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Albedo for surfaces, emitted radiance for lights
    pub color: Color,
    pub is_light: bool,
    pub brdf: Brdf,
}

impl Material {
    pub fn new(name: impl Into<String>, color: Color, brdf: Brdf) -> Self {
        Self {
            name: name.into(),
            color,
            is_light: false,
            brdf,
        }
    }

    /// A light source radiating `color`.
    pub fn emitter(name: impl Into<String>, color: Color) -> Self {
        Self {
            is_light: true,
            ..Self::new(name, color, Brdf::default())
        }
    }

    /// Scatter an incoming ray. Emitters never scatter.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        if self.is_light {
            return None;
        }
        self.brdf.scatter(self.color, ray_in, rec, rng)
    }

    /// Whether this material blocks shadow rays.
    pub fn occludes(&self) -> bool {
        !self.is_light && !self.brdf.is_transmissive()
    }
}

impl From<&MaterialDesc> for Material {
    fn from(desc: &MaterialDesc) -> Self {
        Self {
            name: desc.name.clone(),
            color: desc.color,
            is_light: desc.light,
            brdf: Brdf::from(&desc.brdf),
        }
    }
}
