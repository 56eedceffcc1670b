//! Random sampling helpers.
//!
//! Everything takes the caller's generator so each render worker can own a
//! private, independently seeded stream.

use pathrender_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Uniformly distributed direction on the unit sphere.
///
/// Picks `z` uniformly in [-1, 1] and an azimuth in [0, 2π), which is exact
/// by Archimedes' hat-box theorem and needs no rejection loop.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let z = gen_f32(rng) * 2.0 - 1.0;
    let a = gen_f32(rng) * 2.0 * PI;
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * a.cos(), r * a.sin(), z)
}

/// Random point inside the unit ball, by rejection from the enclosing cube.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}
