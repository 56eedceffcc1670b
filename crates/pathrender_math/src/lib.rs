//! PathRender math types.
//!
//! Vectors come straight from glam. Points and colors are the same `Vec3`
//! type under different names so signatures say what a value means.

// Re-export glam for convenience
pub use glam::*;

mod basis;
mod interval;
mod ray;

pub use basis::{build_orthonormal_basis, reflect, refract};
pub use interval::Interval;
pub use ray::Ray;

/// A position in world space.
///
/// `Point3 - Point3` yields a displacement (`Vec3`), `Point3 ± Vec3` yields a
/// new position.
pub type Point3 = Vec3;

/// Linear RGB color, one `f32` per channel.
pub type Color = Vec3;
