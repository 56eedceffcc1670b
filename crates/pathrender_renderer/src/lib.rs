//! PathRender renderer - CPU path tracing
//!
//! A Monte Carlo path tracer over a flat arena of spheres, planes,
//! triangles and triangle meshes. Rendering is split into row bands that
//! run in parallel on a rayon pool, each with its own seeded random stream.

mod band;
mod camera;
mod config;
mod hittable;
mod material;
mod mesh;
mod object;
mod output;
mod plane;
mod progress;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod triangle;

pub use band::{generate_bands, render, render_band, worker_seed, Band, RenderError};
pub use camera::Camera;
pub use config::SceneConfig;
pub use hittable::{HitRecord, MaterialId, ObjectId};
pub use material::{reflectance, Brdf, Material, ScatterRecord, SURFACE_EPSILON};
pub use mesh::TriangleMesh;
pub use object::Object;
pub use output::{ImageFormat, OutputError};
pub use plane::Plane;
pub use progress::Progress;
pub use renderer::{
    clamp_01, color_to_rgb8, direct_light, light_attenuation, linear_to_gamma, ray_color,
    raycast_pixel, render_pixel, shade_pixel, to_display, DirectLighting, ImageBuffer,
    RenderMode, RenderSettings, T_MIN,
};
pub use sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export common math types from pathrender_math
pub use pathrender_math::{Color, Interval, Point3, Ray, Vec3};
