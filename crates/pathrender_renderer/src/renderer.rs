//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with a throughput accumulator and fixed depth
//! - Optional next-event estimation toward every emitter
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction

use crate::hittable::HitRecord;
use crate::material::SURFACE_EPSILON;
use crate::sampling::gen_f32;
use crate::{Camera, Scene};
use pathrender_core::RenderOverrides;
use pathrender_math::{Color, Interval, Ray};
use rand::RngCore;
use std::f32::consts::PI;

/// Nearest accepted hit distance for camera and bounce rays.
pub const T_MIN: f32 = 0.001;

/// Explicit light sampling settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectLighting {
    pub enabled: bool,
    /// Scale applied to every emitter's color
    pub intensity: f32,
    /// Weight of the direct term relative to bounced light
    pub diffuse_weight: f32,
}

impl Default for DirectLighting {
    fn default() -> Self {
        Self {
            enabled: false,
            intensity: 10.0,
            diffuse_weight: 0.7,
        }
    }
}

/// How each pixel is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Full Monte Carlo path tracing
    #[default]
    PathTrace,
    /// One unjittered primary ray per pixel returning the hit material color
    RayCast,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of path segments
    pub max_depth: u32,
    /// Worker threads; 0 uses rayon's default
    pub threads: usize,
    /// Master seed; `None` draws one from entropy
    pub seed: Option<u64>,
    pub direct_lighting: DirectLighting,
    pub mode: RenderMode,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 50,
            max_depth: 5,
            threads: 0,
            seed: None,
            direct_lighting: DirectLighting::default(),
            mode: RenderMode::PathTrace,
            background: Color::ZERO,
            show_progress: false,
        }
    }
}

impl RenderSettings {
    /// Apply the per-scene `render:` overrides on top of these settings.
    pub fn apply_overrides(&mut self, overrides: &RenderOverrides) {
        if let Some(samples) = overrides.samples {
            self.samples_per_pixel = samples;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.max_depth = max_depth;
        }
        if let Some(enabled) = overrides.direct_lighting {
            self.direct_lighting.enabled = enabled;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
    }
}

/// Compute the radiance carried back along a camera ray.
///
/// Each bounce multiplies the throughput by the scatter attenuation; a
/// miss adds the background, an emitter adds its color, and the path ends
/// after `max_depth` segments.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..settings.max_depth {
        let mut rec = HitRecord::default();

        if !scene.intersect(&ray, Interval::from_min(T_MIN), &mut rec) {
            radiance += throughput * settings.background;
            break;
        }

        let material = scene.material(rec.material);
        if material.is_light {
            radiance += throughput * material.color;
            break;
        }

        if settings.direct_lighting.enabled {
            radiance += throughput
                * direct_light(&rec, material.color, scene, &settings.direct_lighting);
        }

        match material.scatter(&ray, &rec, rng) {
            Some(scattered) => {
                throughput *= scattered.attenuation;
                ray = scattered.ray;
            }
            None => break,
        }
    }

    radiance
}

/// Inverse-square falloff of a point emitter.
#[inline]
pub fn light_attenuation(distance: f32) -> f32 {
    1.0 / (4.0 * PI * distance * distance)
}

/// Next-event estimate at `rec`: one shadow ray toward each emitter's
/// representative position.
pub fn direct_light(
    rec: &HitRecord,
    albedo: Color,
    scene: &Scene,
    settings: &DirectLighting,
) -> Color {
    let mut total = Color::ZERO;
    let shadow_origin = rec.p + rec.normal * SURFACE_EPSILON;

    for (_, emitter) in scene.emitters() {
        let to_light = emitter.position() - rec.p;
        let distance = to_light.length();
        if distance <= SURFACE_EPSILON {
            continue;
        }

        let light_dir = to_light / distance;
        let n_dot_l = rec.normal.dot(light_dir);
        if n_dot_l <= 0.0 {
            continue;
        }

        let shadow_ray = Ray::new(shadow_origin, light_dir);
        if scene.occluded(&shadow_ray, Interval::new(T_MIN, distance - SURFACE_EPSILON)) {
            continue;
        }

        let light_color = scene.material(emitter.material()).color;
        total += albedo * light_color * n_dot_l * light_attenuation(distance) * settings.intensity;
    }

    total * settings.diffuse_weight
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    Interval::UNIT.clamp(x)
}

/// Gamma-correct and clamp a linear color for storage.
pub fn to_display(color: Color) -> Color {
    Color::new(
        clamp_01(linear_to_gamma(color.x)),
        clamp_01(linear_to_gamma(color.y)),
        clamp_01(linear_to_gamma(color.z)),
    )
}

/// Viewport coordinate of pixel column/row `i` plus `offset` out of `size`.
#[inline]
fn viewport_coord(i: u32, offset: f32, size: u32) -> f32 {
    (i as f32 + offset) / (size.max(2) - 1) as f32
}

/// Average of `samples_per_pixel` jittered paths through pixel `(i, j)`.
///
/// `j` counts rows from the bottom of the image. The result is linear.
#[allow(clippy::too_many_arguments)]
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    i: u32,
    j: u32,
    width: u32,
    height: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = settings.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let u = viewport_coord(i, gen_f32(rng), width);
        let v = viewport_coord(j, gen_f32(rng), height);
        let ray = camera.get_ray(u, v);
        pixel_color += ray_color(&ray, scene, settings, rng);
    }

    pixel_color / samples as f32
}

/// Flat color of whatever the unjittered ray through pixel `(i, j)` hits.
pub fn raycast_pixel(
    camera: &Camera,
    scene: &Scene,
    i: u32,
    j: u32,
    width: u32,
    height: u32,
    settings: &RenderSettings,
) -> Color {
    let ray = camera.get_ray(viewport_coord(i, 0.0, width), viewport_coord(j, 0.0, height));
    let mut rec = HitRecord::default();

    if scene.intersect(&ray, Interval::from_min(T_MIN), &mut rec) {
        scene.display_color(&rec)
    } else {
        settings.background
    }
}

/// Final stored value of pixel `(i, j)` for the configured mode.
#[allow(clippy::too_many_arguments)]
pub fn shade_pixel(
    camera: &Camera,
    scene: &Scene,
    i: u32,
    j: u32,
    width: u32,
    height: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    match settings.mode {
        RenderMode::PathTrace => {
            to_display(render_pixel(camera, scene, i, j, width, height, settings, rng))
        }
        RenderMode::RayCast => {
            raycast_pixel(camera, scene, i, j, width, height, settings).clamp(Color::ZERO, Color::ONE)
        }
    }
}

/// Row-major image, top row first, display-ready colors in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y), y counted from the top.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y), y counted from the top.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Mean of all pixels, or black for an empty image.
    pub fn average(&self) -> Color {
        if self.pixels.is_empty() {
            return Color::ZERO;
        }
        self.pixels.iter().copied().sum::<Color>() / self.pixels.len() as f32
    }

    /// Convert to 8-bit RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Quantize a display color to 8 bits per channel.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.999 * clamp_01(c)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Brdf, Material};
    use crate::sphere::Sphere;
    use pathrender_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn camera() -> Camera {
        Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 60.0, 1.0)
    }

    /// Camera sitting inside a large emitting sphere.
    fn inside_light(color: Color) -> Scene {
        let mut scene = Scene::new();
        let light = scene.add_material(Material::emitter("light", color));
        scene.add_object(Sphere::new(Vec3::ZERO, 50.0, light));
        scene
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_zero_depth_is_black() {
        let scene = inside_light(Color::ONE);
        let settings = RenderSettings {
            max_depth: 0,
            background: Color::ONE,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &scene, &settings, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_emitter_view_averages_to_emitter_color() {
        let color = Color::new(0.9, 0.4, 0.2);
        let scene = inside_light(color);
        let settings = RenderSettings {
            samples_per_pixel: 16,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(2);

        for (i, j) in [(0, 0), (3, 5), (7, 7)] {
            let c = render_pixel(&camera(), &scene, i, j, 8, 8, &settings, &mut rng);
            assert!((c - color).length() < 1e-5, "pixel ({i}, {j}) = {c:?}");
        }
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::new();
        let settings = RenderSettings {
            background: Color::new(0.1, 0.2, 0.3),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &scene, &settings, &mut rng), settings.background);
    }

    #[test]
    fn test_absorbing_surface_is_black() {
        let mut scene = Scene::new();
        let dead = scene.add_material(Material::new(
            "dead",
            Color::ONE,
            Brdf::Phong {
                ka: 0.0,
                kd: 0.0,
                ks: 0.0,
                n: 1.0,
            },
        ));
        scene.add_object(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, dead));
        let settings = RenderSettings {
            background: Color::ONE,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(4);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &scene, &settings, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_direct_light_falloff() {
        let mut scene = Scene::new();
        let wall = scene.add_material(Material::new("wall", Color::ONE, Brdf::default()));
        let light = scene.add_material(Material::emitter("light", Color::ONE));
        scene.add_object(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.1, light));
        scene.add_object(crate::plane::Plane::new(Vec3::ZERO, Vec3::Y, wall));

        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);
        assert!(scene.intersect(&ray, Interval::from_min(T_MIN), &mut rec));

        let settings = DirectLighting {
            enabled: true,
            intensity: 1.0,
            diffuse_weight: 1.0,
        };
        let direct = direct_light(&rec, Color::ONE, &scene, &settings);
        let expected = light_attenuation(2.0);
        assert!((direct.x - expected).abs() < 1e-6);

        // Facing away from the light contributes nothing
        rec.normal = -rec.normal;
        assert_eq!(direct_light(&rec, Color::ONE, &scene, &settings), Color::ZERO);
    }

    #[test]
    fn test_direct_light_blocked() {
        let mut scene = Scene::new();
        let wall = scene.add_material(Material::new("wall", Color::ONE, Brdf::default()));
        let light = scene.add_material(Material::emitter("light", Color::ONE));
        scene.add_object(Sphere::new(Vec3::new(0.0, 4.0, 0.0), 0.1, light));
        scene.add_object(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 0.5, wall));

        let rec = HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::Y,
            t: 1.0,
            front_face: true,
            ..Default::default()
        };
        let direct = direct_light(&rec, Color::ONE, &scene, &DirectLighting::default());
        assert_eq!(direct, Color::ZERO);
    }

    #[test]
    fn test_raycast_returns_flat_color() {
        let mut scene = Scene::new();
        let red = scene.add_material(Material::new("red", Color::new(0.8, 0.1, 0.1), Brdf::default()));
        scene.add_object(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, red));
        let settings = RenderSettings {
            mode: RenderMode::RayCast,
            background: Color::new(0.0, 0.0, 0.2),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);

        let center = shade_pixel(&camera(), &scene, 5, 5, 11, 11, &settings, &mut rng);
        assert_eq!(center, Color::new(0.8, 0.1, 0.1));

        let corner = shade_pixel(&camera(), &scene, 0, 0, 11, 11, &settings, &mut rng);
        assert_eq!(corner, settings.background);
    }

    #[test]
    fn test_apply_overrides() {
        let mut settings = RenderSettings::default();
        settings.apply_overrides(&RenderOverrides {
            samples: Some(8),
            max_depth: None,
            direct_lighting: Some(true),
            seed: Some(99),
        });

        assert_eq!(settings.samples_per_pixel, 8);
        assert_eq!(settings.max_depth, 5);
        assert!(settings.direct_lighting.enabled);
        assert_eq!(settings.seed, Some(99));
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb8(Color::new(0.5, 2.0, -1.0)), [127, 255, 0]);
    }

    #[test]
    fn test_image_buffer_indexing() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(3, 2, Color::ONE);
        assert_eq!(image.get(3, 2), Color::ONE);
        assert_eq!(image.pixels[11], Color::ONE);
        assert!((image.average() - Color::splat(1.0 / 12.0)).length() < 1e-6);
    }
}
