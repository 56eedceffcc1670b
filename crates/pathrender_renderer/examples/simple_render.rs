//! Simple path tracer example.
//!
//! Builds a small scene in code, renders it in parallel and saves a PPM.

use pathrender_renderer::{
    render, Brdf, Camera, Color, DirectLighting, Material, Plane, RenderSettings, Scene, Sphere,
    Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("PathRender - Simple Example");
    println!("===========================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?} ({} objects)", start.elapsed(), scene.len());

    let (width, height) = (640, 360);
    let camera = Camera::new(
        Vec3::new(0.0, 1.2, 5.0),
        Vec3::new(0.0, 0.6, 0.0),
        Vec3::Y,
        40.0,
        width as f32 / height as f32,
    );

    let settings = RenderSettings {
        samples_per_pixel: 32,
        max_depth: 6,
        seed: Some(1),
        background: Color::new(0.05, 0.05, 0.08),
        direct_lighting: DirectLighting {
            enabled: true,
            ..Default::default()
        },
        show_progress: true,
        ..Default::default()
    };

    println!("Rendering {}x{} @ {} spp...", width, height, settings.samples_per_pixel);

    let start = std::time::Instant::now();
    let image = render(&camera, &scene, width, height, &settings)?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "simple_render.ppm";
    image.save(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let ground = scene.add_material(Material::new("ground", Color::splat(0.5), Brdf::default()));
    let clay = scene.add_material(Material::new(
        "clay",
        Color::new(0.4, 0.2, 0.1),
        Brdf::Phong {
            ka: 0.1,
            kd: 0.8,
            ks: 0.2,
            n: 30.0,
        },
    ));
    let glass = scene.add_material(Material::new(
        "glass",
        Color::ONE,
        Brdf::Dielectric {
            kd: 0.0,
            kt: 1.0,
            ior: 1.5,
        },
    ));
    let brushed = scene.add_material(Material::new(
        "brushed",
        Color::new(0.7, 0.6, 0.5),
        Brdf::Anisotropic { nu: 0.5, nv: 0.05 },
    ));
    let lamp = scene.add_material(Material::emitter("lamp", Color::splat(8.0)));

    scene.add_object(Plane::new(Vec3::ZERO, Vec3::Y, ground));
    scene.add_object(Sphere::new(Vec3::new(-1.4, 0.6, 0.0), 0.6, clay));
    scene.add_object(Sphere::new(Vec3::new(0.0, 0.6, 0.0), 0.6, glass));
    scene.add_object(Sphere::new(Vec3::new(1.4, 0.6, 0.0), 0.6, brushed));
    scene.add_object(Sphere::new(Vec3::new(0.0, 4.0, 1.0), 0.5, lamp));

    scene
}
