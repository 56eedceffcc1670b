//! Conversion from a loaded `SceneDescription` to render-ready data.

use crate::hittable::MaterialId;
use crate::material::Material;
use crate::mesh::TriangleMesh;
use crate::object::Object;
use crate::plane::Plane;
use crate::renderer::RenderSettings;
use crate::sphere::Sphere;
use crate::triangle::Triangle;
use crate::{Camera, Scene};
use pathrender_core::{RenderOverrides, SceneDescription, ShapeDesc};
use pathrender_math::Color;

/// Everything needed to render one scene.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub name: String,
    pub scene: Scene,
    pub camera: Camera,
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Requested output file name from the scene file
    pub filename: Option<String>,
    /// Settings from the scene's `render:` section
    pub overrides: RenderOverrides,
}

impl SceneConfig {
    /// Build the object and material arenas and the camera.
    ///
    /// Material indices in the description map one-to-one onto material
    /// handles; an object whose material index is out of range falls back to
    /// a grey default material.
    pub fn from_description(desc: &SceneDescription) -> Self {
        let mut scene = Scene::new();

        let material_ids: Vec<MaterialId> = desc
            .materials
            .iter()
            .map(|m| scene.add_material(Material::from(m)))
            .collect();

        let mut fallback: Option<MaterialId> = None;

        for object in &desc.objects {
            let material = match material_ids.get(object.material) {
                Some(id) => *id,
                None => {
                    log::warn!(
                        "Object '{}' references missing material {}, using default",
                        object.name,
                        object.material
                    );
                    *fallback.get_or_insert_with(|| {
                        scene.add_material(Material::new(
                            "default",
                            Color::splat(0.5),
                            Default::default(),
                        ))
                    })
                }
            };

            let renderable: Object = match &object.shape {
                ShapeDesc::Sphere { center, radius } => {
                    Sphere::new(*center, *radius, material).into()
                }
                ShapeDesc::Plane { point, normal } => Plane::new(*point, *normal, material).into(),
                ShapeDesc::Triangle { a, b, c } => Triangle::new(*a, *b, *c, material).into(),
                ShapeDesc::Mesh(mesh) => TriangleMesh::from_mesh(mesh, material).into(),
            };

            log::debug!("Added {} '{}'", renderable.kind(), object.name);
            scene.add_object(renderable);
        }

        let camera = Camera::from_desc(&desc.camera, desc.output.aspect_ratio());

        log::info!(
            "Scene '{}': {} objects ({} emitters), {} materials, {} triangles",
            desc.name,
            scene.len(),
            scene.emitters().count(),
            scene.materials().len(),
            desc.total_triangle_count()
        );

        Self {
            name: desc.name.clone(),
            scene,
            camera,
            width: desc.output.width,
            height: desc.output.height,
            background: desc.background,
            filename: desc.output.filename.clone(),
            overrides: desc.render.clone(),
        }
    }

    /// `base` with the scene background and `render:` overrides applied.
    pub fn settings(&self, base: &RenderSettings) -> RenderSettings {
        let mut settings = base.clone();
        settings.background = self.background;
        settings.apply_overrides(&self.overrides);
        settings
    }
}
