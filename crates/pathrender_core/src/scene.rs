//! Scene description types for PathRender.
//!
//! A `SceneDescription` is what the loaders produce: plain data, already
//! validated, with every material reference resolved to an index into
//! `materials`. It knows nothing about intersection or sampling; the
//! renderer turns it into its own scene arena.

use pathrender_math::{Color, Point3, Vec3};

use crate::mesh::Mesh;

/// Scattering model parameters of a material.
#[derive(Clone, Debug, PartialEq)]
pub enum BrdfDesc {
    /// Diffuse lobe plus a glossy reflection lobe.
    Phong {
        /// Ambient weight (kept for completeness, unused by the path tracer)
        ka: f32,
        /// Diffuse weight
        kd: f32,
        /// Specular weight
        ks: f32,
        /// Shininess exponent
        n: f32,
    },

    /// Reflection blurred by two independent roughness values.
    Anisotropic {
        /// Roughness along the surface tangent (0 = sharp, 1 = rough)
        nu: f32,
        /// Roughness along the surface bitangent
        nv: f32,
    },

    /// Glass-like refraction with an optional diffuse lobe.
    Dielectric {
        /// Diffuse weight
        kd: f32,
        /// Transmissive weight
        kt: f32,
        /// Index of refraction (1.5 = glass, 2.4 = diamond)
        ior: f32,
    },
}

impl BrdfDesc {
    pub const DEFAULT_PHONG: BrdfDesc = BrdfDesc::Phong {
        ka: 0.3,
        kd: 0.7,
        ks: 0.0,
        n: 5.0,
    };
}

/// A named material.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDesc {
    /// Material name (from the scene file or OBJ `usemtl`)
    pub name: String,

    /// Base color: albedo for surfaces, radiance for emitters
    pub color: Color,

    /// Emitters return `color` instead of scattering
    pub light: bool,

    pub brdf: BrdfDesc,
}

impl MaterialDesc {
    /// A default Phong material with just a name and color.
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            light: false,
            brdf: BrdfDesc::DEFAULT_PHONG,
        }
    }

    /// An emitter with the given radiance.
    pub fn emitter(name: impl Into<String>, color: Color) -> Self {
        Self {
            light: true,
            ..Self::new(name, color)
        }
    }
}

/// Geometry of a scene object.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeDesc {
    Sphere { center: Point3, radius: f32 },
    Plane { point: Point3, normal: Vec3 },
    Triangle { a: Point3, b: Point3, c: Point3 },
    Mesh(Mesh),
}

impl ShapeDesc {
    /// Short lowercase kind name, used for logging and generated names.
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeDesc::Sphere { .. } => "sphere",
            ShapeDesc::Plane { .. } => "plane",
            ShapeDesc::Triangle { .. } => "triangle",
            ShapeDesc::Mesh(_) => "mesh",
        }
    }
}

/// A scene object: geometry plus a material index.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDesc {
    pub name: String,
    pub shape: ShapeDesc,
    /// Index into `SceneDescription::materials`
    pub material: usize,
}

/// Camera placement. The aspect ratio comes from the output size.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraDesc {
    pub position: Point3,
    pub look_at: Point3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: 70.0,
        }
    }
}

/// Output image parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputDesc {
    pub width: u32,
    pub height: u32,
    /// Requested file name; the driver decides the final path
    pub filename: Option<String>,
}

impl OutputDesc {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for OutputDesc {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            filename: None,
        }
    }
}

/// Per-scene render settings overrides from the `render:` section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOverrides {
    pub samples: Option<u32>,
    pub max_depth: Option<u32>,
    pub direct_lighting: Option<bool>,
    pub seed: Option<u64>,
}

/// A complete, validated scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    /// Scene name (usually from filename)
    pub name: String,

    pub output: OutputDesc,

    pub camera: CameraDesc,

    /// Radiance returned by rays that escape the scene
    pub background: Color,

    /// Material arena; objects refer to entries by index
    pub materials: Vec<MaterialDesc>,

    pub objects: Vec<ObjectDesc>,

    pub render: RenderOverrides,
}

impl SceneDescription {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: MaterialDesc) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Index of the material with the given name.
    pub fn find_material(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    /// Add an object referencing an existing material.
    pub fn add_object(&mut self, name: impl Into<String>, shape: ShapeDesc, material: usize) {
        self.objects.push(ObjectDesc {
            name: name.into(),
            shape,
            material,
        });
    }

    /// Number of objects whose material is an emitter.
    pub fn emitter_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| self.materials.get(o.material).is_some_and(|m| m.light))
            .count()
    }

    /// Get total triangle count across explicit triangles and meshes.
    pub fn total_triangle_count(&self) -> usize {
        self.objects
            .iter()
            .map(|o| match &o.shape {
                ShapeDesc::Triangle { .. } => 1,
                ShapeDesc::Mesh(mesh) => mesh.triangle_count(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_creation() {
        let mut scene = SceneDescription::new("test");

        let red = scene.add_material(MaterialDesc::new("red", Vec3::new(0.65, 0.05, 0.05)));
        let light = scene.add_material(MaterialDesc::emitter("light", Vec3::splat(10.0)));

        scene.add_object(
            "ball",
            ShapeDesc::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
            red,
        );
        scene.add_object(
            "lamp",
            ShapeDesc::Mesh(Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2])),
            light,
        );

        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.emitter_count(), 1);
        assert_eq!(scene.total_triangle_count(), 1);
        assert_eq!(scene.find_material("light"), Some(1));
        assert_eq!(scene.find_material("missing"), None);
    }

    #[test]
    fn test_default_material_is_phong() {
        let material = MaterialDesc::new("grey", Vec3::splat(0.5));
        assert!(!material.light);
        assert_eq!(material.brdf, BrdfDesc::DEFAULT_PHONG);
    }

    #[test]
    fn test_aspect_ratio() {
        let output = OutputDesc {
            width: 800,
            height: 400,
            filename: None,
        };
        assert_eq!(output.aspect_ratio(), 2.0);
    }
}
