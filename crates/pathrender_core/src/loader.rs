//! Scene file loading.
//!
//! Scene files are YAML or JSON documents with the same schema, or OBJ
//! files loaded as a whole Cornell-box style scene. The format is chosen
//! from the file extension.
//!
//! ```yaml
//! output: { width: 400, height: 300, filename: render.png }
//! camera: { position: [0, 1, 5], look_at: [0, 1, 0], up: [0, 1, 0], fov: 60 }
//! background: { color: [0.0, 0.0, 0.0] }
//! materials:
//!   glass: { type: dielectric, ior: 1.5 }
//!   lamp:  { type: phong, color: [4, 4, 4], light: true }
//! objects:
//!   - { type: sphere, center: [0, 1, 0], radius: 1, material: glass }
//!   - { type: plane, point: [0, 0, 0], normal: [0, 1, 0], color: [0.7, 0.7, 0.7] }
//!   - { type: mesh, file: bunny.obj, material: lamp }
//! render: { samples: 64, max_depth: 5, direct_lighting: true, seed: 7 }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pathrender_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::mesh::Mesh;
use crate::obj::{obj_scene, parse_obj};
use crate::scene::{
    BrdfDesc, CameraDesc, MaterialDesc, OutputDesc, RenderOverrides, SceneDescription, ShapeDesc,
};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("Invalid scene: {0}")]
    Invalid(String),

    #[error("Unsupported scene format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Scene file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Yaml,
    Json,
    Obj,
}

impl SceneFormat {
    /// Detect the format of a path from its extension.
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "yaml" | "yml" => Ok(SceneFormat::Yaml),
            "json" => Ok(SceneFormat::Json),
            "obj" => Ok(SceneFormat::Obj),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load a scene file.
///
/// Mesh files referenced by YAML/JSON scenes are resolved relative to the
/// scene file's directory.
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let format = SceneFormat::from_path(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    log::debug!("Loading {:?} scene from {}", format, path.display());
    let source = std::fs::read_to_string(path)?;
    load_scene_from_str(&source, format, name, base_dir)
}

/// Load a scene from in-memory source text.
pub fn load_scene_from_str(
    source: &str,
    format: SceneFormat,
    name: &str,
    base_dir: &Path,
) -> LoadResult<SceneDescription> {
    let scene = match format {
        SceneFormat::Yaml => build_scene(serde_yaml::from_str(source)?, name, base_dir)?,
        SceneFormat::Json => build_scene(serde_json::from_str(source)?, name, base_dir)?,
        SceneFormat::Obj => obj_scene(name, &parse_obj(source)?),
    };

    log::info!(
        "Loaded scene '{}': {} objects, {} materials, {} triangles, {} emitters",
        scene.name,
        scene.objects.len(),
        scene.materials.len(),
        scene.total_triangle_count(),
        scene.emitter_count()
    );
    Ok(scene)
}

/// Load an OBJ file as a single mesh, ignoring its material groups.
pub fn load_obj_mesh<P: AsRef<Path>>(path: P) -> LoadResult<Mesh> {
    let source = std::fs::read_to_string(path.as_ref())?;
    Ok(parse_obj(&source)?.merged_mesh())
}

// =============================================================================
// File schema
// =============================================================================

type Triple = [f32; 3];

#[derive(Deserialize, Debug)]
struct SceneFile {
    output: OutputFile,
    camera: CameraFile,
    #[serde(default)]
    background: Option<BackgroundFile>,
    #[serde(default)]
    materials: BTreeMap<String, MaterialFile>,
    objects: Vec<ObjectFile>,
    #[serde(default)]
    render: Option<RenderFile>,
}

#[derive(Deserialize, Debug)]
struct OutputFile {
    width: u32,
    height: u32,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CameraFile {
    position: Triple,
    look_at: Triple,
    #[serde(default = "default_up")]
    up: Triple,
    fov: f32,
}

#[derive(Deserialize, Debug)]
struct BackgroundFile {
    color: Triple,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
enum MaterialFile {
    Phong {
        color: Triple,
        #[serde(default)]
        light: bool,
        #[serde(default = "default_ka")]
        ka: f32,
        #[serde(default = "default_phong_kd")]
        kd: f32,
        #[serde(default)]
        ks: f32,
        #[serde(default = "default_shininess")]
        n: f32,
    },
    Anisotropic {
        color: Triple,
        #[serde(default)]
        light: bool,
        #[serde(default = "default_nu")]
        nu: f32,
        #[serde(default = "default_nv")]
        nv: f32,
    },
    Dielectric {
        #[serde(default = "default_white")]
        color: Triple,
        #[serde(default)]
        light: bool,
        #[serde(default)]
        kd: f32,
        #[serde(default = "default_kt")]
        kt: f32,
        #[serde(default = "default_ior")]
        ior: f32,
    },
}

#[derive(Deserialize, Debug)]
struct ObjectFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    material: Option<String>,
    #[serde(default)]
    color: Option<Triple>,
    #[serde(flatten)]
    shape: ShapeFile,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ShapeFile {
    Sphere {
        center: Triple,
        radius: f32,
    },
    Plane {
        point: Triple,
        normal: Triple,
    },
    Triangle {
        a: Triple,
        b: Triple,
        c: Triple,
    },
    Mesh {
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        vertices: Vec<Triple>,
        #[serde(default)]
        faces: Vec<[u32; 3]>,
    },
}

#[derive(Deserialize, Debug, Default)]
struct RenderFile {
    #[serde(default)]
    samples: Option<u32>,
    #[serde(default)]
    max_depth: Option<u32>,
    #[serde(default)]
    direct_lighting: Option<bool>,
    #[serde(default)]
    seed: Option<u64>,
}

fn default_up() -> Triple {
    [0.0, 1.0, 0.0]
}
fn default_white() -> Triple {
    [1.0, 1.0, 1.0]
}
fn default_ka() -> f32 {
    0.3
}
fn default_phong_kd() -> f32 {
    0.7
}
fn default_shininess() -> f32 {
    5.0
}
fn default_nu() -> f32 {
    0.5
}
fn default_nv() -> f32 {
    0.1
}
fn default_kt() -> f32 {
    1.0
}
fn default_ior() -> f32 {
    1.5
}

// =============================================================================
// Validation and conversion
// =============================================================================

fn build_scene(file: SceneFile, name: &str, base_dir: &Path) -> LoadResult<SceneDescription> {
    let mut scene = SceneDescription::new(name);

    if file.output.width == 0 || file.output.height == 0 {
        return Err(invalid(format!(
            "output size must be non-zero, got {}x{}",
            file.output.width, file.output.height
        )));
    }
    scene.output = OutputDesc {
        width: file.output.width,
        height: file.output.height,
        filename: file.output.filename,
    };

    scene.camera = convert_camera(file.camera)?;
    scene.background = file
        .background
        .map(|b| Vec3::from_array(b.color))
        .unwrap_or(Vec3::ZERO);

    for (material_name, material) in file.materials {
        let desc = convert_material(material_name, material)?;
        scene.add_material(desc);
    }

    for (index, object) in file.objects.into_iter().enumerate() {
        let object_name = object
            .name
            .clone()
            .unwrap_or_else(|| format!("{}_{}", object.shape.kind(), index));

        let material = match (&object.material, object.color) {
            (Some(material_name), _) => scene
                .find_material(material_name)
                .ok_or_else(|| LoadError::UnknownMaterial(material_name.clone()))?,
            (None, Some(color)) => scene.add_material(MaterialDesc::new(
                object_name.clone(),
                Vec3::from_array(color),
            )),
            (None, None) => match scene.find_material(DEFAULT_MATERIAL) {
                Some(existing) => existing,
                None => scene.add_material(MaterialDesc::new(DEFAULT_MATERIAL, Vec3::splat(0.5))),
            },
        };

        let shape = convert_shape(object.shape, &object_name, base_dir)?;
        scene.add_object(object_name, shape, material);
    }

    if let Some(render) = file.render {
        scene.render = RenderOverrides {
            samples: render.samples,
            max_depth: render.max_depth,
            direct_lighting: render.direct_lighting,
            seed: render.seed,
        };
    }

    Ok(scene)
}

/// Material used by objects that name neither a material nor a color.
const DEFAULT_MATERIAL: &str = "default";

fn convert_camera(camera: CameraFile) -> LoadResult<CameraDesc> {
    if !(camera.fov > 0.0 && camera.fov < 180.0) {
        return Err(invalid(format!(
            "camera fov must be in (0, 180) degrees, got {}",
            camera.fov
        )));
    }
    let position = Vec3::from_array(camera.position);
    let look_at = Vec3::from_array(camera.look_at);
    if position == look_at {
        return Err(invalid("camera position and look_at coincide"));
    }

    Ok(CameraDesc {
        position,
        look_at,
        up: Vec3::from_array(camera.up),
        fov: camera.fov,
    })
}

fn convert_material(name: String, material: MaterialFile) -> LoadResult<MaterialDesc> {
    let (color, light, brdf) = match material {
        MaterialFile::Phong {
            color,
            light,
            ka,
            kd,
            ks,
            n,
        } => {
            check_weights(&name, &[("ka", ka), ("kd", kd), ("ks", ks)])?;
            (color, light, BrdfDesc::Phong { ka, kd, ks, n })
        }
        MaterialFile::Anisotropic {
            color,
            light,
            nu,
            nv,
        } => {
            check_weights(&name, &[("nu", nu), ("nv", nv)])?;
            (color, light, BrdfDesc::Anisotropic { nu, nv })
        }
        MaterialFile::Dielectric {
            color,
            light,
            kd,
            kt,
            ior,
        } => {
            check_weights(&name, &[("kd", kd), ("kt", kt)])?;
            if ior <= 0.0 {
                return Err(invalid(format!(
                    "material '{}': ior must be positive, got {}",
                    name, ior
                )));
            }
            (color, light, BrdfDesc::Dielectric { kd, kt, ior })
        }
    };

    Ok(MaterialDesc {
        name,
        color: Vec3::from_array(color),
        light,
        brdf,
    })
}

fn check_weights(material: &str, weights: &[(&str, f32)]) -> LoadResult<()> {
    match weights.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
        Some((field, value)) => Err(invalid(format!(
            "material '{}': {} must be a non-negative number, got {}",
            material, field, value
        ))),
        None => Ok(()),
    }
}

fn convert_shape(shape: ShapeFile, object: &str, base_dir: &Path) -> LoadResult<ShapeDesc> {
    match shape {
        ShapeFile::Sphere { center, radius } => {
            if !(radius > 0.0) {
                return Err(invalid(format!(
                    "object '{}': sphere radius must be positive, got {}",
                    object, radius
                )));
            }
            Ok(ShapeDesc::Sphere {
                center: Vec3::from_array(center),
                radius,
            })
        }
        ShapeFile::Plane { point, normal } => Ok(ShapeDesc::Plane {
            point: Vec3::from_array(point),
            normal: Vec3::from_array(normal),
        }),
        ShapeFile::Triangle { a, b, c } => Ok(ShapeDesc::Triangle {
            a: Vec3::from_array(a),
            b: Vec3::from_array(b),
            c: Vec3::from_array(c),
        }),
        ShapeFile::Mesh {
            file,
            vertices,
            faces,
        } => {
            let mesh = match file {
                Some(file) => {
                    let path: PathBuf = base_dir.join(file);
                    log::debug!("Loading mesh for '{}' from {}", object, path.display());
                    load_obj_mesh(&path)?
                }
                None => Mesh::new(
                    vertices.into_iter().map(Vec3::from_array).collect(),
                    faces.into_iter().flatten().collect(),
                ),
            };

            if mesh.is_empty() {
                return Err(invalid(format!("object '{}': mesh has no faces", object)));
            }
            if let Some(face) = mesh.first_invalid_face() {
                return Err(invalid(format!(
                    "object '{}': face {} references a missing vertex",
                    object, face
                )));
            }
            Ok(ShapeDesc::Mesh(mesh))
        }
    }
}

impl ShapeFile {
    fn kind(&self) -> &'static str {
        match self {
            ShapeFile::Sphere { .. } => "sphere",
            ShapeFile::Plane { .. } => "plane",
            ShapeFile::Triangle { .. } => "triangle",
            ShapeFile::Mesh { .. } => "mesh",
        }
    }
}

fn invalid(message: impl Into<String>) -> LoadError {
    LoadError::Invalid(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
output:
  width: 320
  height: 240
  filename: basic.png
camera:
  position: [0, 1, 5]
  look_at: [0, 1, 0]
  fov: 60
background:
  color: [0.1, 0.2, 0.3]
materials:
  glass: { type: dielectric, ior: 1.5 }
  lamp: { type: phong, color: [4, 4, 4], light: true }
  brushed: { type: anisotropic, color: [0.8, 0.8, 0.8], nu: 0.8, nv: 0.1 }
objects:
  - type: sphere
    name: ball
    center: [0, 1, 0]
    radius: 1
    material: glass
  - type: plane
    point: [0, 0, 0]
    normal: [0, 1, 0]
    color: [0.7, 0.7, 0.7]
  - type: triangle
    a: [0, 3, 0]
    b: [1, 3, 0]
    c: [0, 3, 1]
    material: lamp
  - type: mesh
    vertices: [[0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0]]
    faces: [[0, 1, 2], [1, 3, 2]]
    material: brushed
render:
  samples: 16
  direct_lighting: true
"#;

    fn load_yaml(source: &str) -> LoadResult<SceneDescription> {
        load_scene_from_str(source, SceneFormat::Yaml, "test", Path::new("."))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SceneFormat::from_path(Path::new("a.yaml")).unwrap(), SceneFormat::Yaml);
        assert_eq!(SceneFormat::from_path(Path::new("a.YML")).unwrap(), SceneFormat::Yaml);
        assert_eq!(SceneFormat::from_path(Path::new("a.json")).unwrap(), SceneFormat::Json);
        assert_eq!(SceneFormat::from_path(Path::new("a.obj")).unwrap(), SceneFormat::Obj);
        assert!(matches!(
            SceneFormat::from_path(Path::new("a.usda")),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_basic_yaml() {
        let scene = load_yaml(BASIC_YAML).unwrap();

        assert_eq!(scene.output.width, 320);
        assert_eq!(scene.output.filename.as_deref(), Some("basic.png"));
        assert_eq!(scene.camera.up, Vec3::Y);
        assert_eq!(scene.background, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(scene.objects.len(), 4);
        assert_eq!(scene.emitter_count(), 1);
        assert_eq!(scene.total_triangle_count(), 3);

        let ball = &scene.objects[0];
        assert_eq!(ball.name, "ball");
        assert_eq!(scene.materials[ball.material].name, "glass");
        assert_eq!(
            scene.materials[ball.material].brdf,
            BrdfDesc::Dielectric {
                kd: 0.0,
                kt: 1.0,
                ior: 1.5
            }
        );

        // Color shorthand creates a default phong material named after the object
        let plane = &scene.objects[1];
        assert_eq!(plane.name, "plane_1");
        assert_eq!(scene.materials[plane.material].brdf, BrdfDesc::DEFAULT_PHONG);

        assert_eq!(scene.render.samples, Some(16));
        assert_eq!(scene.render.direct_lighting, Some(true));
        assert_eq!(scene.render.max_depth, None);
    }

    #[test]
    fn test_load_json() {
        let source = r#"{
            "output": { "width": 10, "height": 10 },
            "camera": { "position": [0, 0, 1], "look_at": [0, 0, 0], "fov": 45 },
            "objects": [ { "type": "sphere", "center": [0, 0, -1], "radius": 0.5 } ]
        }"#;
        let scene = load_scene_from_str(source, SceneFormat::Json, "json", Path::new(".")).unwrap();

        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.background, Vec3::ZERO);
        assert_eq!(scene.materials[0].name, DEFAULT_MATERIAL);
    }

    #[test]
    fn test_unknown_material() {
        let source = BASIC_YAML.replace("material: glass", "material: crystal");
        assert!(matches!(load_yaml(&source), Err(LoadError::UnknownMaterial(name)) if name == "crystal"));
    }

    #[test]
    fn test_unknown_object_type() {
        let source = BASIC_YAML.replace("type: sphere", "type: torus");
        assert!(matches!(load_yaml(&source), Err(LoadError::Yaml(_))));
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero_radius = BASIC_YAML.replace("radius: 1", "radius: 0");
        assert!(matches!(load_yaml(&zero_radius), Err(LoadError::Invalid(_))));

        let bad_fov = BASIC_YAML.replace("fov: 60", "fov: 0");
        assert!(matches!(load_yaml(&bad_fov), Err(LoadError::Invalid(_))));

        let bad_face = BASIC_YAML.replace("[1, 3, 2]", "[1, 7, 2]");
        assert!(matches!(load_yaml(&bad_face), Err(LoadError::Invalid(_))));

        let bad_ior = BASIC_YAML.replace("ior: 1.5", "ior: -1");
        assert!(matches!(load_yaml(&bad_ior), Err(LoadError::Invalid(_))));
    }

    #[test]
    fn test_mesh_file_relative_to_scene() {
        let dir = std::env::temp_dir().join(format!("pathrender_loader_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let scene_path = dir.join("scene.yaml");
        std::fs::write(
            &scene_path,
            "output: { width: 4, height: 4 }\n\
             camera: { position: [0, 0, 2], look_at: [0, 0, 0], fov: 40 }\n\
             objects:\n  - { type: mesh, file: tri.obj, color: [1, 0, 0] }\n",
        )
        .unwrap();

        let scene = load_scene(&scene_path).unwrap();
        assert_eq!(scene.name, "scene");
        assert_eq!(scene.total_triangle_count(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_scene("/definitely/not/here.yaml"),
            Err(LoadError::Io(_))
        ));
    }
}
