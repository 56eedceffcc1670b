//! PathRender Core - scene descriptions and scene file loading.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription`, `MaterialDesc`,
//!   `ObjectDesc`, `CameraDesc`, `Mesh`
//! - **Loaders**: YAML/JSON scene files and Wavefront OBJ
//!
//! # Example
//!
//! ```ignore
//! use pathrender_core::load_scene;
//!
//! let scene = load_scene("scenes/cornell.yaml")?;
//! println!("Loaded {} objects, {} emitters",
//!     scene.objects.len(),
//!     scene.emitter_count());
//! ```

pub mod loader;
pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_obj_mesh, load_scene, load_scene_from_str, LoadError, LoadResult, SceneFormat};
pub use mesh::Mesh;
pub use obj::{obj_scene, parse_obj, ObjData, ObjGroup};
pub use scene::{
    BrdfDesc, CameraDesc, MaterialDesc, ObjectDesc, OutputDesc, RenderOverrides, SceneDescription,
    ShapeDesc,
};
