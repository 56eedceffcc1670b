//! Wavefront OBJ parser.
//!
//! Handles the subset needed for Cornell-box style scenes:
//!
//! - `v x y z` vertex positions
//! - `vn x y z` normals (only the last one is kept, as the camera up vector)
//! - `f a b c ...` faces; `a/b/c` index forms and negative indices are
//!   accepted, polygons are fan-triangulated
//! - `usemtl name` starts a new group, one mesh per material name
//! - `g name` records a camera from the two most recent vertices
//!   (position, then look-at)
//! - `lp n` legacy light point; consumes the last vertex and is ignored
//!
//! Everything else (`o`, `s`, `vt`, `mtllib`, ...) is skipped.

use std::collections::HashMap;

use pathrender_math::{Color, Point3, Vec3};

use crate::loader::{LoadError, LoadResult};
use crate::mesh::Mesh;
use crate::scene::{CameraDesc, MaterialDesc, OutputDesc, SceneDescription, ShapeDesc};

/// Material name used when faces appear before any `usemtl`.
pub const DEFAULT_GROUP: &str = "default";

/// Group name whose faces become emitters in OBJ scenes.
pub const LIGHT_GROUP: &str = "light";

/// Field of view used for cameras derived from OBJ files.
pub const OBJ_CAMERA_FOV: f32 = 70.0;

/// Faces sharing one `usemtl` material.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjGroup {
    pub material: String,
    pub mesh: Mesh,
}

/// Parsed OBJ contents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjData {
    /// Groups in order of first appearance
    pub groups: Vec<ObjGroup>,

    /// Camera recorded by the last `g` statement, if any
    pub camera: Option<CameraDesc>,

    /// Number of `lp` statements that were skipped
    pub ignored_light_points: usize,
}

impl ObjData {
    /// All groups merged into a single mesh.
    pub fn merged_mesh(&self) -> Mesh {
        let mut mesh = Mesh::default();
        for group in &self.groups {
            mesh.append(&group.mesh);
        }
        mesh
    }
}

/// A `v` statement with a serial number that survives `lp` pops.
#[derive(Clone, Copy)]
struct ObjVertex {
    serial: u32,
    position: Point3,
}

/// Faces of one group, resolved to vertices when the `f` line is read.
struct PendingGroup {
    material: String,
    faces: Vec<[ObjVertex; 3]>,
}

/// Parse OBJ source text.
pub fn parse_obj(source: &str) -> LoadResult<ObjData> {
    let mut vertices: Vec<ObjVertex> = Vec::new();
    let mut serial: u32 = 0;
    let mut last_normal: Option<Vec3> = None;
    let mut groups: Vec<PendingGroup> = Vec::new();
    let mut current: Option<usize> = None;
    let mut data = ObjData::default();

    for (index, raw) in source.lines().enumerate() {
        let line_num = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or_default();
        let rest: Vec<&str> = tokens.collect();

        match keyword {
            "v" => {
                let position = parse_vec3(&rest, line_num)?;
                vertices.push(ObjVertex { serial, position });
                serial += 1;
            }
            "vn" => last_normal = Some(parse_vec3(&rest, line_num)?),
            "usemtl" => {
                let name = rest.join(" ");
                if name.is_empty() {
                    return Err(parse_error(line_num, "usemtl without a material name"));
                }
                current = Some(group_index(&mut groups, &name));
            }
            "f" => {
                if rest.len() < 3 {
                    return Err(parse_error(line_num, "face needs at least 3 vertices"));
                }
                let corners = rest
                    .iter()
                    .map(|token| resolve_index(token, vertices.len(), line_num).map(|i| vertices[i as usize]))
                    .collect::<LoadResult<Vec<ObjVertex>>>()?;

                let group = *current.get_or_insert_with(|| group_index(&mut groups, DEFAULT_GROUP));
                for k in 1..corners.len() - 1 {
                    groups[group].faces.push([corners[0], corners[k], corners[k + 1]]);
                }
            }
            "g" => {
                if vertices.len() >= 2 {
                    data.camera = Some(CameraDesc {
                        position: vertices[vertices.len() - 2].position,
                        look_at: vertices[vertices.len() - 1].position,
                        up: last_normal.unwrap_or(Vec3::Y),
                        fov: OBJ_CAMERA_FOV,
                    });
                }
            }
            "lp" => {
                if vertices.pop().is_none() {
                    return Err(parse_error(line_num, "light point without a vertex"));
                }
                data.ignored_light_points += 1;
            }
            other => log::trace!("Skipping OBJ statement '{}' at line {}", other, line_num),
        }
    }

    data.groups = groups
        .into_iter()
        .filter(|g| !g.faces.is_empty())
        .map(|g| ObjGroup {
            mesh: compact_mesh(&g.faces),
            material: g.material,
        })
        .collect();

    Ok(data)
}

/// Build a whole scene from OBJ contents.
///
/// Each group becomes a mesh object with a material from the Cornell-box
/// palette; the `light` group becomes an emitter.
pub fn obj_scene(name: impl Into<String>, data: &ObjData) -> SceneDescription {
    let mut scene = SceneDescription::new(name);
    scene.output = OutputDesc::default();
    scene.camera = data.camera.clone().unwrap_or_default();

    if data.ignored_light_points > 0 {
        log::warn!(
            "Ignored {} legacy light point(s); mark emitters with 'usemtl {}' instead",
            data.ignored_light_points,
            LIGHT_GROUP
        );
    }

    for group in &data.groups {
        let material = match scene.find_material(&group.material) {
            Some(index) => index,
            None => {
                let color = palette_color(&group.material);
                let desc = if group.material == LIGHT_GROUP {
                    MaterialDesc::emitter(group.material.clone(), color)
                } else {
                    MaterialDesc::new(group.material.clone(), color)
                };
                scene.add_material(desc)
            }
        };
        scene.add_object(
            group.material.clone(),
            ShapeDesc::Mesh(group.mesh.clone()),
            material,
        );
    }

    scene
}

/// Hardcoded colors for the standard Cornell box material names.
pub fn palette_color(material: &str) -> Color {
    match material {
        "floor" | "ceiling" | "back" => Color::new(0.7, 0.7, 0.7),
        "green" => Color::new(0.12, 0.45, 0.15),
        "red" => Color::new(0.65, 0.05, 0.05),
        "short_box" => Color::new(0.0, 0.0, 1.0),
        "tall_box" => Color::new(0.0, 0.0, 0.0),
        LIGHT_GROUP => Color::new(10.0, 10.0, 10.0),
        _ => Color::new(0.5, 0.5, 0.5),
    }
}

fn group_index(groups: &mut Vec<PendingGroup>, material: &str) -> usize {
    if let Some(index) = groups.iter().position(|g| g.material == material) {
        return index;
    }
    groups.push(PendingGroup {
        material: material.to_string(),
        faces: Vec::new(),
    });
    groups.len() - 1
}

/// Copy only the vertices a group references and renumber its faces.
fn compact_mesh(faces: &[[ObjVertex; 3]]) -> Mesh {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut positions = Vec::new();
    let mut indices = Vec::with_capacity(faces.len() * 3);

    for vertex in faces.iter().flatten() {
        let local = *remap.entry(vertex.serial).or_insert_with(|| {
            positions.push(vertex.position);
            (positions.len() - 1) as u32
        });
        indices.push(local);
    }

    Mesh::new(positions, indices)
}

/// Turn a face token (`7`, `7/1`, `7//3`, `-1`) into a zero-based index.
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> LoadResult<u32> {
    let head = token.split('/').next().unwrap_or_default();
    let value: i64 = head
        .parse()
        .map_err(|_| parse_error(line, format!("invalid face index '{}'", token)))?;

    let resolved = if value > 0 {
        value - 1
    } else if value < 0 {
        vertex_count as i64 + value
    } else {
        return Err(parse_error(line, "face indices are 1-based, got 0"));
    };

    if resolved < 0 || resolved as usize >= vertex_count {
        return Err(parse_error(
            line,
            format!("face index {} out of range ({} vertices)", value, vertex_count),
        ));
    }
    Ok(resolved as u32)
}

fn parse_vec3(tokens: &[&str], line: usize) -> LoadResult<Vec3> {
    if tokens.len() < 3 {
        return Err(parse_error(line, "expected 3 coordinates"));
    }
    let mut xyz = [0.0f32; 3];
    for (slot, token) in xyz.iter_mut().zip(tokens) {
        *slot = token
            .parse()
            .map_err(|_| parse_error(line, format!("invalid number '{}'", token)))?;
    }
    Ok(Vec3::from_array(xyz))
}

fn parse_error(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        line,
        message: message.into(),
    }
}
