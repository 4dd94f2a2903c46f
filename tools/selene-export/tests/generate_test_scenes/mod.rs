//! Scene snapshot generators for integration tests

use serde_json::{json, Value};
use std::path::Path;

fn translation(x: f32, y: f32, z: f32) -> Value {
    json!([1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, x, y, z, 1.0])
}

fn phong(name: &str) -> Value {
    json!({
        "name": name,
        "shading": "PHONG",
        "diffuse_color": [0.8, 0.8, 0.8],
        "diffuse_intensity": 1.0,
        "emission": 0.3,
        "specular_color": [1.0, 1.0, 1.0],
        "specular_intensity": 0.5,
        "hardness": 50.0,
        "textures": [
            { "image": "//textures/crate.png", "use_diffuse": true },
            null
        ]
    })
}

fn write(path: &Path, scene: &Value) -> std::io::Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(scene)?)
}

/// Single textured quad, one material
pub fn quad_scene() -> Value {
    json!({
        "object": {
            "name": "Quad",
            "mesh": {
                "vertices": [
                    { "position": [0.0, 0.0, 0.0], "normal": [0.0, 0.0, 1.0] },
                    { "position": [1.0, 0.0, 0.0], "normal": [0.0, 0.0, 1.0] },
                    { "position": [1.0, 1.0, 0.0], "normal": [0.0, 0.0, 1.0] },
                    { "position": [0.0, 1.0, 0.0], "normal": [0.0, 0.0, 1.0] }
                ],
                "polygons": [
                    { "vertices": [0, 1, 2, 3], "normal": [0.0, 0.0, 1.0] }
                ],
                "uv_layers": [
                    {
                        "name": "UVMap",
                        "active": true,
                        "polygons": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]
                    }
                ],
                "materials": [phong("Crate")]
            }
        }
    })
}

pub fn generate_quad_scene(path: &Path) -> std::io::Result<()> {
    write(path, &quad_scene())
}

/// Quad without any UV layer
pub fn generate_untextured_scene(path: &Path) -> std::io::Result<()> {
    let mut scene = quad_scene();
    scene["object"]["mesh"]["uv_layers"] = json!([]);
    write(path, &scene)
}

pub const BONE_NAMES: [&str; 5] = ["root", "spine", "head", "leg", "foot"];

/// Strip of two quads skinned to a five bone armature
///
/// Vertex 0 is influenced by all five bones. The armature lists children
/// before their parents.
pub fn skinned_scene() -> Value {
    let bones = json!([
        { "name": "head", "parent": "spine", "matrix_local": translation(0.0, 2.0, 0.0) },
        { "name": "spine", "parent": "root", "matrix_local": translation(0.0, 1.0, 0.0) },
        { "name": "root", "matrix_local": translation(0.0, 0.0, 0.0) },
        { "name": "leg", "parent": "root", "matrix_local": translation(1.0, 0.0, 0.0) },
        { "name": "foot", "parent": "leg", "matrix_local": translation(1.0, -1.0, 0.0) },
        { "name": "tail", "parent": "root", "matrix_local": translation(-1.0, 0.0, 0.0) }
    ]);

    let groups: Vec<Value> = BONE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "index": i, "name": name }))
        .collect();

    let five = json!([
        { "group": 0, "weight": 0.2 },
        { "group": 1, "weight": 0.2 },
        { "group": 2, "weight": 0.2 },
        { "group": 3, "weight": 0.2 },
        { "group": 4, "weight": 0.2 }
    ]);
    let root_only = json!([{ "group": 0, "weight": 1.0 }]);
    let split = json!([{ "group": 1, "weight": 0.5 }, { "group": 3, "weight": 1.5 }]);

    let frames: Vec<Value> = (1..=3)
        .map(|frame| {
            json!({
                "frame": frame,
                "bones": {
                    "root": translation(0.0, 0.0, frame as f32),
                    "spine": translation(0.0, 1.0, frame as f32)
                }
            })
        })
        .collect();

    json!({
        "object": {
            "name": "Strip",
            "world_matrix": translation(0.0, 0.0, 2.0),
            "vertex_groups": groups,
            "mesh": {
                "vertices": [
                    { "position": [0.0, 0.0, 0.0], "normal": [0.0, 0.0, 1.0], "groups": five },
                    { "position": [1.0, 0.0, 0.0], "normal": [0.0, 0.0, 1.0], "groups": root_only },
                    { "position": [1.0, 1.0, 0.0], "normal": [0.0, 0.0, 1.0], "groups": split },
                    { "position": [0.0, 1.0, 0.0], "normal": [0.0, 0.0, 1.0], "groups": root_only },
                    { "position": [2.0, 0.0, 0.0], "normal": [0.0, 0.0, 1.0], "groups": split },
                    { "position": [2.0, 1.0, 0.0], "normal": [0.0, 0.0, 1.0], "groups": root_only }
                ],
                "polygons": [
                    { "vertices": [0, 1, 2, 3], "normal": [0.0, 0.0, 1.0], "smooth": true },
                    { "vertices": [1, 4, 5, 2], "normal": [0.0, 0.0, 1.0], "material": 1 }
                ],
                "uv_layers": [
                    {
                        "active": true,
                        "polygons": [
                            [[0.0, 0.0], [0.5, 0.0], [0.5, 1.0], [0.0, 1.0]],
                            [[0.5, 0.0], [1.0, 0.0], [1.0, 1.0], [0.5, 1.0]]
                        ]
                    }
                ],
                "materials": [phong("Body"), phong("Legs")]
            }
        },
        "armatures": [
            { "name": "Rig", "world_matrix": translation(0.0, 0.0, 2.0), "bones": bones }
        ],
        "timeline": {
            "frame_start": 1,
            "frame_end": 3,
            "frame_current": 2,
            "frames": frames
        }
    })
}

pub fn generate_skinned_scene(path: &Path) -> std::io::Result<()> {
    write(path, &skinned_scene())
}

/// Textured quad as Wavefront OBJ
pub fn generate_quad_obj(path: &Path) -> std::io::Result<()> {
    let obj = "\
# quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl Crate
f 1/1/1 2/2/1 3/3/1 4/4/1
";
    std::fs::write(path, obj)
}
