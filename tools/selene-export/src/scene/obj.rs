//! Wavefront OBJ reader for static meshes
//!
//! Handles `v`, `vt`, `vn`, `f`, `usemtl` and `s` records. Each `usemtl`
//! name becomes a material slot with default shading values, in order of
//! first use. Polygons keep their vertex count; the triangulator decides
//! which ones are supported.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;
use hashbrown::HashMap;

use super::{Mesh, SceneError, SceneSnapshot, SourceMaterial, SourcePolygon, SourceVertex, UvLayer};

const DEFAULT_MATERIAL: &str = "default";

/// Load an OBJ file as a static mesh snapshot
pub fn load_obj(path: &Path) -> Result<SceneSnapshot, SceneError> {
    let read_err = |source| SceneError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    let reader = BufReader::new(file);

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();

    let mut polygons: Vec<SourcePolygon> = Vec::new();
    let mut polygon_uvs: Vec<Vec<[f32; 2]>> = Vec::new();
    let mut any_uv = false;

    // First vn referenced by each vertex
    let mut vertex_normals: HashMap<usize, [f32; 3]> = HashMap::new();

    let mut material_slots: HashMap<String, u32> = HashMap::new();
    let mut material_names: Vec<String> = Vec::new();
    let mut current_material: Option<u32> = None;
    let mut smooth = false;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(read_err)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let obj_err = |message: String| SceneError::Obj {
            path: path.to_path_buf(),
            line: line_no + 1,
            message,
        };

        match parts[0] {
            "v" if parts.len() >= 4 => {
                positions.push(parse_floats(&parts[1..4]).map_err(obj_err)?);
            }
            "vt" if parts.len() >= 3 => {
                tex_coords.push(parse_floats(&parts[1..3]).map_err(obj_err)?);
            }
            "vn" if parts.len() >= 4 => {
                normals_raw.push(parse_floats(&parts[1..4]).map_err(obj_err)?);
            }
            "usemtl" if parts.len() >= 2 => {
                current_material = Some(slot_for(&mut material_slots, &mut material_names, parts[1]));
            }
            "s" if parts.len() >= 2 => {
                smooth = !matches!(parts[1], "off" | "0");
            }
            "f" if parts.len() >= 4 => {
                let mut vertices = Vec::with_capacity(parts.len() - 1);
                let mut uvs = Vec::with_capacity(parts.len() - 1);

                for corner in &parts[1..] {
                    let (vi, vti, vni) = parse_obj_vertex(corner)
                        .ok_or_else(|| obj_err(format!("Invalid face vertex '{}'", corner)))?;
                    if vi >= positions.len() {
                        return Err(obj_err(format!("Vertex index {} out of range", vi + 1)));
                    }
                    vertices.push(vi as u32);

                    if let Some(ti) = vti {
                        any_uv = true;
                        let uv = tex_coords.get(ti).copied().ok_or_else(|| {
                            obj_err(format!("Texture coordinate index {} out of range", ti + 1))
                        })?;
                        uvs.push(uv);
                    } else {
                        uvs.push([0.0; 2]);
                    }

                    if let Some(normal) = vni.and_then(|ni| normals_raw.get(ni)) {
                        vertex_normals.entry(vi).or_insert(*normal);
                    }
                }

                let material = match current_material {
                    Some(slot) => slot,
                    None => {
                        let slot =
                            slot_for(&mut material_slots, &mut material_names, DEFAULT_MATERIAL);
                        current_material = Some(slot);
                        slot
                    }
                };

                let normal = polygon_normal(&positions, &vertices);
                polygons.push(SourcePolygon {
                    vertices,
                    material,
                    smooth,
                    normal,
                });
                polygon_uvs.push(uvs);
            }
            _ => {}
        }
    }

    let vertices = build_vertices(&positions, &polygons, &vertex_normals);
    let uv_layers = if any_uv {
        vec![UvLayer {
            name: "UVMap".to_string(),
            active: true,
            polygons: polygon_uvs,
        }]
    } else {
        Vec::new()
    };

    let mesh = Mesh {
        vertices,
        polygons,
        uv_layers,
        materials: material_names
            .into_iter()
            .map(SourceMaterial::with_defaults)
            .collect(),
    };

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    tracing::debug!(
        "Read OBJ {:?}: {} vertices, {} polygons, {} materials",
        path,
        mesh.vertices.len(),
        mesh.polygons.len(),
        mesh.materials.len()
    );

    Ok(SceneSnapshot::from_mesh(name, mesh))
}

fn slot_for(slots: &mut HashMap<String, u32>, names: &mut Vec<String>, name: &str) -> u32 {
    if let Some(&slot) = slots.get(name) {
        return slot;
    }
    let slot = names.len() as u32;
    slots.insert(name.to_string(), slot);
    names.push(name.to_string());
    slot
}

fn parse_floats<const N: usize>(parts: &[&str]) -> Result<[f32; N], String> {
    let mut out = [0.0f32; N];
    for (value, part) in out.iter_mut().zip(parts) {
        *value = part
            .parse()
            .map_err(|_| format!("Invalid number '{}'", part))?;
    }
    Ok(out)
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
fn parse_obj_vertex(s: &str) -> Option<(usize, Option<usize>, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = parts.first()?.parse::<usize>().ok()?.checked_sub(1)?; // OBJ indices are 1-based

    let vti = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    let vni = parts
        .get(2)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<usize>().ok())
        .and_then(|i| i.checked_sub(1));

    Some((vi, vti, vni))
}

/// Newell normal of a planar polygon
fn polygon_normal(positions: &[[f32; 3]], vertices: &[u32]) -> [f32; 3] {
    let mut normal = Vec3::ZERO;
    for (i, &a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        let p = Vec3::from(positions[a as usize]);
        let q = Vec3::from(positions[b as usize]);
        normal += Vec3::new(
            (p.y - q.y) * (p.z + q.z),
            (p.z - q.z) * (p.x + q.x),
            (p.x - q.x) * (p.y + q.y),
        );
    }
    normal.normalize_or_zero().to_array()
}

/// Vertex normals come from `vn` records when present, otherwise from the
/// sum of adjacent polygon normals.
fn build_vertices(
    positions: &[[f32; 3]],
    polygons: &[SourcePolygon],
    vertex_normals: &HashMap<usize, [f32; 3]>,
) -> Vec<SourceVertex> {
    let mut accumulated = vec![Vec3::ZERO; positions.len()];
    for polygon in polygons {
        for &v in &polygon.vertices {
            accumulated[v as usize] += Vec3::from(polygon.normal);
        }
    }

    positions
        .iter()
        .enumerate()
        .map(|(i, &position)| SourceVertex {
            position,
            normal: vertex_normals
                .get(&i)
                .copied()
                .unwrap_or_else(|| accumulated[i].normalize_or_zero().to_array()),
            groups: Vec::new(),
        })
        .collect()
}
