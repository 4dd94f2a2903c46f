//! Mesh consolidation
//!
//! Turns a scene snapshot into a model that can be encoded without further
//! checks: polygons are triangulated, texture coordinates and normals are
//! deduplicated, triangles are regrouped by material and, for skinned
//! models, the skeleton and skin weights are resolved.

use glam::{Mat3, Vec3};

use crate::error::{Result, ValidationError, Warnings};
use crate::formats::{
    swap_axes, BoneRecord, MaterialRecord, ModelFormat, SleTriangle, INFLUENCES_PER_VERTEX,
};
use crate::material::{extract_materials, MaterialGroups};
use crate::normals::resolve_normals;
use crate::scene::SceneSnapshot;
use crate::skeleton::Skeleton;
use crate::skin::{normalize_skin, SkinVertex};
use crate::texcoords::resolve_tex_coords;
use crate::triangulate::triangulate;

/// Consolidated `.sle` model
#[derive(Debug, Clone, PartialEq)]
pub struct StaticModel {
    /// Object-space positions
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangles grouped by material
    pub triangles: Vec<SleTriangle>,
    pub materials: Vec<MaterialRecord>,
}

/// Consolidated `.sdmf` model
///
/// Positions and normals are in world space with Y and Z swapped, texture
/// coordinates are V-flipped. The three face lists share one order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedModel {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// One entry per position when the model has bones
    pub skin: Vec<SkinVertex>,
    pub tex_coords: Vec<[f32; 2]>,
    pub position_faces: Vec<[u32; 3]>,
    pub normal_faces: Vec<[u32; 3]>,
    pub tex_coord_faces: Vec<[u32; 3]>,
    pub materials: Vec<MaterialRecord>,
    pub bones: Vec<BoneRecord>,
}

pub(crate) fn check_count(what: &'static str, count: usize, max: usize) -> Result<(), ValidationError> {
    if count > max {
        return Err(ValidationError::TooMany { what, count, max });
    }
    Ok(())
}

/// Build the `.sle` model of a snapshot
pub fn build_static_model(scene: &SceneSnapshot, warnings: &mut Warnings) -> Result<StaticModel> {
    let format = ModelFormat::Sle;
    let mesh = &scene.object.mesh;

    let faces = triangulate(&mesh.polygons, mesh.vertices.len(), format.winding())?;
    let uvs = resolve_tex_coords(mesh, faces.len(), format.winding())?;
    let groups = MaterialGroups::new(&faces);
    let materials = extract_materials(&mesh.materials, &groups, format, warnings)?;

    let triangles = groups
        .face_order()
        .map(|face| SleTriangle {
            positions: faces[face].vertices,
            tex_coords: uvs.faces[face],
        })
        .collect();

    tracing::debug!(
        "Consolidated {:?}: {} triangles, {} texture coordinates, {} materials",
        scene.object.name,
        faces.len(),
        uvs.tex_coords.len(),
        materials.len()
    );

    Ok(StaticModel {
        positions: mesh.vertices.iter().map(|v| v.position).collect(),
        tex_coords: uvs.tex_coords,
        triangles,
        materials,
    })
}

/// Build the `.sdmf` model of a snapshot
pub fn build_skinned_model(
    scene: &SceneSnapshot,
    warnings: &mut Warnings,
) -> Result<SkinnedModel> {
    let format = ModelFormat::Sdmf;
    let object = &scene.object;
    let mesh = &object.mesh;
    let armature = scene.armature()?;

    let faces = triangulate(&mesh.polygons, mesh.vertices.len(), format.winding())?;
    let uvs = resolve_tex_coords(mesh, faces.len(), format.winding())?;
    let normals = resolve_normals(&faces, &mesh.vertices);
    let groups = MaterialGroups::new(&faces);
    let materials = extract_materials(&mesh.materials, &groups, format, warnings)?;
    check_count("materials", materials.len(), u16::MAX as usize)?;

    let (skeleton, skin) = match armature {
        Some(armature) => {
            let skeleton = Skeleton::build(armature, &object.vertex_groups);
            check_count("bones", skeleton.len(), u16::MAX as usize)?;
            let skin = normalize_skin(&mesh.vertices, &object.vertex_groups, &skeleton, warnings)?;
            (skeleton, skin)
        }
        None => (Skeleton::default(), Vec::new()),
    };

    let world = object.world();
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

    let positions = mesh
        .vertices
        .iter()
        .map(|v| swap_axes(world.transform_point3(Vec3::from(v.position)).to_array()))
        .collect();
    let normals_out = normals
        .normals
        .iter()
        .map(|&n| swap_axes((normal_matrix * Vec3::from(n)).to_array()))
        .collect();
    let tex_coords = uvs.tex_coords.iter().map(|&[u, v]| [u, 1.0 - v]).collect();

    let order: Vec<usize> = groups.face_order().collect();
    let position_faces = order.iter().map(|&f| faces[f].vertices).collect();
    let normal_faces = order.iter().map(|&f| normals.faces[f]).collect();
    let tex_coord_faces = order.iter().map(|&f| uvs.faces[f]).collect();

    tracing::debug!(
        "Consolidated {:?}: {} triangles, {} normals, {} bones ({} influences per vertex)",
        object.name,
        faces.len(),
        normals.normals.len(),
        skeleton.len(),
        INFLUENCES_PER_VERTEX
    );

    Ok(SkinnedModel {
        positions,
        normals: normals_out,
        skin,
        tex_coords,
        position_faces,
        normal_faces,
        tex_coord_faces,
        materials,
        bones: skeleton.records(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::scene::{
        Armature, GroupWeight, Mesh, SourceBone, SourceMaterial, SourcePolygon, SourceVertex,
        UvLayer, VertexGroup,
    };
    use glam::Mat4;

    fn vertex(position: [f32; 3]) -> SourceVertex {
        SourceVertex {
            position,
            normal: [0.0, 0.0, 1.0],
            groups: Vec::new(),
        }
    }

    fn polygon(vertices: &[u32], material: u32, smooth: bool) -> SourcePolygon {
        SourcePolygon {
            vertices: vertices.to_vec(),
            material,
            smooth,
            normal: [0.0, 0.0, 1.0],
        }
    }

    /// A quad followed by a triangle using a second material
    fn scene() -> SceneSnapshot {
        let mesh = Mesh {
            vertices: vec![
                vertex([0.0, 0.0, 0.0]),
                vertex([1.0, 0.0, 0.0]),
                vertex([1.0, 1.0, 0.0]),
                vertex([0.0, 1.0, 0.0]),
                vertex([2.0, 0.0, 0.0]),
            ],
            polygons: vec![polygon(&[0, 1, 2, 3], 1, false), polygon(&[1, 4, 2], 0, true)],
            uv_layers: vec![UvLayer {
                name: "UVMap".into(),
                active: true,
                polygons: vec![
                    vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
                    vec![[1.0, 0.0], [0.0, 0.0], [1.0, 1.0]],
                ],
            }],
            materials: vec![
                SourceMaterial::with_defaults("first"),
                SourceMaterial::with_defaults("second"),
            ],
        };
        SceneSnapshot::from_mesh("Quad", mesh)
    }

    #[test]
    fn test_static_model_groups_by_material() {
        let mut warnings = Warnings::default();
        let model = build_static_model(&scene(), &mut warnings).unwrap();

        assert_eq!(model.positions.len(), 5);
        assert_eq!(model.tex_coords.len(), 4);
        assert_eq!(model.triangles.len(), 3);
        assert_eq!(model.triangles[0].positions, [0, 1, 2]);
        assert_eq!(model.triangles[1].positions, [2, 3, 0]);
        assert_eq!(model.triangles[2].positions, [1, 4, 2]);
        // the quad's material comes first
        assert_eq!(model.materials.len(), 2);
        assert_eq!(model.materials[0].face_index, 0);
        assert_eq!(model.materials[1].face_index, 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_uv_layer_rejected() {
        let mut scene = scene();
        scene.object.mesh.uv_layers.clear();
        let err = build_static_model(&scene, &mut Warnings::default()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Validation(ValidationError::NoTextureCoordinates)
        ));
    }

    #[test]
    fn test_skinned_model_without_armature() {
        let mut warnings = Warnings::default();
        let model = build_skinned_model(&scene(), &mut warnings).unwrap();

        assert!(model.skin.is_empty());
        assert!(model.bones.is_empty());
        assert_eq!(model.position_faces[0], [0, 2, 1]);
        assert_eq!(model.position_faces[1], [2, 0, 3]);
        assert_eq!(model.position_faces.len(), model.normal_faces.len());
        assert_eq!(model.position_faces.len(), model.tex_coord_faces.len());
        // V flipped
        assert!(model.tex_coords.contains(&[0.0, 1.0]));
        assert!(model.tex_coords.contains(&[1.0, 0.0]));
    }

    #[test]
    fn test_skinned_model_world_space_axis_swap() {
        let mut scene = scene();
        scene.object.world_matrix =
            Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0)).to_cols_array();

        let model = build_skinned_model(&scene, &mut Warnings::default()).unwrap();
        assert_eq!(model.positions[1], [11.0, 30.0, 20.0]);
        // translation leaves normals alone, only axes swap
        assert!(model.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_skinned_model_with_bones() {
        let mut scene = scene();
        scene.armatures.push(Armature {
            name: "Armature".into(),
            world_matrix: Mat4::IDENTITY.to_cols_array(),
            bones: vec![
                SourceBone {
                    name: "root".into(),
                    parent: None,
                    matrix_local: Mat4::IDENTITY.to_cols_array(),
                },
                SourceBone {
                    name: "tip".into(),
                    parent: Some("root".into()),
                    matrix_local: Mat4::from_translation(Vec3::X).to_cols_array(),
                },
            ],
        });
        scene.object.vertex_groups = vec![
            VertexGroup {
                index: 0,
                name: "root".into(),
            },
            VertexGroup {
                index: 1,
                name: "tip".into(),
            },
        ];
        for (i, vertex) in scene.object.mesh.vertices.iter_mut().enumerate() {
            vertex.groups = vec![
                GroupWeight {
                    group: 0,
                    weight: 1.0,
                },
                GroupWeight {
                    group: 1,
                    weight: i as f32,
                },
            ];
        }

        let model = build_skinned_model(&scene, &mut Warnings::default()).unwrap();
        assert_eq!(model.bones.len(), 2);
        assert_eq!(model.bones[1].parent, 0);
        assert_eq!(model.skin.len(), 5);
        assert_eq!(model.skin[0].weights, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(model.skin[3].weights, [0.25, 0.75, 0.0, 0.0]);
        assert_eq!(model.skin[3].indices, [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_vertex_without_bones_rejected() {
        let mut scene = scene();
        scene.armatures.push(Armature {
            name: "Armature".into(),
            world_matrix: Mat4::IDENTITY.to_cols_array(),
            bones: vec![SourceBone {
                name: "root".into(),
                parent: None,
                matrix_local: Mat4::IDENTITY.to_cols_array(),
            }],
        });
        scene.object.vertex_groups = vec![VertexGroup {
            index: 0,
            name: "root".into(),
        }];

        let err = build_skinned_model(&scene, &mut Warnings::default()).unwrap_err();
        assert!(matches!(err, ExportError::Skin(_)));
    }

    #[test]
    fn test_check_count() {
        assert!(check_count("bones", 65535, u16::MAX as usize).is_ok());
        assert_eq!(
            check_count("bones", 65536, u16::MAX as usize),
            Err(ValidationError::TooMany {
                what: "bones",
                count: 65536,
                max: 65535
            })
        );
    }

    #[test]
    fn test_too_many_materials_rejected() {
        let count = u16::MAX as usize + 1;
        let mesh = Mesh {
            vertices: vec![
                vertex([0.0, 0.0, 0.0]),
                vertex([1.0, 0.0, 0.0]),
                vertex([0.0, 1.0, 0.0]),
            ],
            polygons: (0..count)
                .map(|m| polygon(&[0, 1, 2], m as u32, false))
                .collect(),
            uv_layers: vec![UvLayer {
                name: "UVMap".into(),
                active: true,
                polygons: vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]; count],
            }],
            materials: (0..count)
                .map(|m| SourceMaterial::with_defaults(format!("m{m}")))
                .collect(),
        };
        let scene = SceneSnapshot::from_mesh("Many", mesh);

        let err = build_skinned_model(&scene, &mut Warnings::default()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Validation(ValidationError::TooMany {
                what: "materials",
                count: 65536,
                ..
            })
        ));
    }
}
