//! Integration tests for selene-export
//!
//! Tests the full pipeline: generate scene snapshot -> export -> decode output

mod generate_test_scenes;

use std::path::Path;
use std::process::Command;

use selene_common::{SdafAnimation, SdmfModel, Shading, SleModel, SleTriangle, NO_PARENT};
use selene_export::{
    ExportError, ExportWarning, SceneSnapshot, SkinDataError, ValidationError,
};
use tempfile::tempdir;

fn load(path: &Path) -> SceneSnapshot {
    SceneSnapshot::load(path).expect("Failed to load scene")
}

fn selene_export(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_selene-export"))
        .args(args)
        .output()
        .expect("Failed to run selene-export")
}

/// Quad -> .sle round trip through the library
#[test]
fn test_quad_to_sle() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = dir.path().join("quad.json");
    let sle_path = dir.path().join("quad.sle");
    generate_test_scenes::generate_quad_scene(&scene_path).expect("Failed to generate scene");

    let report = selene_export::export_sle(&load(&scene_path), &sle_path).unwrap();
    assert!(report.warnings.is_empty());

    let data = std::fs::read(&sle_path).expect("Failed to read .sle");
    assert_eq!(report.bytes, data.len());

    let model = SleModel::parse(&data).unwrap();
    assert_eq!(model.header.vertex_count, 4);
    assert_eq!(model.header.face_count, 2);
    assert_eq!(model.header.tex_coord_count, 4);
    assert_eq!(model.materials.len(), 1);
    assert_eq!(model.skin_vertex_count, 0);
    assert_eq!(
        model.triangles,
        vec![
            SleTriangle {
                positions: [0, 1, 2],
                tex_coords: [0, 1, 2]
            },
            SleTriangle {
                positions: [2, 3, 0],
                tex_coords: [2, 3, 0]
            },
        ]
    );

    let material = &model.materials[0];
    assert_eq!(material.face_index, 0);
    assert_eq!(material.shading, Shading::tag("PHONG"));
    assert_eq!(material.texture_maps[0], "crate.png");
    assert_eq!(material.texture_maps[1], "crate.png");
    assert_eq!(material.texture_maps[2], "");
}

/// A missing UV layer is rejected and the target file is left as it was
#[test]
fn test_missing_uv_leaves_target_untouched() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = dir.path().join("flat.json");
    let existing = dir.path().join("existing.sle");
    let fresh = dir.path().join("fresh.sle");
    generate_test_scenes::generate_untextured_scene(&scene_path)
        .expect("Failed to generate scene");
    std::fs::write(&existing, b"previous export").unwrap();

    let scene = load(&scene_path);
    let err = selene_export::export_sle(&scene, &existing).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Validation(ValidationError::NoTextureCoordinates)
    ));
    assert_eq!(err.to_string(), "no texture coordinates");
    assert_eq!(std::fs::read(&existing).unwrap(), b"previous export");

    assert!(selene_export::export_sdmf(&scene, &fresh).is_err());
    assert!(!fresh.exists());
}

/// Five influences on one vertex: warning, truncation, normalized weights
#[test]
fn test_skinned_sdmf() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = dir.path().join("strip.json");
    let sdmf_path = dir.path().join("strip.sdmf");
    generate_test_scenes::generate_skinned_scene(&scene_path).expect("Failed to generate scene");

    let report = selene_export::export_sdmf(&load(&scene_path), &sdmf_path).unwrap();
    assert_eq!(
        report.warnings,
        vec![ExportWarning::ExcessInfluences {
            vertex: 0,
            count: 5
        }]
    );

    let model = SdmfModel::parse(&std::fs::read(&sdmf_path).unwrap()).unwrap();
    assert_eq!(model.header.vertex_count, 6);
    assert_eq!(model.header.face_count, 4);
    assert_eq!(model.header.material_count, 2);
    assert_eq!(model.header.bone_count, 5);

    // Bones: armature "tail" has no vertex group and is left out
    let names: Vec<&str> = model.bones.iter().map(|b| b.pose.name.as_str()).collect();
    assert_eq!(names, generate_test_scenes::BONE_NAMES.to_vec());
    assert_eq!(model.bones[0].parent, NO_PARENT);
    for (index, bone) in model.bones.iter().enumerate().skip(1) {
        assert!(bone.parent >= 0 && (bone.parent as usize) < index);
    }

    // Skin
    assert_eq!(model.bone_indices[0], [0.0, 1.0, 2.0, 3.0]);
    for weights in &model.bone_weights {
        let sum: f32 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }
    assert_eq!(model.bone_indices[2], [1.0, 3.0, 0.0, 0.0]);
    assert_eq!(model.bone_weights[2], [0.25, 0.75, 0.0, 0.0]);

    // World space (translated along z), axes swapped
    assert_eq!(model.positions[1], [1.0, 2.0, 0.0]);
    assert!(model.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));

    // Flipped winding, grouped by material
    assert_eq!(model.position_faces[0], [0, 2, 1]);
    assert_eq!(model.position_faces[1], [2, 0, 3]);
    assert_eq!(model.position_faces[2], [1, 5, 4]);
    assert_eq!(model.materials[1].face_index, 2);
    assert_eq!(model.materials[0].shading, Shading::Type(0));

    // V flipped
    assert!(model.tex_coords.contains(&[0.5, 1.0]));
}

/// A vertex outside every exported bone aborts the export
#[test]
fn test_unskinned_vertex_aborts() {
    let dir = tempdir().expect("Failed to create temp dir");
    let sdmf_path = dir.path().join("broken.sdmf");

    let mut scene_json = generate_test_scenes::skinned_scene();
    scene_json["object"]["mesh"]["vertices"][4]["groups"] = serde_json::json!([]);
    let scene: SceneSnapshot = serde_json::from_value(scene_json).unwrap();

    let err = selene_export::export_sdmf(&scene, &sdmf_path).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Skin(SkinDataError::NoInfluences { vertex: 4 })
    ));
    assert!(!sdmf_path.exists());
}

/// Animation sampled over the timeline, bones in skeleton order
#[test]
fn test_sdaf_export() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = dir.path().join("strip.json");
    let sdaf_path = dir.path().join("strip.sdaf");
    generate_test_scenes::generate_skinned_scene(&scene_path).expect("Failed to generate scene");
    let scene = load(&scene_path);

    selene_export::export_sdaf(&scene, None, &sdaf_path).unwrap();
    let animation = SdafAnimation::parse(&std::fs::read(&sdaf_path).unwrap()).unwrap();

    assert_eq!(animation.header.frame_count, 3);
    for (i, frame) in animation.frames.iter().enumerate() {
        let names: Vec<&str> = frame.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, generate_test_scenes::BONE_NAMES.to_vec());

        // root in world space: armature at z=2, root pose at z=frame
        let expected_y = 2.0 + (i + 1) as f32;
        let [x, y, z] = frame[0].position;
        assert!(x.abs() < 1e-5 && (y - expected_y).abs() < 1e-5 && z.abs() < 1e-5);
    }

    let err = selene_export::export_sdaf(&scene, Some(5..=4), &sdaf_path).unwrap_err();
    assert!(matches!(
        err,
        ExportError::Validation(ValidationError::InvalidFrameRange { start: 5, end: 4 })
    ));
}

#[test]
fn test_sdaf_requires_armature() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = dir.path().join("quad.json");
    generate_test_scenes::generate_quad_scene(&scene_path).expect("Failed to generate scene");

    let err = selene_export::export_sdaf(&load(&scene_path), None, &dir.path().join("quad.sdaf"))
        .unwrap_err();
    assert!(matches!(
        err,
        ExportError::Validation(ValidationError::NoArmature)
    ));
}

/// OBJ -> .sle through the CLI
#[test]
fn test_cli_obj_to_sle() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("quad.obj");
    let sle_path = dir.path().join("quad.sle");
    generate_test_scenes::generate_quad_obj(&obj_path).expect("Failed to generate OBJ");

    let output = selene_export(&[
        "sle",
        obj_path.to_str().unwrap(),
        "-o",
        sle_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "selene-export sle command failed");

    let model = SleModel::parse(&std::fs::read(&sle_path).unwrap()).unwrap();
    assert_eq!(model.header.vertex_count, 4);
    assert_eq!(model.header.face_count, 2);
    assert_eq!(model.header.tex_coord_count, 4);
    assert_eq!(model.materials[0].colors[0], [0.3, 0.3, 0.3]);
}

#[test]
fn test_cli_failure_reports_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let scene_path = dir.path().join("flat.json");
    let sle_path = dir.path().join("flat.sle");
    generate_test_scenes::generate_untextured_scene(&scene_path)
        .expect("Failed to generate scene");

    let output = selene_export(&[
        "sle",
        scene_path.to_str().unwrap(),
        "-o",
        sle_path.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no texture coordinates"));
    assert!(!sle_path.exists());
}

/// Manifest build, then inspect the results
#[test]
fn test_cli_build_manifest() {
    let dir = tempdir().expect("Failed to create temp dir");
    generate_test_scenes::generate_quad_scene(&dir.path().join("quad.json"))
        .expect("Failed to generate scene");
    generate_test_scenes::generate_skinned_scene(&dir.path().join("strip.json"))
        .expect("Failed to generate scene");

    let manifest_path = dir.path().join("export.toml");
    std::fs::write(
        &manifest_path,
        r#"
[output]
dir = "out"

[[models]]
id = "quad"
scene = "quad.json"
format = "sle"

[[models]]
id = "strip"
scene = "strip.json"

[[animations]]
id = "strip_walk"
scene = "strip.json"
frame_start = 1
frame_end = 2
"#,
    )
    .unwrap();

    let manifest = manifest_path.to_str().unwrap();
    assert!(selene_export(&["check", manifest]).status.success());
    assert!(selene_export(&["build", manifest]).status.success());

    let out = dir.path().join("out");
    assert!(out.join("quad.sle").exists());
    assert!(out.join("strip.sdmf").exists());

    let animation =
        SdafAnimation::parse(&std::fs::read(out.join("strip_walk.sdaf")).unwrap()).unwrap();
    assert_eq!(animation.frames.len(), 2);

    let inspect = selene_export(&["inspect", out.join("strip.sdmf").to_str().unwrap()]);
    assert!(inspect.status.success());
    let stdout = String::from_utf8_lossy(&inspect.stdout);
    assert!(stdout.contains("bones:      5"));
}
