//! selene-export library
//!
//! Converts scene snapshots into SELENE Device model (`.sle`, `.sdmf`) and
//! animation (`.sdaf`) files. Every export builds the complete payload in
//! memory first; nothing is written unless all validation passed.

pub mod animation;
pub mod dedup;
pub mod error;
pub mod formats;
pub mod manifest;
pub mod material;
pub mod mesh;
pub mod normals;
pub mod output;
pub mod scene;
pub mod skeleton;
pub mod skin;
pub mod texcoords;
pub mod triangulate;

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub use error::{ExportError, ExportWarning, Result, SkinDataError, ValidationError, Warnings};
pub use formats::ModelFormat;
pub use mesh::{SkinnedModel, StaticModel};
pub use scene::{SceneError, SceneSnapshot};

use animation::TimelinePlayer;
use skeleton::Skeleton;

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub path: PathBuf,
    /// Size of the written file
    pub bytes: usize,
    pub warnings: Vec<ExportWarning>,
}

/// Encode a model without touching the filesystem
pub fn encode_model(
    scene: &SceneSnapshot,
    format: ModelFormat,
    warnings: &mut Warnings,
) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ModelFormat::Sle => {
            let model = mesh::build_static_model(scene, warnings)?;
            formats::write_sle_model(&mut bytes, &model)?;
        }
        ModelFormat::Sdmf => {
            let model = mesh::build_skinned_model(scene, warnings)?;
            formats::write_sdmf_model(&mut bytes, &model)?;
        }
    }
    Ok(bytes)
}

/// Encode an animation without touching the filesystem
///
/// `frames` defaults to the timeline's range; a snapshot without a
/// timeline samples the rest pose at frame 0.
pub fn encode_animation(
    scene: &SceneSnapshot,
    frames: Option<RangeInclusive<i32>>,
) -> Result<Vec<u8>> {
    let armature = scene.armature()?.ok_or(ValidationError::NoArmature)?;
    let skeleton = Skeleton::build(armature, &scene.object.vertex_groups);

    let (mut player, default_range) = match &scene.timeline {
        Some(timeline) => (
            TimelinePlayer::new(timeline),
            timeline.frame_start..=timeline.frame_end,
        ),
        None => (TimelinePlayer::empty(), 0..=0),
    };
    let frames = frames.unwrap_or(default_range);

    let sampled = animation::sample_animation(&mut player, armature, &skeleton, frames)?;
    let mut bytes = Vec::new();
    formats::write_sdaf_animation(&mut bytes, &sampled)?;
    Ok(bytes)
}

/// Export a model to `output`
pub fn export_model(
    scene: &SceneSnapshot,
    format: ModelFormat,
    output: &Path,
) -> Result<ExportReport> {
    let mut warnings = Warnings::default();
    let bytes = encode_model(scene, format, &mut warnings)?;
    finish(output, &bytes, warnings)
}

pub fn export_sle(scene: &SceneSnapshot, output: &Path) -> Result<ExportReport> {
    export_model(scene, ModelFormat::Sle, output)
}

pub fn export_sdmf(scene: &SceneSnapshot, output: &Path) -> Result<ExportReport> {
    export_model(scene, ModelFormat::Sdmf, output)
}

/// Export an animation over `frames` (inclusive) to `output`
pub fn export_sdaf(
    scene: &SceneSnapshot,
    frames: Option<RangeInclusive<i32>>,
    output: &Path,
) -> Result<ExportReport> {
    let bytes = encode_animation(scene, frames)?;
    finish(output, &bytes, Warnings::default())
}

fn finish(output: &Path, bytes: &[u8], warnings: Warnings) -> Result<ExportReport> {
    output::commit(output, bytes)?;
    tracing::info!(
        "Exported {:?} ({} bytes, {} warnings)",
        output,
        bytes.len(),
        warnings.len()
    );
    Ok(ExportReport {
        path: output.to_path_buf(),
        bytes: bytes.len(),
        warnings: warnings.into_vec(),
    })
}
