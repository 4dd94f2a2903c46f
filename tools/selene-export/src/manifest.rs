//! Manifest parsing and batch export
//!
//! Parses export.toml and runs every listed model and animation export.
//! Scene paths are relative to the manifest's directory.

use anyhow::{Context, Result};
use hashbrown::HashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::formats::ModelFormat;
use crate::scene::SceneSnapshot;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    #[serde(default)]
    pub animations: Vec<AnimationEntry>,
    /// Directory the manifest was loaded from
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/")
}

fn default_model_format() -> String {
    "sdmf".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub scene: PathBuf,
    /// `sle` or `sdmf`
    #[serde(default = "default_model_format")]
    pub format: String,
    /// File name inside the output directory, `<id>.<format>` by default
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl ModelEntry {
    pub fn model_format(&self) -> Option<ModelFormat> {
        ModelFormat::from_extension(&self.format)
    }
}

#[derive(Debug, Deserialize)]
pub struct AnimationEntry {
    pub id: String,
    pub scene: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub frame_start: Option<i32>,
    #[serde(default)]
    pub frame_end: Option<i32>,
}

impl AnimationEntry {
    /// Explicit frame range, `None` to use the scene timeline
    pub fn frames(&self) -> Option<std::ops::RangeInclusive<i32>> {
        Some(self.frame_start?..=self.frame_end?)
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(manifest)
}

impl Manifest {
    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    let mut ids = HashSet::new();

    for entry in &manifest.models {
        if !ids.insert(entry.id.as_str()) {
            anyhow::bail!("Duplicate export id '{}'", entry.id);
        }
        if entry.model_format().is_none() {
            anyhow::bail!(
                "Model '{}' has unknown format '{}' (use sle or sdmf)",
                entry.id,
                entry.format
            );
        }
        let scene = manifest.resolve(&entry.scene);
        if !scene.exists() {
            anyhow::bail!("Model '{}' scene not found: {:?}", entry.id, scene);
        }
    }

    for entry in &manifest.animations {
        if !ids.insert(entry.id.as_str()) {
            anyhow::bail!("Duplicate export id '{}'", entry.id);
        }
        if entry.frame_start.is_some() != entry.frame_end.is_some() {
            anyhow::bail!(
                "Animation '{}' must set both frame_start and frame_end",
                entry.id
            );
        }
        let scene = manifest.resolve(&entry.scene);
        if !scene.exists() {
            anyhow::bail!("Animation '{}' scene not found: {:?}", entry.id, scene);
        }
    }
    Ok(())
}

/// Export everything listed in a manifest
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<()> {
    validate(manifest)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.resolve(&manifest.output.dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    for entry in &manifest.models {
        let Some(format) = entry.model_format() else {
            anyhow::bail!("Model '{}' has unknown format '{}'", entry.id, entry.format);
        };
        let output = output_dir.join(
            entry
                .output
                .clone()
                .unwrap_or_else(|| format!("{}.{}", entry.id, format.extension()).into()),
        );
        tracing::info!("Exporting model: {} -> {:?}", entry.id, output);

        let scene = SceneSnapshot::load(&manifest.resolve(&entry.scene))?;
        crate::export_model(&scene, format, &output)
            .with_context(|| format!("Failed to export model '{}'", entry.id))?;
    }

    for entry in &manifest.animations {
        let output = output_dir.join(
            entry
                .output
                .clone()
                .unwrap_or_else(|| format!("{}.sdaf", entry.id).into()),
        );
        tracing::info!("Exporting animation: {} -> {:?}", entry.id, output);

        let scene = SceneSnapshot::load(&manifest.resolve(&entry.scene))?;
        crate::export_sdaf(&scene, entry.frames(), &output)
            .with_context(|| format!("Failed to export animation '{}'", entry.id))?;
    }

    Ok(())
}
