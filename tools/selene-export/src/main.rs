//! selene-export - SELENE Device asset export tool
//!
//! Converts scene snapshots (JSON, or OBJ for static meshes) to engine
//! model and animation files (.sle, .sdmf, .sdaf)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use selene_export::formats::{SdafAnimation, SdmfModel, SleModel};
use selene_export::{manifest, ExportReport, ModelFormat, SceneSnapshot};

#[derive(Parser)]
#[command(name = "selene-export")]
#[command(about = "SELENE Device asset export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a static model (.sle)
    Sle {
        /// Input scene snapshot (.json or .obj)
        input: PathBuf,

        /// Output .sle file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a skinned model (.sdmf)
    Sdmf {
        /// Input scene snapshot (.json or .obj)
        input: PathBuf,

        /// Output .sdmf file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export an animation (.sdaf)
    Sdaf {
        /// Input scene snapshot (.json)
        input: PathBuf,

        /// Output .sdaf file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// First frame (default: timeline start)
        #[arg(long, requires = "end")]
        start: Option<i32>,

        /// Last frame, inclusive (default: timeline end)
        #[arg(long, requires = "start")]
        end: Option<i32>,
    },

    /// Export everything listed in a manifest file
    Build {
        /// Path to export.toml manifest
        #[arg(default_value = "export.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without exporting
    Check {
        /// Path to export.toml manifest
        #[arg(default_value = "export.toml")]
        manifest: PathBuf,
    },

    /// Print a summary of an exported file
    Inspect {
        /// .sle, .sdmf or .sdaf file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sle { input, output } => export_model(&input, output, ModelFormat::Sle)?,

        Commands::Sdmf { input, output } => export_model(&input, output, ModelFormat::Sdmf)?,

        Commands::Sdaf {
            input,
            output,
            start,
            end,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("sdaf"));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            let scene = SceneSnapshot::load(&input)?;
            let frames = start.zip(end).map(|(start, end)| start..=end);
            let report = selene_export::export_sdaf(&scene, frames, &output)
                .with_context(|| format!("Failed to export animation from {:?}", input))?;
            report_done(&report);
        }

        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building exports from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Inspect { input } => inspect(&input)?,
    }

    Ok(())
}

fn export_model(input: &Path, output: Option<PathBuf>, format: ModelFormat) -> Result<()> {
    let output = output.unwrap_or_else(|| input.with_extension(format.extension()));
    tracing::info!("Converting {:?} -> {:?}", input, output);

    let scene = SceneSnapshot::load(input)?;
    let report = selene_export::export_model(&scene, format, &output)
        .with_context(|| format!("Failed to export {:?}", input))?;
    report_done(&report);
    Ok(())
}

fn report_done(report: &ExportReport) {
    if report.warnings.is_empty() {
        tracing::info!("Done!");
    } else {
        tracing::info!("Done with {} warnings", report.warnings.len());
    }
}

fn inspect(input: &Path) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "sle" => {
            let model = SleModel::parse(&data)?;
            println!("format:     sle");
            println!("vertices:   {}", model.header.vertex_count);
            println!("faces:      {}", model.header.face_count);
            println!("tex coords: {}", model.header.tex_coord_count);
            println!("materials:  {}", model.materials.len());
            for material in &model.materials {
                println!(
                    "  face {:>6}  {}  {:?}",
                    material.face_index,
                    material.shading.tag_str().unwrap_or_default(),
                    material.texture_maps
                );
            }
        }
        "sdmf" => {
            let model = SdmfModel::parse(&data)?;
            println!("format:     sdmf");
            println!("vertices:   {}", model.header.vertex_count);
            println!("normals:    {}", model.header.normal_count);
            println!("tex coords: {}", model.header.tex_coord_count);
            println!("faces:      {}", model.header.face_count);
            println!("materials:  {}", model.header.material_count);
            println!("bones:      {}", model.header.bone_count);
            for (index, bone) in model.bones.iter().enumerate() {
                println!("  [{:>3}] {} (parent {})", index, bone.pose.name, bone.parent);
            }
        }
        "sdaf" => {
            let animation = SdafAnimation::parse(&data)?;
            println!("format:     sdaf");
            println!("frames:     {}", animation.header.frame_count);
            if let Some(first) = animation.frames.first() {
                let names: Vec<&str> = first.iter().map(|p| p.name.as_str()).collect();
                println!("bones:      {}", names.join(", "));
            }
        }
        _ => anyhow::bail!(
            "Unsupported file: {:?} (use .sle, .sdmf, or .sdaf)",
            input
        ),
    }

    Ok(())
}
