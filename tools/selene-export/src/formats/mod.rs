//! Payload assembly for SELENE Device files
//!
//! Re-exports the record and header types from selene-common and writes
//! complete files from consolidated models. Writers only see data that has
//! already passed validation.

pub use selene_common::formats::*;

use std::io::Write;

use selene_common::FormatError;

use crate::material::ShadingModel;
use crate::mesh::{SkinnedModel, StaticModel};
use crate::triangulate::Winding;

/// Target model format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// `.sle` static model
    Sle,
    /// `.sdmf` skinned model
    Sdmf,
}

impl ModelFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Sle => "sle",
            Self::Sdmf => "sdmf",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "sle" => Some(Self::Sle),
            "sdmf" => Some(Self::Sdmf),
            _ => None,
        }
    }

    pub fn winding(self) -> Winding {
        match self {
            Self::Sle => Winding::Preserve,
            Self::Sdmf => Winding::Flip,
        }
    }

    pub fn accepts_shading(self, model: ShadingModel) -> bool {
        match self {
            Self::Sle => matches!(model, ShadingModel::Phong | ShadingModel::Blinn),
            Self::Sdmf => true,
        }
    }

    /// Shading field stored in the material record
    pub fn shading_field(self, model: ShadingModel) -> Shading {
        match self {
            Self::Sle => Shading::tag(model.name()),
            Self::Sdmf => Shading::Type(0),
        }
    }

    /// `.sle` fails on procedural textures, `.sdmf` writes an empty name
    pub fn rejects_non_image_textures(self) -> bool {
        self == Self::Sle
    }
}

fn write_u32s<W: Write>(w: &mut W, values: &[u32]) -> Result<(), FormatError> {
    for v in values {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Write a complete .sle file
pub fn write_sle_model<W: Write>(w: &mut W, model: &StaticModel) -> Result<(), FormatError> {
    let header = SleHeader::new(
        model.positions.len() as u32,
        model.triangles.len() as u32,
        model.tex_coords.len() as u32,
    );
    w.write_all(&header.to_bytes())?;

    for position in &model.positions {
        write_f32s(w, position)?;
    }
    for uv in &model.tex_coords {
        write_f32s(w, uv)?;
    }
    for triangle in &model.triangles {
        write_u32s(w, &triangle.positions)?;
        write_u32s(w, &triangle.tex_coords)?;
    }

    w.write_all(&(model.materials.len() as u32).to_le_bytes())?;
    for material in &model.materials {
        material.write(w)?;
    }

    // Skin vertex count, always empty in this format
    w.write_all(&0u32.to_le_bytes())?;
    Ok(())
}

/// Write a complete .sdmf file
///
/// The weight and index blocks are only written for a model with bones.
pub fn write_sdmf_model<W: Write>(w: &mut W, model: &SkinnedModel) -> Result<(), FormatError> {
    let header = SdmfHeader {
        vertex_count: model.positions.len() as u32,
        normal_count: model.normals.len() as u32,
        tex_coord_count: model.tex_coords.len() as u32,
        face_count: model.position_faces.len() as u32,
        material_count: model.materials.len() as u16,
        bone_count: model.bones.len() as u16,
    };
    w.write_all(&header.to_bytes())?;

    for position in &model.positions {
        write_f32s(w, position)?;
    }
    for normal in &model.normals {
        write_f32s(w, normal)?;
    }

    if header.has_skin() {
        for skin in &model.skin {
            write_f32s(w, &skin.weights)?;
        }
        for skin in &model.skin {
            write_f32s(w, &skin.indices)?;
        }
    }

    for uv in &model.tex_coords {
        write_f32s(w, uv)?;
    }

    for faces in [
        &model.position_faces,
        &model.normal_faces,
        &model.tex_coord_faces,
    ] {
        for face in faces {
            write_u32s(w, face)?;
        }
    }

    for material in &model.materials {
        material.write(w)?;
    }
    for bone in &model.bones {
        bone.write(w)?;
    }
    Ok(())
}

/// Write a complete .sdaf file
pub fn write_sdaf_animation<W: Write>(
    w: &mut W,
    frames: &[Vec<PoseRecord>],
) -> Result<(), FormatError> {
    let header = SdafHeader::new(frames.len() as u32);
    w.write_all(&header.to_bytes())?;

    for poses in frames {
        w.write_all(&(poses.len() as u16).to_le_bytes())?;
        for pose in poses {
            pose.write(w)?;
        }
    }
    Ok(())
}
