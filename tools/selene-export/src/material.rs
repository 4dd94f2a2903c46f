//! Material grouping and extraction
//!
//! Faces are grouped by material in order of first appearance. Each group
//! becomes one contiguous run in the output triangle arrays and one
//! [`MaterialRecord`] whose `face_index` is the start of that run.

use hashbrown::HashMap;
use selene_common::{
    MaterialRecord, AMBIENT_COLOR, AMBIENT_MAP, DIFFUSE_COLOR, DIFFUSE_MAP, NORMAL_MAP,
    SPECULAR_COLOR, SPECULAR_MAP,
};

use crate::error::{ExportWarning, ValidationError, Warnings};
use crate::formats::ModelFormat;
use crate::scene::{SourceMaterial, TextureSlot};
use crate::triangulate::TriangleFace;

/// Specular shading models known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    Phong,
    Blinn,
    CookTorrance,
}

impl ShadingModel {
    /// Names are matched exactly as the source application spells them
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "PHONG" => Some(Self::Phong),
            "BLINN" => Some(Self::Blinn),
            "COOKTORR" => Some(Self::CookTorrance),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Phong => "PHONG",
            Self::Blinn => "BLINN",
            Self::CookTorrance => "COOKTORR",
        }
    }
}

/// Faces partitioned by material, in first-appearance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialGroups {
    groups: Vec<(u32, Vec<usize>)>,
}

impl MaterialGroups {
    /// Group face indices by material id
    pub fn new(faces: &[TriangleFace]) -> Self {
        let mut slots: HashMap<u32, usize> = HashMap::new();
        let mut groups: Vec<(u32, Vec<usize>)> = Vec::new();

        for (index, face) in faces.iter().enumerate() {
            let slot = *slots.entry(face.material).or_insert_with(|| {
                groups.push((face.material, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(index);
        }

        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Material ids in output order
    pub fn materials(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.iter().map(|(material, _)| *material)
    }

    /// Face indices of the `group`-th material
    pub fn run(&self, group: usize) -> &[usize] {
        &self.groups[group].1
    }

    /// Source face indices in output order (all runs concatenated)
    pub fn face_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().flat_map(|(_, faces)| faces.iter().copied())
    }

    /// Offset of each run in the output triangle array
    pub fn run_offsets(&self) -> Vec<u32> {
        let mut offset = 0u32;
        self.groups
            .iter()
            .map(|(_, faces)| {
                let start = offset;
                offset += faces.len() as u32;
                start
            })
            .collect()
    }
}

/// Base file name of a texture path, accepting `\` and `/` separators
pub fn texture_file_name(path: &str) -> &str {
    path.rsplit(|c| c == '\\' || c == '/')
        .next()
        .unwrap_or(path)
}

/// Build material records for every group
pub fn extract_materials(
    materials: &[SourceMaterial],
    groups: &MaterialGroups,
    format: ModelFormat,
    warnings: &mut Warnings,
) -> Result<Vec<MaterialRecord>, ValidationError> {
    groups
        .materials()
        .zip(groups.run_offsets())
        .map(|(id, face_index)| {
            let source = materials
                .get(id as usize)
                .ok_or(ValidationError::MissingMaterial {
                    index: id,
                    available: materials.len(),
                })?;
            extract_material(source, face_index, format, warnings)
        })
        .collect()
}

/// Convert one source material into a record starting at `face_index`
pub fn extract_material(
    source: &SourceMaterial,
    face_index: u32,
    format: ModelFormat,
    warnings: &mut Warnings,
) -> Result<MaterialRecord, ValidationError> {
    let shading = ShadingModel::parse(&source.shading)
        .filter(|&model| format.accepts_shading(model))
        .ok_or_else(|| ValidationError::UnsupportedShading {
            material: source.name.clone(),
            shading: source.shading.clone(),
        })?;

    let scale = |s: f32| source.diffuse_color.map(|c| c * s);

    let mut record = MaterialRecord {
        face_index,
        shading: format.shading_field(shading),
        flags: 0,
        ..Default::default()
    };
    record.colors[AMBIENT_COLOR] = scale(source.emission);
    record.colors[DIFFUSE_COLOR] = scale(source.diffuse_intensity);
    record.colors[SPECULAR_COLOR] = source.specular_color;
    record.specular_level = source.specular_intensity;
    record.glossiness = source.hardness;
    record.opacity = source.alpha;

    for slot in source.textures.iter().flatten() {
        let name = texture_name(source, slot, format, warnings)?;

        if slot.use_diffuse {
            record.texture_maps[AMBIENT_MAP] = name.clone();
            record.texture_maps[DIFFUSE_MAP] = name;
        } else if slot.use_normal {
            record.texture_maps[NORMAL_MAP] = name;
        } else if slot.use_specular {
            record.texture_maps[SPECULAR_MAP] = name;
        }
    }

    Ok(record)
}

fn texture_name(
    material: &SourceMaterial,
    slot: &TextureSlot,
    format: ModelFormat,
    warnings: &mut Warnings,
) -> Result<String, ValidationError> {
    if !slot.is_image() {
        if format.rejects_non_image_textures() {
            return Err(ValidationError::UnsupportedTexture {
                material: material.name.clone(),
                texture_type: slot.kind.clone(),
            });
        }
        warnings.push(ExportWarning::NonImageTexture {
            material: material.name.clone(),
            texture_type: slot.kind.clone(),
        });
        return Ok(String::new());
    }

    Ok(slot
        .image
        .as_deref()
        .map(texture_file_name)
        .unwrap_or_default()
        .to_string())
}
