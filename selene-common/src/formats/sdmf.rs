//! Skinned model format (.sdmf)
//!
//! # Layout
//! ```text
//! 0x00: magic "SDIF" (4 bytes)
//! 0x04: vertex_count u32
//! 0x08: normal_count u32
//! 0x0C: tex_coord_count u32
//! 0x10: face_count u32 (triangles)
//! 0x14: material_count u16
//! 0x16: bone_count u16
//! 0x18: positions (vertex_count × f32×3, world space, Y/Z swapped)
//! var:  normals (normal_count × f32×3, world space, Y/Z swapped)
//! var:  bone weights (vertex_count × f32×4), only when bone_count > 0
//! var:  bone indices (vertex_count × f32×4), only when bone_count > 0
//! var:  tex_coords (tex_coord_count × f32×2, V flipped)
//! var:  position faces (face_count × u32×3), grouped by material
//! var:  normal faces (face_count × u32×3), grouped by material
//! var:  tex_coord faces (face_count × u32×3), grouped by material
//! var:  materials (see `material`, u8 shading type layout)
//! var:  bones (see `bone`)
//! ```

use super::bone::BoneRecord;
use super::io::ByteReader;
use super::material::MaterialRecord;
use crate::FormatError;

pub const SDMF_MAGIC: [u8; 4] = *b"SDIF";

/// Number of bone influences stored per vertex
pub const INFLUENCES_PER_VERTEX: usize = 4;

/// .sdmf header (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdmfHeader {
    pub vertex_count: u32,
    pub normal_count: u32,
    pub tex_coord_count: u32,
    pub face_count: u32,
    pub material_count: u16,
    pub bone_count: u16,
}

impl SdmfHeader {
    pub const SIZE: usize = 24;

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&SDMF_MAGIC);
        bytes[4..8].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.normal_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.tex_coord_count.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.face_count.to_le_bytes());
        bytes[20..22].copy_from_slice(&self.material_count.to_le_bytes());
        bytes[22..24].copy_from_slice(&self.bone_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes, `None` if too short or the magic does not match
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != SDMF_MAGIC {
            return None;
        }
        let u32_at =
            |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        Some(Self {
            vertex_count: u32_at(4),
            normal_count: u32_at(8),
            tex_coord_count: u32_at(12),
            face_count: u32_at(16),
            material_count: u16::from_le_bytes([bytes[20], bytes[21]]),
            bone_count: u16::from_le_bytes([bytes[22], bytes[23]]),
        })
    }

    /// Whether the per-vertex weight and index blocks are present
    pub fn has_skin(&self) -> bool {
        self.bone_count > 0
    }
}

/// Fully decoded .sdmf file
#[derive(Debug, Clone, PartialEq)]
pub struct SdmfModel {
    pub header: SdmfHeader,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub bone_weights: Vec<[f32; 4]>,
    pub bone_indices: Vec<[f32; 4]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub position_faces: Vec<[u32; 3]>,
    pub normal_faces: Vec<[u32; 3]>,
    pub tex_coord_faces: Vec<[u32; 3]>,
    pub materials: Vec<MaterialRecord>,
    pub bones: Vec<BoneRecord>,
}

impl SdmfModel {
    /// Decode a complete .sdmf file
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let header =
            SdmfHeader::from_bytes(data).ok_or(FormatError::InvalidHeader { format: "sdmf" })?;
        let mut r = ByteReader::new(data);
        r.take(SdmfHeader::SIZE)?;

        let positions = read_n(&mut r, header.vertex_count, |r| r.read_f32_array::<3>())?;
        let normals = read_n(&mut r, header.normal_count, |r| r.read_f32_array::<3>())?;

        let skin_count = if header.has_skin() {
            header.vertex_count
        } else {
            0
        };
        let bone_weights = read_n(&mut r, skin_count, |r| r.read_f32_array::<4>())?;
        let bone_indices = read_n(&mut r, skin_count, |r| r.read_f32_array::<4>())?;

        let tex_coords = read_n(&mut r, header.tex_coord_count, |r| r.read_f32_array::<2>())?;

        let position_faces = read_n(&mut r, header.face_count, |r| r.read_u32_array::<3>())?;
        let normal_faces = read_n(&mut r, header.face_count, |r| r.read_u32_array::<3>())?;
        let tex_coord_faces = read_n(&mut r, header.face_count, |r| r.read_u32_array::<3>())?;

        let materials = read_n(&mut r, header.material_count as u32, MaterialRecord::read_sdmf)?;
        let bones = read_n(&mut r, header.bone_count as u32, BoneRecord::read)?;
        r.finish("sdmf")?;

        Ok(Self {
            header,
            positions,
            normals,
            bone_weights,
            bone_indices,
            tex_coords,
            position_faces,
            normal_faces,
            tex_coord_faces,
            materials,
            bones,
        })
    }
}

fn read_n<'a, T>(
    r: &mut ByteReader<'a>,
    count: u32,
    mut read: impl FnMut(&mut ByteReader<'a>) -> Result<T, FormatError>,
) -> Result<Vec<T>, FormatError> {
    (0..count).map(|_| read(r)).collect()
}
