//! Static model format (.sle)
//!
//! # Layout
//! ```text
//! 0x00: magic "TEMPSLE" (7 bytes)
//! 0x07: vertex_count u32
//! 0x0B: face_count u32 (triangles)
//! 0x0F: tex_coord_count u32
//! 0x13: positions (vertex_count × f32×3, local space)
//! var:  tex_coords (tex_coord_count × f32×2)
//! var:  triangles (face_count × u32×6: position indices then UV indices),
//!       grouped by material
//! var:  material_count u32
//! var:  materials (see `material`, 5-byte shading tag layout)
//! var:  skin_vertex_count u32 (always 0)
//! ```

use super::io::ByteReader;
use super::material::MaterialRecord;
use crate::FormatError;

pub const SLE_MAGIC: [u8; 7] = *b"TEMPSLE";

/// .sle header (19 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleHeader {
    pub vertex_count: u32,
    pub face_count: u32,
    pub tex_coord_count: u32,
}

impl SleHeader {
    pub const SIZE: usize = 19;

    pub fn new(vertex_count: u32, face_count: u32, tex_coord_count: u32) -> Self {
        Self {
            vertex_count,
            face_count,
            tex_coord_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..7].copy_from_slice(&SLE_MAGIC);
        bytes[7..11].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[11..15].copy_from_slice(&self.face_count.to_le_bytes());
        bytes[15..19].copy_from_slice(&self.tex_coord_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes, `None` if too short or the magic does not match
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..7] != SLE_MAGIC {
            return None;
        }
        let u32_at =
            |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        Some(Self {
            vertex_count: u32_at(7),
            face_count: u32_at(11),
            tex_coord_count: u32_at(15),
        })
    }
}

/// One triangle with its position and texture coordinate indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleTriangle {
    pub positions: [u32; 3],
    pub tex_coords: [u32; 3],
}

/// Fully decoded .sle file
#[derive(Debug, Clone, PartialEq)]
pub struct SleModel {
    pub header: SleHeader,
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub triangles: Vec<SleTriangle>,
    pub materials: Vec<MaterialRecord>,
    pub skin_vertex_count: u32,
}

impl SleModel {
    /// Decode a complete .sle file
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let header =
            SleHeader::from_bytes(data).ok_or(FormatError::InvalidHeader { format: "sle" })?;
        let mut r = ByteReader::new(data);
        r.take(SleHeader::SIZE)?;

        let positions = (0..header.vertex_count)
            .map(|_| r.read_f32_array::<3>())
            .collect::<Result<Vec<_>, _>>()?;
        let tex_coords = (0..header.tex_coord_count)
            .map(|_| r.read_f32_array::<2>())
            .collect::<Result<Vec<_>, _>>()?;
        let triangles = (0..header.face_count)
            .map(|_| -> Result<SleTriangle, FormatError> {
                Ok(SleTriangle {
                    positions: r.read_u32_array()?,
                    tex_coords: r.read_u32_array()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let material_count = r.read_u32()?;
        let materials = (0..material_count)
            .map(|_| MaterialRecord::read_sle(&mut r))
            .collect::<Result<Vec<_>, _>>()?;

        let skin_vertex_count = r.read_u32()?;
        r.finish("sle")?;

        Ok(Self {
            header,
            positions,
            tex_coords,
            triangles,
            materials,
            skin_vertex_count,
        })
    }
}
