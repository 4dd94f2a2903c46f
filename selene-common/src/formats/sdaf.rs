//! Animation format (.sdaf)
//!
//! # Layout
//! ```text
//! 0x00: magic "SDAF" (4 bytes)
//! 0x04: frame_count u32
//! per frame:
//!   bone_count u16
//!   poses (bone_count × pose record, see `bone`)
//! ```
//!
//! Bone hierarchy is not stored; poses are relative to the parent bone of
//! the matching skeleton in the `.sdmf` file.

use super::bone::PoseRecord;
use super::io::ByteReader;
use crate::FormatError;

pub const SDAF_MAGIC: [u8; 4] = *b"SDAF";

/// .sdaf header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdafHeader {
    pub frame_count: u32,
}

impl SdafHeader {
    pub const SIZE: usize = 8;

    pub fn new(frame_count: u32) -> Self {
        Self { frame_count }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&SDAF_MAGIC);
        bytes[4..8].copy_from_slice(&self.frame_count.to_le_bytes());
        bytes
    }

    /// Read header from bytes, `None` if too short or the magic does not match
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || bytes[0..4] != SDAF_MAGIC {
            return None;
        }
        Some(Self {
            frame_count: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

/// Fully decoded .sdaf file
#[derive(Debug, Clone, PartialEq)]
pub struct SdafAnimation {
    pub header: SdafHeader,
    /// Poses per frame
    pub frames: Vec<Vec<PoseRecord>>,
}

impl SdafAnimation {
    /// Decode a complete .sdaf file
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let header =
            SdafHeader::from_bytes(data).ok_or(FormatError::InvalidHeader { format: "sdaf" })?;
        let mut r = ByteReader::new(data);
        r.take(SdafHeader::SIZE)?;

        let mut frames = Vec::new();
        for _ in 0..header.frame_count {
            let bone_count = r.read_u16()?;
            let poses = (0..bone_count)
                .map(|_| PoseRecord::read(&mut r))
                .collect::<Result<Vec<_>, _>>()?;
            frames.push(poses);
        }
        r.finish("sdaf")?;

        Ok(Self { header, frames })
    }
}
