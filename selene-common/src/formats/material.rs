//! Material records shared by the `.sle` and `.sdmf` formats
//!
//! # Layout
//! ```text
//! u32      face_index      first triangle of this material's run
//! shading  [u8; 5] tag (.sle) or u8 shading type (.sdmf)
//! u8       flags           two-sided flag (.sle) / flags (.sdmf)
//! f32 × 9  ambient, diffuse, specular (RGB each)
//! f32      specular level
//! f32      glossiness
//! f32      opacity
//! string×4 ambient, diffuse, normal, specular texture names
//! ```

use std::io::Write;

use super::io::{write_f32s, write_string, ByteReader};
use crate::FormatError;

/// Length of the ASCII shading tag in `.sle` material records
pub const SHADING_TAG_LEN: usize = 5;

/// Number of texture map slots per material
pub const TEXTURE_MAP_COUNT: usize = 4;

/// Texture slot indices
pub const AMBIENT_MAP: usize = 0;
pub const DIFFUSE_MAP: usize = 1;
pub const NORMAL_MAP: usize = 2;
pub const SPECULAR_MAP: usize = 3;

/// Color slot indices
pub const AMBIENT_COLOR: usize = 0;
pub const DIFFUSE_COLOR: usize = 1;
pub const SPECULAR_COLOR: usize = 2;

/// Shading descriptor, whose encoding differs between the two model formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Five ASCII bytes naming the model (`.sle`), e.g. `PHONG`
    Tag([u8; SHADING_TAG_LEN]),
    /// Numeric shading type (`.sdmf`)
    Type(u8),
}

impl Shading {
    /// Build a tag from a model name, padding with zeros or truncating to five bytes
    pub fn tag(name: &str) -> Self {
        let mut tag = [0u8; SHADING_TAG_LEN];
        for (dst, src) in tag.iter_mut().zip(name.bytes().filter(u8::is_ascii)) {
            *dst = src;
        }
        Self::Tag(tag)
    }

    /// The tag text without trailing zero padding
    pub fn tag_str(&self) -> Option<String> {
        match self {
            Self::Tag(tag) => Some(
                tag.iter()
                    .take_while(|&&b| b != 0)
                    .map(|&b| b as char)
                    .collect(),
            ),
            Self::Type(_) => None,
        }
    }
}

/// One material and the offset of its contiguous triangle run
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    pub face_index: u32,
    pub shading: Shading,
    pub flags: u8,
    /// Ambient, diffuse and specular colors
    pub colors: [[f32; 3]; 3],
    pub specular_level: f32,
    pub glossiness: f32,
    pub opacity: f32,
    /// Texture file names by slot; empty means no texture
    pub texture_maps: [String; TEXTURE_MAP_COUNT],
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self {
            face_index: 0,
            shading: Shading::Type(0),
            flags: 0,
            colors: [[0.3, 0.3, 0.3], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
            specular_level: 0.0,
            glossiness: 0.0,
            opacity: 1.0,
            texture_maps: Default::default(),
        }
    }
}

impl MaterialRecord {
    /// Write the record using the encoding of its [`Shading`] variant
    pub fn write<W: Write>(&self, w: &mut W) -> Result<(), FormatError> {
        w.write_all(&self.face_index.to_le_bytes())?;
        match self.shading {
            Shading::Tag(tag) => w.write_all(&tag)?,
            Shading::Type(ty) => w.write_all(&[ty])?,
        }
        w.write_all(&[self.flags])?;

        for color in &self.colors {
            write_f32s(w, color)?;
        }
        write_f32s(w, &[self.specular_level, self.glossiness, self.opacity])?;

        for name in &self.texture_maps {
            write_string(w, name)?;
        }
        Ok(())
    }

    /// Read a record in `.sle` layout (5-byte shading tag)
    pub fn read_sle(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let face_index = r.read_u32()?;
        let mut tag = [0u8; SHADING_TAG_LEN];
        tag.copy_from_slice(r.take(SHADING_TAG_LEN)?);
        Self::read_body(r, face_index, Shading::Tag(tag))
    }

    /// Read a record in `.sdmf` layout (`u8` shading type)
    pub fn read_sdmf(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let face_index = r.read_u32()?;
        let shading = Shading::Type(r.read_u8()?);
        Self::read_body(r, face_index, shading)
    }

    fn read_body(
        r: &mut ByteReader<'_>,
        face_index: u32,
        shading: Shading,
    ) -> Result<Self, FormatError> {
        let flags = r.read_u8()?;
        let colors = [
            r.read_f32_array::<3>()?,
            r.read_f32_array::<3>()?,
            r.read_f32_array::<3>()?,
        ];
        let [specular_level, glossiness, opacity] = r.read_f32_array::<3>()?;
        let texture_maps = [
            r.read_string()?,
            r.read_string()?,
            r.read_string()?,
            r.read_string()?,
        ];

        Ok(Self {
            face_index,
            shading,
            flags,
            colors,
            specular_level,
            glossiness,
            opacity,
            texture_maps,
        })
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        let shading = match self.shading {
            Shading::Tag(_) => SHADING_TAG_LEN,
            Shading::Type(_) => 1,
        };
        let names: usize = self
            .texture_maps
            .iter()
            .map(|n| 2 + n.chars().filter(char::is_ascii).count())
            .sum();
        4 + shading + 1 + 12 * 4 + names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(shading: Shading) -> MaterialRecord {
        MaterialRecord {
            face_index: 12,
            shading,
            flags: 0,
            colors: [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6], [0.7, 0.8, 0.9]],
            specular_level: 0.5,
            glossiness: 50.0,
            opacity: 1.0,
            texture_maps: [
                "stone.png".into(),
                "stone.png".into(),
                String::new(),
                "stone_spec.png".into(),
            ],
        }
    }

    #[test]
    fn test_sle_layout() {
        let material = sample(Shading::tag("PHONG"));
        let mut out = Vec::new();
        material.write(&mut out).unwrap();

        assert_eq!(out.len(), material.encoded_len());
        assert_eq!(&out[0..4], &12u32.to_le_bytes());
        assert_eq!(&out[4..9], b"PHONG");
        assert_eq!(out[9], 0);
        assert_eq!(&out[10..14], &0.1f32.to_le_bytes());

        let mut reader = ByteReader::new(&out);
        let parsed = MaterialRecord::read_sle(&mut reader).unwrap();
        reader.finish("material").unwrap();
        assert_eq!(parsed, material);
        assert_eq!(parsed.shading.tag_str().as_deref(), Some("PHONG"));
    }

    #[test]
    fn test_sdmf_layout() {
        let material = sample(Shading::Type(0));
        let mut out = Vec::new();
        material.write(&mut out).unwrap();

        // 4 + 1 + 1 + 48 + (2 + 9) * 2 + 2 + (2 + 14)
        assert_eq!(out.len(), 94);
        assert_eq!(out.len(), material.encoded_len());

        let mut reader = ByteReader::new(&out);
        assert_eq!(MaterialRecord::read_sdmf(&mut reader).unwrap(), material);
    }

    #[test]
    fn test_short_tag_is_zero_padded() {
        assert_eq!(Shading::tag("AB"), Shading::Tag(*b"AB\0\0\0"));
        assert_eq!(Shading::tag("AB").tag_str().as_deref(), Some("AB"));
        assert_eq!(Shading::tag("COOKTORR"), Shading::Tag(*b"COOKT"));
    }

    #[test]
    fn test_default_colors() {
        let material = MaterialRecord::default();
        assert_eq!(material.colors[AMBIENT_COLOR], [0.3, 0.3, 0.3]);
        assert_eq!(material.colors[DIFFUSE_COLOR], [1.0, 1.0, 1.0]);
        assert_eq!(material.opacity, 1.0);
        assert!(material.texture_maps.iter().all(String::is_empty));
    }
}
