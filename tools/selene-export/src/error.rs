//! Export error taxonomy
//!
//! Validation and skin errors abort an export before any byte reaches the
//! filesystem. Structural warnings are logged and returned alongside the
//! successful result.

use std::path::PathBuf;

use selene_common::FormatError;

use crate::scene::SceneError;

/// Input rejected before encoding
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("no texture coordinates")]
    NoTextureCoordinates,

    #[error("wrong number of texture faces: {texture_faces} texture faces for {faces} faces")]
    TextureFaceMismatch { faces: usize, texture_faces: usize },

    #[error("polygon {polygon} has {vertices} vertices but {loops} texture coordinates")]
    UvLoopMismatch {
        polygon: usize,
        vertices: usize,
        loops: usize,
    },

    #[error("polygon {polygon} has {vertices} vertices, only triangles and quads are supported")]
    UnsupportedPolygon { polygon: usize, vertices: usize },

    #[error("polygon {polygon} references vertex {vertex}, mesh has {vertex_count} vertices")]
    VertexIndexOutOfRange {
        polygon: usize,
        vertex: u32,
        vertex_count: usize,
    },

    #[error("material \"{material}\" has incompatible shading type ({shading})")]
    UnsupportedShading { material: String, shading: String },

    #[error("material \"{material}\" has wrong texture type ({texture_type}), only images are allowed")]
    UnsupportedTexture {
        material: String,
        texture_type: String,
    },

    #[error("faces reference material slot {index}, mesh has {available} materials")]
    MissingMaterial { index: u32, available: usize },

    #[error("too many {what}: {count} (maximum {max})")]
    TooMany {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("invalid frame range {start}..={end}")]
    InvalidFrameRange { start: i32, end: i32 },

    #[error("mesh has no armature")]
    NoArmature,
}

/// Fatal skinning problem on a single vertex
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkinDataError {
    #[error("vertex {vertex} is not influenced by any bones")]
    NoInfluences { vertex: usize },

    #[error("vertex {vertex} has bone influences whose weights sum to zero")]
    ZeroWeight { vertex: usize },
}

/// Non-fatal problem that was clamped or defaulted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportWarning {
    #[error("vertex {vertex} is influenced by more than 4 bones ({count})")]
    ExcessInfluences { vertex: usize, count: usize },

    #[error("material {material} has incompatible texture type ({texture_type}), empty texture shall be used")]
    NonImageTexture {
        material: String,
        texture_type: String,
    },
}

/// Warnings collected during one export call
///
/// Every pushed warning is also logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Warnings(Vec<ExportWarning>);

impl Warnings {
    pub fn push(&mut self, warning: ExportWarning) {
        tracing::warn!("{}", warning);
        self.0.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[ExportWarning] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ExportWarning> {
        self.0
    }
}

/// Any failure of an export call
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Skin(#[from] SkinDataError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] FormatError),

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
