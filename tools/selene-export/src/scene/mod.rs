//! Scene snapshot: the plain records the exporter consumes
//!
//! An authoring tool plugin (out of scope here) dumps the active mesh object,
//! its armature and optionally its animation timeline into a JSON document
//! with this shape. Static meshes can also be read from Wavefront OBJ files
//! (see [`obj`]).
//!
//! Matrices are 16 floats in column-major order.

pub mod obj;

use std::path::{Path, PathBuf};

use glam::Mat4;
use hashbrown::HashMap;
use serde::Deserialize;

/// 4×4 matrix, column-major
pub type Matrix4 = [f32; 16];

/// Failure to load or interpret a scene snapshot
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Failed to read scene {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scene {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path:?} line {line}: {message}")]
    Obj {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("selected mesh has more than one armature ({count})")]
    MultipleArmatures { count: usize },

    #[error("Unsupported scene format: {0:?} (use .json or .obj)")]
    UnsupportedFormat(PathBuf),
}

fn identity() -> Matrix4 {
    Mat4::IDENTITY.to_cols_array()
}

/// Everything exported from one mesh object
#[derive(Debug, Clone, Deserialize)]
pub struct SceneSnapshot {
    pub object: MeshObject,
    /// Enabled armature modifiers on the object
    #[serde(default)]
    pub armatures: Vec<Armature>,
    #[serde(default)]
    pub timeline: Option<Timeline>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshObject {
    #[serde(default)]
    pub name: String,
    #[serde(default = "identity")]
    pub world_matrix: Matrix4,
    pub mesh: Mesh,
    #[serde(default)]
    pub vertex_groups: Vec<VertexGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<SourceVertex>,
    pub polygons: Vec<SourcePolygon>,
    #[serde(default)]
    pub uv_layers: Vec<UvLayer>,
    #[serde(default)]
    pub materials: Vec<SourceMaterial>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceVertex {
    pub position: [f32; 3],
    #[serde(default)]
    pub normal: [f32; 3],
    /// Vertex group memberships in source order
    #[serde(default)]
    pub groups: Vec<GroupWeight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GroupWeight {
    pub group: u32,
    pub weight: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePolygon {
    pub vertices: Vec<u32>,
    #[serde(default)]
    pub material: u32,
    #[serde(default)]
    pub smooth: bool,
    pub normal: [f32; 3],
}

/// One UV channel: a texture coordinate per polygon corner
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UvLayer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    pub polygons: Vec<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VertexGroup {
    pub index: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceMaterial {
    pub name: String,
    /// Specular shading model name, e.g. `PHONG`
    pub shading: String,
    pub diffuse_color: [f32; 3],
    pub diffuse_intensity: f32,
    #[serde(default)]
    pub emission: f32,
    pub specular_color: [f32; 3],
    pub specular_intensity: f32,
    pub hardness: f32,
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    /// Texture slots; `None` entries are unused slots
    #[serde(default)]
    pub textures: Vec<Option<TextureSlot>>,
}

fn default_alpha() -> f32 {
    1.0
}

impl SourceMaterial {
    /// Material that extracts to the engine's default record values
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shading: "PHONG".to_string(),
            diffuse_color: [1.0, 1.0, 1.0],
            diffuse_intensity: 1.0,
            emission: 0.3,
            specular_color: [1.0, 1.0, 1.0],
            specular_intensity: 0.0,
            hardness: 0.0,
            alpha: 1.0,
            textures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextureSlot {
    /// Texture type, `IMAGE` for image textures
    #[serde(default = "image_kind")]
    pub kind: String,
    /// File path of the bound image
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub use_diffuse: bool,
    #[serde(default)]
    pub use_normal: bool,
    #[serde(default)]
    pub use_specular: bool,
}

fn image_kind() -> String {
    "IMAGE".to_string()
}

impl TextureSlot {
    pub fn is_image(&self) -> bool {
        self.kind.eq_ignore_ascii_case("IMAGE")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Armature {
    #[serde(default)]
    pub name: String,
    #[serde(default = "identity")]
    pub world_matrix: Matrix4,
    pub bones: Vec<SourceBone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceBone {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Rest matrix in armature space
    pub matrix_local: Matrix4,
}

/// Sampled pose matrices over the scene's frame range
#[derive(Debug, Clone, Deserialize)]
pub struct Timeline {
    pub frame_start: i32,
    pub frame_end: i32,
    #[serde(default)]
    pub frame_current: i32,
    pub frames: Vec<FramePose>,
}

/// Pose matrices (armature space) of every bone at one frame
#[derive(Debug, Clone, Deserialize)]
pub struct FramePose {
    pub frame: i32,
    pub bones: HashMap<String, Matrix4>,
}

impl SceneSnapshot {
    /// Load a snapshot, choosing the reader by file extension
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Self::load_json(path),
            "obj" => obj::load_obj(path),
            _ => Err(SceneError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn load_json(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SceneError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The single armature deforming the mesh, if any
    pub fn armature(&self) -> Result<Option<&Armature>, SceneError> {
        match self.armatures.as_slice() {
            [] => Ok(None),
            [armature] => Ok(Some(armature)),
            many => Err(SceneError::MultipleArmatures { count: many.len() }),
        }
    }

    /// Snapshot of a static mesh without armature or animation
    pub fn from_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            object: MeshObject {
                name: name.into(),
                world_matrix: identity(),
                mesh,
                vertex_groups: Vec::new(),
            },
            armatures: Vec::new(),
            timeline: None,
        }
    }
}

impl Mesh {
    /// The UV layer marked active, falling back to the first one
    pub fn active_uv_layer(&self) -> Option<&UvLayer> {
        self.uv_layers
            .iter()
            .find(|layer| layer.active)
            .or_else(|| self.uv_layers.first())
    }
}

impl MeshObject {
    pub fn world(&self) -> Mat4 {
        Mat4::from_cols_array(&self.world_matrix)
    }
}

impl Armature {
    pub fn world(&self) -> Mat4 {
        Mat4::from_cols_array(&self.world_matrix)
    }
}
