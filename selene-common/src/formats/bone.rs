//! Bone and pose records
//!
//! Rotations and positions are stored in the engine's coordinate system: the
//! Y and Z axes of the authoring tool are swapped and the quaternion W
//! component is negated.
//!
//! # Layout
//! ```text
//! string   name
//! f32 × 4  rotation (x, z, y, -w)
//! f32 × 3  position (x, z, y)
//! i32      parent index, -1 for roots (bone records only)
//! ```

use std::io::Write;

use super::io::{write_f32s, write_string, ByteReader};
use crate::FormatError;

/// Parent index stored for root bones
pub const NO_PARENT: i32 = -1;

/// Convert an `[x, y, z, w]` quaternion to the engine's axis convention
pub fn swap_rotation(q: [f32; 4]) -> [f32; 4] {
    [q[0], q[2], q[1], -q[3]]
}

/// Convert an `[x, y, z]` vector to the engine's axis convention
pub fn swap_axes(v: [f32; 3]) -> [f32; 3] {
    [v[0], v[2], v[1]]
}

/// Rotation and translation of one bone, already axis-swapped
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
    pub name: String,
    pub rotation: [f32; 4],
    pub position: [f32; 3],
}

impl PoseRecord {
    /// Build a record from an authoring-space rotation and translation
    pub fn from_authoring(name: impl Into<String>, rotation: [f32; 4], position: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            rotation: swap_rotation(rotation),
            position: swap_axes(position),
        }
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<(), FormatError> {
        write_string(w, &self.name)?;
        write_f32s(w, &self.rotation)?;
        write_f32s(w, &self.position)
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        Ok(Self {
            name: r.read_string()?,
            rotation: r.read_f32_array()?,
            position: r.read_f32_array()?,
        })
    }
}

/// Skeleton bone: inverse bind pose plus parent link
#[derive(Debug, Clone, PartialEq)]
pub struct BoneRecord {
    pub pose: PoseRecord,
    pub parent: i32,
}

impl BoneRecord {
    pub fn write<W: Write>(&self, w: &mut W) -> Result<(), FormatError> {
        self.pose.write(w)?;
        w.write_all(&self.parent.to_le_bytes())?;
        Ok(())
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let pose = PoseRecord::read(r)?;
        let parent = r.read_i32()?;
        Ok(Self { pose, parent })
    }

    pub fn is_root(&self) -> bool {
        self.parent == NO_PARENT
    }
}
