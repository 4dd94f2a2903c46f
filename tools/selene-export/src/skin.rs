//! Skin weight normalization
//!
//! Every vertex of a skinned mesh carries exactly four (bone index, weight)
//! slots. Influences of groups without an exported bone are ignored.

use hashbrown::HashMap;
use selene_common::INFLUENCES_PER_VERTEX;

use crate::error::{ExportWarning, SkinDataError, Warnings};
use crate::scene::{SourceVertex, VertexGroup};
use crate::skeleton::Skeleton;

/// Four bone influences of one vertex
///
/// Indices are stored as floats, matching the file layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkinVertex {
    pub indices: [f32; INFLUENCES_PER_VERTEX],
    pub weights: [f32; INFLUENCES_PER_VERTEX],
}

impl SkinVertex {
    /// Normalize the influences of vertex `vertex`
    ///
    /// Only the first four influences in source order are kept; the
    /// retained weights are rescaled to sum to one.
    pub fn from_influences(
        vertex: usize,
        influences: &[(usize, f32)],
        warnings: &mut Warnings,
    ) -> Result<Self, SkinDataError> {
        if influences.is_empty() {
            return Err(SkinDataError::NoInfluences { vertex });
        }
        if influences.len() > INFLUENCES_PER_VERTEX {
            warnings.push(ExportWarning::ExcessInfluences {
                vertex,
                count: influences.len(),
            });
        }

        let retained = &influences[..influences.len().min(INFLUENCES_PER_VERTEX)];
        let total: f32 = retained.iter().map(|&(_, weight)| weight).sum();
        if total == 0.0 || !total.is_finite() {
            return Err(SkinDataError::ZeroWeight { vertex });
        }

        let mut skin = Self::default();
        for (slot, &(bone, weight)) in retained.iter().enumerate() {
            skin.indices[slot] = bone as f32;
            skin.weights[slot] = weight / total;
        }
        Ok(skin)
    }
}

/// Normalize the skin weights of every vertex
pub fn normalize_skin(
    vertices: &[SourceVertex],
    groups: &[VertexGroup],
    skeleton: &Skeleton,
    warnings: &mut Warnings,
) -> Result<Vec<SkinVertex>, SkinDataError> {
    let bone_of_group: HashMap<u32, usize> = groups
        .iter()
        .filter_map(|group| Some((group.index, skeleton.index_of(&group.name)?)))
        .collect();

    vertices
        .iter()
        .enumerate()
        .map(|(index, vertex)| {
            let influences: Vec<(usize, f32)> = vertex
                .groups
                .iter()
                .filter_map(|g| Some((*bone_of_group.get(&g.group)?, g.weight)))
                .collect();
            SkinVertex::from_influences(index, &influences, warnings)
        })
        .collect()
}
