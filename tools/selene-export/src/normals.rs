//! Normal resolution for triangulated faces
//!
//! Smooth faces use the normals of their three vertices; flat faces repeat
//! the polygon normal on all three corners. Both go through the same
//! deduplicator, so a flat face and a smooth vertex with equal normals share
//! one entry.

use crate::dedup::NormalDeduplicator;
use crate::scene::SourceVertex;
use crate::triangulate::TriangleFace;

/// Distinct normals and one index triple per face
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedNormals {
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
}

/// Resolve normals for every face
///
/// Vertex indices must already be validated against `vertices`.
pub fn resolve_normals(faces: &[TriangleFace], vertices: &[SourceVertex]) -> ResolvedNormals {
    let mut normals = NormalDeduplicator::new();

    let faces = faces
        .iter()
        .map(|face| {
            if face.smooth {
                face.vertices
                    .map(|v| normals.add_normal(vertices[v as usize].normal))
            } else {
                let index = normals.add_normal(face.normal);
                [index; 3]
            }
        })
        .collect();

    ResolvedNormals {
        normals: normals.into_values(),
        faces,
    }
}
