//! Texture coordinate resolution
//!
//! Coordinates of the active UV layer are deduplicated per polygon corner
//! and the resulting index loops are triangulated with the same winding as
//! the geometry.

use crate::dedup::UvDeduplicator;
use crate::error::ValidationError;
use crate::scene::Mesh;
use crate::triangulate::{triangulate_uv_loops, Winding};

/// Distinct texture coordinates and one index triple per face
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTexCoords {
    pub tex_coords: Vec<[f32; 2]>,
    pub faces: Vec<[u32; 3]>,
}

/// Resolve texture coordinates for `face_count` triangulated faces
pub fn resolve_tex_coords(
    mesh: &Mesh,
    face_count: usize,
    winding: Winding,
) -> Result<ResolvedTexCoords, ValidationError> {
    let layer = mesh
        .active_uv_layer()
        .ok_or(ValidationError::NoTextureCoordinates)?;

    let mut tex_coords = UvDeduplicator::new();
    let loops: Vec<Vec<u32>> = layer
        .polygons
        .iter()
        .map(|corners| corners.iter().map(|&uv| tex_coords.add_uv(uv)).collect())
        .collect();

    let faces = triangulate_uv_loops(&loops, winding)?;
    if faces.len() != face_count {
        return Err(ValidationError::TextureFaceMismatch {
            faces: face_count,
            texture_faces: faces.len(),
        });
    }

    // Equal totals can still hide a triangle/quad swap between two polygons
    for (index, (polygon, corners)) in mesh.polygons.iter().zip(&layer.polygons).enumerate() {
        if polygon.vertices.len() != corners.len() {
            return Err(ValidationError::UvLoopMismatch {
                polygon: index,
                vertices: polygon.vertices.len(),
                loops: corners.len(),
            });
        }
    }

    Ok(ResolvedTexCoords {
        tex_coords: tex_coords.into_values(),
        faces,
    })
}
