//! Polygon triangulation
//!
//! Source polygons are triangles or quads. A quad is split along its 0–2
//! diagonal into two triangles that share the polygon's material, smoothing
//! flag and normal. Texture coordinate loops are split with the same rule so
//! that triangle `i` and texture triangle `i` always describe the same face.

use crate::error::ValidationError;
use crate::scene::SourcePolygon;

/// Corner order used when splitting polygons
///
/// Each target format expects a fixed winding; it is a property of the
/// format, not of the export call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Triangle `[0, 1, 2]`; quad `[0, 1, 2]` + `[2, 3, 0]`
    Preserve,
    /// Triangle `[0, 2, 1]`; quad `[0, 2, 1]` + `[2, 0, 3]`
    Flip,
}

impl Winding {
    const PRESERVE_TRI: [[usize; 3]; 1] = [[0, 1, 2]];
    const PRESERVE_QUAD: [[usize; 3]; 2] = [[0, 1, 2], [2, 3, 0]];
    const FLIP_TRI: [[usize; 3]; 1] = [[0, 2, 1]];
    const FLIP_QUAD: [[usize; 3]; 2] = [[0, 2, 1], [2, 0, 3]];

    /// Corner indices of the triangles for a polygon with `corners` vertices
    pub fn split(self, corners: usize) -> Option<&'static [[usize; 3]]> {
        match (self, corners) {
            (Self::Preserve, 3) => Some(&Self::PRESERVE_TRI),
            (Self::Preserve, 4) => Some(&Self::PRESERVE_QUAD),
            (Self::Flip, 3) => Some(&Self::FLIP_TRI),
            (Self::Flip, 4) => Some(&Self::FLIP_QUAD),
            _ => None,
        }
    }

    /// Apply the split to any per-corner list
    pub fn apply<T: Copy>(self, corners: &[T]) -> Option<Vec<[T; 3]>> {
        let split = self.split(corners.len())?;
        Some(
            split
                .iter()
                .map(|tri| [corners[tri[0]], corners[tri[1]], corners[tri[2]]])
                .collect(),
        )
    }
}

/// One triangle derived from a source polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleFace {
    pub vertices: [u32; 3],
    pub material: u32,
    pub smooth: bool,
    pub normal: [f32; 3],
}

/// Triangulate a single polygon
pub fn triangulate_polygon(
    index: usize,
    polygon: &SourcePolygon,
    winding: Winding,
) -> Result<Vec<TriangleFace>, ValidationError> {
    let triangles = winding
        .apply(&polygon.vertices)
        .ok_or(ValidationError::UnsupportedPolygon {
            polygon: index,
            vertices: polygon.vertices.len(),
        })?;

    Ok(triangles
        .into_iter()
        .map(|vertices| TriangleFace {
            vertices,
            material: polygon.material,
            smooth: polygon.smooth,
            normal: polygon.normal,
        })
        .collect())
}

/// Triangulate every polygon, checking vertex references
pub fn triangulate(
    polygons: &[SourcePolygon],
    vertex_count: usize,
    winding: Winding,
) -> Result<Vec<TriangleFace>, ValidationError> {
    let mut faces = Vec::with_capacity(polygons.len() * 2);
    for (index, polygon) in polygons.iter().enumerate() {
        if let Some(&vertex) = polygon
            .vertices
            .iter()
            .find(|&&v| v as usize >= vertex_count)
        {
            return Err(ValidationError::VertexIndexOutOfRange {
                polygon: index,
                vertex,
                vertex_count,
            });
        }
        faces.extend(triangulate_polygon(index, polygon, winding)?);
    }
    Ok(faces)
}

/// Triangulate per-polygon texture coordinate index loops
pub fn triangulate_uv_loops(
    loops: &[Vec<u32>],
    winding: Winding,
) -> Result<Vec<[u32; 3]>, ValidationError> {
    let mut faces = Vec::with_capacity(loops.len() * 2);
    for (index, corners) in loops.iter().enumerate() {
        let triangles = winding
            .apply(corners)
            .ok_or(ValidationError::UnsupportedPolygon {
                polygon: index,
                vertices: corners.len(),
            })?;
        faces.extend(triangles);
    }
    Ok(faces)
}
