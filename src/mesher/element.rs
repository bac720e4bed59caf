//! Element face geometry.
//!
//! Converts one face of a model element into a quad in block-centred
//! space: element rotation first, then the model's GUI translation, then
//! the blockstate's rotation about the block centre.

use super::face::{corner_uvs, default_uv};
use super::geometry::Mesh;
use crate::resource_pack::{ModelElement, ModelFace};
use crate::types::{BlockTransform, Direction};
use glam::Vec3;

/// Half a block in model units; subtracted so the block is centred on the origin.
pub const BLOCK_CENTER: f32 = 8.0;

/// The four corners of a face after all transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    /// TL, TR, BR, BL as seen from outside before rotation.
    pub positions: [[f32; 3]; 4],
    pub normal: [f32; 3],
    /// Per-corner UVs in model texture space, face rotation applied.
    pub uvs: [[f32; 2]; 4],
}

impl FaceGeometry {
    pub fn to_mesh(&self) -> Mesh {
        Mesh::quad(self.positions, self.normal, self.uvs)
    }
}

/// Build the geometry for `direction` of `element`.
///
/// `translation` is applied before the block rotation, so it turns with
/// the block.
pub fn face_geometry(
    element: &ModelElement,
    direction: Direction,
    face: &ModelFace,
    transform: &BlockTransform,
    translation: [f32; 3],
) -> FaceGeometry {
    let bounds = element.bounds();
    let uv = face
        .uv
        .unwrap_or_else(|| default_uv(direction, element.from, element.to));
    let uvs = corner_uvs(uv, face.rotation);

    let mut positions = direction.face_corners(bounds.min, bounds.max);
    let mut normal = Vec3::from(direction.normal());

    if let Some(rotation) = &element.rotation {
        positions = positions.map(|p| rotation.apply(p));
        normal = rotation.matrix() * normal;
    }

    let block = transform.matrix();
    let offset = Vec3::from(translation) - Vec3::splat(BLOCK_CENTER);
    let positions = positions.map(|p| (block * (Vec3::from(p) + offset)).to_array());
    let normal = (block * normal).normalize_or_zero().to_array();

    FaceGeometry {
        positions,
        normal,
        uvs,
    }
}
