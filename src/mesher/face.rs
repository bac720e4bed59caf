//! Per-face texture and UV resolution.

use crate::error::{RenderError, Result};
use crate::resource_pack::{BlockModel, TextureRef};
use crate::types::Direction;
use std::collections::HashSet;

/// How a face reacts to the light rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeMode {
    /// Lambert shading from the directional lights.
    #[default]
    Lit,
    /// Full brightness regardless of orientation.
    Flat,
}

impl ShadeMode {
    /// Mode for an element's `shade` flag.
    pub fn from_shade(shade: bool) -> Self {
        if shade {
            ShadeMode::Lit
        } else {
            ShadeMode::Flat
        }
    }
}

/// Follow `#alias` references through the model's texture variables until a
/// texture id is reached.
///
/// A missing variable or a cycle is an error naming every hop taken.
pub fn resolve_texture(model: &BlockModel, reference: &TextureRef) -> Result<String> {
    let mut current = reference;
    let mut visited = HashSet::new();
    let mut hops = vec![reference.to_string()];

    loop {
        let name = match current {
            TextureRef::Literal(id) => return Ok(id.clone()),
            TextureRef::Alias(name) => name,
        };

        if !visited.insert(name.as_str()) {
            return Err(RenderError::UnresolvedTexture(format!(
                "{} (cycle)",
                hops.join(" -> ")
            )));
        }

        match model.texture_variable(name) {
            Some(next) => {
                hops.push(next.to_string());
                current = next;
            }
            None => {
                return Err(RenderError::UnresolvedTexture(format!(
                    "{} (undefined)",
                    hops.join(" -> ")
                )));
            }
        }
    }
}

/// UV rectangle for a face with no explicit `uv`: the element's extent on
/// the two axes the face spans, as `[min_u, min_v, max_u, max_v]`.
pub fn default_uv(direction: Direction, from: [f32; 3], to: [f32; 3]) -> [f32; 4] {
    let (u, v) = direction.uv_axes();
    [
        from[u].min(to[u]),
        from[v].min(to[v]),
        from[u].max(to[u]),
        from[v].max(to[v]),
    ]
}

/// Corner UVs of a rectangle in quad order (TL, TR, BR, BL), rotated in
/// 90° steps.
pub fn corner_uvs(uv: [f32; 4], rotation: i32) -> [[f32; 2]; 4] {
    let (u1, v1, u2, v2) = (uv[0], uv[1], uv[2], uv[3]);
    rotate_uvs([[u1, v1], [u2, v1], [u2, v2], [u1, v2]], rotation)
}

/// Rotate UV coordinates.
pub fn rotate_uvs(uvs: [[f32; 2]; 4], rotation: i32) -> [[f32; 2]; 4] {
    let steps = ((rotation / 90) % 4 + 4) % 4;
    let mut result = uvs;
    for _ in 0..steps {
        result = [result[3], result[0], result[1], result[2]];
    }
    result
}
