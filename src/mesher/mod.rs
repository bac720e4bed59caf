//! Mesh generation from block models.
//!
//! This module converts a resolved block model into textured quads, one per
//! visible element face, together with the animation state needed to pick
//! a texture frame for every tick.

pub mod animation;
pub mod element;
pub mod face;
pub mod geometry;

pub use animation::{FaceAnimation, RenderContext};
pub use element::{face_geometry, FaceGeometry};
pub use face::{default_uv, resolve_texture, ShadeMode};
pub use geometry::{Mesh, Vertex};

use crate::error::Result;
use crate::resolver::ResolvedBlock;
use crate::resource_pack::{ResourcePack, TextureData};
use crate::types::{Direction, ResourceLocation};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// A decoded texture plus how to step through its frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMaterial {
    pub texture_id: ResourceLocation,
    pub texture: Arc<TextureData>,
    /// Rows per frame; the full height for static textures.
    pub frame_height: u32,
    /// `None` for static textures or when animation is disabled.
    pub animation: Option<FaceAnimation>,
}

impl FaceMaterial {
    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    /// Frame to draw at the context's tick.
    pub fn frame_at(&self, ctx: &mut RenderContext) -> u32 {
        self.animation.map_or(0, |animation| animation.frame_at(ctx))
    }

    /// The image to sample for `frame`.
    pub fn frame_texture(&self, frame: u32) -> Cow<'_, TextureData> {
        if self.frame_height == self.texture.height {
            Cow::Borrowed(self.texture.as_ref())
        } else {
            Cow::Owned(self.texture.frame(frame, self.frame_height))
        }
    }
}

/// One visible element face.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFace {
    pub direction: Direction,
    pub mesh: Mesh,
    pub shade: ShadeMode,
    pub material: Arc<FaceMaterial>,
}

/// Faces of one element, indexed like [`Direction::MATERIAL_ORDER`].
/// Faces the element doesn't declare are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledElement {
    pub faces: [Option<CompiledFace>; 6],
}

impl CompiledElement {
    pub fn face(&self, direction: Direction) -> Option<&CompiledFace> {
        Direction::MATERIAL_ORDER
            .iter()
            .position(|d| *d == direction)
            .and_then(|i| self.faces[i].as_ref())
    }
}

/// A face ready to hand to a render backend for one tick.
#[derive(Debug)]
pub struct FrameFace<'a> {
    pub mesh: &'a Mesh,
    pub texture: Cow<'a, TextureData>,
    pub shade: ShadeMode,
}

/// Renderer-ready form of a block model.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledModel {
    pub id: ResourceLocation,
    pub elements: Vec<CompiledElement>,
    pub context: RenderContext,
}

impl CompiledModel {
    /// Every visible face in element order, then material order.
    pub fn faces(&self) -> impl Iterator<Item = &CompiledFace> {
        self.elements
            .iter()
            .flat_map(|element| element.faces.iter().flatten())
    }

    pub fn is_animated(&self) -> bool {
        self.faces().any(|face| face.material.is_animated())
    }

    /// First tick after `tick` at which some face switches texture frame;
    /// `None` when nothing is animated.
    pub fn next_frame_change(&self, tick: u32) -> Option<u32> {
        self.faces()
            .filter_map(|face| face.material.animation)
            .map(|animation| animation.next_change(tick))
            .min()
    }

    /// Faces with their texture frame for `ctx.current_tick`.
    ///
    /// On tick 0 this also settles `ctx.max_ticks`.
    pub fn frame(&self, ctx: &mut RenderContext) -> Vec<FrameFace<'_>> {
        self.faces()
            .map(|face| {
                let frame = face.material.frame_at(ctx);
                FrameFace {
                    mesh: &face.mesh,
                    texture: face.material.frame_texture(frame),
                    shade: face.shade,
                }
            })
            .collect()
    }
}

/// Builds [`CompiledModel`]s, decoding each texture once per model.
pub struct ModelCompiler<'a> {
    pack: &'a ResourcePack,
    animation: bool,
    materials: HashMap<String, Arc<FaceMaterial>>,
}

impl<'a> ModelCompiler<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self {
            pack,
            animation: true,
            materials: HashMap::new(),
        }
    }

    /// Disable to always draw the first frame of animated textures.
    pub fn with_animation(mut self, animation: bool) -> Self {
        self.animation = animation;
        self
    }

    /// Compile the faces of a resolved block.
    pub fn compile(&mut self, resolved: &ResolvedBlock) -> Result<CompiledModel> {
        let model = &resolved.model;
        let translation = model.gui_translation();
        let mut elements = Vec::with_capacity(model.elements().len());

        for element in model.elements() {
            let shade = ShadeMode::from_shade(element.shade);
            let mut compiled = CompiledElement::default();

            for (slot, direction) in Direction::MATERIAL_ORDER.iter().enumerate() {
                let Some(face) = element.faces.get(direction) else {
                    continue;
                };

                let texture_id = resolve_texture(model, &face.texture)?;
                let material = self.material(&texture_id)?;
                let geometry =
                    face_geometry(element, *direction, face, &resolved.transform, translation);

                compiled.faces[slot] = Some(CompiledFace {
                    direction: *direction,
                    mesh: geometry.to_mesh(),
                    shade,
                    material,
                });
            }

            elements.push(compiled);
        }

        log::debug!(
            "Compiled {} with {} elements",
            resolved.model_id,
            elements.len()
        );

        Ok(CompiledModel {
            id: resolved.model_id.clone(),
            elements,
            context: RenderContext::new(resolved.transform),
        })
    }

    fn material(&mut self, texture_id: &str) -> Result<Arc<FaceMaterial>> {
        if let Some(material) = self.materials.get(texture_id) {
            return Ok(material.clone());
        }

        let location = ResourceLocation::parse(texture_id)?;
        let texture = self.pack.get_texture(&location)?;
        let meta = self.pack.get_animation(&location)?;

        let (frame_height, animation) = match meta {
            Some(meta) => {
                let frame_count = texture.frame_count()?;
                let animation = (self.animation && frame_count > 1)
                    .then(|| FaceAnimation::new(&meta, frame_count));
                (texture.width, animation)
            }
            None => (texture.height, None),
        };

        log::trace!(
            "Loaded texture {} ({}x{}, animated: {})",
            location,
            texture.width,
            texture.height,
            animation.is_some()
        );

        let material = Arc::new(FaceMaterial {
            texture_id: location,
            texture: Arc::new(texture),
            frame_height,
            animation,
        });
        self.materials
            .insert(texture_id.to_string(), material.clone());
        Ok(material)
    }
}
