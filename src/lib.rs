//! # Block Renderer
//!
//! A Rust library for rendering isometric icons of Minecraft blocks.
//!
//! ## Overview
//!
//! Given a resource pack and a block identifier such as
//! `minecraft:campfire[lit=true]`, the library picks a blockstate variant,
//! walks and merges the model's parent chain, turns every element face into
//! a textured quad, and draws the result through an isometric camera. Blocks
//! with animated textures come out as APNG, everything else as PNG.
//!
//! ## Quick Start
//!
//! ```ignore
//! use block_renderer::{load_resource_pack, IsometricRenderer, RendererConfig, ResourceLocation};
//!
//! let pack = load_resource_pack("path/to/pack.zip")?;
//! let renderer = IsometricRenderer::new(pack, RendererConfig::default());
//!
//! let id = ResourceLocation::from_identifier("minecraft:campfire[lit=true]")?;
//! let path = renderer.render_to_file(&id, None)?;
//! ```
//!
//! ## Custom Backends
//!
//! Drawing goes through the [`RenderBackend`] trait. The crate ships a CPU
//! rasterizer ([`SoftwareBackend`]); other engines can be plugged in with
//! [`IsometricRenderer::draw_with`].

pub mod error;
pub mod types;
pub mod resource_pack;
pub mod resolver;
pub mod mesher;
pub mod render;

// Re-export main types for convenience
pub use error::{RenderError, Result};
pub use types::{Axis, BlockTransform, Direction, ResourceLocation};
pub use resource_pack::{
    BlockModel, BlockstateDefinition, ModelElement, ResourceLoader, ResourcePack, ResourcePath,
};
pub use resolver::{resolve_block, ResolvedBlock};
pub use mesher::{CompiledModel, Mesh, ModelCompiler, ShadeMode, Vertex};
pub use render::{
    FrameDelay, IsometricRenderer, RenderBackend, RenderedImage, RendererConfig, SoftwareBackend,
};

/// Load a resource pack from a file path (ZIP or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<ResourcePack> {
    ResourcePack::from_path(path)
}

/// Load a resource pack from the bytes of a ZIP archive.
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    Ok(ResourcePack::new(resource_pack::ZipLoader::from_bytes(data)?))
}
