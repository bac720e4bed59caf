//! Isometric rendering of resolved block models.
//!
//! [`IsometricRenderer`] ties the pipeline together: resolve the block,
//! compile its faces, draw every animation tick through a
//! [`RenderBackend`], and encode the frames as PNG or APNG.

pub mod camera;
pub mod encode;
pub mod engine;

pub use camera::{Camera, DirectionalLight, LightRig};
pub use encode::{encode_apng, encode_png, FrameDelay, RenderedImage};
pub use engine::{RenderBackend, SoftwareBackend};

use crate::error::Result;
use crate::mesher::{CompiledModel, ModelCompiler};
use crate::resolver::resolve_block;
use crate::resource_pack::ResourcePack;
use crate::types::ResourceLocation;
use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Length of the debug axis lines in model units.
const AXIS_LENGTH: f32 = 10.0;
const WIREFRAME_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Root directory for [`IsometricRenderer::render_to_file`].
    pub out_dir: PathBuf,
    /// Output width and height in pixels.
    pub image_size: u32,
    /// Model units visible across the image.
    pub camera_size: f32,
    /// Draw XYZ axes and the block outline.
    pub debug_axes: bool,
    pub ambient_light: bool,
    /// Render every tick of animated textures.
    pub animation: bool,
    pub frame_delay: FrameDelay,
    /// Use `<model>_inventory` when the pack has one.
    pub prefer_inventory_models: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            image_size: 300,
            camera_size: 25.3,
            debug_axes: false,
            ambient_light: false,
            animation: true,
            frame_delay: FrameDelay::default(),
            prefer_inventory_models: true,
        }
    }
}

impl RendererConfig {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn with_image_size(mut self, image_size: u32) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn with_camera_size(mut self, camera_size: f32) -> Self {
        self.camera_size = camera_size;
        self
    }

    pub fn with_debug_axes(mut self, debug_axes: bool) -> Self {
        self.debug_axes = debug_axes;
        self
    }

    pub fn with_ambient_light(mut self, ambient_light: bool) -> Self {
        self.ambient_light = ambient_light;
        self
    }

    pub fn with_animation(mut self, animation: bool) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_frame_delay(mut self, frame_delay: FrameDelay) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    pub fn with_prefer_inventory_models(mut self, prefer: bool) -> Self {
        self.prefer_inventory_models = prefer;
        self
    }
}

/// Renders blocks from one resource pack.
pub struct IsometricRenderer {
    pack: ResourcePack,
    config: RendererConfig,
}

impl IsometricRenderer {
    pub fn new(pack: ResourcePack, config: RendererConfig) -> Self {
        Self { pack, config }
    }

    pub fn pack(&self) -> &ResourcePack {
        &self.pack
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resolve and compile one block.
    pub fn resolve(&self, location: &ResourceLocation) -> Result<CompiledModel> {
        let resolved = resolve_block(&self.pack, location, self.config.prefer_inventory_models)?;
        ModelCompiler::new(&self.pack)
            .with_animation(self.config.animation)
            .compile(&resolved)
    }

    /// Resolve and compile many blocks in parallel. Results keep input order.
    pub fn resolve_many(&self, locations: &[ResourceLocation]) -> Vec<Result<CompiledModel>> {
        locations
            .par_iter()
            .map(|location| self.resolve(location))
            .collect()
    }

    /// Render one block to its frames.
    pub fn render(&self, location: &ResourceLocation) -> Result<RenderedImage> {
        log::trace!("Started rendering {}", location);
        let model = self.resolve(location)?;
        let image = self.draw(&model);
        log::debug!("Rendered {} ({} frames)", location, image.frames.len());
        Ok(image)
    }

    /// Draw a compiled model with the built-in software backend.
    pub fn draw(&self, model: &CompiledModel) -> RenderedImage {
        let camera = Camera::isometric(self.config.camera_size);
        let lights = LightRig::standard(self.config.ambient_light);
        let mut backend = SoftwareBackend::new(self.config.image_size, &camera, lights);
        self.draw_with(model, &mut backend)
    }

    /// Draw `model` through `backend`, one frame per run of identical ticks.
    ///
    /// Tick 0 settles how many ticks the animation needs. After that only
    /// ticks where some face switches texture frame are drawn; the frames in
    /// between are folded into the previous frame's tick count. Static
    /// models produce exactly one frame.
    pub fn draw_with<B: RenderBackend>(&self, model: &CompiledModel, backend: &mut B) -> RenderedImage {
        let mut ctx = model.context.clone();
        let mut frames = Vec::new();
        let mut frame_ticks = Vec::new();

        loop {
            backend.begin_frame();
            for face in model.frame(&mut ctx) {
                backend.draw_mesh(face.mesh, &face.texture, face.shade);
            }
            if self.config.debug_axes {
                draw_debug_overlay(backend);
            }
            frames.push(backend.finish_frame());

            let next = model
                .next_frame_change(ctx.current_tick)
                .map_or(ctx.max_ticks, |tick| tick.min(ctx.max_ticks));
            frame_ticks.push(next - ctx.current_tick);
            log::trace!("Drew ticks {}..{} of {}", ctx.current_tick, next, ctx.max_ticks);

            if next >= ctx.max_ticks {
                break;
            }
            ctx.current_tick = next;
        }

        RenderedImage {
            frames,
            frame_ticks,
            frame_delay: self.config.frame_delay,
        }
    }

    /// Where [`render_to_file`](Self::render_to_file) writes `location`.
    ///
    /// Only the final component of `filename` is used, so an override can't
    /// leave the textures directory.
    pub fn output_path(&self, location: &ResourceLocation, filename: Option<&str>) -> PathBuf {
        let filename = filename
            .and_then(|name| Path::new(name).file_name())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{}.png", location.path)));
        self.config
            .out_dir
            .join("assets")
            .join(&location.namespace)
            .join("textures")
            .join(filename)
    }

    /// Render and write to `<out_dir>/assets/<namespace>/textures/<filename>`,
    /// where `filename` defaults to `<path>.png`.
    pub fn render_to_file(&self, location: &ResourceLocation, filename: Option<&str>) -> Result<PathBuf> {
        let image = self.render(location)?;
        let path = self.output_path(location, filename);
        image.save(&path)?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

/// Axis lines plus the outline of the unit block.
fn draw_debug_overlay<B: RenderBackend>(backend: &mut B) {
    backend.draw_line(Vec3::ZERO, Vec3::X * AXIS_LENGTH, [255, 0, 0, 255]);
    backend.draw_line(Vec3::ZERO, Vec3::Y * AXIS_LENGTH, [0, 255, 0, 255]);
    backend.draw_line(Vec3::ZERO, Vec3::Z * AXIS_LENGTH, [0, 0, 255, 255]);

    let corner = |i: u8| {
        Vec3::new(
            if i & 1 == 0 { -8.0 } else { 8.0 },
            if i & 2 == 0 { -8.0 } else { 8.0 },
            if i & 4 == 0 { -8.0 } else { 8.0 },
        )
    };
    // Corners that differ in exactly one bit share an edge.
    for a in 0..8u8 {
        for bit in [1u8, 2, 4] {
            let b = a | bit;
            if b != a {
                backend.draw_line(corner(a), corner(b), WIREFRAME_COLOR);
            }
        }
    }
}
