//! Block Renderer CLI
//!
//! Render isometric icons of Minecraft blocks from a resource pack.

use block_renderer::{
    FrameDelay, IsometricRenderer, RenderError, RendererConfig, ResourceLocation, ResourcePack,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "block-renderer")]
#[command(author, version, about = "Render isometric icons of Minecraft blocks", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render blocks to PNG/APNG files
    Render {
        /// Block identifiers, e.g. "stone" or "minecraft:campfire[lit=true](1)"
        #[arg(required = true)]
        blocks: Vec<String>,

        #[command(flatten)]
        packs: PackArgs,

        /// Output directory (files land in <out>/assets/<namespace>/textures/)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// JSON file with renderer settings; flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Image width and height in pixels
        #[arg(short, long)]
        size: Option<u32>,

        /// Model units visible across the image
        #[arg(long)]
        camera_size: Option<f32>,

        /// Draw axes and the block outline
        #[arg(long)]
        debug_axes: bool,

        /// Add ambient light
        #[arg(long)]
        ambient: bool,

        /// Only render the first frame of animated textures
        #[arg(long)]
        no_animation: bool,

        /// Delay between APNG frames, as "numerator/denominator" seconds
        #[arg(long, value_parser = parse_frame_delay)]
        frame_delay: Option<FrameDelay>,

        /// Ignore `_inventory` model variants
        #[arg(long)]
        no_inventory_models: bool,
    },

    /// Show how blocks resolve without rendering them
    Resolve {
        /// Block identifiers
        #[arg(required = true)]
        blocks: Vec<String>,

        #[command(flatten)]
        packs: PackArgs,
    },
}

#[derive(Args)]
struct PackArgs {
    /// Resource pack (ZIP or directory). Repeat to layer packs; earlier wins.
    #[arg(short, long = "pack", required = true)]
    packs: Vec<PathBuf>,
}

impl PackArgs {
    fn open(&self) -> Result<ResourcePack, RenderError> {
        println!("Loading {} resource pack(s)...", self.packs.len());
        ResourcePack::from_paths(&self.packs)
    }
}

fn parse_frame_delay(s: &str) -> Result<FrameDelay, String> {
    let (num, den) = s
        .split_once('/')
        .ok_or_else(|| format!("Invalid frame delay: '{}'. Use numerator/denominator", s))?;
    let num = num.trim().parse::<u16>().map_err(|e| e.to_string())?;
    let den = den.trim().parse::<u16>().map_err(|e| e.to_string())?;
    Ok(FrameDelay::new(num, den))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            blocks,
            packs,
            out_dir,
            config,
            size,
            camera_size,
            debug_axes,
            ambient,
            no_animation,
            frame_delay,
            no_inventory_models,
        } => {
            let mut config = match config {
                Some(path) => RendererConfig::from_json_file(path)?,
                None => RendererConfig::default(),
            };
            if let Some(out_dir) = out_dir {
                config = config.with_out_dir(out_dir);
            }
            if let Some(size) = size {
                config = config.with_image_size(size);
            }
            if let Some(camera_size) = camera_size {
                config = config.with_camera_size(camera_size);
            }
            if let Some(frame_delay) = frame_delay {
                config = config.with_frame_delay(frame_delay);
            }
            if debug_axes {
                config = config.with_debug_axes(true);
            }
            if ambient {
                config = config.with_ambient_light(true);
            }
            if no_animation {
                config = config.with_animation(false);
            }
            if no_inventory_models {
                config = config.with_prefer_inventory_models(false);
            }

            let renderer = IsometricRenderer::new(packs.open()?, config);
            render_blocks(&renderer, &blocks);
            renderer.pack().close()?;
        }
        Commands::Resolve { blocks, packs } => {
            let renderer = IsometricRenderer::new(packs.open()?, RendererConfig::default());
            resolve_blocks(&renderer, &blocks);
        }
    }

    Ok(())
}

/// Render every block, reporting failures and moving on.
fn render_blocks(renderer: &IsometricRenderer, blocks: &[String]) {
    let mut failed = 0;

    for (i, block) in blocks.iter().enumerate() {
        println!("[{}/{}] Rendering {}", i + 1, blocks.len(), block);
        let result = ResourceLocation::from_identifier(block)
            .and_then(|id| renderer.render_to_file(&id, None));

        match result {
            Ok(path) => println!("  Wrote {:?}", path),
            Err(e) => {
                failed += 1;
                log::error!("Failed to render {}: {}", block, e);
            }
        }
    }

    println!(
        "Rendered {} of {} blocks",
        blocks.len() - failed,
        blocks.len()
    );
}

fn resolve_blocks(renderer: &IsometricRenderer, blocks: &[String]) {
    let mut ids = Vec::new();
    for block in blocks {
        match ResourceLocation::from_identifier(block) {
            Ok(id) => ids.push(id),
            Err(e) => log::error!("Invalid block id {}: {}", block, e),
        }
    }

    for (id, result) in ids.iter().zip(renderer.resolve_many(&ids)) {
        match result {
            Ok(model) => {
                let transform = model.context.transform();
                println!("{}", id);
                println!("  Model: {}", model.id);
                println!("  Rotation: x={} y={}", transform.x, transform.y);
                println!("  Elements: {}", model.elements.len());
                println!("  Faces: {}", model.faces().count());
                println!("  Animated: {}", model.is_animated());
            }
            Err(e) => log::error!("Failed to resolve {}: {}", id, e),
        }
    }
}
