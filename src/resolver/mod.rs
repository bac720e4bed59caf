//! Block state and model resolution.
//!
//! This module handles resolving block locations to concrete model variants
//! and resolving model inheritance chains.

pub mod model_resolver;
pub mod state_resolver;

pub use model_resolver::{ensure_complete, ModelResolver, MAX_INHERITANCE_DEPTH};
pub use state_resolver::{select_variant, StateResolver};

use crate::error::Result;
use crate::resource_pack::{BlockModel, ModelVariant, ResourcePack};
use crate::types::{BlockTransform, ResourceLocation};

/// Suffix of the item-icon flavour of a block model.
const INVENTORY_SUFFIX: &str = "_inventory";

/// A resolved model ready for meshing.
#[derive(Debug, Clone)]
pub struct ResolvedBlock {
    /// Id of the model that was compiled.
    pub model_id: ResourceLocation,
    /// The fully resolved block model (with inherited elements/textures).
    pub model: BlockModel,
    /// Block-level transform (x/y rotation).
    pub transform: BlockTransform,
}

/// Model id for a blockstate variant.
///
/// With `prefer_inventory` set, `<model>_inventory` is used when the pack
/// has it; otherwise the variant's own model.
pub fn resolve_model_id(
    pack: &ResourcePack,
    variant: &ModelVariant,
    prefer_inventory: bool,
) -> Result<ResourceLocation> {
    let base = ResourceLocation::parse(&variant.model)?;
    if !prefer_inventory {
        return Ok(base);
    }

    let inventory = base.with_path_suffix(INVENTORY_SUFFIX);
    match pack.load_model_json(&inventory) {
        Ok(_) => {
            log::debug!("Using inventory model {}", inventory);
            Ok(inventory)
        }
        Err(e) if e.is_not_found() => Ok(base),
        Err(e) => Err(e),
    }
}

/// Resolve a block location to its compiled model and transform.
///
/// Blocks without a blockstate file are treated as model ids.
pub fn resolve_block(
    pack: &ResourcePack,
    location: &ResourceLocation,
    prefer_inventory: bool,
) -> Result<ResolvedBlock> {
    let variant = StateResolver::new(pack).resolve(location)?;

    let (model_id, transform) = match &variant {
        Some(variant) => (
            resolve_model_id(pack, variant, prefer_inventory)?,
            BlockTransform::new(variant.x, variant.y),
        ),
        None => (
            ResourceLocation::new(location.namespace.clone(), location.path.clone())?,
            BlockTransform::default(),
        ),
    };

    let model = pack.get_compiled_model(&model_id)?;
    ensure_complete(&model, &model_id.to_id())?;

    Ok(ResolvedBlock {
        model_id,
        model,
        transform,
    })
}
