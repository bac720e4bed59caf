//! Model inheritance resolution.

use crate::error::{IncompleteCause, RenderError, Result};
use crate::resource_pack::model::{deep_merge, is_builtin_parent};
use crate::resource_pack::{BlockModel, ResourcePack};
use crate::types::ResourceLocation;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Maximum depth for model inheritance to prevent infinite loops.
pub const MAX_INHERITANCE_DEPTH: usize = 16;

/// Resolves model inheritance chains.
pub struct ModelResolver<'a> {
    pack: &'a ResourcePack,
}

impl<'a> ModelResolver<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self { pack }
    }

    /// The model and its ancestors, root ancestor first.
    pub fn chain(&self, location: &ResourceLocation) -> Result<Vec<BlockModel>> {
        self.chain_values(location)?
            .iter()
            .map(|value| BlockModel::deserialize(value.as_ref()).map_err(RenderError::from))
            .collect()
    }

    /// Resolve a model with all inherited properties.
    pub fn resolve(&self, location: &ResourceLocation) -> Result<BlockModel> {
        let chain = self.chain_values(location)?;
        compile_chain(chain.iter().map(|value| value.as_ref()))
    }

    /// Raw model documents from root ancestor to `location`.
    fn chain_values(&self, location: &ResourceLocation) -> Result<Vec<Arc<Value>>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut trail = Vec::new();
        let mut current = location.clone();

        loop {
            let id = current.to_id();
            trail.push(id.clone());
            if !visited.insert(id) || chain.len() >= MAX_INHERITANCE_DEPTH {
                return Err(RenderError::ModelInheritanceTooDeep(trail.join(" -> ")));
            }

            let value = self.pack.load_model_json(&current)?;
            let parent = value
                .get("parent")
                .and_then(Value::as_str)
                .map(str::to_string);
            chain.push(value);

            match parent {
                Some(parent) if is_builtin_parent(&parent) => {
                    log::trace!("{} ends at builtin parent {}", location, parent);
                    break;
                }
                Some(parent) => current = ResourceLocation::parse(&parent)?,
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }
}

/// Left-fold a model chain (root first) into one model with `parent` cleared.
pub fn compile_chain<'v>(chain: impl IntoIterator<Item = &'v Value>) -> Result<BlockModel> {
    let mut merged = Value::Object(Map::new());
    for layer in chain {
        deep_merge(&mut merged, layer);
    }

    let mut model = BlockModel::deserialize(&merged)?;
    model.parent = None;
    Ok(model)
}

/// Check that a compiled model has something to draw.
pub fn ensure_complete(model: &BlockModel, id: &str) -> Result<()> {
    let has_elements = model.has_elements();
    if has_elements && model.has_textures() {
        return Ok(());
    }

    let cause = if !model.has_gui_display() {
        IncompleteCause::NoDisplay
    } else if !has_elements {
        IncompleteCause::NoElements
    } else {
        IncompleteCause::NoTextures
    };

    Err(RenderError::IncompleteModel {
        id: id.to_string(),
        cause,
    })
}
