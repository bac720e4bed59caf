//! Resource pack access.
//!
//! A [`ResourcePack`] fronts a [`ResourceLoader`] (directory, ZIP archive,
//! memory or a composite of those) with a memoizing cache, and parses
//! blockstates, models and textures on demand.

pub mod blockstate;
pub mod cache;
pub mod loader;
pub mod model;
pub mod path;
pub mod texture;

pub use blockstate::{BlockstateDefinition, ModelVariant};
pub use cache::MemoizedLoader;
pub use loader::{
    open_pack, CompositeLoader, DirectoryLoader, MemoryLoader, ResourceLoader, ZipLoader,
};
pub use model::{BlockModel, ModelElement, ModelFace, TextureRef};
pub use path::{AssetKind, ResourcePath};
pub use texture::{AnimationMeta, TextureData};

use crate::error::Result;
use crate::resolver::ModelResolver;
use crate::types::ResourceLocation;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// A Minecraft resource pack backed by a shared, memoized loader.
///
/// Cloning is cheap; clones share the cache.
#[derive(Clone)]
pub struct ResourcePack {
    loader: Arc<dyn ResourceLoader>,
}

impl ResourcePack {
    /// Wrap `loader` in a [`MemoizedLoader`].
    pub fn new<L: ResourceLoader + 'static>(loader: L) -> Self {
        Self {
            loader: Arc::new(MemoizedLoader::new(loader)),
        }
    }

    /// Open a pack directory or ZIP archive.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(open_pack(path)?))
    }

    /// Open several packs; earlier ones take priority.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let loaders = paths
            .iter()
            .map(open_pack)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(CompositeLoader::new(loaders)))
    }

    pub fn loader(&self) -> &dyn ResourceLoader {
        self.loader.as_ref()
    }

    /// Get the blockstate definition for a block.
    pub fn get_blockstate(&self, location: &ResourceLocation) -> Result<BlockstateDefinition> {
        let value = self.loader.load_json(&ResourcePath::blockstate(location)?)?;
        Ok(BlockstateDefinition::deserialize(value.as_ref())?)
    }

    /// Like [`ResourcePack::get_blockstate`], but a missing blockstate is `None`.
    pub fn try_get_blockstate(
        &self,
        location: &ResourceLocation,
    ) -> Result<Option<BlockstateDefinition>> {
        match self.get_blockstate(location) {
            Ok(def) => Ok(Some(def)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get a single model file without following its parent.
    pub fn get_model(&self, location: &ResourceLocation) -> Result<BlockModel> {
        let value = self.loader.load_json(&ResourcePath::model(location)?)?;
        Ok(BlockModel::deserialize(value.as_ref())?)
    }

    /// Get the model and all of its ancestors, root ancestor first.
    pub fn get_models(&self, location: &ResourceLocation) -> Result<Vec<BlockModel>> {
        ModelResolver::new(self).chain(location)
    }

    /// Get the model with its whole inheritance chain merged in.
    pub fn get_compiled_model(&self, location: &ResourceLocation) -> Result<BlockModel> {
        ModelResolver::new(self).resolve(location)
    }

    /// Get and decode a texture.
    pub fn get_texture(&self, location: &ResourceLocation) -> Result<TextureData> {
        let bytes = self.loader.load_texture(&ResourcePath::texture(location)?)?;
        texture::load_texture_from_bytes(&bytes)
    }

    /// Animation metadata from the texture's `.png.mcmeta`, if it has one.
    pub fn get_animation(&self, location: &ResourceLocation) -> Result<Option<AnimationMeta>> {
        match self.loader.load_json(&ResourcePath::texture_meta(location)?) {
            Ok(document) => texture::parse_mcmeta(&document),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Release the underlying loader.
    pub fn close(&self) -> Result<()> {
        self.loader.close()
    }

    pub(crate) fn load_model_json(
        &self,
        location: &ResourceLocation,
    ) -> Result<Arc<serde_json::Value>> {
        self.loader.load_json(&ResourcePath::model(location)?)
    }
}

impl std::fmt::Debug for ResourcePack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePack").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use serde_json::json;

    fn loc(id: &str) -> ResourceLocation {
        ResourceLocation::parse(id).unwrap()
    }

    fn pack() -> ResourcePack {
        let mut mem = MemoryLoader::new();
        mem.insert_json(
            &ResourcePath::blockstate(&loc("stone")).unwrap(),
            json!({"variants": {"": {"model": "block/stone"}}}),
        );
        mem.insert_json(
            &ResourcePath::texture_meta(&loc("block/fire_0")).unwrap(),
            json!({"animation": {"frametime": 3}}),
        );
        mem.insert_json(
            &ResourcePath::blockstate(&loc("broken")).unwrap(),
            json!({"variants": {"": {"y": 90}}}),
        );
        ResourcePack::new(mem)
    }

    #[test]
    fn test_get_blockstate() {
        let pack = pack();
        let def = pack.get_blockstate(&loc("stone")).unwrap();
        assert_eq!(def.selectors().collect::<Vec<_>>(), vec![""]);
        assert!(pack.get_blockstate(&loc("dirt")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_try_get_blockstate() {
        let pack = pack();
        assert!(pack.try_get_blockstate(&loc("stone")).unwrap().is_some());
        assert!(pack.try_get_blockstate(&loc("dirt")).unwrap().is_none());
        assert!(matches!(
            pack.try_get_blockstate(&loc("broken")),
            Err(RenderError::Json(_))
        ));
    }

    #[test]
    fn test_layered_pack_reports_corrupt_blockstate() {
        let path = ResourcePath::blockstate(&loc("furnace")).unwrap();
        let pack = ResourcePack::new(CompositeLoader::new(vec![
            Box::new(MemoryLoader::new().with_bytes(&path, b"{ not json".to_vec())),
            Box::new(MemoryLoader::new()),
        ]));

        let err = pack.try_get_blockstate(&loc("furnace")).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_get_animation() {
        let pack = pack();
        let meta = pack.get_animation(&loc("block/fire_0")).unwrap().unwrap();
        assert_eq!(meta.frametime, 3);
        assert_eq!(pack.get_animation(&loc("block/stone")).unwrap(), None);
    }
}
