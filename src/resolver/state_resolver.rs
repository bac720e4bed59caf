//! Block state to model variant resolution.

use crate::error::{RenderError, Result};
use crate::resource_pack::{BlockstateDefinition, ModelVariant, ResourcePack};
use crate::types::ResourceLocation;

/// Resolves block locations to model variants.
pub struct StateResolver<'a> {
    pack: &'a ResourcePack,
}

impl<'a> StateResolver<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self { pack }
    }

    /// Pick the variant for `location`, or `None` when the block has no
    /// blockstate file at all.
    pub fn resolve(&self, location: &ResourceLocation) -> Result<Option<ModelVariant>> {
        match self.pack.try_get_blockstate(location)? {
            Some(definition) => select_variant(&definition, location).map(Some),
            None => {
                log::debug!("No blockstate for {}, using it as a model id", location);
                Ok(None)
            }
        }
    }
}

/// Choose one model variant from a blockstate definition.
///
/// The selector with the lowest [`ResourceLocation::sort_variant`] score
/// wins; ties go to whichever selector comes first in the file. The
/// location's `variant_index` then picks from that selector's alternates.
pub fn select_variant(
    definition: &BlockstateDefinition,
    location: &ResourceLocation,
) -> Result<ModelVariant> {
    let variants = match definition {
        BlockstateDefinition::Variants(variants) => variants,
        BlockstateDefinition::Multipart(_) => {
            return Err(RenderError::UnresolvedMultipart(location.to_id()));
        }
    };

    // `min_by_key` keeps the first of equal minimums.
    let (selector, alternates) = variants
        .iter()
        .min_by_key(|(selector, _)| location.sort_variant(selector))
        .ok_or_else(|| {
            RenderError::BlockstateResolution(format!("{} has no variants", location.to_id()))
        })?;

    log::trace!("Selected variant \"{}\" for {}", selector, location);

    alternates
        .get(location.variant_index)
        .cloned()
        .ok_or_else(|| RenderError::VariantIndexOutOfRange {
            selector: selector.clone(),
            index: location.variant_index,
            len: alternates.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::{MemoryLoader, ResourcePath};
    use serde_json::json;

    fn definition(json: serde_json::Value) -> BlockstateDefinition {
        serde_json::from_value(json).unwrap()
    }

    fn campfire() -> BlockstateDefinition {
        definition(json!({
            "variants": {
                "facing=north,lit=true": {"model": "block/campfire"},
                "facing=north,lit=false": {"model": "block/campfire_off"},
                "facing=west,lit=true": {"model": "block/campfire", "y": 90},
                "facing=west,lit=false": {"model": "block/campfire_off", "y": 90}
            }
        }))
    }

    #[test]
    fn test_select_builtin_preference() {
        let loc = ResourceLocation::parse("campfire").unwrap();
        let variant = select_variant(&campfire(), &loc).unwrap();
        assert_eq!(variant.model, "block/campfire_off");
        assert_eq!(variant.y, 90);
    }

    #[test]
    fn test_select_caller_preference() {
        let loc = ResourceLocation::from_identifier("campfire[lit=true]").unwrap();
        let variant = select_variant(&campfire(), &loc).unwrap();
        assert_eq!(variant.model, "block/campfire");
        // facing=west breaks the tie between the two lit=true selectors
        assert_eq!(variant.y, 90);
    }

    #[test]
    fn test_ties_resolve_to_file_order() {
        let def = definition(json!({
            "variants": {
                "age=0": {"model": "block/wheat_stage0"},
                "age=1": {"model": "block/wheat_stage1"}
            }
        }));
        let loc = ResourceLocation::parse("wheat").unwrap();
        for _ in 0..5 {
            assert_eq!(select_variant(&def, &loc).unwrap().model, "block/wheat_stage0");
        }
    }

    #[test]
    fn test_variant_index() {
        let def = definition(json!({
            "variants": {
                "": [{"model": "block/stone"}, {"model": "block/stone_mirrored"}]
            }
        }));
        let loc = ResourceLocation::from_identifier("stone(1)").unwrap();
        assert_eq!(select_variant(&def, &loc).unwrap().model, "block/stone_mirrored");

        let loc = ResourceLocation::from_identifier("stone(2)").unwrap();
        match select_variant(&def, &loc) {
            Err(RenderError::VariantIndexOutOfRange { selector, index, len }) => {
                assert_eq!(selector, "");
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_multipart_is_rejected() {
        let def = definition(json!({"multipart": [{"apply": {"model": "block/fence_post"}}]}));
        let loc = ResourceLocation::parse("oak_fence").unwrap();
        assert!(matches!(
            select_variant(&def, &loc),
            Err(RenderError::UnresolvedMultipart(ref id)) if id == "minecraft:oak_fence"
        ));
    }

    #[test]
    fn test_empty_variants() {
        let def = definition(json!({"variants": {}}));
        let loc = ResourceLocation::parse("nothing").unwrap();
        assert!(matches!(
            select_variant(&def, &loc),
            Err(RenderError::BlockstateResolution(_))
        ));
    }

    #[test]
    fn test_resolver_missing_blockstate() {
        let pack = ResourcePack::new(MemoryLoader::new());
        let resolver = StateResolver::new(&pack);
        let loc = ResourceLocation::parse("block/stone").unwrap();
        assert_eq!(resolver.resolve(&loc).unwrap(), None);
    }

    #[test]
    fn test_resolver_with_blockstate() {
        let loc = ResourceLocation::parse("stone").unwrap();
        let mem = MemoryLoader::new().with_json(
            &ResourcePath::blockstate(&loc).unwrap(),
            json!({"variants": {"": {"model": "block/stone"}}}),
        );
        let pack = ResourcePack::new(mem);
        let variant = StateResolver::new(&pack).resolve(&loc).unwrap().unwrap();
        assert_eq!(variant.model, "block/stone");
    }
}
