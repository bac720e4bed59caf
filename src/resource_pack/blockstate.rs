//! Blockstate definition parsing.
//!
//! Blockstates define how block properties map to model variants.
//! There are two formats: "variants" and "multipart". Only the first one
//! can be rendered; multipart definitions are kept as raw JSON so callers
//! can report them.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A blockstate definition from blockstates/*.json.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockstateDefinition {
    /// Selector strings mapped to alternative models, in file order.
    Variants(Vec<(String, Vec<ModelVariant>)>),
    /// Conditional parts, unparsed.
    Multipart(Vec<Value>),
}

impl BlockstateDefinition {
    pub fn is_multipart(&self) -> bool {
        matches!(self, BlockstateDefinition::Multipart(_))
    }

    /// Iterate selectors in file order. Empty for multipart.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        let variants: &[(String, Vec<ModelVariant>)] = match self {
            BlockstateDefinition::Variants(v) => v,
            BlockstateDefinition::Multipart(_) => &[],
        };
        variants.iter().map(|(selector, _)| selector.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockstateDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBlockstate {
            // serde_json's `preserve_order` keeps the file's key order here.
            variants: Option<Map<String, Value>>,
            multipart: Option<Vec<Value>>,
        }

        let raw = RawBlockstate::deserialize(deserializer)?;

        if let Some(variants) = raw.variants {
            let parsed = variants
                .into_iter()
                .map(|(selector, value)| {
                    let value: VariantValue = serde_json::from_value(value).map_err(|e| {
                        D::Error::custom(format!("variant \"{}\": {}", selector, e))
                    })?;
                    Ok((selector, value.into_vec()))
                })
                .collect::<Result<Vec<_>, D::Error>>()?;
            Ok(BlockstateDefinition::Variants(parsed))
        } else if let Some(multipart) = raw.multipart {
            Ok(BlockstateDefinition::Multipart(multipart))
        } else {
            Ok(BlockstateDefinition::Variants(Vec::new()))
        }
    }
}

/// A variant value can be a single model or an array of weighted models.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum VariantValue {
    Single(ModelVariant),
    Multiple(Vec<ModelVariant>),
}

impl VariantValue {
    fn into_vec(self) -> Vec<ModelVariant> {
        match self {
            VariantValue::Single(v) => vec![v],
            VariantValue::Multiple(v) => v,
        }
    }
}

/// A model variant reference with optional rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Model resource location (e.g., "block/stone" or "minecraft:block/stone").
    pub model: String,
    /// X rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub y: i32,
    /// If true, UV coordinates don't rotate with the block.
    #[serde(default)]
    pub uvlock: bool,
    /// Weight for random selection (default 1). Parsed but not used for selection.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ModelVariant {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            x: 0,
            y: 0,
            uvlock: false,
            weight: default_weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_variants() {
        let json = r#"{
            "variants": {
                "": { "model": "block/stone" }
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        match def {
            BlockstateDefinition::Variants(variants) => {
                assert_eq!(variants.len(), 1);
                assert_eq!(variants[0].0, "");
                assert_eq!(variants[0].1[0], ModelVariant::new("block/stone"));
            }
            _ => panic!("Expected variants"),
        }
    }

    #[test]
    fn test_variants_keep_file_order() {
        let json = r#"{
            "variants": {
                "lit=true,facing=north": { "model": "block/campfire" },
                "lit=false,facing=north": { "model": "block/campfire_off" },
                "lit=true,facing=east": { "model": "block/campfire", "y": 90 },
                "lit=false,facing=east": { "model": "block/campfire_off", "y": 90 }
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        let selectors: Vec<&str> = def.selectors().collect();
        assert_eq!(
            selectors,
            vec![
                "lit=true,facing=north",
                "lit=false,facing=north",
                "lit=true,facing=east",
                "lit=false,facing=east",
            ]
        );
    }

    #[test]
    fn test_parse_variant_with_rotation() {
        let json = r#"{
            "variants": {
                "facing=east": { "model": "block/furnace", "y": 90 },
                "facing=up": { "model": "block/furnace", "x": 270, "uvlock": true }
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        if let BlockstateDefinition::Variants(variants) = def {
            assert_eq!(variants[0].1[0].y, 90);
            assert_eq!(variants[1].1[0].x, 270);
            assert!(variants[1].1[0].uvlock);
        } else {
            panic!("Expected variants");
        }
    }

    #[test]
    fn test_parse_weighted_list() {
        let json = r#"{
            "variants": {
                "": [
                    { "model": "block/stone" },
                    { "model": "block/stone_mirrored", "weight": 3 }
                ]
            }
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        if let BlockstateDefinition::Variants(variants) = def {
            assert_eq!(variants[0].1.len(), 2);
            assert_eq!(variants[0].1[0].weight, 1);
            assert_eq!(variants[0].1[1].weight, 3);
        } else {
            panic!("Expected variants");
        }
    }

    #[test]
    fn test_parse_multipart() {
        let json = r#"{
            "multipart": [
                { "apply": { "model": "block/fence_post" } },
                { "when": { "north": "true" }, "apply": { "model": "block/fence_side", "uvlock": true } }
            ]
        }"#;

        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        assert!(def.is_multipart());
        assert_eq!(def.selectors().count(), 0);
    }

    #[test]
    fn test_parse_bad_variant_names_selector() {
        let json = r#"{ "variants": { "facing=north": { "y": 90 } } }"#;
        let err = serde_json::from_str::<BlockstateDefinition>(json).unwrap_err();
        assert!(err.to_string().contains("facing=north"));
    }
}
