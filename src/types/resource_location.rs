//! Block identities and variant preference scoring.

use crate::error::{RenderError, Result};
use crate::resource_pack::path::parse_identifier;
use std::fmt;

/// Namespace used when an identifier omits one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Built-in selector preferences, each worth one point.
const PREFERRED_VARIANTS: [&str; 7] = [
    "facing=west",
    "axis=y",
    "face=wall",
    "attachment=floor",
    "lit=false",
    "powered=false",
    "shape=straight",
];

/// Weight of a caller-supplied preference; dominates every built-in.
const CALLER_PREFERENCE_WEIGHT: i32 = 100;

/// A parsed `namespace:path` identity plus variant preferences.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocation {
    pub namespace: String,
    pub path: String,
    /// Selector substrings the caller wants (e.g. `lit=true`).
    pub preferred_variants: Vec<String>,
    /// Index into a list-valued variant.
    pub variant_index: usize,
}

impl ResourceLocation {
    /// Build from already-validated parts.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let path = path.into();
        if !is_valid_namespace(&namespace) || !is_valid_path(&path) {
            return Err(RenderError::Validation(format!("{}:{}", namespace, path)));
        }
        Ok(Self {
            namespace,
            path,
            preferred_variants: Vec::new(),
            variant_index: 0,
        })
    }

    /// Parse `namespace:path` or `path` (namespace defaults to `minecraft`).
    pub fn parse(raw: &str) -> Result<Self> {
        let (namespace, path) = match raw.split_once(':') {
            Some((namespace, path)) => (namespace, path),
            None => (DEFAULT_NAMESPACE, raw),
        };

        if !is_valid_namespace(namespace) || !is_valid_path(path) {
            return Err(RenderError::Parse(format!(
                "Invalid ResourceLocation: {}",
                raw
            )));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
            preferred_variants: Vec::new(),
            variant_index: 0,
        })
    }

    /// Parse the combined form `namespace:path[sel1,sel2](n)`.
    pub fn from_identifier(raw: &str) -> Result<Self> {
        let parsed = parse_identifier(raw)?;
        let mut location = Self::parse(&parsed.base)?;
        location.preferred_variants = parsed.selectors;
        location.variant_index = parsed.index.unwrap_or(0);
        Ok(location)
    }

    pub fn with_preferred_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_variants = variants.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_variant_index(mut self, index: usize) -> Self {
        self.variant_index = index;
        self
    }

    /// Same namespace, path with `suffix` appended, no preferences.
    pub fn with_path_suffix(&self, suffix: &str) -> Self {
        Self {
            namespace: self.namespace.clone(),
            path: format!("{}{}", self.path, suffix),
            preferred_variants: Vec::new(),
            variant_index: 0,
        }
    }

    /// Canonical `namespace:path`.
    pub fn to_id(&self) -> String {
        format!("{}:{}", self.namespace, self.path)
    }

    /// Tie-break score for a variant selector. Lower is better.
    pub fn sort_variant(&self, selector: &str) -> i32 {
        let mut score = 0;

        for preferred in PREFERRED_VARIANTS {
            if selector.contains(preferred) {
                score -= 1;
            }
        }

        for preferred in &self.preferred_variants {
            if selector.contains(preferred.as_str()) {
                score -= CALLER_PREFERENCE_WEIGHT;
            }
        }

        // Wall-mounted blocks look best facing the camera.
        if selector.contains("face=wall") && selector.contains("facing=east") {
            score -= 1;
        }

        score
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)?;
        if !self.preferred_variants.is_empty() {
            write!(f, "[{}]", self.preferred_variants.join(","))?;
        }
        if self.variant_index != 0 {
            write!(f, "({})", self.variant_index)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ResourceLocation {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_identifier(s)
    }
}

/// `[0-9a-z_.-]+`, excluding `.` and `..`.
pub fn is_valid_namespace(namespace: &str) -> bool {
    is_plain_segment(namespace)
        && namespace
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'_' | b'.' | b'-'))
}

/// `[0-9a-z_.-/]+` made of non-empty segments, none of them `.` or `..`.
///
/// Locations end up as file paths, so they must stay below the directory
/// they are joined onto.
pub fn is_valid_path(path: &str) -> bool {
    path.bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'_' | b'.' | b'-' | b'/'))
        && path.split('/').all(is_plain_segment)
}

fn is_plain_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_namespace() {
        let loc = ResourceLocation::parse("block/stone").unwrap();
        assert_eq!(loc.namespace, "minecraft");
        assert_eq!(loc.path, "block/stone");
        assert_eq!(loc.to_id(), "minecraft:block/stone");
    }

    #[test]
    fn test_parse_explicit_namespace() {
        let loc = ResourceLocation::parse("hexcasting:akashic_record").unwrap();
        assert_eq!(loc.namespace, "hexcasting");
        assert_eq!(loc.path, "akashic_record");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ResourceLocation::parse("").is_err());
        assert!(ResourceLocation::parse(":stone").is_err());
        assert!(ResourceLocation::parse("minecraft:").is_err());
        assert!(ResourceLocation::parse("Minecraft:Stone").is_err());
        assert!(ResourceLocation::parse("a:b:c").is_err());
        assert!(ResourceLocation::parse("my/mod:stone").is_err());
        assert!(matches!(
            ResourceLocation::parse("bad name"),
            Err(RenderError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_escaping_paths() {
        for raw in [
            "minecraft:../../x",
            "minecraft:block/../stone",
            "minecraft:./stone",
            "minecraft:/etc/passwd",
            "minecraft:block//stone",
            "minecraft:block/",
            "..:stone",
        ] {
            assert!(ResourceLocation::parse(raw).is_err(), "{} should be rejected", raw);
        }
        assert!(ResourceLocation::new("minecraft", "../x").is_err());
        // Dots inside a segment are fine.
        assert!(ResourceLocation::parse("minecraft:block/stone.v2").is_ok());
    }

    #[test]
    fn test_round_trip() {
        for raw in ["minecraft:stone", "create:block/cogwheel", "a.b-c:d_e/f.g"] {
            let loc = ResourceLocation::parse(raw).unwrap();
            assert_eq!(ResourceLocation::parse(&loc.to_id()).unwrap(), loc);
        }
    }

    #[test]
    fn test_from_identifier() {
        let loc = ResourceLocation::from_identifier("minecraft:campfire[lit=true](2)").unwrap();
        assert_eq!(loc.to_id(), "minecraft:campfire");
        assert_eq!(loc.preferred_variants, vec!["lit=true"]);
        assert_eq!(loc.variant_index, 2);
        assert_eq!(loc.to_string(), "minecraft:campfire[lit=true](2)");
    }

    #[test]
    fn test_display_omits_defaults() {
        let loc = ResourceLocation::parse("stone").unwrap();
        assert_eq!(loc.to_string(), "minecraft:stone");
    }

    #[test]
    fn test_sort_variant_builtins() {
        let loc = ResourceLocation::parse("furnace").unwrap();
        assert_eq!(loc.sort_variant("facing=north,lit=true"), 0);
        assert_eq!(loc.sort_variant("facing=west,lit=false"), -2);
    }

    #[test]
    fn test_sort_variant_caller_preference_dominates() {
        let loc = ResourceLocation::parse("campfire")
            .unwrap()
            .with_preferred_variants(["lit=true"]);
        let lit = loc.sort_variant("facing=north,lit=true");
        let unlit = loc.sort_variant("facing=west,lit=false");
        assert_eq!(lit, -100);
        assert_eq!(unlit, -2);
        assert!(lit < unlit);
    }

    #[test]
    fn test_sort_variant_wall_facing_east() {
        let loc = ResourceLocation::parse("lever").unwrap();
        // face=wall (-1) plus the wall/east bonus (-1)
        assert_eq!(loc.sort_variant("face=wall,facing=east"), -2);
        // face=wall (-1) plus facing=west (-1)
        assert_eq!(loc.sort_variant("face=wall,facing=west"), -2);
        assert_eq!(loc.sort_variant("face=floor,facing=east"), 0);
    }

    #[test]
    fn test_with_path_suffix() {
        let loc = ResourceLocation::parse("block/oak_button").unwrap();
        assert_eq!(
            loc.with_path_suffix("_inventory").to_id(),
            "minecraft:block/oak_button_inventory"
        );
    }
}
