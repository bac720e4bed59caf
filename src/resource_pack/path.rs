//! Asset paths inside a resource pack and combined-identifier splitting.

use crate::error::{RenderError, Result};
use crate::types::resource_location::{is_valid_namespace, is_valid_path, ResourceLocation};
use std::fmt;

/// Asset category directory under `assets/<namespace>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Blockstates,
    Models,
    Textures,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Blockstates => "blockstates",
            AssetKind::Models => "models",
            AssetKind::Textures => "textures",
        }
    }

    /// Parse a directory name back into a kind.
    pub fn from_dir(dir: &str) -> Option<Self> {
        match dir {
            "blockstates" => Some(AssetKind::Blockstates),
            "models" => Some(AssetKind::Models),
            "textures" => Some(AssetKind::Textures),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated asset address: `namespace/kind/identifier.suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    pub namespace: String,
    pub kind: AssetKind,
    pub identifier: String,
    pub suffix: String,
}

impl ResourcePath {
    /// Address the asset for `location` of the given kind and file suffix.
    pub fn new(kind: AssetKind, suffix: &str, location: &ResourceLocation) -> Result<Self> {
        if !is_valid_namespace(&location.namespace) || !is_valid_path(&location.path) {
            return Err(RenderError::Validation(location.to_id()));
        }
        Ok(Self {
            namespace: location.namespace.clone(),
            kind,
            identifier: location.path.clone(),
            suffix: suffix.to_string(),
        })
    }

    pub fn blockstate(location: &ResourceLocation) -> Result<Self> {
        Self::new(AssetKind::Blockstates, "json", location)
    }

    pub fn model(location: &ResourceLocation) -> Result<Self> {
        Self::new(AssetKind::Models, "json", location)
    }

    pub fn texture(location: &ResourceLocation) -> Result<Self> {
        Self::new(AssetKind::Textures, "png", location)
    }

    pub fn texture_meta(location: &ResourceLocation) -> Result<Self> {
        Self::new(AssetKind::Textures, "png.mcmeta", location)
    }

    /// Path relative to a pack root, e.g. `assets/minecraft/models/block/stone.json`.
    pub fn file_path(&self) -> String {
        format!("assets/{}", self)
    }

    /// Inverse of [`ResourcePath::file_path`]. Returns `None` for anything
    /// outside `assets/<namespace>/<kind>/`.
    pub fn from_file_path(file_path: &str) -> Option<Self> {
        let parts: Vec<&str> = file_path.splitn(4, '/').collect();
        if parts.len() < 4 || parts[0] != "assets" {
            return None;
        }
        let kind = AssetKind::from_dir(parts[2])?;
        let (identifier, suffix) = match parts[3].strip_suffix(".png.mcmeta") {
            Some(identifier) => (identifier, "png.mcmeta"),
            None => parts[3].rsplit_once('.')?,
        };
        Some(Self {
            namespace: parts[1].to_string(),
            kind,
            identifier: identifier.to_string(),
            suffix: suffix.to_string(),
        })
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}.{}",
            self.namespace, self.kind, self.identifier, self.suffix
        )
    }
}

/// Pieces of a combined identifier `base[sel1,sel2](n)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIdentifier {
    pub base: String,
    pub selectors: Vec<String>,
    pub index: Option<usize>,
}

/// Split a combined identifier. The `[...]` and `(...)` groups are each
/// optional but must appear in that order at the end of the string.
pub fn parse_identifier(raw: &str) -> Result<ParsedIdentifier> {
    let malformed = || RenderError::Parse(format!("Malformed identifier: {}", raw));
    let mut rest = raw.trim();

    let mut index = None;
    if let Some(head) = rest.strip_suffix(')') {
        let open = head.rfind('(').ok_or_else(malformed)?;
        let digits = &head[open + 1..];
        index = Some(digits.parse::<usize>().map_err(|_| malformed())?);
        rest = &head[..open];
    }

    let mut selectors = Vec::new();
    if let Some(head) = rest.strip_suffix(']') {
        let open = head.find('[').ok_or_else(malformed)?;
        for selector in head[open + 1..].split(',') {
            let selector = selector.trim();
            if selector.contains(['[', ']', '(', ')']) {
                return Err(malformed());
            }
            if !selector.is_empty() {
                selectors.push(selector.to_string());
            }
        }
        rest = &head[..open];
    }

    if rest.is_empty() || rest.contains(['[', ']', '(', ')']) {
        return Err(malformed());
    }

    Ok(ParsedIdentifier {
        base: rest.to_string(),
        selectors,
        index,
    })
}
