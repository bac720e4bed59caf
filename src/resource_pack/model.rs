//! Block model parsing and layered merging.
//!
//! Block models define the 3D geometry of blocks using cuboid elements.
//! Every top-level field is optional so that a partial model in an
//! inheritance chain only contributes what it actually declares.

use crate::error::Result;
use crate::types::{BoundingBox, Direction, ElementRotation, ResourceLocation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A parsed block model from models/*.json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockModel {
    /// Parent model to inherit from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Whether to use ambient occlusion.
    #[serde(
        default,
        rename = "ambientocclusion",
        skip_serializing_if = "Option::is_none"
    )]
    pub ambient_occlusion: Option<bool>,

    /// Texture variable definitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textures: Option<HashMap<String, TextureRef>>,

    /// Model elements (cuboids).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ModelElement>>,

    /// Display transforms keyed by context (`gui`, `ground`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
}

impl BlockModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the parent reference, if any.
    pub fn parent_location(&self) -> Option<Result<ResourceLocation>> {
        self.parent.as_deref().map(ResourceLocation::parse)
    }

    /// Check if this model has its own elements (not inherited).
    pub fn has_elements(&self) -> bool {
        self.elements.as_ref().is_some_and(|e| !e.is_empty())
    }

    pub fn has_textures(&self) -> bool {
        self.textures.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Whether the model carries a `display.gui` transform.
    pub fn has_gui_display(&self) -> bool {
        self.display
            .as_ref()
            .and_then(|d| d.get("gui"))
            .is_some()
    }

    /// Offset from `display.gui.translation`; zero when absent or not a
    /// three-number array.
    pub fn gui_translation(&self) -> [f32; 3] {
        self.display
            .as_ref()
            .and_then(|d| d.get("gui"))
            .and_then(|gui| gui.get("translation"))
            .and_then(|t| <[f32; 3]>::deserialize(t).ok())
            .unwrap_or([0.0; 3])
    }

    /// Elements, or an empty slice when none are declared.
    pub fn elements(&self) -> &[ModelElement] {
        self.elements.as_deref().unwrap_or(&[])
    }

    /// Look up a texture variable without following aliases.
    pub fn texture_variable(&self, name: &str) -> Option<&TextureRef> {
        self.textures.as_ref().and_then(|t| t.get(name))
    }
}

/// Returns true for engine-provided parents such as `builtin/generated`,
/// which have no JSON and end an inheritance chain.
pub fn is_builtin_parent(parent: &str) -> bool {
    let path = parent.split_once(':').map_or(parent, |(_, path)| path);
    path.starts_with("builtin/")
}

/// Merge `overlay` into `base`: objects merge key by key, recursively;
/// arrays and scalars in `overlay` replace what `base` had.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// A texture slot value: either a texture id or a `#`-prefixed variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextureRef {
    /// A texture resource id such as `block/stone`.
    Literal(String),
    /// Another variable in the model's `textures` map (without the `#`).
    Alias(String),
}

impl From<String> for TextureRef {
    fn from(raw: String) -> Self {
        match raw.strip_prefix('#') {
            Some(name) => TextureRef::Alias(name.to_string()),
            None => TextureRef::Literal(raw),
        }
    }
}

impl From<&str> for TextureRef {
    fn from(raw: &str) -> Self {
        TextureRef::from(raw.to_string())
    }
}

impl From<TextureRef> for String {
    fn from(texture: TextureRef) -> Self {
        texture.to_string()
    }
}

impl fmt::Display for TextureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureRef::Literal(id) => f.write_str(id),
            TextureRef::Alias(name) => write!(f, "#{}", name),
        }
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelElement {
    /// First corner (0-16 range).
    pub from: [f32; 3],
    /// Opposite corner (0-16 range).
    pub to: [f32; 3],
    /// Optional rotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<ElementRotation>,
    /// Whether this element receives shade.
    #[serde(default = "default_shade")]
    pub shade: bool,
    /// Face definitions.
    #[serde(default)]
    pub faces: HashMap<Direction, ModelFace>,
}

fn default_shade() -> bool {
    true
}

impl ModelElement {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_corners(self.from, self.to)
    }

    /// Get the size of this element in Minecraft coordinates (0-16).
    pub fn size(&self) -> [f32; 3] {
        self.bounds().dimensions()
    }

    /// Get the center of this element in Minecraft coordinates.
    pub fn center(&self) -> [f32; 3] {
        self.bounds().center()
    }
}

/// A face of a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv: Option<[f32; 4]>,
    /// Texture reference (e.g., "#side" or "block/stone").
    pub texture: TextureRef,
    /// Face direction for culling (if adjacent block is opaque, hide this face).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cullface: Option<Direction>,
    /// UV rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub rotation: i32,
    /// Tint index for biome coloring (-1 = no tint).
    #[serde(default = "default_tint_index")]
    pub tintindex: i32,
}

fn default_tint_index() -> i32 {
    -1
}
