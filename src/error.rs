//! Error types for block resolution and rendering.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias using RenderError.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Which part of a compiled model was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompleteCause {
    /// No `display.gui` transform and nothing to draw.
    NoDisplay,
    /// The compiled model has no elements.
    NoElements,
    /// The compiled model has no texture variables.
    NoTextures,
}

impl fmt::Display for IncompleteCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteCause::NoDisplay => write!(f, "no gui display metadata"),
            IncompleteCause::NoElements => write!(f, "no elements"),
            IncompleteCause::NoTextures => write!(f, "no textures"),
        }
    }
}

/// Main error type for block rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Malformed resource location or combined identifier string.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Identifier does not satisfy the resource location grammar.
    #[error("\"{0}\" is not a valid resource location")]
    Validation(String),

    /// The loader could not supply a requested path.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Blockstate uses the multipart format.
    #[error("Multipart blockstate is not supported: {0}")]
    UnresolvedMultipart(String),

    /// Failed to resolve a blockstate.
    #[error("Blockstate resolution error: {0}")]
    BlockstateResolution(String),

    /// Requested variant index is past the end of a variant list.
    #[error("Variant index {index} out of range for \"{selector}\" ({len} alternates)")]
    VariantIndexOutOfRange {
        selector: String,
        index: usize,
        len: usize,
    },

    /// Model inheritance chain too deep or circular.
    #[error("Model inheritance too deep (possible circular reference): {0}")]
    ModelInheritanceTooDeep(String),

    /// Texture reference could not be resolved to a literal texture id.
    #[error("Unresolved texture reference: {0}")]
    UnresolvedTexture(String),

    /// Compiled model cannot be rendered.
    #[error("Incomplete model {id}: {cause}")]
    IncompleteModel { id: String, cause: IncompleteCause },

    /// Texture data is unusable (e.g. animation strip with bad dimensions).
    #[error("Invalid texture {0}")]
    InvalidTexture(String),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frames cannot be combined into one output image.
    #[error("Encoding error: {0}")]
    Encode(String),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to encode an animated PNG.
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    /// Failed to read or parse a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A memoized failure replayed from the loader cache.
    #[error(transparent)]
    Shared(Arc<RenderError>),
}

impl RenderError {
    /// True for errors that mean "this source has no such resource".
    pub fn is_not_found(&self) -> bool {
        match self {
            RenderError::NotFound(_) => true,
            RenderError::Shared(inner) => inner.is_not_found(),
            _ => false,
        }
    }
}
