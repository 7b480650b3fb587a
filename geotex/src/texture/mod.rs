//! Texture encoding.
//!
//! Rendered textures are plain RGBA bitmaps. A [`TextureEncoder`] turns one
//! into file bytes for callers that persist or ship textures.

mod encoder;

pub use encoder::{PngTextureEncoder, TextureEncoder};

use thiserror::Error;

/// Errors that can occur while encoding a texture.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Encoding failed: {0}")]
    Encoding(#[from] image::ImageError),
}
