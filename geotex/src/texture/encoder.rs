//! TextureEncoder trait and the PNG implementation.
//!
//! # Example
//!
//! ```
//! use geotex::texture::{PngTextureEncoder, TextureEncoder};
//! use image::RgbaImage;
//! use std::sync::Arc;
//!
//! let encoder: Arc<dyn TextureEncoder> = Arc::new(PngTextureEncoder::new());
//! let bytes = encoder.encode(&RgbaImage::new(16, 16)).unwrap();
//! assert_eq!(&bytes[1..4], b"PNG");
//! assert_eq!(encoder.extension(), "png");
//! ```

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, RgbaImage};

use super::TextureError;

/// Trait for texture encoding strategies.
///
/// Implementations must be `Send + Sync` so one encoder can serve textures
/// produced on several threads.
pub trait TextureEncoder: Send + Sync {
    /// Encodes an RGBA image into complete file bytes.
    ///
    /// # Errors
    ///
    /// Returns `TextureError` if the image is empty or the encoder fails.
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError>;

    /// File extension without the leading dot.
    fn extension(&self) -> &str;

    fn name(&self) -> &str;
}

impl<T: TextureEncoder + ?Sized> TextureEncoder for Arc<T> {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError> {
        (**self).encode(image)
    }

    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Lossless PNG output, keeping the alpha channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngTextureEncoder;

impl PngTextureEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl TextureEncoder for PngTextureEncoder {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }

    fn extension(&self) -> &str {
        "png"
    }

    fn name(&self) -> &str {
        "PNG RGBA"
    }
}
