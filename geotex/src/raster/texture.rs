//! Render results.

use glam::Vec3;
use image::RgbaImage;

use crate::extent::Extent;

/// Where a texture sits: the tile extent in the layer projection, and the zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureCoords {
    pub extent: Extent,
    pub zoom: u8,
}

/// A rendered tile texture. Owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureResult {
    /// `TEXTURE_SIZE` x `TEXTURE_SIZE` RGBA bitmap, not premultiplied
    pub texture: RgbaImage,
    /// Always (0, 0, 1): the texture covers the whole tile
    pub pitch: Vec3,
    /// Extent of the tile the texture was rendered for
    pub extent: Extent,
    pub coords: TextureCoords,
}

/// Why a render produced no texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The tile has no surface to attach a texture to.
    NoSurface,
    /// The layer is not a color layer.
    NotColorLayer,
}

/// Outcome of a successful render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Rendered(TextureResult),
    Skipped(SkipReason),
}

impl RenderOutcome {
    pub fn texture(&self) -> Option<&TextureResult> {
        match self {
            RenderOutcome::Rendered(result) => Some(result),
            RenderOutcome::Skipped(_) => None,
        }
    }

    pub fn into_texture(self) -> Option<TextureResult> {
        match self {
            RenderOutcome::Rendered(result) => Some(result),
            RenderOutcome::Skipped(_) => None,
        }
    }
}
