//! Provider types and traits

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::extent::Extent;
use crate::layer::PreparedLayer;
use crate::raster::{RenderError, RenderOutcome};
use crate::tile::Tile;

/// Errors that can occur while serving a texture command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// No route for this mimetype
    #[error("Unsupported mimetype: {0}")]
    UnsupportedMimetype(String),

    /// The tile is outside the layer's zoom range or extent
    #[error("Tile at level {level} ({tile}) is outside layer limits ({layer})")]
    TileOutOfBounds {
        tile: Extent,
        layer: Extent,
        level: u8,
    },

    /// Rendering task failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RenderError> for ProviderError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::TileOutOfBounds { tile, layer, level } => {
                ProviderError::TileOutOfBounds { tile, layer, level }
            }
            other => ProviderError::Internal(other.to_string()),
        }
    }
}

/// A texture request for one tile from one layer.
#[derive(Debug, Clone)]
pub struct Command {
    /// The tile asking for a texture
    pub requester: Tile,
    pub layer: Arc<PreparedLayer>,
    /// Route, e.g. `"vector/kml"`
    pub mimetype: String,
}

impl Command {
    /// Creates a command routed by the layer's detected format.
    pub fn new(requester: Tile, layer: Arc<PreparedLayer>) -> Self {
        let mimetype = layer.format().mimetype().to_string();
        Self {
            requester,
            layer,
            mimetype,
        }
    }

    /// Overrides the route.
    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = mimetype.into();
        self
    }
}

/// Async trait for texture providers.
///
/// Every call is independent; implementations hold no per-request state and
/// may serve any number of commands concurrently.
pub trait TextureProvider: Send + Sync {
    /// Serves one command.
    ///
    /// # Returns
    ///
    /// [`RenderOutcome::Rendered`] with the texture, or
    /// [`RenderOutcome::Skipped`] when the tile takes no texture from this
    /// layer.
    fn execute(
        &self,
        command: Command,
    ) -> impl Future<Output = Result<RenderOutcome, ProviderError>> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;

    /// Checks if this provider has a route for `mimetype`.
    fn supports(&self, mimetype: &str) -> bool;
}
