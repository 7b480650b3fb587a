//! Vector layers to color textures.

use tokio::task::spawn_blocking;
use tracing::{debug, instrument};

use super::types::{Command, ProviderError, TextureProvider};
use crate::config::RasterConfig;
use crate::format::VectorFormat;
use crate::raster::{Rasterizer, RenderOutcome};

/// Serves `vector/kml`, `vector/gpx` and `vector/geojson` commands by
/// rasterizing the layer into the tile's color texture.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorToColorProvider {
    rasterizer: Rasterizer,
}

impl VectorToColorProvider {
    pub fn new(config: RasterConfig) -> Self {
        Self {
            rasterizer: Rasterizer::new(config),
        }
    }

    async fn color_texture(&self, command: Command) -> Result<RenderOutcome, ProviderError> {
        let rasterizer = self.rasterizer;
        let Command {
            requester, layer, ..
        } = command;

        // Move the CPU-intensive rasterization to a blocking task
        let outcome = spawn_blocking(move || rasterizer.render(&requester, &layer))
            .await
            .map_err(|e| ProviderError::Internal(format!("render task panicked: {}", e)))??;

        match &outcome {
            RenderOutcome::Rendered(result) => debug!(
                width = result.texture.width(),
                height = result.texture.height(),
                "Texture rendered"
            ),
            RenderOutcome::Skipped(reason) => debug!(?reason, "Texture skipped"),
        }
        Ok(outcome)
    }
}

impl TextureProvider for VectorToColorProvider {
    #[instrument(
        skip(self, command),
        fields(
            layer = command.layer.id(),
            mimetype = %command.mimetype,
            level = command.requester.level()
        )
    )]
    async fn execute(&self, command: Command) -> Result<RenderOutcome, ProviderError> {
        let format: VectorFormat = command
            .mimetype
            .parse()
            .map_err(|_| ProviderError::UnsupportedMimetype(command.mimetype.clone()))?;

        match format {
            VectorFormat::Kml | VectorFormat::Gpx | VectorFormat::GeoJson => {
                self.color_texture(command).await
            }
        }
    }

    fn name(&self) -> &str {
        "vector-to-color"
    }

    fn supports(&self, mimetype: &str) -> bool {
        mimetype.parse::<VectorFormat>().is_ok()
    }
}
