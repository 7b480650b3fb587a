//! Render command - rasterize one tile of a layer to a PNG file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use geotex::config::ConfigFile;
use geotex::coord::TileCoord;
use geotex::layer::{FileFetcher, LayerDescriptor, LayerLoader};
use geotex::provider::{Command, TextureProvider, VectorToColorProvider};
use geotex::raster::RenderOutcome;
use geotex::texture::{PngTextureEncoder, TextureEncoder};
use geotex::tile::Tile;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CliError;

/// Arguments for the render command.
pub struct RenderArgs {
    /// Layer descriptor JSON; relative source URLs resolve against its directory
    pub layer: PathBuf,
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
    pub output: PathBuf,
}

/// Run the render command.
pub async fn run(
    args: RenderArgs,
    config: &ConfigFile,
    cancellation: CancellationToken,
) -> Result<(), CliError> {
    let coord = TileCoord::new(args.y, args.x, args.zoom).map_err(CliError::InvalidTile)?;
    let descriptor = read_descriptor(&args.layer)?;
    let base_dir = args
        .layer
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let layer = LayerLoader::new(FileFetcher::with_base_dir(base_dir))
        .with_defaults(config.layer)
        .load(descriptor, cancellation)
        .await?;

    let tile = Tile::from_coord(coord);
    println!("Rendering tile {} from layer '{}'", coord, layer.id());

    let start = Instant::now();
    let provider = VectorToColorProvider::new(config.raster);
    let outcome = provider
        .execute(Command::new(tile, Arc::clone(&layer)))
        .await?;

    let result = match outcome {
        RenderOutcome::Rendered(result) => result,
        RenderOutcome::Skipped(reason) => {
            println!("No texture produced: {:?}", reason);
            return Ok(());
        }
    };
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Tile rendered"
    );

    let encoder = PngTextureEncoder::new();
    let bytes = encoder.encode(&result.texture)?;
    std::fs::write(&args.output, &bytes).map_err(|error| CliError::FileWrite {
        path: args.output.display().to_string(),
        error,
    })?;

    println!(
        "Wrote {} ({} bytes, {})",
        args.output.display(),
        bytes.len(),
        encoder.name()
    );
    Ok(())
}

fn read_descriptor(path: &Path) -> Result<LayerDescriptor, CliError> {
    let descriptor_error = |reason: String| CliError::Descriptor {
        path: path.display().to_string(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| descriptor_error(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| descriptor_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[{
        "type":"Feature","properties":{},
        "geometry":{"type":"Polygon","coordinates":[[[-170,-80],[170,-80],[170,80],[-170,80],[-170,-80]]]}
    }]}"#;

    fn write_layer(dir: &Path) -> PathBuf {
        std::fs::write(dir.join("land.geojson"), GEOJSON).unwrap();
        let descriptor = dir.join("land.json");
        std::fs::write(
            &descriptor,
            r#"{"id":"land","type":"color","url":"land.geojson","projection":"EPSG:4326",
               "style":{"fill":"green"},"options":{"zoom":{"min":0,"max":10}}}"#,
        )
        .unwrap();
        descriptor
    }

    #[tokio::test]
    async fn test_render_writes_png() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("tile.png");
        let args = RenderArgs {
            layer: write_layer(temp_dir.path()),
            x: 1,
            y: 1,
            zoom: 2,
            output: output.clone(),
        };

        run(args, &ConfigFile::default(), CancellationToken::new())
            .await
            .unwrap();

        let image = image::open(&output).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (256, 256));
    }

    #[tokio::test]
    async fn test_invalid_tile() {
        let temp_dir = TempDir::new().unwrap();
        let args = RenderArgs {
            layer: write_layer(temp_dir.path()),
            x: 9,
            y: 0,
            zoom: 2,
            output: temp_dir.path().join("tile.png"),
        };
        let err = run(args, &ConfigFile::default(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidTile(_)));
    }

    #[test]
    fn test_read_descriptor_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        match read_descriptor(&path) {
            Err(CliError::Descriptor { path: p, .. }) => assert!(p.ends_with("broken.json")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
