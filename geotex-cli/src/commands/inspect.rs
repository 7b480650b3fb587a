//! Inspect command - load a layer source and summarize it.

use std::path::PathBuf;
use std::sync::Arc;

use geotex::config::ConfigFile;
use geotex::geometry::GeometryKind;
use geotex::layer::{
    FileFetcher, LayerDescriptor, LayerLoader, LayerOptions, LayerType, PreparedLayer,
};
use geotex::style::StyleOptions;
use tokio_util::sync::CancellationToken;

use crate::error::CliError;

/// Arguments for the inspect command.
pub struct InspectArgs {
    pub file: PathBuf,
    pub projection: String,
}

/// Run the inspect command.
pub async fn run(
    args: InspectArgs,
    config: &ConfigFile,
    cancellation: CancellationToken,
) -> Result<(), CliError> {
    let descriptor = descriptor_for(&args);
    let layer = LayerLoader::new(FileFetcher::new())
        .with_defaults(config.layer)
        .load(descriptor, cancellation)
        .await?;

    print!("{}", summary(&layer));
    Ok(())
}

fn descriptor_for(args: &InspectArgs) -> LayerDescriptor {
    let id = args
        .file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layer".to_string());
    LayerDescriptor {
        id,
        layer_type: LayerType::Color,
        url: args.file.to_string_lossy().into_owned(),
        projection: Some(args.projection.clone()),
        crs_file: None,
        extent: None,
        style: StyleOptions::default(),
        options: LayerOptions::default(),
    }
}

fn summary(layer: &Arc<PreparedLayer>) -> String {
    let geometry = layer.geometry();
    let zoom = layer.zoom();
    format!(
        "Layer:      {}\n\
         Format:     {}\n\
         Source CRS: {}\n\
         Projection: {}\n\
         Extent:     {}\n\
         Zoom:       {}-{}\n\
         Features:   {} ({} points, {} lines, {} polygons)\n",
        layer.id(),
        layer.format(),
        layer.crs_file(),
        layer.projection(),
        layer.extent(),
        zoom.min(),
        zoom.max(),
        geometry.features.len(),
        geometry.count(GeometryKind::Point),
        geometry.count(GeometryKind::Line),
        geometry.count(GeometryKind::Polygon),
    )
}
