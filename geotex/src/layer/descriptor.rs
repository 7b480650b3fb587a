//! Layer declarations.

use serde::{Deserialize, Serialize};

use crate::config::ZoomRange;
use crate::extent::Bounds;
use crate::format::LayerSource;
use crate::style::StyleOptions;

/// What a layer contributes to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// Drawn into the tile's color texture.
    Color,
    Elevation,
    Geometry,
    #[serde(other)]
    Other,
}

/// Per-layer options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<ZoomRange>,
}

/// A layer as declared by the application, in JSON:
///
/// ```json
/// {
///   "id": "trails",
///   "type": "color",
///   "url": "trails.kml",
///   "projection": "EPSG:4326",
///   "style": { "fill": "orange", "fillOpacity": 0.5, "stroke": "white" },
///   "options": { "zoom": { "min": 3, "max": 18 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Bounds>,
    #[serde(default)]
    pub style: StyleOptions,
    #[serde(default)]
    pub options: LayerOptions,
}

impl LayerDescriptor {
    /// Pairs the descriptor with its fetched content.
    pub fn into_raw(self, source: LayerSource) -> RawLayerConfig {
        RawLayerConfig {
            id: self.id,
            layer_type: self.layer_type,
            file: Some(source),
            projection: self.projection,
            crs_file: self.crs_file,
            extent: self.extent,
            style: self.style,
            zoom: self.options.zoom,
        }
    }
}

/// Input of [`preprocess`](super::preprocess).
#[derive(Debug, Clone, PartialEq)]
pub struct RawLayerConfig {
    pub id: String,
    pub layer_type: LayerType,
    /// Source content; required.
    pub file: Option<LayerSource>,
    /// Reference system the layer is rendered in; required.
    pub projection: Option<String>,
    /// Reference system of the source coordinates.
    pub crs_file: Option<String>,
    pub extent: Option<Bounds>,
    pub style: StyleOptions,
    pub zoom: Option<ZoomRange>,
}

impl RawLayerConfig {
    /// A color layer in `projection` reading `source`.
    pub fn new(id: impl Into<String>, source: LayerSource, projection: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer_type: LayerType::Color,
            file: Some(source),
            projection: Some(projection.into()),
            crs_file: None,
            extent: None,
            style: StyleOptions::default(),
            zoom: None,
        }
    }

    pub fn with_layer_type(mut self, layer_type: LayerType) -> Self {
        self.layer_type = layer_type;
        self
    }

    pub fn with_crs_file(mut self, crs: impl Into<String>) -> Self {
        self.crs_file = Some(crs.into());
        self
    }

    pub fn with_extent(mut self, extent: Bounds) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomRange) -> Self {
        self.zoom = Some(zoom);
        self
    }
}
