//! One-time layer preprocessing.

use tracing::{debug, info};

use super::descriptor::{LayerType, RawLayerConfig};
use super::PreprocessError;
use crate::config::{LayerDefaults, ZoomRange};
use crate::extent::{Crs, Extent};
use crate::format::{self, VectorFormat};
use crate::geometry::{normalize, GeometryKind, NormalizeOptions, NormalizedGeometry};
use crate::style::{Color, Style};

/// A layer ready for tile rendering. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedLayer {
    id: String,
    layer_type: LayerType,
    format: VectorFormat,
    crs_file: Crs,
    projection: Crs,
    style: Style,
    zoom: ZoomRange,
    geometry: NormalizedGeometry,
    extent: Extent,
    no_texture_parent_outside_limit: bool,
}

impl PreparedLayer {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layer_type(&self) -> LayerType {
        self.layer_type
    }

    /// Format detected from the source content.
    pub fn format(&self) -> VectorFormat {
        self.format
    }

    /// Reference system of the source coordinates.
    pub fn crs_file(&self) -> Crs {
        self.crs_file
    }

    /// Reference system the geometry was normalized into.
    pub fn projection(&self) -> Crs {
        self.projection
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn zoom(&self) -> ZoomRange {
        self.zoom
    }

    pub fn geometry(&self) -> &NormalizedGeometry {
        &self.geometry
    }

    /// Area the layer covers; tiles outside it get no texture.
    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    /// Tiles outside the layer extent do not inherit their parent's texture.
    pub fn no_texture_parent_outside_limit(&self) -> bool {
        self.no_texture_parent_outside_limit
    }
}

/// Builds a [`PreparedLayer`] from its declaration.
///
/// Pure: the same input always yields the same layer.
pub fn preprocess(
    config: &RawLayerConfig,
    defaults: &LayerDefaults,
) -> Result<PreparedLayer, PreprocessError> {
    let source = config
        .file
        .as_ref()
        .ok_or(PreprocessError::MissingField("file"))?;
    let projection: Crs = config
        .projection
        .as_deref()
        .ok_or(PreprocessError::MissingField("projection"))?
        .parse()?;

    let document = format::read(source)?;

    let crs_file: Crs = match (&config.crs_file, document.format) {
        (Some(crs), _) => crs.parse()?,
        (None, VectorFormat::GeoJson) => match &document.declared_crs {
            Some(crs) => crs.parse()?,
            None => Crs::Wgs84,
        },
        (None, VectorFormat::Kml | VectorFormat::Gpx) => Crs::Wgs84,
    };

    let configured_extent = match config.extent {
        Some(bounds) => Extent::from_bounds(projection, bounds)?,
        None => Extent::world().to_crs(projection),
    };

    let zoom = config.zoom.unwrap_or_else(|| defaults.zoom());

    let mut style = Style::from_options(&config.style)?;
    if document.format == VectorFormat::Gpx && style.stroke.is_none() {
        style.stroke = Some(Color::RED);
    }

    let options = NormalizeOptions::new(crs_file, projection).with_extent_hint(configured_extent);
    let geometry = normalize(&document.geojson, &options)?;

    let extent = match document.format {
        VectorFormat::Gpx => document.declared_bounds.unwrap_or_else(Extent::world),
        VectorFormat::Kml | VectorFormat::GeoJson => geometry.extent,
    };

    debug!(
        layer = %config.id,
        format = %document.format,
        crs_file = %crs_file,
        points = geometry.count(GeometryKind::Point),
        lines = geometry.count(GeometryKind::Line),
        polygons = geometry.count(GeometryKind::Polygon),
        "Layer geometry normalized"
    );
    info!(
        layer = %config.id,
        format = %document.format,
        projection = %projection,
        extent = %extent,
        features = geometry.features.len(),
        "Layer prepared"
    );

    Ok(PreparedLayer {
        id: config.id.clone(),
        layer_type: config.layer_type,
        format: document.format,
        crs_file,
        projection,
        style,
        zoom,
        geometry,
        extent,
        no_texture_parent_outside_limit: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::Bounds;
    use crate::format::LayerSource;
    use crate::style::StyleOptions;
    use serde_json::json;

    fn geojson_point() -> LayerSource {
        LayerSource::Json(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "Point", "coordinates": [2.35, 48.85]}
            }]
        }))
    }

    fn prepare(config: &RawLayerConfig) -> Result<PreparedLayer, PreprocessError> {
        preprocess(config, &LayerDefaults::default())
    }

    #[test]
    fn test_missing_file() {
        let mut config = RawLayerConfig::new("a", geojson_point(), "EPSG:4326");
        config.file = None;
        assert_eq!(prepare(&config), Err(PreprocessError::MissingField("file")));
    }

    #[test]
    fn test_missing_projection() {
        let mut config = RawLayerConfig::new("a", geojson_point(), "EPSG:4326");
        config.projection = None;
        assert_eq!(
            prepare(&config),
            Err(PreprocessError::MissingField("projection"))
        );
    }

    #[test]
    fn test_unknown_projection() {
        let config = RawLayerConfig::new("a", geojson_point(), "EPSG:2154");
        assert!(matches!(prepare(&config), Err(PreprocessError::Extent(_))));
    }

    #[test]
    fn test_unsupported_json_type() {
        let source = LayerSource::Json(json!({"type": "Topology", "objects": {}}));
        let config = RawLayerConfig::new("a", source, "EPSG:4326");
        assert!(matches!(
            prepare(&config),
            Err(PreprocessError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_geojson_defaults() {
        let layer = prepare(&RawLayerConfig::new("a", geojson_point(), "EPSG:4326")).unwrap();
        assert_eq!(layer.format(), VectorFormat::GeoJson);
        assert_eq!(layer.crs_file(), Crs::Wgs84);
        assert_eq!(layer.zoom(), ZoomRange::new(5, 21).unwrap());
        assert!(layer.no_texture_parent_outside_limit());
        assert_eq!(layer.extent().west(), 2.35);
        assert_eq!(layer.extent().north(), 48.85);
        assert_eq!(layer.style(), &Style::default());
    }

    #[test]
    fn test_explicit_crs_file_wins() {
        let config = RawLayerConfig::new("a", geojson_point(), "EPSG:4326")
            .with_crs_file("EPSG:3857");
        let layer = prepare(&config).unwrap();
        assert_eq!(layer.crs_file(), Crs::WebMercator);
        // 2.35 meters east of the origin is a tiny fraction of a degree
        assert!(layer.extent().west().abs() < 1e-3);
    }

    #[test]
    fn test_legacy_geojson_crs() {
        let source = LayerSource::Json(json!({
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "EPSG:3857"}},
            "features": []
        }));
        let layer = prepare(&RawLayerConfig::new("a", source, "EPSG:4326")).unwrap();
        assert_eq!(layer.crs_file(), Crs::WebMercator);
    }

    #[test]
    fn test_projection_reprojects_geometry() {
        let layer = prepare(&RawLayerConfig::new("a", geojson_point(), "EPSG:3857")).unwrap();
        assert_eq!(layer.projection(), Crs::WebMercator);
        assert_eq!(layer.extent().crs(), Crs::WebMercator);
        assert!(layer.extent().west() > 261_000.0);
    }

    #[test]
    fn test_invalid_configured_extent() {
        let config = RawLayerConfig::new("a", geojson_point(), "EPSG:4326").with_extent(Bounds {
            west: 10.0,
            east: 0.0,
            south: 0.0,
            north: 1.0,
        });
        assert!(matches!(prepare(&config), Err(PreprocessError::Extent(_))));
    }

    #[test]
    fn test_invalid_style() {
        let config = RawLayerConfig::new("a", geojson_point(), "EPSG:4326").with_style(
            StyleOptions {
                fill: Some("very orange".into()),
                ..Default::default()
            },
        );
        assert!(matches!(
            prepare(&config),
            Err(PreprocessError::InvalidStyle(_))
        ));
    }

    #[test]
    fn test_gpx_defaults_to_red_stroke() {
        let source = LayerSource::Xml(r#"<gpx><wpt lat="1" lon="2"/></gpx>"#.into());
        let layer = prepare(&RawLayerConfig::new("a", source, "EPSG:4326")).unwrap();
        assert_eq!(layer.format(), VectorFormat::Gpx);
        assert_eq!(layer.style().stroke, Some(Color::RED));
        assert_eq!(layer.extent(), &Extent::world());
    }

    #[test]
    fn test_gpx_declared_bounds_win_over_geometry() {
        // track points lie well outside the declared bounds
        let gpx = r#"<gpx>
            <metadata><bounds minlon="1" maxlon="2" minlat="3" maxlat="4"/></metadata>
            <trk><trkseg>
                <trkpt lat="10" lon="20"/>
                <trkpt lat="11" lon="21"/>
            </trkseg></trk>
        </gpx>"#;
        for projection in ["EPSG:4326", "EPSG:3857"] {
            let source = LayerSource::Xml(gpx.into());
            let layer = prepare(&RawLayerConfig::new("a", source, projection)).unwrap();
            let extent = layer.extent();
            assert_eq!(extent.crs(), Crs::Wgs84, "{}", projection);
            assert_eq!(
                (extent.west(), extent.east(), extent.south(), extent.north()),
                (1.0, 2.0, 3.0, 4.0),
                "{}",
                projection
            );
            assert_ne!(&layer.geometry().extent, extent, "{}", projection);
        }
    }

    #[test]
    fn test_configured_zoom_and_defaults() {
        let source = geojson_point();
        let defaults = LayerDefaults::new().with_zoom(ZoomRange::new(1, 8).unwrap());
        let layer = preprocess(&RawLayerConfig::new("a", source.clone(), "EPSG:4326"), &defaults)
            .unwrap();
        assert_eq!(layer.zoom(), ZoomRange::new(1, 8).unwrap());

        let config = RawLayerConfig::new("a", source, "EPSG:4326")
            .with_zoom(ZoomRange::new(10, 12).unwrap());
        assert_eq!(preprocess(&config, &defaults).unwrap().zoom().min(), 10);
    }

    #[test]
    fn test_preprocess_twice_is_identical() {
        let config = RawLayerConfig::new("a", geojson_point(), "EPSG:3857");
        let first = prepare(&config).unwrap();
        let second = prepare(&config).unwrap();
        assert_eq!(first.geometry(), second.geometry());
        assert_eq!(first.extent(), second.extent());
    }
}
