//! Input formats.
//!
//! A layer source is either XML text (KML, GPX) or a JSON value (GeoJSON).
//! [`read`] detects which format it is and converts it into a GeoJSON
//! document ready for normalization, along with whatever the format says
//! about its own reference system and bounds.

mod gpx;
mod kml;

use std::fmt;
use std::str::FromStr;

use geojson::GeoJson;
use roxmltree::Document;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::extent::{Extent, ExtentError};
use crate::geometry::GeometryError;

/// The closed set of vector formats a layer can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorFormat {
    Kml,
    Gpx,
    GeoJson,
}

impl VectorFormat {
    pub const ALL: [VectorFormat; 3] = [
        VectorFormat::Kml,
        VectorFormat::Gpx,
        VectorFormat::GeoJson,
    ];

    /// Mimetype used to route tile commands, e.g. `"vector/kml"`.
    pub fn mimetype(&self) -> &'static str {
        match self {
            VectorFormat::Kml => "vector/kml",
            VectorFormat::Gpx => "vector/gpx",
            VectorFormat::GeoJson => "vector/geojson",
        }
    }
}

impl FromStr for VectorFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.mimetype() == s)
            .ok_or_else(|| FormatError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for VectorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mimetype())
    }
}

/// Errors raised while detecting or converting a source document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Extent(#[from] ExtentError),
}

/// Raw layer content as handed over by the fetcher.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSource {
    /// XML text (KML or GPX).
    Xml(String),
    /// A parsed JSON value (GeoJSON).
    Json(JsonValue),
}

impl LayerSource {
    /// Classifies fetched text: markup is kept as XML, anything else must be JSON.
    pub fn from_text(text: impl Into<String>) -> Result<Self, FormatError> {
        let text = text.into();
        if text.trim_start().starts_with('<') {
            return Ok(LayerSource::Xml(text));
        }
        serde_json::from_str(&text)
            .map(LayerSource::Json)
            .map_err(|e| FormatError::UnsupportedFormat(format!("not XML or JSON: {}", e)))
    }
}

/// A source document converted to GeoJSON.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    pub format: VectorFormat,
    pub geojson: GeoJson,
    /// Reference system named by the document itself (legacy GeoJSON `crs`).
    pub declared_crs: Option<String>,
    /// Bounds declared by the document (GPX `<bounds>`), in EPSG:4326.
    pub declared_bounds: Option<Extent>,
}

/// Detects the format of `source` without converting it.
pub fn detect(source: &LayerSource) -> Result<VectorFormat, FormatError> {
    match source {
        LayerSource::Xml(text) => detect_xml(&parse_xml(text)?),
        LayerSource::Json(value) => detect_json(value),
    }
}

/// Detects the format of `source` and converts it to GeoJSON.
pub fn read(source: &LayerSource) -> Result<VectorDocument, FormatError> {
    match source {
        LayerSource::Xml(text) => {
            let doc = parse_xml(text)?;
            match detect_xml(&doc)? {
                VectorFormat::Kml => Ok(VectorDocument {
                    format: VectorFormat::Kml,
                    geojson: kml::to_geojson(&doc)?,
                    declared_crs: None,
                    declared_bounds: None,
                }),
                VectorFormat::Gpx => Ok(VectorDocument {
                    format: VectorFormat::Gpx,
                    geojson: gpx::to_geojson(&doc)?,
                    declared_crs: None,
                    declared_bounds: gpx::bounds(&doc)?,
                }),
                VectorFormat::GeoJson => Err(FormatError::UnsupportedFormat(
                    "GeoJSON cannot be XML".to_string(),
                )),
            }
        }
        LayerSource::Json(value) => {
            detect_json(value)?;
            let geojson = GeoJson::from_json_value(value.clone())
                .map_err(|e| GeometryError::MalformedDocument(e.to_string()))?;
            Ok(VectorDocument {
                format: VectorFormat::GeoJson,
                geojson,
                declared_crs: legacy_crs_name(value),
                declared_bounds: None,
            })
        }
    }
}

fn parse_xml(text: &str) -> Result<Document<'_>, FormatError> {
    Document::parse(text)
        .map_err(|e| FormatError::UnsupportedFormat(format!("malformed XML: {}", e)))
}

fn detect_xml(doc: &Document<'_>) -> Result<VectorFormat, FormatError> {
    let has_element = |name: &str| {
        doc.descendants()
            .any(|n| n.is_element() && n.tag_name().name() == name)
    };
    if has_element("kml") {
        Ok(VectorFormat::Kml)
    } else if has_element("gpx") {
        Ok(VectorFormat::Gpx)
    } else {
        Err(FormatError::UnsupportedFormat(format!(
            "XML document root <{}> is neither KML nor GPX",
            doc.root_element().tag_name().name()
        )))
    }
}

fn detect_json(value: &JsonValue) -> Result<VectorFormat, FormatError> {
    match value.get("type").and_then(JsonValue::as_str) {
        Some("Feature") | Some("FeatureCollection") => Ok(VectorFormat::GeoJson),
        Some(other) => Err(FormatError::UnsupportedFormat(format!(
            "JSON object of type '{}'",
            other
        ))),
        None => Err(FormatError::UnsupportedFormat(
            "JSON value without a 'type' member".to_string(),
        )),
    }
}

/// `{"crs": {"type": "name", "properties": {"name": "EPSG:3857"}}}`
fn legacy_crs_name(value: &JsonValue) -> Option<String> {
    value
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mimetype_roundtrip() {
        for format in VectorFormat::ALL {
            assert_eq!(format.mimetype().parse::<VectorFormat>().unwrap(), format);
        }
        assert!(matches!(
            "vector/shapefile".parse::<VectorFormat>(),
            Err(FormatError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_text() {
        assert!(matches!(
            LayerSource::from_text("  <kml/>").unwrap(),
            LayerSource::Xml(_)
        ));
        assert!(matches!(
            LayerSource::from_text(r#"{"type":"Feature"}"#).unwrap(),
            LayerSource::Json(_)
        ));
        assert!(LayerSource::from_text("lon,lat\n1,2").is_err());
    }

    #[test]
    fn test_detect_xml() {
        let kml = LayerSource::Xml(r#"<kml xmlns="http://www.opengis.net/kml/2.2"/>"#.into());
        assert_eq!(detect(&kml).unwrap(), VectorFormat::Kml);

        let gpx = LayerSource::Xml(r#"<gpx version="1.1"></gpx>"#.into());
        assert_eq!(detect(&gpx).unwrap(), VectorFormat::Gpx);

        let svg = LayerSource::Xml("<svg></svg>".into());
        assert!(matches!(detect(&svg), Err(FormatError::UnsupportedFormat(_))));

        let broken = LayerSource::Xml("<kml>".into());
        assert!(matches!(detect(&broken), Err(FormatError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_kml_wins_over_gpx() {
        let both = LayerSource::Xml("<kml><gpx/></kml>".into());
        assert_eq!(detect(&both).unwrap(), VectorFormat::Kml);
    }

    #[test]
    fn test_detect_json() {
        let fc = LayerSource::Json(json!({"type": "FeatureCollection", "features": []}));
        assert_eq!(detect(&fc).unwrap(), VectorFormat::GeoJson);

        let topo = LayerSource::Json(json!({"type": "Topology"}));
        assert!(matches!(detect(&topo), Err(FormatError::UnsupportedFormat(_))));

        let bare = LayerSource::Json(json!({"type": "Point", "coordinates": [0, 0]}));
        assert!(detect(&bare).is_err());
    }

    #[test]
    fn test_read_geojson_legacy_crs() {
        let source = LayerSource::Json(json!({
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "EPSG:3857"}},
            "features": []
        }));
        let doc = read(&source).unwrap();
        assert_eq!(doc.format, VectorFormat::GeoJson);
        assert_eq!(doc.declared_crs.as_deref(), Some("EPSG:3857"));
    }

    #[test]
    fn test_read_invalid_geojson() {
        let source = LayerSource::Json(json!({"type": "Feature", "geometry": 12}));
        assert!(matches!(
            read(&source),
            Err(FormatError::Geometry(GeometryError::MalformedDocument(_)))
        ));
    }
}
