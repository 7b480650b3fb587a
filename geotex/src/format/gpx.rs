//! GPX to GeoJSON.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use roxmltree::{Document, Node};
use serde_json::Value as JsonValue;

use crate::extent::{Crs, Extent, ExtentError};
use crate::geometry::GeometryError;

type Position = Vec<f64>;

/// Tracks, routes and waypoints, in that order.
pub(super) fn to_geojson(doc: &Document<'_>) -> Result<GeoJson, GeometryError> {
    let mut features = Vec::new();

    for trk in doc.descendants().filter(|n| is(n, "trk")) {
        let index = features.len();
        let mut lines = Vec::new();
        let mut times = Vec::new();
        for segment in children(trk, "trkseg") {
            let (line, segment_times) = points(index, segment, "trkpt")?;
            if !line.is_empty() {
                lines.push(line);
                times.push(segment_times);
            }
        }
        let mut properties = common_properties(trk);
        let value = match lines.len() {
            0 => continue,
            1 => {
                insert_times(&mut properties, times.swap_remove(0).into());
                Value::LineString(lines.swap_remove(0))
            }
            _ => {
                if times.iter().any(|t| !t.is_empty()) {
                    properties.insert("coordTimes".to_string(), times.into());
                }
                Value::MultiLineString(lines)
            }
        };
        features.push(feature(value, properties));
    }

    for rte in doc.descendants().filter(|n| is(n, "rte")) {
        let index = features.len();
        let (line, times) = points(index, rte, "rtept")?;
        if line.is_empty() {
            continue;
        }
        let mut properties = common_properties(rte);
        insert_times(&mut properties, times.into());
        features.push(feature(Value::LineString(line), properties));
    }

    for wpt in doc.descendants().filter(|n| is(n, "wpt")) {
        let index = features.len();
        let mut properties = common_properties(wpt);
        if let Some(sym) = child_text(wpt, "sym") {
            properties.insert("sym".to_string(), sym.into());
        }
        if let Some(time) = child_text(wpt, "time") {
            properties.insert("time".to_string(), time.into());
        }
        features.push(feature(Value::Point(position(index, wpt)?), properties));
    }

    Ok(GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }))
}

/// The first `<bounds>` element, verbatim in EPSG:4326.
pub(super) fn bounds(doc: &Document<'_>) -> Result<Option<Extent>, ExtentError> {
    let Some(node) = doc.descendants().find(|n| is(n, "bounds")) else {
        return Ok(None);
    };
    let attr = |name: &str| {
        node.attribute(name).ok_or_else(|| {
            ExtentError::InvalidExtent(format!("<bounds> is missing the '{}' attribute", name))
        })
    };
    Extent::parse(
        Crs::Wgs84,
        attr("minlon")?,
        attr("maxlon")?,
        attr("minlat")?,
        attr("maxlat")?,
    )
    .map(Some)
}

fn points(
    index: usize,
    parent: Node<'_, '_>,
    name: &str,
) -> Result<(Vec<Position>, Vec<String>), GeometryError> {
    let mut line = Vec::new();
    let mut times = Vec::new();
    for point in children(parent, name) {
        line.push(position(index, point)?);
        if let Some(time) = child_text(point, "time") {
            times.push(time);
        }
    }
    Ok((line, times))
}

/// `[lon, lat]` from the attributes, plus `ele` when present.
fn position(index: usize, node: Node<'_, '_>) -> Result<Position, GeometryError> {
    let coordinate = |name: &str| -> Result<f64, GeometryError> {
        let raw = node.attribute(name).ok_or_else(|| {
            GeometryError::malformed(
                index,
                format!("<{}> without '{}'", node.tag_name().name(), name),
            )
        })?;
        raw.trim().parse().map_err(|_| {
            GeometryError::malformed(index, format!("invalid {} '{}'", name, raw))
        })
    };
    let mut position = vec![coordinate("lon")?, coordinate("lat")?];
    if let Some(ele) = child_text(node, "ele").and_then(|e| e.parse::<f64>().ok()) {
        position.push(ele);
    }
    Ok(position)
}

fn common_properties(node: Node<'_, '_>) -> JsonObject {
    let mut properties = JsonObject::new();
    for key in ["name", "cmt", "desc", "type"] {
        if let Some(value) = child_text(node, key) {
            properties.insert(key.to_string(), JsonValue::String(value));
        }
    }
    properties
}

fn insert_times(properties: &mut JsonObject, times: JsonValue) {
    if times.as_array().is_some_and(|t| !t.is_empty()) {
        properties.insert("coordTimes".to_string(), times);
    }
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn is(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| is(n, name))
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| is(n, name))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata><bounds minlon="1" maxlon="2" minlat="3" maxlat="4"/></metadata>
  <wpt lat="3.5" lon="1.5"><ele>120</ele><name>Camp</name><sym>Flag</sym></wpt>
  <rte><name>Route</name>
    <rtept lat="3.1" lon="1.1"/><rtept lat="3.2" lon="1.2"/>
  </rte>
  <trk><name>Morning</name><type>hiking</type>
    <trkseg>
      <trkpt lat="3.0" lon="1.0"><ele>100</ele><time>2021-01-01T08:00:00Z</time></trkpt>
      <trkpt lat="3.9" lon="1.9"><ele>110</ele><time>2021-01-01T08:10:00Z</time></trkpt>
    </trkseg>
  </trk>
  <trk><name>Split</name>
    <trkseg><trkpt lat="3" lon="1"/><trkpt lat="3.1" lon="1.1"/></trkseg>
    <trkseg><trkpt lat="3.5" lon="1.5"/><trkpt lat="3.6" lon="1.6"/></trkseg>
  </trk>
</gpx>"#;

    fn features(xml: &str) -> Vec<Feature> {
        let doc = Document::parse(xml).unwrap();
        match to_geojson(&doc).unwrap() {
            GeoJson::FeatureCollection(fc) => fc.features,
            other => panic!("expected a collection, got {:?}", other),
        }
    }

    fn value(feature: &Feature) -> &Value {
        &feature.geometry.as_ref().unwrap().value
    }

    #[test]
    fn test_tracks_routes_waypoints() {
        let features = features(GPX);
        assert_eq!(features.len(), 4);

        match value(&features[0]) {
            Value::LineString(line) => assert_eq!(line[0], vec![1.0, 3.0, 100.0]),
            other => panic!("unexpected {:?}", other),
        }
        let props = features[0].properties.as_ref().unwrap();
        assert_eq!(props.get("name"), Some(&JsonValue::from("Morning")));
        assert_eq!(props.get("type"), Some(&JsonValue::from("hiking")));
        assert_eq!(
            props.get("coordTimes").and_then(|t| t.as_array()).map(Vec::len),
            Some(2)
        );

        assert!(matches!(value(&features[1]), Value::MultiLineString(lines) if lines.len() == 2));
        assert!(matches!(value(&features[2]), Value::LineString(line) if line.len() == 2));

        match value(&features[3]) {
            Value::Point(p) => assert_eq!(p, &vec![1.5, 3.5, 120.0]),
            other => panic!("unexpected {:?}", other),
        }
        let props = features[3].properties.as_ref().unwrap();
        assert_eq!(props.get("sym"), Some(&JsonValue::from("Flag")));
    }

    #[test]
    fn test_bounds() {
        let doc = Document::parse(GPX).unwrap();
        let extent = bounds(&doc).unwrap().unwrap();
        assert_eq!(extent.crs(), Crs::Wgs84);
        assert_eq!(
            (extent.west(), extent.east(), extent.south(), extent.north()),
            (1.0, 2.0, 3.0, 4.0)
        );
    }

    #[test]
    fn test_missing_bounds() {
        let doc = Document::parse("<gpx></gpx>").unwrap();
        assert_eq!(bounds(&doc).unwrap(), None);
    }

    #[test]
    fn test_bad_bounds() {
        let doc = Document::parse(
            r#"<gpx><bounds minlon="x" maxlon="2" minlat="3" maxlat="4"/></gpx>"#,
        )
        .unwrap();
        assert!(matches!(bounds(&doc), Err(ExtentError::InvalidExtent(_))));
    }

    #[test]
    fn test_empty_track_is_skipped() {
        assert!(features("<gpx><trk><trkseg/></trk></gpx>").is_empty());
    }

    #[test]
    fn test_invalid_latitude_text() {
        let doc = Document::parse(r#"<gpx><wpt lat="north" lon="1"/></gpx>"#).unwrap();
        assert!(matches!(
            to_geojson(&doc),
            Err(GeometryError::MalformedGeometry { feature: 0, .. })
        ));
    }
}
