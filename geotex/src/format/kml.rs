//! KML to GeoJSON.
//!
//! Follows the common KML to GeoJSON mapping: one feature per `Placemark`, with
//! `name`, `description`, `styleUrl`, `ExtendedData` entries and the
//! simplestyle keys of the resolved `<Style>` as properties.

use std::collections::HashMap;

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use roxmltree::{Document, Node};
use serde_json::Value as JsonValue;

use crate::geometry::GeometryError;

type Position = Vec<f64>;

pub(super) fn to_geojson(doc: &Document<'_>) -> Result<GeoJson, GeometryError> {
    let styles = StyleIndex::build(doc);
    let features = doc
        .descendants()
        .filter(|n| is(n, "Placemark"))
        .enumerate()
        .map(|(index, placemark)| placemark_feature(index, placemark, &styles))
        .filter_map(Result::transpose)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }))
}

fn placemark_feature(
    index: usize,
    placemark: Node<'_, '_>,
    styles: &StyleIndex,
) -> Result<Option<Feature>, GeometryError> {
    let mut geometries = Vec::new();
    let mut coord_times = Vec::new();
    for node in placemark.descendants().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "Point" => {
                let mut positions = coordinates(index, node)?;
                if positions.is_empty() {
                    continue;
                }
                geometries.push(Value::Point(positions.swap_remove(0)));
            }
            "LineString" => geometries.push(Value::LineString(coordinates(index, node)?)),
            "LinearRing" if !inside_polygon(node) => {
                geometries.push(Value::LineString(coordinates(index, node)?))
            }
            "Polygon" => geometries.push(Value::Polygon(polygon(index, node)?)),
            "Track" => {
                let (line, times) = track(index, node)?;
                geometries.push(Value::LineString(line));
                if !times.is_empty() {
                    coord_times.push(times);
                }
            }
            _ => {}
        }
    }

    let geometry = match geometries.len() {
        0 => return Ok(None),
        1 => geometries.swap_remove(0),
        _ => Value::GeometryCollection(geometries.into_iter().map(Geometry::new).collect()),
    };

    let mut properties = JsonObject::new();
    for key in ["name", "description", "styleUrl"] {
        if let Some(value) = child_text(placemark, key) {
            properties.insert(key.to_string(), JsonValue::String(value));
        }
    }
    extended_data(placemark, &mut properties);

    let inline = child(placemark, "Style").map(simplestyle);
    let shared = child_text(placemark, "styleUrl").and_then(|url| styles.resolve(&url));
    for style in shared.into_iter().chain(inline) {
        properties.extend(style);
    }

    match coord_times.len() {
        0 => {}
        1 => {
            properties.insert("coordTimes".to_string(), coord_times.swap_remove(0).into());
        }
        _ => {
            properties.insert("coordTimes".to_string(), coord_times.into());
        }
    }

    Ok(Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }))
}

fn polygon(index: usize, node: Node<'_, '_>) -> Result<Vec<Vec<Position>>, GeometryError> {
    let mut rings = Vec::new();
    for boundary in ["outerBoundaryIs", "innerBoundaryIs"] {
        for ring in children(node, boundary).filter_map(|b| child(b, "LinearRing")) {
            rings.push(coordinates(index, ring)?);
        }
    }
    Ok(rings)
}

/// `gx:Track`: positions in `gx:coord` ("lon lat alt"), times in `when`.
fn track(index: usize, node: Node<'_, '_>) -> Result<(Vec<Position>, Vec<String>), GeometryError> {
    let line = children(node, "coord")
        .map(|c| position(index, &text(c), char::is_whitespace))
        .collect::<Result<Vec<_>, _>>()?;
    let times = children(node, "when").map(text).collect();
    Ok((line, times))
}

/// Reads a `<coordinates>` child: whitespace-separated "lon,lat[,alt]" tuples.
fn coordinates(index: usize, node: Node<'_, '_>) -> Result<Vec<Position>, GeometryError> {
    let Some(coords) = child(node, "coordinates") else {
        return Ok(Vec::new());
    };
    text(coords)
        .split_whitespace()
        .map(|tuple| position(index, tuple, |c| c == ','))
        .collect()
}

fn position(
    index: usize,
    tuple: &str,
    separator: impl Fn(char) -> bool,
) -> Result<Position, GeometryError> {
    tuple
        .split(separator)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.trim().parse::<f64>().map_err(|_| {
                GeometryError::malformed(index, format!("invalid coordinate '{}'", tuple))
            })
        })
        .collect()
}

fn inside_polygon(node: Node<'_, '_>) -> bool {
    node.ancestors().any(|a| is(&a, "Polygon"))
}

fn extended_data(placemark: Node<'_, '_>, properties: &mut JsonObject) {
    let Some(data) = child(placemark, "ExtendedData") else {
        return;
    };
    for entry in data.descendants().filter(|n| is(n, "Data") || is(n, "SimpleData")) {
        let Some(name) = entry.attribute("name") else {
            continue;
        };
        let value = if is(&entry, "Data") {
            child_text(entry, "value").unwrap_or_default()
        } else {
            text(entry)
        };
        properties.insert(name.to_string(), JsonValue::String(value));
    }
}

/// Shared `<Style id>` and `<StyleMap id>` definitions, keyed by `#id`.
struct StyleIndex {
    styles: HashMap<String, JsonObject>,
    maps: HashMap<String, String>,
}

impl StyleIndex {
    fn build(doc: &Document<'_>) -> Self {
        let mut styles = HashMap::new();
        let mut maps = HashMap::new();
        for node in doc.descendants().filter(|n| n.is_element()) {
            let Some(id) = node.attribute("id") else {
                continue;
            };
            if is(&node, "Style") {
                styles.insert(format!("#{}", id), simplestyle(node));
            } else if is(&node, "StyleMap") {
                let normal = children(node, "Pair")
                    .find(|pair| child_text(*pair, "key").as_deref() == Some("normal"))
                    .and_then(|pair| child_text(pair, "styleUrl"));
                if let Some(url) = normal {
                    maps.insert(format!("#{}", id), url);
                }
            }
        }
        Self { styles, maps }
    }

    fn resolve(&self, url: &str) -> Option<JsonObject> {
        let url = self.maps.get(url).map(String::as_str).unwrap_or(url);
        self.styles.get(url).cloned()
    }
}

/// Simplestyle properties from a `<Style>` element.
fn simplestyle(style: Node<'_, '_>) -> JsonObject {
    let mut properties = JsonObject::new();

    if let Some(line) = child(style, "LineStyle") {
        if let Some((color, opacity)) = child_text(line, "color").as_deref().and_then(kml_color) {
            properties.insert("stroke".to_string(), color.into());
            properties.insert("stroke-opacity".to_string(), opacity.into());
        }
        if let Some(width) = child_text(line, "width").and_then(|w| w.parse::<f64>().ok()) {
            properties.insert("stroke-width".to_string(), width.into());
        }
    }

    if let Some(poly) = child(style, "PolyStyle") {
        if let Some((color, opacity)) = child_text(poly, "color").as_deref().and_then(kml_color) {
            properties.insert("fill".to_string(), color.into());
            properties.insert("fill-opacity".to_string(), opacity.into());
        }
        if child_text(poly, "fill").as_deref() == Some("0") {
            properties.insert("fill-opacity".to_string(), 0.0.into());
        }
        if child_text(poly, "outline").as_deref() == Some("0") {
            properties.insert("stroke-opacity".to_string(), 0.0.into());
        }
    }

    properties
}

/// Converts a KML `aabbggrr` color to `("#rrggbb", opacity)`.
fn kml_color(value: &str) -> Option<(String, f64)> {
    let value = value.trim().trim_start_matches('#');
    if value.len() != 8 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let alpha = u8::from_str_radix(&value[0..2], 16).ok()?;
    let color = format!("#{}{}{}", &value[6..8], &value[4..6], &value[2..4]);
    Some((color, alpha as f64 / 255.0))
}

fn is(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is(n, name))
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| is(n, name))
}

fn text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).map(text)
}
