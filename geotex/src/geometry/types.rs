//! Normalized geometry types.

use geo_types::Coord;
use geojson::JsonObject;

use crate::extent::{Crs, Extent};

/// The three kinds of geometry the rasterizer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

/// A polygon: one exterior ring and any number of holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Vec<Coord<f64>>,
    pub holes: Vec<Vec<Coord<f64>>>,
}

impl Polygon {
    pub fn rings(&self) -> impl Iterator<Item = &Vec<Coord<f64>>> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }
}

/// Coordinates of a feature. Multi-part geometries keep all their parts.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Points(Vec<Coord<f64>>),
    Lines(Vec<Vec<Coord<f64>>>),
    Polygons(Vec<Polygon>),
}

impl Shape {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Shape::Points(_) => GeometryKind::Point,
            Shape::Lines(_) => GeometryKind::Line,
            Shape::Polygons(_) => GeometryKind::Polygon,
        }
    }

    /// Iterates over every coordinate of the shape.
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coord<f64>> + '_> {
        match self {
            Shape::Points(points) => Box::new(points.iter()),
            Shape::Lines(lines) => Box::new(lines.iter().flatten()),
            Shape::Polygons(polygons) => {
                Box::new(polygons.iter().flat_map(|p| p.rings().flatten()))
            }
        }
    }
}

/// One feature in the layer's reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeature {
    pub shape: Shape,
    /// Bounding box of the feature's coordinates.
    pub extent: Extent,
    /// Source properties (name, simplestyle keys, ...).
    pub properties: JsonObject,
}

impl NormalizedFeature {
    pub fn kind(&self) -> GeometryKind {
        self.shape.kind()
    }

    /// Looks up a string property.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    /// Looks up a numeric property, accepting numbers written as strings.
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A layer's geometry after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGeometry {
    pub crs: Crs,
    pub features: Vec<NormalizedFeature>,
    /// Union of all feature extents (or the default world extent).
    pub extent: Extent,
}

impl NormalizedGeometry {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of features of the given kind.
    pub fn count(&self, kind: GeometryKind) -> usize {
        self.features.iter().filter(|f| f.kind() == kind).count()
    }
}
