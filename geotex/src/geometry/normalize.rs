//! GeoJSON to [`NormalizedGeometry`].

use geo_types::Coord;
use geojson::{Feature, GeoJson, Geometry, JsonObject, Value};
use tracing::debug;

use super::types::{NormalizedFeature, NormalizedGeometry, Polygon, Shape};
use super::GeometryError;
use crate::extent::{Crs, Extent};

/// Options controlling normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    /// Reference system of the source coordinates.
    pub crs_in: Crs,
    /// Reference system of the normalized output.
    pub crs_out: Crs,
    /// Compute the aggregate extent from the features.
    pub build_extent: bool,
    /// Extent known before normalization. Never used to discard features;
    /// it becomes the aggregate extent when `build_extent` is off.
    pub extent_hint: Option<Extent>,
}

impl NormalizeOptions {
    pub fn new(crs_in: Crs, crs_out: Crs) -> Self {
        Self {
            crs_in,
            crs_out,
            build_extent: true,
            extent_hint: None,
        }
    }

    pub fn with_extent_hint(mut self, extent: Extent) -> Self {
        self.extent_hint = Some(extent);
        self
    }

    pub fn with_build_extent(mut self, build_extent: bool) -> Self {
        self.build_extent = build_extent;
        self
    }
}

/// Normalizes a GeoJSON document.
///
/// Coordinates are reprojected from `crs_in` to `crs_out`. Features with a
/// `null` geometry are skipped; a `GeometryCollection` yields one normalized
/// feature per member.
pub fn normalize(
    document: &GeoJson,
    options: &NormalizeOptions,
) -> Result<NormalizedGeometry, GeometryError> {
    let mut normalizer = Normalizer {
        options,
        features: match document {
            GeoJson::FeatureCollection(fc) => Vec::with_capacity(fc.features.len()),
            _ => Vec::with_capacity(1),
        },
    };

    match document {
        GeoJson::FeatureCollection(fc) => {
            for (index, feature) in fc.features.iter().enumerate() {
                normalizer.push_feature(index, feature)?;
            }
        }
        GeoJson::Feature(feature) => normalizer.push_feature(0, feature)?,
        GeoJson::Geometry(geometry) => normalizer.push_geometry(0, geometry, &JsonObject::new())?,
    }

    let features = normalizer.features;
    let default_extent = || {
        options
            .extent_hint
            .map(|e| e.to_crs(options.crs_out))
            .unwrap_or_else(|| Extent::world().to_crs(options.crs_out))
    };
    let extent = if options.build_extent {
        features
            .iter()
            .map(|f| f.extent)
            .reduce(|acc, e| acc.union(&e))
            .unwrap_or_else(|| Extent::world().to_crs(options.crs_out))
    } else {
        default_extent()
    };

    debug!(
        features = features.len(),
        crs_in = %options.crs_in,
        crs_out = %options.crs_out,
        extent = %extent,
        "Normalized vector geometry"
    );

    Ok(NormalizedGeometry {
        crs: options.crs_out,
        features,
        extent,
    })
}

struct Normalizer<'a> {
    options: &'a NormalizeOptions,
    features: Vec<NormalizedFeature>,
}

impl Normalizer<'_> {
    fn push_feature(&mut self, index: usize, feature: &Feature) -> Result<(), GeometryError> {
        let Some(geometry) = feature.geometry.as_ref() else {
            return Ok(());
        };
        let properties = feature.properties.clone().unwrap_or_default();
        self.push_geometry(index, geometry, &properties)
    }

    fn push_geometry(
        &mut self,
        index: usize,
        geometry: &Geometry,
        properties: &JsonObject,
    ) -> Result<(), GeometryError> {
        let shape = match &geometry.value {
            Value::Point(position) => Shape::Points(vec![self.coord(index, position)?]),
            Value::MultiPoint(positions) => Shape::Points(self.sequence(index, positions)?),
            Value::LineString(positions) => Shape::Lines(vec![self.sequence(index, positions)?]),
            Value::MultiLineString(lines) => Shape::Lines(
                non_empty(index, lines, "MultiLineString")?
                    .iter()
                    .map(|line| self.sequence(index, line))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Polygon(rings) => Shape::Polygons(vec![self.polygon(index, rings)?]),
            Value::MultiPolygon(polygons) => Shape::Polygons(
                non_empty(index, polygons, "MultiPolygon")?
                    .iter()
                    .map(|rings| self.polygon(index, rings))
                    .collect::<Result<_, _>>()?,
            ),
            Value::GeometryCollection(members) => {
                for member in members {
                    self.push_geometry(index, member, properties)?;
                }
                return Ok(());
            }
        };

        let extent = Extent::from_coords(self.options.crs_out, shape.coords())
            .ok_or_else(|| GeometryError::malformed(index, "geometry has no coordinates"))?;

        self.features.push(NormalizedFeature {
            shape,
            extent,
            properties: properties.clone(),
        });
        Ok(())
    }

    fn polygon(&self, index: usize, rings: &[Vec<Vec<f64>>]) -> Result<Polygon, GeometryError> {
        let (exterior, holes) = rings
            .split_first()
            .ok_or_else(|| GeometryError::malformed(index, "polygon has no rings"))?;
        Ok(Polygon {
            exterior: self.sequence(index, exterior)?,
            holes: holes
                .iter()
                .map(|ring| self.sequence(index, ring))
                .collect::<Result<_, _>>()?,
        })
    }

    fn sequence(
        &self,
        index: usize,
        positions: &[Vec<f64>],
    ) -> Result<Vec<Coord<f64>>, GeometryError> {
        non_empty(index, positions, "coordinate sequence")?
            .iter()
            .map(|p| self.coord(index, p))
            .collect()
    }

    fn coord(&self, index: usize, position: &[f64]) -> Result<Coord<f64>, GeometryError> {
        let (x, y) = match position {
            [x, y, ..] => (*x, *y),
            _ => {
                return Err(GeometryError::malformed(
                    index,
                    format!("position {:?} needs at least two values", position),
                ))
            }
        };
        if !x.is_finite() || !y.is_finite() {
            return Err(GeometryError::malformed(
                index,
                format!("position {:?} is not finite", position),
            ));
        }
        let coord = self
            .options
            .crs_in
            .transform(self.options.crs_out, Coord { x, y });
        Ok(coord)
    }
}

fn non_empty<'a, T>(index: usize, items: &'a [T], what: &str) -> Result<&'a [T], GeometryError> {
    if items.is_empty() {
        Err(GeometryError::malformed(index, format!("empty {}", what)))
    } else {
        Ok(items)
    }
}
