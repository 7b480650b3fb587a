//! Supported coordinate reference systems.

use std::fmt;
use std::str::FromStr;

use geo_types::Coord;

use super::ExtentError;
use crate::coord::{lon_lat_to_mercator, mercator_to_lon_lat};

/// A coordinate reference system this crate can transform between.
///
/// Only the two systems tiled viewers and the supported formats actually use
/// are modelled: geographic WGS84 degrees (what KML, GPX and RFC 7946 GeoJSON
/// mandate) and spherical Web Mercator meters (what most tile grids use).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Geographic longitude/latitude in degrees (EPSG:4326).
    Wgs84,
    /// Spherical Web Mercator in meters (EPSG:3857).
    WebMercator,
}

impl Crs {
    /// Canonical identifier, e.g. `"EPSG:4326"`.
    pub fn code(&self) -> &'static str {
        match self {
            Crs::Wgs84 => "EPSG:4326",
            Crs::WebMercator => "EPSG:3857",
        }
    }

    /// Transforms a single coordinate from `self` into `target`.
    #[inline]
    pub fn transform(&self, target: Crs, coord: Coord<f64>) -> Coord<f64> {
        match (self, target) {
            (Crs::Wgs84, Crs::WebMercator) => {
                let (x, y) = lon_lat_to_mercator(coord.x, coord.y);
                Coord { x, y }
            }
            (Crs::WebMercator, Crs::Wgs84) => {
                let (x, y) = mercator_to_lon_lat(coord.x, coord.y);
                Coord { x, y }
            }
            _ => coord,
        }
    }
}

impl FromStr for Crs {
    type Err = ExtentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "EPSG:4326" | "WGS84" | "CRS:84" | "URN:OGC:DEF:CRS:OGC:1.3:CRS84"
            | "URN:OGC:DEF:CRS:EPSG::4326" => Ok(Crs::Wgs84),
            "EPSG:3857" | "EPSG:900913" | "EPSG:102100" | "EPSG:102113"
            | "URN:OGC:DEF:CRS:EPSG::3857" => Ok(Crs::WebMercator),
            _ => Err(ExtentError::UnsupportedProjection(s.to_string())),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("EPSG:4326".parse::<Crs>().unwrap(), Crs::Wgs84);
        assert_eq!("epsg:4326".parse::<Crs>().unwrap(), Crs::Wgs84);
        assert_eq!(
            "urn:ogc:def:crs:OGC:1.3:CRS84".parse::<Crs>().unwrap(),
            Crs::Wgs84
        );
        assert_eq!("EPSG:900913".parse::<Crs>().unwrap(), Crs::WebMercator);
        assert_eq!(" EPSG:3857 ".parse::<Crs>().unwrap(), Crs::WebMercator);
    }

    #[test]
    fn test_unknown_identifier() {
        let err = "EPSG:4978".parse::<Crs>().unwrap_err();
        assert_eq!(err, ExtentError::UnsupportedProjection("EPSG:4978".into()));
    }

    #[test]
    fn test_identity_transform() {
        let c = Coord { x: 12.5, y: -3.0 };
        assert_eq!(Crs::Wgs84.transform(Crs::Wgs84, c), c);
        assert_eq!(Crs::WebMercator.transform(Crs::WebMercator, c), c);
    }

    #[test]
    fn test_display_is_canonical_code() {
        assert_eq!(Crs::WebMercator.to_string(), "EPSG:3857");
    }
}
