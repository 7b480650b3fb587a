//! The [`Extent`] type.

use std::fmt;

use geo_types::Coord;
use serde::{Deserialize, Serialize};

use super::{Crs, ExtentError};
use crate::coord::{tile_bounds, TileCoord};

/// Raw bounds as found in configuration, not yet tied to a reference system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

/// An axis-aligned bounding rectangle in a named reference system.
///
/// Always satisfies `west <= east` and `south <= north` with finite bounds;
/// the only way to obtain one is through a validating constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    crs: Crs,
    west: f64,
    east: f64,
    south: f64,
    north: f64,
}

impl Extent {
    /// Creates an extent, rejecting inverted or non-finite bounds.
    pub fn new(
        crs: Crs,
        west: f64,
        east: f64,
        south: f64,
        north: f64,
    ) -> Result<Self, ExtentError> {
        if ![west, east, south, north].iter().all(|v| v.is_finite()) {
            return Err(ExtentError::InvalidExtent(format!(
                "bounds must be finite (west={}, east={}, south={}, north={})",
                west, east, south, north
            )));
        }
        if west > east {
            return Err(ExtentError::InvalidExtent(format!(
                "west {} is greater than east {}",
                west, east
            )));
        }
        if south > north {
            return Err(ExtentError::InvalidExtent(format!(
                "south {} is greater than north {}",
                south, north
            )));
        }
        Ok(Self {
            crs,
            west,
            east,
            south,
            north,
        })
    }

    /// Creates an extent from a reference system identifier such as `"EPSG:4326"`.
    pub fn with_crs_code(
        crs: &str,
        west: f64,
        east: f64,
        south: f64,
        north: f64,
    ) -> Result<Self, ExtentError> {
        Self::new(crs.parse()?, west, east, south, north)
    }

    /// Creates an extent from textual bounds, e.g. XML attribute values.
    pub fn parse(
        crs: Crs,
        west: &str,
        east: &str,
        south: &str,
        north: &str,
    ) -> Result<Self, ExtentError> {
        Self::new(
            crs,
            parse_bound("west", west)?,
            parse_bound("east", east)?,
            parse_bound("south", south)?,
            parse_bound("north", north)?,
        )
    }

    /// Creates an extent from configuration bounds.
    pub fn from_bounds(crs: Crs, bounds: Bounds) -> Result<Self, ExtentError> {
        Self::new(crs, bounds.west, bounds.east, bounds.south, bounds.north)
    }

    /// The whole world in geographic degrees: (-180, 180, -90, 90).
    pub fn world() -> Self {
        Self {
            crs: Crs::Wgs84,
            west: -180.0,
            east: 180.0,
            south: -90.0,
            north: 90.0,
        }
    }

    /// Geographic bounds of an XYZ tile.
    pub fn from_tile(tile: &TileCoord) -> Self {
        let (west, east, south, north) = tile_bounds(tile);
        Self {
            crs: Crs::Wgs84,
            west,
            east,
            south,
            north,
        }
    }

    /// The smallest extent containing every coordinate, or `None` when empty.
    pub fn from_coords<'a, I>(crs: Crs, coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coord<f64>>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let (west, east, south, north) = iter.fold(
            (first.x, first.x, first.y, first.y),
            |(w, e, s, n), c| (w.min(c.x), e.max(c.x), s.min(c.y), n.max(c.y)),
        );
        Some(Self {
            crs,
            west,
            east,
            south,
            north,
        })
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.west + self.east) / 2.0,
            y: (self.south + self.north) / 2.0,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            west: self.west,
            east: self.east,
            south: self.south,
            north: self.north,
        }
    }

    /// Reprojects into the reference system named by `target`.
    ///
    /// Fails with [`ExtentError::UnsupportedProjection`] for unknown identifiers.
    pub fn as_projection(&self, target: &str) -> Result<Extent, ExtentError> {
        Ok(self.to_crs(target.parse()?))
    }

    /// Reprojects into `target`.
    ///
    /// Both supported transforms are monotonic per axis, so projecting the
    /// south-west and north-east corners yields the exact reprojected box.
    pub fn to_crs(&self, target: Crs) -> Extent {
        if target == self.crs {
            return *self;
        }
        let sw = self.crs.transform(
            target,
            Coord {
                x: self.west,
                y: self.south,
            },
        );
        let ne = self.crs.transform(
            target,
            Coord {
                x: self.east,
                y: self.north,
            },
        );
        Extent {
            crs: target,
            west: sw.x.min(ne.x),
            east: sw.x.max(ne.x),
            south: sw.y.min(ne.y),
            north: sw.y.max(ne.y),
        }
    }

    /// True when the rectangles overlap; shared edges count as overlapping.
    ///
    /// `other` is reprojected into this extent's reference system first.
    pub fn intersects(&self, other: &Extent) -> bool {
        let other = other.to_crs(self.crs);
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    /// True when `coord` (in this extent's reference system) lies inside or on the edge.
    pub fn contains_point(&self, coord: Coord<f64>) -> bool {
        coord.x >= self.west
            && coord.x <= self.east
            && coord.y >= self.south
            && coord.y <= self.north
    }

    /// Smallest extent covering both, in this extent's reference system.
    pub fn union(&self, other: &Extent) -> Extent {
        let other = other.to_crs(self.crs);
        Extent {
            crs: self.crs,
            west: self.west.min(other.west),
            east: self.east.max(other.east),
            south: self.south.min(other.south),
            north: self.north.max(other.north),
        }
    }

    /// Grows the extent by `margin` units on every side.
    pub fn expand(&self, margin: f64) -> Extent {
        Extent {
            crs: self.crs,
            west: self.west - margin,
            east: self.east + margin,
            south: self.south - margin,
            north: self.north + margin,
        }
    }
}

fn parse_bound(field: &str, value: &str) -> Result<f64, ExtentError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| {
            ExtentError::InvalidExtent(format!("{} '{}' is not a number", field, value))
        })
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [west {}, east {}, south {}, north {}]",
            self.crs, self.west, self.east, self.south, self.north
        )
    }
}
