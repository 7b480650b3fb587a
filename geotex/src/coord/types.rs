//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels addressable by the tile grid
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 24;

/// Semi-major axis of the WGS84 ellipsoid, used as the sphere radius of
/// spherical Web Mercator.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Tile coordinates in the Web Mercator / Slippy Map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Creates a tile coordinate, validating it against the grid size at `zoom`.
    pub fn new(row: u32, col: u32, zoom: u8) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let n = 1u64 << zoom;
        if u64::from(row) >= n || u64::from(col) >= n {
            return Err(CoordError::OutsideGrid { row, col, zoom });
        }
        Ok(Self { row, col, zoom })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-85.05112878 to 85.05112878)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Zoom level is outside valid range
    InvalidZoom(u8),
    /// Row or column does not exist at this zoom level
    OutsideGrid { row: u32, col: u32, zoom: u8 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::OutsideGrid { row, col, zoom } => {
                write!(
                    f,
                    "Tile (row {}, col {}) does not exist at zoom {}",
                    row, col, zoom
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
