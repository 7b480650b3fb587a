//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! spherical Web Mercator meters, and the XYZ tile grid that tile extents
//! are derived from.

mod types;

pub use types::{
    CoordError, TileCoord, EARTH_RADIUS_M, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to [`MAX_ZOOM`])
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = 2.0_f64.powi(zoom as i32);
    let max_index = n - 1.0;

    // lon = 180 and the southern limit land exactly on the far edge
    let col = ((lon + 180.0) / 360.0 * n).min(max_index) as u32;
    let lat_rad = lat * PI / 180.0;
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).min(max_index) as u32;

    Ok(TileCoord { row, col, zoom })
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.col as f64 / n * 360.0 - 180.0;

    let y = tile.row as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

/// Returns the geographic bounds of a tile as `(west, east, south, north)` in degrees.
pub fn tile_bounds(tile: &TileCoord) -> (f64, f64, f64, f64) {
    let (north, west) = tile_to_lat_lon(tile);
    let (south, east) = tile_to_lat_lon(&TileCoord {
        row: tile.row + 1,
        col: tile.col + 1,
        zoom: tile.zoom,
    });
    (west, east, south, north)
}

/// Projects longitude/latitude degrees to spherical Web Mercator meters.
///
/// Latitudes beyond the Mercator limit are clamped to [`MIN_LAT`]/[`MAX_LAT`]
/// so poles map to the edge of the square world instead of infinity.
#[inline]
pub fn lon_lat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

/// Unprojects spherical Web Mercator meters to longitude/latitude degrees.
#[inline]
pub fn mercator_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let tile = to_tile_coords(40.7128, -74.0060, 16).unwrap();
        assert_eq!(tile.row, 24640);
        assert_eq!(tile.col, 19295);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_london_at_zoom_10() {
        let tile = to_tile_coords(51.5074, -0.1278, 10).unwrap();
        assert_eq!(tile.row, 340);
        assert_eq!(tile.col, 511);
    }

    #[test]
    fn test_equator_prime_meridian() {
        let tile = to_tile_coords(0.0, 0.0, 1).unwrap();
        assert_eq!(tile.row, 1);
        assert_eq!(tile.col, 1);
    }

    #[test]
    fn test_antimeridian_stays_inside_grid() {
        let tile = to_tile_coords(0.0, 180.0, 3).unwrap();
        assert_eq!(tile.col, 7);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = to_tile_coords(90.0, 0.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = to_tile_coords(0.0, 181.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_invalid_zoom() {
        let result = to_tile_coords(0.0, 0.0, MAX_ZOOM + 1);
        assert!(matches!(result, Err(CoordError::InvalidZoom(_))));
    }

    #[test]
    fn test_tile_to_lat_lon_northwest_corner() {
        let tile = TileCoord {
            row: 24640,
            col: 19295,
            zoom: 16,
        };
        let (lat, lon) = tile_to_lat_lon(&tile);
        assert!((lat - 40.714).abs() < 0.01);
        assert!((lon - (-74.009)).abs() < 0.01);
    }

    #[test]
    fn test_world_tile_bounds() {
        let tile = TileCoord::new(0, 0, 0).unwrap();
        let (west, east, south, north) = tile_bounds(&tile);
        assert_eq!(west, -180.0);
        assert_eq!(east, 180.0);
        assert!((north - MAX_LAT).abs() < 1e-6);
        assert!((south - MIN_LAT).abs() < 1e-6);
    }

    #[test]
    fn test_quadrant_bounds() {
        let tile = TileCoord::new(1, 1, 1).unwrap();
        let (west, east, south, north) = tile_bounds(&tile);
        assert_eq!(west, 0.0);
        assert_eq!(east, 180.0);
        assert!(north.abs() < 1e-9);
        assert!(south < -85.0);
    }

    #[test]
    fn test_tile_coord_rejects_out_of_grid() {
        assert!(TileCoord::new(0, 2, 1).is_err());
        assert!(TileCoord::new(3, 3, 2).is_ok());
    }

    #[test]
    fn test_mercator_edges() {
        let (x, _) = lon_lat_to_mercator(180.0, 0.0);
        assert!((x - 20_037_508.342789244).abs() < 1e-6);
        let (_, y) = lon_lat_to_mercator(0.0, 90.0);
        assert!((y - 20_037_508.34).abs() < 1.0);
    }

    #[test]
    fn test_mercator_roundtrip() {
        for (lon, lat) in [(2.3522, 48.8566), (-74.006, 40.7128), (151.2, -33.86)] {
            let (x, y) = lon_lat_to_mercator(lon, lat);
            let (lon2, lat2) = mercator_to_lon_lat(x, y);
            assert!((lon - lon2).abs() < 1e-9);
            assert!((lat - lat2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_paris_in_meters() {
        let (x, y) = lon_lat_to_mercator(2.3522, 48.8566);
        assert!((x - 261_845.706).abs() < 0.01);
        assert!((y - 6_250_564.35).abs() < 0.01);
    }
}
