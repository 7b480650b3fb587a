//! Tiles requesting textures.
//!
//! A [`Tile`] is what the external scheduler hands over with each texture
//! request: its zoom level, the area it covers and whether it currently has
//! a surface a texture can be attached to.
//!
//! # Example
//!
//! ```
//! use geotex::coord::TileCoord;
//! use geotex::tile::Tile;
//!
//! let tile = Tile::from_coord(TileCoord::new(340, 511, 10).unwrap());
//! assert_eq!(tile.level(), 10);
//! assert!(tile.has_surface());
//! assert!(tile.extent().west() < -0.1);
//! ```

mod eligibility;

pub use eligibility::is_eligible;

use std::fmt;

use crate::coord::TileCoord;
use crate::extent::Extent;

/// A tile requesting a texture. Read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Zoom level
    level: u8,
    /// Area covered by the tile
    extent: Extent,
    /// Whether the tile has a surface to attach a texture to
    has_surface: bool,
}

impl Tile {
    /// Create a tile with an attachable surface.
    pub fn new(level: u8, extent: Extent) -> Self {
        Self {
            level,
            extent,
            has_surface: true,
        }
    }

    /// Create the tile of an XYZ address, covering its EPSG:4326 bounds.
    pub fn from_coord(coord: TileCoord) -> Self {
        Self::new(coord.zoom, Extent::from_tile(&coord))
    }

    /// The same tile without a surface, e.g. before its mesh exists.
    pub fn without_surface(self) -> Self {
        Self {
            has_surface: false,
            ..self
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn extent(&self) -> &Extent {
        &self.extent
    }

    pub fn has_surface(&self) -> bool {
        self.has_surface
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {} {}", self.level, self.extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::Crs;

    #[test]
    fn test_new_has_surface() {
        let tile = Tile::new(7, Extent::world());
        assert_eq!(tile.level(), 7);
        assert!(tile.has_surface());
        assert!(!tile.without_surface().has_surface());
    }

    #[test]
    fn test_from_coord() {
        let coord = TileCoord::new(1, 1, 1).unwrap();
        let tile = Tile::from_coord(coord);
        assert_eq!(tile.level(), 1);
        assert_eq!(tile.extent().crs(), Crs::Wgs84);
        assert_eq!(tile.extent().west(), 0.0);
        assert_eq!(tile.extent().east(), 180.0);
    }
}
