//! Which tiles a layer draws into.

use super::Tile;
use crate::layer::PreparedLayer;

/// True when `layer` contributes a texture to `tile`: the tile level lies in
/// the layer's zoom range and the tile extent touches the layer extent.
#[inline]
pub fn is_eligible(tile: &Tile, layer: &PreparedLayer) -> bool {
    layer.zoom().contains(tile.level()) && layer.extent().intersects(tile.extent())
}
