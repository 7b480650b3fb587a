//! Vector rasterization.
//!
//! [`Rasterizer::render`] draws the features of a prepared layer that fall
//! inside a tile into a [`TEXTURE_SIZE`]² RGBA bitmap. The layer is only
//! read; any number of renders may share it.

mod canvas;
mod clip;
mod paint;
mod texture;

pub use texture::{RenderOutcome, SkipReason, TextureCoords, TextureResult};

use glam::Vec3;
use image::RgbaImage;
use thiserror::Error;
use tracing::trace;

use crate::config::RasterConfig;
use crate::extent::Extent;
use crate::layer::{LayerType, PreparedLayer};
use crate::tile::{is_eligible, Tile};

use canvas::Canvas;

/// Width and height of every texture, in pixels.
pub const TEXTURE_SIZE: u32 = 256;

/// Errors that can occur while rendering a tile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// The layer does not contribute to this tile.
    #[error("Tile at level {level} ({tile}) is outside layer limits ({layer})")]
    TileOutOfBounds {
        tile: Extent,
        layer: Extent,
        level: u8,
    },

    #[error("Failed to allocate {0}x{0} canvas")]
    Canvas(u32),
}

/// Renders prepared layers into tile textures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rasterizer {
    config: RasterConfig,
}

impl Rasterizer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    /// Renders `layer` for `tile`.
    ///
    /// Tiles outside the layer's zoom range or extent are an error. Tiles
    /// without a surface and non-color layers yield [`RenderOutcome::Skipped`].
    pub fn render(&self, tile: &Tile, layer: &PreparedLayer) -> Result<RenderOutcome, RenderError> {
        if !is_eligible(tile, layer) {
            return Err(RenderError::TileOutOfBounds {
                tile: *tile.extent(),
                layer: *layer.extent(),
                level: tile.level(),
            });
        }
        if !tile.has_surface() {
            return Ok(RenderOutcome::Skipped(SkipReason::NoSurface));
        }
        if layer.layer_type() != LayerType::Color {
            return Ok(RenderOutcome::Skipped(SkipReason::NotColorLayer));
        }

        let extent = tile.extent().to_crs(layer.projection());
        let texture = self.draw(&extent, layer)?;

        Ok(RenderOutcome::Rendered(TextureResult {
            texture,
            pitch: Vec3::Z,
            extent: *tile.extent(),
            coords: TextureCoords {
                extent,
                zoom: tile.level(),
            },
        }))
    }

    /// Draws the features of `layer` intersecting `extent`, which must be in
    /// the layer's projection.
    ///
    /// Each feature is culled and clipped against `extent` grown by the
    /// number of pixels its resolved stroke or point disc can reach.
    pub fn draw(&self, extent: &Extent, layer: &PreparedLayer) -> Result<RgbaImage, RenderError> {
        let mut canvas = Canvas::new(TEXTURE_SIZE, *extent, &self.config)?;
        let units_per_pixel = extent.width().max(extent.height()) / TEXTURE_SIZE as f64;

        let mut drawn = 0usize;
        for feature in &layer.geometry().features {
            let style = paint::resolve(layer.style(), feature, &self.config);
            let reach = style.reach(feature.kind(), self.config.point_radius());
            let window = extent.expand(reach as f64 * units_per_pixel);
            if !feature.extent.intersects(&window) {
                continue;
            }
            let Some(shape) = clip::clip_shape(&feature.shape, &window) else {
                continue;
            };
            canvas.draw(&shape, &style);
            drawn += 1;
        }

        trace!(layer = layer.id(), extent = %extent, features = drawn, "Tile drawn");
        Ok(canvas.into_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayerDefaults, ZoomRange};
    use crate::coord::{to_tile_coords, MAX_ZOOM};
    use crate::extent::Crs;
    use crate::format::LayerSource;
    use crate::layer::{preprocess, RawLayerConfig};
    use crate::style::StyleOptions;
    use serde_json::json;

    /// A filled square covering (0..10, 0..10).
    fn square_layer(layer_type: LayerType) -> PreparedLayer {
        let source = LayerSource::Json(json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [
                [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]
            ]}
        }));
        let config = RawLayerConfig::new("square", source, "EPSG:4326")
            .with_layer_type(layer_type)
            .with_zoom(ZoomRange::new(0, 20).unwrap())
            .with_style(StyleOptions {
                fill: Some("#0000ff".into()),
                stroke_width: Some(0.0),
                ..Default::default()
            });
        preprocess(&config, &LayerDefaults::default()).unwrap()
    }

    fn tile(west: f64, east: f64, south: f64, north: f64) -> Tile {
        Tile::new(6, Extent::new(Crs::Wgs84, west, east, south, north).unwrap())
    }

    #[test]
    fn test_render_inside_is_filled() {
        let layer = square_layer(LayerType::Color);
        let outcome = Rasterizer::default()
            .render(&tile(2.0, 4.0, 2.0, 4.0), &layer)
            .unwrap();
        let result = outcome.texture().unwrap();
        assert_eq!(result.texture.dimensions(), (TEXTURE_SIZE, TEXTURE_SIZE));
        assert_eq!(result.texture.get_pixel(128, 128).0, [0, 0, 255, 255]);
        assert_eq!(result.pitch, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(result.coords.zoom, 6);
    }

    #[test]
    fn test_render_edge_leaves_outside_transparent() {
        let layer = square_layer(LayerType::Color);
        // left half of the tile is west of the square
        let outcome = Rasterizer::default()
            .render(&tile(-2.0, 2.0, 4.0, 8.0), &layer)
            .unwrap();
        let texture = &outcome.texture().unwrap().texture;
        assert_eq!(texture.get_pixel(10, 128).0[3], 0);
        assert_eq!(texture.get_pixel(240, 128).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_out_of_bounds() {
        let layer = square_layer(LayerType::Color);
        let far = tile(50.0, 60.0, 50.0, 60.0);
        let err = Rasterizer::default().render(&far, &layer).unwrap_err();
        assert_eq!(
            err,
            RenderError::TileOutOfBounds {
                tile: *far.extent(),
                layer: *layer.extent(),
                level: 6,
            }
        );
    }

    #[test]
    fn test_no_surface_is_skipped() {
        let layer = square_layer(LayerType::Color);
        let outcome = Rasterizer::default()
            .render(&tile(2.0, 4.0, 2.0, 4.0).without_surface(), &layer)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::NoSurface));
    }

    #[test]
    fn test_non_color_layer_is_skipped() {
        let layer = square_layer(LayerType::Elevation);
        let outcome = Rasterizer::default()
            .render(&tile(2.0, 4.0, 2.0, 4.0), &layer)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::NotColorLayer));
    }

    #[test]
    fn test_render_does_not_mutate_layer() {
        let layer = square_layer(LayerType::Color);
        let before = layer.clone();
        let _ = Rasterizer::default().render(&tile(2.0, 4.0, 2.0, 4.0), &layer);
        assert_eq!(layer, before);
    }

    #[test]
    fn test_render_in_mercator_layer() {
        let source = LayerSource::Json(json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [
                [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]
            ]}
        }));
        let config = RawLayerConfig::new("m", source, "EPSG:3857")
            .with_zoom(ZoomRange::new(0, 20).unwrap());
        let layer = preprocess(&config, &LayerDefaults::default()).unwrap();

        let outcome = Rasterizer::default()
            .render(&tile(2.0, 4.0, 2.0, 4.0), &layer)
            .unwrap();
        let result = outcome.texture().unwrap();
        assert_eq!(result.extent.crs(), Crs::Wgs84);
        assert_eq!(result.coords.extent.crs(), Crs::WebMercator);
        // default fill is opaque orange
        assert_eq!(result.texture.get_pixel(128, 128).0, [255, 165, 0, 255]);
    }

    /// A blue polygon covering almost the whole world, drawable at every level.
    fn world_layer(projection: &str) -> PreparedLayer {
        let source = LayerSource::Json(json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [[
                [-170.0, -80.0], [170.0, -80.0], [170.0, 80.0], [-170.0, 80.0], [-170.0, -80.0]
            ]]}
        }));
        let config = RawLayerConfig::new("world", source, projection)
            .with_zoom(ZoomRange::new(0, MAX_ZOOM).unwrap())
            .with_style(StyleOptions {
                fill: Some("#0000ff".into()),
                ..Default::default()
            });
        preprocess(&config, &LayerDefaults::default()).unwrap()
    }

    #[test]
    fn test_world_polygon_fills_deepest_tile() {
        let tile = Tile::from_coord(to_tile_coords(45.0, 6.0, MAX_ZOOM).unwrap());
        for projection in ["EPSG:4326", "EPSG:3857"] {
            let layer = world_layer(projection);
            let outcome = Rasterizer::default().render(&tile, &layer).unwrap();
            let texture = &outcome.texture().unwrap().texture;
            assert_eq!(texture.get_pixel(128, 128).0, [0, 0, 255, 255], "{}", projection);
            // no stroke from the clipped outline reaches the corners
            assert_eq!(texture.get_pixel(0, 0).0, [0, 0, 255, 255], "{}", projection);
            assert_eq!(texture.get_pixel(255, 255).0, [0, 0, 255, 255], "{}", projection);
        }
    }

    #[test]
    fn test_wide_stroke_from_neighbour_is_drawn() {
        let source = LayerSource::Json(json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "LineString", "coordinates": [[-0.2, -5.0], [-0.2, 15.0]]}
        }));
        let config = RawLayerConfig::new("wide", source, "EPSG:4326")
            .with_zoom(ZoomRange::new(0, 20).unwrap())
            .with_style(StyleOptions {
                stroke: Some("#ff0000".into()),
                stroke_width: Some(30.0),
                ..Default::default()
            });
        let layer = preprocess(&config, &LayerDefaults::default()).unwrap();

        // the line sits about 5 pixels west of the canvas, its stroke is 30 wide
        let extent = Extent::new(Crs::Wgs84, 0.0, 10.0, 0.0, 10.0).unwrap();
        let texture = Rasterizer::default().draw(&extent, &layer).unwrap();
        assert_eq!(texture.get_pixel(2, 20).0, [255, 0, 0, 255]);
        assert_eq!(texture.get_pixel(40, 20).0[3], 0);
    }
}
