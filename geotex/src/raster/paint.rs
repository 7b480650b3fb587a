//! Per-feature style resolution.

use tracing::debug;

use crate::config::{RasterConfig, DEFAULT_FILL_OPACITY};
use crate::geometry::{GeometryKind, NormalizedFeature};
use crate::style::{Color, Style};

/// Final colors and width for one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Paint {
    /// Fill color with the fill opacity applied
    pub fill: Color,
    /// Stroke color with the stroke opacity applied
    pub stroke: Color,
    pub stroke_width: f32,
}

impl Paint {
    /// How many pixels the drawn feature can extend past its geometry.
    pub fn reach(&self, kind: GeometryKind, point_radius: f32) -> f32 {
        // one full stroke width plus a pixel, so clip edges stay off the canvas
        let stroke = self.stroke_width + 1.0;
        match kind {
            GeometryKind::Point => point_radius + stroke,
            GeometryKind::Line | GeometryKind::Polygon => stroke,
        }
    }
}

/// Layer style first, then the feature's simplestyle properties, then defaults.
pub(super) fn resolve(layer: &Style, feature: &NormalizedFeature, config: &RasterConfig) -> Paint {
    let fill = layer
        .fill
        .or_else(|| feature_color(feature, "fill"))
        .unwrap_or(Color::ORANGE);
    let fill_opacity = layer
        .fill_opacity
        .or_else(|| feature_number(feature, "fill-opacity"))
        .unwrap_or(DEFAULT_FILL_OPACITY);

    let stroke = layer
        .stroke
        .or_else(|| feature_color(feature, "stroke"))
        .unwrap_or(Color::ORANGE);
    let stroke_opacity = feature_number(feature, "stroke-opacity").unwrap_or(1.0);
    let stroke_width = layer
        .stroke_width
        .or_else(|| feature_number(feature, "stroke-width").filter(|w| *w >= 0.0))
        .unwrap_or_else(|| config.stroke_width());

    Paint {
        fill: fill.with_opacity(fill_opacity),
        stroke: stroke.with_opacity(stroke_opacity),
        stroke_width,
    }
}

fn feature_color(feature: &NormalizedFeature, key: &str) -> Option<Color> {
    let value = feature.property_str(key)?;
    match Color::parse(value) {
        Ok(color) => Some(color),
        Err(e) => {
            debug!(property = key, error = %e, "Ignoring feature color");
            None
        }
    }
}

fn feature_number(feature: &NormalizedFeature, key: &str) -> Option<f32> {
    feature
        .property_f64(key)
        .filter(|v| v.is_finite())
        .map(|v| v as f32)
}
