//! Rasterization configuration.

use super::defaults::{DEFAULT_ANTI_ALIAS, DEFAULT_POINT_RADIUS, DEFAULT_STROKE_WIDTH};

/// Configuration for the vector rasterizer.
///
/// # Example
///
/// ```
/// use geotex::config::RasterConfig;
///
/// let config = RasterConfig::default();
/// assert!(config.anti_alias());
///
/// let config = RasterConfig::new()
///     .with_stroke_width(1.0)
///     .with_point_radius(6.0)
///     .with_anti_alias(false);
/// assert_eq!(config.point_radius(), 6.0);
/// assert!(!config.anti_alias());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterConfig {
    /// Stroke width used when neither layer nor feature sets one
    stroke_width: f32,
    /// Radius of point discs
    point_radius: f32,
    anti_alias: bool,
}

impl RasterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback stroke width in pixels.
    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    /// Set the radius of point markers in pixels.
    pub fn with_point_radius(mut self, radius: f32) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn point_radius(&self) -> f32 {
        self.point_radius
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            stroke_width: DEFAULT_STROKE_WIDTH,
            point_radius: DEFAULT_POINT_RADIUS,
            anti_alias: DEFAULT_ANTI_ALIAS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RasterConfig::default();
        assert_eq!(config.stroke_width(), DEFAULT_STROKE_WIDTH);
        assert_eq!(config.point_radius(), DEFAULT_POINT_RADIUS);
        assert_eq!(config.anti_alias(), DEFAULT_ANTI_ALIAS);
    }

    #[test]
    fn test_builder_chain() {
        let config = RasterConfig::new()
            .with_stroke_width(3.0)
            .with_anti_alias(false);
        assert_eq!(config.stroke_width(), 3.0);
        assert_eq!(config.point_radius(), DEFAULT_POINT_RADIUS);
        assert!(!config.anti_alias());
    }

    #[test]
    fn test_copy_semantics() {
        let config1 = RasterConfig::new();
        let config2 = config1;
        assert_eq!(config1, config2);
    }
}
