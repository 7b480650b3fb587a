//! Default values for all configuration settings.

/// Default stroke width in pixels.
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

/// Default radius of point markers in pixels.
pub const DEFAULT_POINT_RADIUS: f32 = 4.0;

/// Anti-aliasing is on unless disabled.
pub const DEFAULT_ANTI_ALIAS: bool = true;

/// Default fill opacity when neither the layer nor the feature sets one.
pub const DEFAULT_FILL_OPACITY: f32 = 1.0;

/// Lowest zoom level a layer is drawn at by default.
pub const DEFAULT_MIN_ZOOM: u8 = 5;

/// Highest zoom level a layer is drawn at by default.
pub const DEFAULT_MAX_ZOOM: u8 = 21;
