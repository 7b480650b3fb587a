//! Layer styling.
//!
//! Layer descriptors carry CSS color strings (`"orange"`, `"#ff8800"`,
//! `"rgba(0,0,0,0.5)"`). They are parsed once during preprocessing into
//! [`Style`], so rendering never deals with unparsable colors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `orange`, the fallback for both stroke and fill.
    pub const ORANGE: Color = Color::rgba(255, 165, 0, 255);

    /// `red`, the default GPX track color.
    pub const RED: Color = Color::rgba(255, 0, 0, 255);

    /// Parses any CSS color string.
    pub fn parse(value: &str) -> Result<Self, StyleError> {
        let parsed = csscolorparser::parse(value).map_err(|e| StyleError::InvalidColor {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        let [r, g, b, a] = parsed.to_rgba8();
        Ok(Self { r, g, b, a })
    }

    /// Returns the color with its alpha scaled by `opacity` (clamped to 0..=1).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            a: (self.a as f32 * opacity).round() as u8,
            ..self
        }
    }
}

/// Style errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("Invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("Invalid {property}: {value} (must be a finite number >= 0)")]
    InvalidNumber { property: &'static str, value: f32 },
}

/// Style options as written in a layer descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
}

/// A validated layer style. Unset fields fall back to per-feature
/// properties and then to renderer defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub fill_opacity: Option<f32>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f32>,
}

impl Style {
    /// Validates descriptor options.
    pub fn from_options(options: &StyleOptions) -> Result<Self, StyleError> {
        Ok(Self {
            fill: options.fill.as_deref().map(Color::parse).transpose()?,
            fill_opacity: options
                .fill_opacity
                .map(|v| non_negative("fillOpacity", v))
                .transpose()?,
            stroke: options.stroke.as_deref().map(Color::parse).transpose()?,
            stroke_width: options
                .stroke_width
                .map(|v| non_negative("strokeWidth", v))
                .transpose()?,
        })
    }
}

fn non_negative(property: &'static str, value: f32) -> Result<f32, StyleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(StyleError::InvalidNumber { property, value })
    }
}
