//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::{ConfigFile, ConfigFileError};
use super::layer::ZoomRange;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [raster] section
    if let Some(section) = ini.section(Some("raster")) {
        if let Some(width) = parse_pixels(section, "raster", "stroke_width")? {
            config.raster = config.raster.with_stroke_width(width);
        }
        if let Some(radius) = parse_pixels(section, "raster", "point_radius")? {
            config.raster = config.raster.with_point_radius(radius);
        }
        if let Some(v) = section.get("anti_alias") {
            let anti_alias = match v.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                "false" | "no" | "off" | "0" => false,
                _ => {
                    return Err(invalid("raster", "anti_alias", v, "expected true or false"));
                }
            };
            config.raster = config.raster.with_anti_alias(anti_alias);
        }
    }

    // [layer] section
    if let Some(section) = ini.section(Some("layer")) {
        let defaults = config.layer.zoom();
        let min = parse_value(section, "layer", "min_zoom", "expected a zoom level 0-255")?;
        let max = parse_value(section, "layer", "max_zoom", "expected a zoom level 0-255")?;
        let min = min.unwrap_or(defaults.min());
        let max = max.unwrap_or(defaults.max());
        let zoom = ZoomRange::new(min, max).map_err(|e| {
            invalid("layer", "min_zoom", &min.to_string(), &e.to_string())
        })?;
        config.layer = config.layer.with_zoom(zoom);
    }

    Ok(config)
}

fn parse_value<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    section
        .get(key)
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| invalid(section_name, key, v, reason))
        })
        .transpose()
}

fn parse_pixels(
    section: &Properties,
    section_name: &str,
    key: &str,
) -> Result<Option<f32>, ConfigFileError> {
    let reason = "expected a non-negative number of pixels";
    let value: Option<f32> = parse_value(section, section_name, key, reason)?;
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(invalid(section_name, key, &v.to_string(), reason))
        }
        other => Ok(other),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
