//! Per-layer defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};

/// Inverted zoom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid zoom range: min {min} is greater than max {max}")]
pub struct ZoomRangeError {
    pub min: u8,
    pub max: u8,
}

/// Inclusive range of zoom levels a layer is drawn at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawZoomRange")]
pub struct ZoomRange {
    min: u8,
    max: u8,
}

#[derive(Deserialize)]
struct RawZoomRange {
    min: u8,
    max: u8,
}

impl TryFrom<RawZoomRange> for ZoomRange {
    type Error = ZoomRangeError;

    fn try_from(raw: RawZoomRange) -> Result<Self, Self::Error> {
        ZoomRange::new(raw.min, raw.max)
    }
}

impl ZoomRange {
    pub fn new(min: u8, max: u8) -> Result<Self, ZoomRangeError> {
        if min > max {
            return Err(ZoomRangeError { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    #[inline]
    pub fn contains(&self, level: u8) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Values applied to layers whose descriptor leaves them out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerDefaults {
    zoom: ZoomRange,
}

impl LayerDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zoom range used when a descriptor has no `options.zoom`.
    pub fn with_zoom(mut self, zoom: ZoomRange) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn zoom(&self) -> ZoomRange {
        self.zoom
    }
}
