//! Configuration types for geotex components.
//!
//! Each struct groups the parameters of one concern and is built with
//! `with_*` methods on top of its defaults. [`ConfigFile`] loads the same
//! settings from an INI file.
//!
//! # Example
//!
//! ```
//! use geotex::config::{LayerDefaults, RasterConfig, ZoomRange};
//!
//! let raster = RasterConfig::default().with_stroke_width(2.5);
//! assert_eq!(raster.stroke_width(), 2.5);
//!
//! let layer = LayerDefaults::default();
//! assert_eq!(layer.zoom(), ZoomRange::new(5, 21).unwrap());
//! ```

mod defaults;
mod file;
mod layer;
mod parser;
mod raster;

pub use defaults::*;
pub use file::{ConfigFile, ConfigFileError};
pub use layer::{LayerDefaults, ZoomRange, ZoomRangeError};
pub use raster::RasterConfig;
