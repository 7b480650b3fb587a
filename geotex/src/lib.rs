//! geotex - Vector layers rasterized into per-tile color textures
//!
//! This library loads KML, GPX and GeoJSON documents as map layers and
//! renders them, one tile at a time, into 256x256 RGBA textures for a
//! tiled globe or map renderer.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use geotex::layer::{FileFetcher, LayerDescriptor, LayerLoader};
//! use geotex::provider::{Command, TextureProvider, VectorToColorProvider};
//! use geotex::tile::Tile;
//! use tokio_util::sync::CancellationToken;
//!
//! let loader = LayerLoader::new(FileFetcher::new());
//! let layer = loader.load(&descriptor, CancellationToken::new()).await?;
//!
//! let provider = VectorToColorProvider::default();
//! let outcome = provider.execute(Command::new(tile, Arc::clone(&layer))).await?;
//! ```

pub mod config;
pub mod coord;
pub mod extent;
pub mod format;
pub mod geometry;
pub mod layer;
pub mod provider;
pub mod raster;
pub mod style;
pub mod texture;
pub mod tile;

/// Version of the geotex library and CLI.
///
/// The version is defined in the workspace `Cargo.toml` and injected at
/// compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
