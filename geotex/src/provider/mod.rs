//! Tile texture providers.
//!
//! The external tile scheduler sends a [`Command`] for every tile that needs
//! a texture from a layer. A [`TextureProvider`] routes it by mimetype and
//! resolves to a texture, an explicit skip, or a typed error.
//!
//! ```ignore
//! use std::sync::Arc;
//! use geotex::provider::{Command, TextureProvider, VectorToColorProvider};
//!
//! let provider = VectorToColorProvider::default();
//! let outcome = provider.execute(Command::new(tile, Arc::clone(&layer))).await?;
//! ```

mod types;
mod vector;

pub use types::{Command, ProviderError, TextureProvider};
pub use vector::VectorToColorProvider;
