//! Async layer loading.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::spawn_blocking;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::descriptor::LayerDescriptor;
use super::prepare::{preprocess, PreparedLayer};
use super::PreprocessError;
use crate::config::LayerDefaults;
use crate::format::LayerSource;

/// Errors from the load pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The cancellation token fired before the layer was ready.
    #[error("Layer load cancelled")]
    Cancelled,

    #[error("Failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    /// The blocking preprocessing task panicked.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Retrieves layer content.
///
/// Networking lives outside this crate; applications plug their own client
/// in here. [`FileFetcher`] reads from the local filesystem.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<LayerSource, LoadError>> + Send;
}

/// Reads sources from disk. Relative URLs resolve against `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    base_dir: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SourceFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<LayerSource, LoadError> {
        let path = self.resolve(url);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoadError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), bytes = text.len(), "Fetched layer source");
        LayerSource::from_text(text).map_err(|e| LoadError::Preprocess(e.into()))
    }
}

/// Fetches and prepares layers.
pub struct LayerLoader<F> {
    fetcher: F,
    defaults: LayerDefaults,
}

impl<F: SourceFetcher> LayerLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            defaults: LayerDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: LayerDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Fetches the descriptor's source and preprocesses it on the blocking pool.
    ///
    /// Returns [`LoadError::Cancelled`] as soon as `cancellation` fires; a
    /// preprocessing task already running is left to finish and its result
    /// dropped.
    #[instrument(skip(self, descriptor, cancellation), fields(layer = %descriptor.id))]
    pub async fn load(
        &self,
        descriptor: LayerDescriptor,
        cancellation: CancellationToken,
    ) -> Result<Arc<PreparedLayer>, LoadError> {
        let source = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Err(LoadError::Cancelled),
            source = self.fetcher.fetch(&descriptor.url) => source?,
        };

        let raw = descriptor.into_raw(source);
        let defaults = self.defaults;
        let task = spawn_blocking(move || preprocess(&raw, &defaults));

        let layer = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                warn!("Layer load cancelled during preprocessing");
                return Err(LoadError::Cancelled);
            }
            joined = task => joined
                .map_err(|e| LoadError::Internal(format!("preprocess task panicked: {}", e)))??,
        };

        Ok(Arc::new(layer))
    }
}
