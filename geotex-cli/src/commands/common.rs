//! Helpers shared across CLI commands.

use std::path::Path;

use geotex::config::ConfigFile;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CliError;

/// Loads the configuration file, or defaults when none was given.
///
/// A path that does not exist also yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    match path {
        Some(path) => {
            let config = ConfigFile::load_from(path)?;
            debug!(path = %path.display(), ?config, "Loaded configuration");
            Ok(config)
        }
        None => Ok(ConfigFile::default()),
    }
}

/// Returns a token that is cancelled when the user presses Ctrl-C.
pub fn cancel_on_ctrl_c() -> Result<CancellationToken, CliError> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        warn!("Interrupted, cancelling");
        handler_token.cancel();
    })
    .map_err(|e| CliError::Signal(e.to_string()))?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_config_path_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_config_path_is_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geotex.ini");
        std::fs::write(&path, "[raster]\nstroke_width = 5\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.raster.stroke_width(), 5.0);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("geotex.ini");
        std::fs::write(&path, "[layer]\nmin_zoom = high\n").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(CliError::Config(_))
        ));
    }
}
