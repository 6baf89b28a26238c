//! Configuration file loading
//!
//! The file is a JSON object shaped like [`ComposerConfig`]. Missing fields
//! keep their defaults, so `{}` is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use compose_core::{ComposerConfig, ConfigError};
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(ConfigError),
}

/// Parses and validates a configuration document
pub fn parse_config(text: &str) -> Result<ComposerConfig, ConfigLoadError> {
    let config: ComposerConfig = serde_json::from_str(text)?;
    if let Err(err) = config.validate() {
        warn!(error = %err, "rejected composer configuration");
        return Err(ConfigLoadError::Invalid(err));
    }
    Ok(config)
}

/// Reads, parses and validates a configuration file
pub fn load_config(path: &Path) -> Result<ComposerConfig, ConfigLoadError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text)?;
    debug!(path = %path.display(), capacity = config.capacity, "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, ComposerConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse_config(r#"{"capacity": 40, "timing": {"multitap_ms": 300}}"#).unwrap();
        assert_eq!(config.capacity, 40);
        assert_eq!(config.timing.multitap_ms, 300);
        // Untouched fields keep their defaults
        assert_eq!(config.timing.long_press_ms, 500);
        assert_eq!(config.geometry.chars_per_line, 10);
    }

    #[test]
    fn test_malformed_json() {
        let result = parse_config("{ capacity: ");
        assert!(matches!(result, Err(ConfigLoadError::Parse(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = parse_config(r#"{"capacity": 0}"#);
        assert!(matches!(
            result,
            Err(ConfigLoadError::Invalid(ConfigError::ZeroCapacity))
        ));
    }
}
