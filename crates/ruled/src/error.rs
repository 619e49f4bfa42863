//! Error types for the extraction layer.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Geometry
//! degeneracy (a page without rulings, a grid without cells) is never
//! an error; only configuration, I/O, and serialization can fail.

use crate::config::ConfigError;
use thiserror::Error;

/// Error type for document extraction and output.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Invalid extraction configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error decoding a page dump or encoding the result document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_config_error_wrapped() {
        let err: ExtractError = ConfigError::InvertedRange { start: 5, end: 2 }.into();
        assert!(err.to_string().contains("configuration error"));
    }
}
