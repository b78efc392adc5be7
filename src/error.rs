//! Error types for AtlasConfig
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::value::FormatTag;

/// Result type alias using ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Unified error type for AtlasConfig operations
#[derive(Debug, Error)]
pub enum ConfigError {
    // -------------------------------------------------------------------------
    // Source Errors
    // -------------------------------------------------------------------------
    /// Table missing, unusable, lacking structural columns, or failing to fetch.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Cannot encode {found} value as {format}")]
    FormatMismatch { format: FormatTag, found: FormatTag },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key name: {0}")]
    NamingCollision(String),

    // -------------------------------------------------------------------------
    // Table Errors
    // -------------------------------------------------------------------------
    #[error("Table error: {0}")]
    Table(String),

    #[error("Table corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Returns true if this error reports an unusable settings source.
    pub fn is_source_error(&self) -> bool {
        matches!(self, ConfigError::InvalidSource(_))
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for ConfigError {
    fn from(err: bincode::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::NamingCollision("keys".to_string());
        assert_eq!(err.to_string(), "Invalid key name: keys");
    }

    #[test]
    fn test_format_mismatch_display() {
        let err = ConfigError::FormatMismatch {
            format: FormatTag::Integer,
            found: FormatTag::String,
        };
        assert_eq!(err.to_string(), "Cannot encode string value as integer");
    }

    #[test]
    fn test_is_source_error() {
        assert!(ConfigError::InvalidSource("x".into()).is_source_error());
        assert!(!ConfigError::Table("x".into()).is_source_error());
    }
}
