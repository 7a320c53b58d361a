//! Error types for elastic-scout.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// The main error type.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// A record or engine was set up in a way that cannot produce a payload.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A caller passed a value the builder or payload cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure reported by the search transport client.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failure reported by the backing record store.
    #[error("Store error: {0}")]
    Store(String),

    /// The target index does not exist on the search engine.
    #[error("Index {name} doesn't exist")]
    IndexNotFound { name: String },

    /// An administration step on a named index failed.
    #[error("Failed to {operation} index {name}: {source}")]
    IndexOperation {
        operation: &'static str,
        name: String,
        source: Box<ScoutError>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScoutError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        ScoutError::Configuration(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ScoutError::InvalidArgument(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        ScoutError::Transport(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        ScoutError::Store(msg.into())
    }

    pub fn index_not_found(name: impl Into<String>) -> Self {
        ScoutError::IndexNotFound { name: name.into() }
    }

    pub fn index_operation(
        operation: &'static str,
        name: impl Into<String>,
        source: ScoutError,
    ) -> Self {
        ScoutError::IndexOperation {
            operation,
            name: name.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_not_found_message_names_index() {
        let err = ScoutError::index_not_found("products");
        assert_eq!(err.to_string(), "Index products doesn't exist");
    }

    #[test]
    fn test_index_operation_names_index_and_keeps_source() {
        use std::error::Error as _;

        let err = ScoutError::index_operation("close", "products", ScoutError::transport("timeout"));
        assert_eq!(
            err.to_string(),
            "Failed to close index products: Transport error: timeout"
        );
        assert_eq!(
            err.source().map(|source| source.to_string()),
            Some("Transport error: timeout".to_string())
        );
    }

    #[test]
    fn test_anyhow_conversion_is_transparent() {
        let err: ScoutError = anyhow::anyhow!("connection refused").into();
        assert_eq!(err.to_string(), "connection refused");
    }
}
