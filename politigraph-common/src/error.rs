//! Common error types for politigraph

use thiserror::Error;

/// Common result type for politigraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the politigraph tools
#[derive(Error, Debug)]
pub enum Error {
    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::from(source);
        assert!(matches!(error, Error::Json(_)));
        assert!(error.to_string().starts_with("JSON error:"));
    }
}
