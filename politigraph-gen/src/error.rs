//! Error types for politigraph-gen

use crate::client::GraphQlError;
use thiserror::Error;

/// Result type for generator operations
pub type GenResult<T> = std::result::Result<T, GenError>;

/// Generator error type
///
/// Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum GenError {
    /// Transport or protocol failure talking to the GraphQL endpoint
    #[error("Fetch failed: {0}")]
    Fetch(#[from] GraphQlError),

    /// Fetched record does not have the expected shape
    #[error("Transform failed: {0}")]
    Transform(String),

    /// Writing output tables failed
    #[error("Output failed for {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// politigraph-common error
    #[error("Common error: {0}")]
    Common(#[from] politigraph_common::Error),
}
