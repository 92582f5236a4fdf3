//! # Politigraph Common Library
//!
//! Shared code for the politigraph data tools:
//! - Run configuration (compiled defaults, TOML, environment)
//! - Common error type

pub mod config;
pub mod error;

pub use config::RunConfig;
pub use error::{Error, Result};
