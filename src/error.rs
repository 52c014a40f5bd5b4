//! Crate-wide error taxonomy.
//!
//! Four conditions cover everything the engine can fail with; none of them
//! is retried at this layer. Retry policy belongs to the embedding
//! application.

use crate::types::Kind;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed or missing schema definition. Fatal, surfaced immediately.
    #[error("schema error: {0}")]
    Schema(String),

    /// The dotted key matched no node in the schema tree.
    #[error("configuration key not found: {0}")]
    KeyNotFound(String),

    /// A stored override string does not parse as the schema-declared type.
    ///
    /// Never substituted by the default value: a stored value that stopped
    /// parsing is a data-corruption signal, not a missing override.
    #[error("cannot coerce {value:?} at {key} to {kind}")]
    TypeCoercion {
        key: String,
        value: String,
        kind: Kind,
    },

    /// The backing store failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::Persistence(err.to_string())
    }
}

impl From<refinery::Error> for ConfigError {
    fn from(err: refinery::Error) -> Self {
        ConfigError::Persistence(err.to_string())
    }
}
