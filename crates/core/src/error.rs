//! Error types for configuration, external services and the game itself.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid or unreadable game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid hex color {0:?}")]
    Color(String),
}

/// Failure reported by an external collaborator (config source, score service).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors surfaced by [`GameState`](crate::GameState) operations.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("game is not prepared")]
    NotPrepared,
}
