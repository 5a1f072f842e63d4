use std::io;

use thiserror::Error;

use crate::database::ValidationError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    // ==== System / External ====
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    // ==== Index consistency ====
    #[error("Index invariant violated: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cached height {cached} differs from computed height {computed}")]
    HeightMismatch { cached: usize, computed: usize },
}
