use thiserror::Error;

/// Failures at the crate's I/O and storage boundary. Parsing itself never
/// fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid enrichment payload: {0}")]
    InvalidEnrichment(String),

    #[error("module not found: {0}")]
    ModuleNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
