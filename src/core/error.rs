use rusqlite;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitrineError {
    #[error("SQLite error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Cross-tenant violation: {0}")]
    CrossTenant(String),
}
