use crate::core::error;
use crate::core::schemas;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub fn db_connect(db_path: &str) -> Result<Connection, error::VitrineError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(error::VitrineError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(error::VitrineError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(error::VitrineError::RusqliteError)?;
    Ok(conn)
}

pub fn documents_db_path(root: &Path) -> PathBuf {
    root.join(schemas::DOCUMENTS_DB_NAME)
}

pub fn initialize_documents_db(root: &Path) -> Result<(), error::VitrineError> {
    let db_path = documents_db_path(root);
    if let Some(parent_dir) = db_path.parent() {
        fs::create_dir_all(parent_dir).map_err(error::VitrineError::IoError)?;
    }

    let conn = db_connect(&db_path.to_string_lossy())?;
    conn.execute(schemas::DOCUMENTS_DB_SCHEMA, [])?;
    conn.execute(schemas::DOCUMENTS_DB_SCHEMA_INDEX, [])?;
    Ok(())
}
