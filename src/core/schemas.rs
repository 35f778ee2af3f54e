//! Database schema definitions for the document store.
//!
//! One SQLite database holds every composition document across tenants;
//! every row is scoped by `store_id` and every query filters on it.

pub const DOCUMENTS_DB_NAME: &str = "documents.db";

/// Append-only audit log written next to the database on every mutation.
pub const DOCUMENTS_EVENTS_NAME: &str = "documents.events.jsonl";

pub const DOCUMENTS_DB_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        store_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        key TEXT NOT NULL,
        status TEXT NOT NULL,
        tree TEXT NOT NULL,
        meta TEXT,
        content_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE(store_id, kind, key, status)
    )
";

pub const DOCUMENTS_DB_SCHEMA_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_documents_scope ON documents(store_id, kind, status)";
