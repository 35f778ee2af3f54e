//! SQLite-backed document store with atomic draft→published promotion.
//!
//! This is the thin waist for storefront document state: every mutation
//! routes through here, is tenant-scoped, and appends an audit event to
//! `documents.events.jsonl` carrying a content hash of the written tree.
//!
//! Concurrency: `publish` is the only operation needing atomicity — the
//! read-DRAFT-then-upsert-PUBLISHED sequence runs inside one IMMEDIATE
//! transaction so a concurrent draft save cannot interleave into a
//! partially-applied publish. Concurrent publishes on the same key are
//! last-writer-wins via SQLite's normal write ordering.

use crate::core::db;
use crate::core::document::{
    Document, DocumentKind, DocumentStatus, DocumentSummary, META_TITLE,
};
use crate::core::error::VitrineError;
use crate::core::node::Node;
use crate::core::schemas;
use crate::core::time;
use crate::core::validate;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use ulid::Ulid;

pub struct DocumentStore {
    db_path: PathBuf,
    events_path: PathBuf,
}

/// One line of the mutation audit log.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DocumentEvent {
    pub ts: String,
    pub event_id: String,
    pub store_id: String,
    pub op: String,
    pub kind: String,
    pub key: String,
    pub status: String,
    pub content_hash: String,
}

struct Row {
    id: String,
    store_id: String,
    kind: String,
    key: String,
    status: String,
    tree: String,
    meta: Option<String>,
    created_at: String,
    updated_at: String,
}

const ROW_COLUMNS: &str = "id, store_id, kind, key, status, tree, meta, created_at, updated_at";

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    Ok(Row {
        id: row.get(0)?,
        store_id: row.get(1)?,
        kind: row.get(2)?,
        key: row.get(3)?,
        status: row.get(4)?,
        tree: row.get(5)?,
        meta: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn row_to_document(row: Row) -> Result<Document, VitrineError> {
    let kind = DocumentKind::parse(&row.kind).ok_or_else(|| {
        VitrineError::ValidationError(format!("corrupt document row {}: kind {}", row.id, row.kind))
    })?;
    let status = DocumentStatus::parse(&row.status).ok_or_else(|| {
        VitrineError::ValidationError(format!(
            "corrupt document row {}: status {}",
            row.id, row.status
        ))
    })?;
    let tree: Node = serde_json::from_str(&row.tree)?;
    let meta: Option<JsonValue> = row.meta.as_deref().map(serde_json::from_str).transpose()?;
    Ok(Document {
        id: row.id,
        store_id: row.store_id,
        kind,
        key: row.key,
        status,
        tree,
        meta,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl DocumentStore {
    /// Open (creating if needed) the document store under `root`.
    pub fn open(root: &Path) -> Result<Self, VitrineError> {
        db::initialize_documents_db(root)?;
        Ok(Self {
            db_path: db::documents_db_path(root),
            events_path: root.join(schemas::DOCUMENTS_EVENTS_NAME),
        })
    }

    fn conn(&self) -> Result<Connection, VitrineError> {
        db::db_connect(&self.db_path.to_string_lossy())
    }

    /// Validate and create-or-overwrite the DRAFT row. Zero writes on a
    /// failed gate.
    pub fn save_draft(
        &self,
        store_id: &str,
        kind: DocumentKind,
        key: &str,
        tree: &Node,
        meta: Option<&JsonValue>,
    ) -> Result<Document, VitrineError> {
        validate::validate_document(kind, key, tree)?;
        let tree_json = serde_json::to_string(tree)?;
        let meta_json = meta.map(serde_json::to_string).transpose()?;
        let hash = time::content_hash(&tree_json);
        let now = time::now_epoch_z();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO documents(id, store_id, kind, key, status, tree, meta, content_hash, created_at, updated_at)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             ON CONFLICT(store_id, kind, key, status) DO UPDATE SET
                 tree = excluded.tree,
                 meta = excluded.meta,
                 content_hash = excluded.content_hash,
                 updated_at = excluded.updated_at",
            params![
                Ulid::new().to_string(),
                store_id,
                kind.as_str(),
                key,
                DocumentStatus::Draft.as_str(),
                tree_json,
                meta_json,
                hash,
                now
            ],
        )?;

        self.log_event(store_id, "document.save_draft", kind, key, DocumentStatus::Draft, &hash)?;
        self.get(store_id, kind, key, DocumentStatus::Draft)
    }

    /// Atomically promote the current DRAFT onto PUBLISHED
    /// (create-if-absent else overwrite). The draft's serialized tree and
    /// meta are copied verbatim, so republishing an unchanged draft is
    /// byte-identical.
    pub fn publish(
        &self,
        store_id: &str,
        kind: DocumentKind,
        key: &str,
    ) -> Result<Document, VitrineError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let draft: Option<(String, Option<String>, String)> = tx
            .query_row(
                "SELECT tree, meta, content_hash FROM documents
                 WHERE store_id = ?1 AND kind = ?2 AND key = ?3 AND status = ?4",
                params![store_id, kind.as_str(), key, DocumentStatus::Draft.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((tree_json, meta_json, hash)) = draft else {
            return Err(VitrineError::NotFound(format!(
                "no draft to publish for {} {} '{}'",
                store_id,
                kind.as_str(),
                key
            )));
        };

        let now = time::now_epoch_z();
        tx.execute(
            "INSERT INTO documents(id, store_id, kind, key, status, tree, meta, content_hash, created_at, updated_at)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             ON CONFLICT(store_id, kind, key, status) DO UPDATE SET
                 tree = excluded.tree,
                 meta = excluded.meta,
                 content_hash = excluded.content_hash,
                 updated_at = excluded.updated_at",
            params![
                Ulid::new().to_string(),
                store_id,
                kind.as_str(),
                key,
                DocumentStatus::Published.as_str(),
                tree_json,
                meta_json,
                hash,
                now
            ],
        )?;
        tx.commit()?;

        self.log_event(store_id, "document.publish", kind, key, DocumentStatus::Published, &hash)?;
        self.get(store_id, kind, key, DocumentStatus::Published)
    }

    /// Keyed lookup of one row.
    pub fn get(
        &self,
        store_id: &str,
        kind: DocumentKind,
        key: &str,
        status: DocumentStatus,
    ) -> Result<Document, VitrineError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM documents
                     WHERE store_id = ?1 AND kind = ?2 AND key = ?3 AND status = ?4",
                    ROW_COLUMNS
                ),
                params![store_id, kind.as_str(), key, status.as_str()],
                read_row,
            )
            .optional()?;
        match row {
            Some(row) => row_to_document(row),
            None => Err(VitrineError::NotFound(format!(
                "{} {} '{}' has no {} row",
                store_id,
                kind.as_str(),
                key,
                status.as_str()
            ))),
        }
    }

    /// Lookup by row id. A row owned by another store is a cross-tenant
    /// violation, not a not-found.
    pub fn get_document(&self, store_id: &str, id: &str) -> Result<Document, VitrineError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM documents WHERE id = ?1", ROW_COLUMNS),
                params![id],
                read_row,
            )
            .optional()?;
        match row {
            None => Err(VitrineError::NotFound(format!("document {}", id))),
            Some(row) if row.store_id != store_id => Err(VitrineError::CrossTenant(format!(
                "document {} belongs to store {}",
                id, row.store_id
            ))),
            Some(row) => row_to_document(row),
        }
    }

    /// The editor read: the DRAFT row, or a synthesized default tree when
    /// none was ever saved (id stays empty until the first draft save).
    pub fn draft_for_edit(
        &self,
        store_id: &str,
        kind: DocumentKind,
        key: &str,
    ) -> Result<Document, VitrineError> {
        match self.get(store_id, kind, key, DocumentStatus::Draft) {
            Ok(doc) => Ok(doc),
            Err(VitrineError::NotFound(_)) => {
                let now = time::now_epoch_z();
                Ok(Document {
                    id: String::new(),
                    store_id: store_id.to_string(),
                    kind,
                    key: key.to_string(),
                    status: DocumentStatus::Draft,
                    tree: Node::default_tree(),
                    meta: None,
                    created_at: now.clone(),
                    updated_at: now,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Filtered listing, stable (kind, key, status) order.
    pub fn list_documents(
        &self,
        store_id: &str,
        kind: Option<DocumentKind>,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<DocumentSummary>, VitrineError> {
        let mut sql = String::from(
            "SELECT id, kind, key, status, meta, updated_at FROM documents WHERE store_id = ?",
        );
        let mut args: Vec<String> = vec![store_id.to_string()];
        if let Some(kind) = kind {
            sql.push_str(" AND kind = ?");
            args.push(kind.as_str().to_string());
        }
        if let Some(status) = status {
            sql.push_str(" AND status = ?");
            args.push(status.as_str().to_string());
        }
        sql.push_str(" ORDER BY kind, key, status");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, kind_raw, key, status_raw, meta, updated_at) = row?;
            let kind = DocumentKind::parse(&kind_raw).ok_or_else(|| {
                VitrineError::ValidationError(format!("corrupt document row {}: kind {}", id, kind_raw))
            })?;
            let status = DocumentStatus::parse(&status_raw).ok_or_else(|| {
                VitrineError::ValidationError(format!(
                    "corrupt document row {}: status {}",
                    id, status_raw
                ))
            })?;
            let title = meta
                .as_deref()
                .and_then(|m| serde_json::from_str::<JsonValue>(m).ok())
                .and_then(|m| m.get(META_TITLE).and_then(|t| t.as_str()).map(String::from));
            summaries.push(DocumentSummary { id, kind, key, status, title, updated_at });
        }
        Ok(summaries)
    }

    /// Remove exactly one row. Deleting a DRAFT never touches PUBLISHED,
    /// and vice versa.
    pub fn delete_document(&self, store_id: &str, id: &str) -> Result<(), VitrineError> {
        let conn = self.conn()?;
        let row: Option<(String, String, String, String, String)> = conn
            .query_row(
                "SELECT store_id, kind, key, status, content_hash FROM documents WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((owner, kind, key, status, hash)) = row else {
            return Err(VitrineError::NotFound(format!("document {}", id)));
        };
        if owner != store_id {
            return Err(VitrineError::CrossTenant(format!(
                "document {} belongs to store {}",
                id, owner
            )));
        }

        conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        self.append_event(DocumentEvent {
            ts: time::now_epoch_z(),
            event_id: time::new_event_id(),
            store_id: store_id.to_string(),
            op: "document.delete".to_string(),
            kind,
            key,
            status,
            content_hash: hash,
        })
    }

    fn log_event(
        &self,
        store_id: &str,
        op: &str,
        kind: DocumentKind,
        key: &str,
        status: DocumentStatus,
        content_hash: &str,
    ) -> Result<(), VitrineError> {
        self.append_event(DocumentEvent {
            ts: time::now_epoch_z(),
            event_id: time::new_event_id(),
            store_id: store_id.to_string(),
            op: op.to_string(),
            kind: kind.as_str().to_string(),
            key: key.to_string(),
            status: status.as_str().to_string(),
            content_hash: content_hash.to_string(),
        })
    }

    fn append_event(&self, event: DocumentEvent) -> Result<(), VitrineError> {
        use std::fs::OpenOptions;
        use std::io::Write;

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)
            .map_err(VitrineError::IoError)?;
        writeln!(f, "{}", serde_json::to_string(&event)?).map_err(VitrineError::IoError)?;
        Ok(())
    }
}
