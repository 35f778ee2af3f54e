//! Builder-surface authorization gate.
//!
//! Authorization lives with the host platform (its own RBAC, sessions,
//! API keys); the runtime treats it as a boolean precondition. Every
//! builder-facing operation passes through this gate before the store is
//! touched, so a denial leaves zero writes and zero reads.

use crate::core::document::{Document, DocumentKind, DocumentStatus, DocumentSummary};
use crate::core::error::VitrineError;
use crate::core::node::Node;
use crate::core::store::DocumentStore;
use serde_json::Value as JsonValue;

pub trait Authorizer {
    fn can_read(&self, store_id: &str) -> bool;
    fn can_write(&self, store_id: &str) -> bool;
}

/// For hosts that gate authorization upstream of the runtime.
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn can_read(&self, _store_id: &str) -> bool {
        true
    }

    fn can_write(&self, _store_id: &str) -> bool {
        true
    }
}

pub struct Gatekeeper<'a, A: Authorizer> {
    store: &'a DocumentStore,
    authorizer: A,
}

impl<'a, A: Authorizer> Gatekeeper<'a, A> {
    pub fn new(store: &'a DocumentStore, authorizer: A) -> Self {
        Self { store, authorizer }
    }

    fn ensure_read(&self, store_id: &str) -> Result<(), VitrineError> {
        if self.authorizer.can_read(store_id) {
            Ok(())
        } else {
            Err(VitrineError::CrossTenant(format!(
                "not authorized to read store {}",
                store_id
            )))
        }
    }

    fn ensure_write(&self, store_id: &str) -> Result<(), VitrineError> {
        if self.authorizer.can_write(store_id) {
            Ok(())
        } else {
            Err(VitrineError::CrossTenant(format!(
                "not authorized to write store {}",
                store_id
            )))
        }
    }

    pub fn save_draft(
        &self,
        store_id: &str,
        kind: DocumentKind,
        key: &str,
        tree: &Node,
        meta: Option<&JsonValue>,
    ) -> Result<Document, VitrineError> {
        self.ensure_write(store_id)?;
        self.store.save_draft(store_id, kind, key, tree, meta)
    }

    pub fn publish(
        &self,
        store_id: &str,
        kind: DocumentKind,
        key: &str,
    ) -> Result<Document, VitrineError> {
        self.ensure_write(store_id)?;
        self.store.publish(store_id, kind, key)
    }

    pub fn list_documents(
        &self,
        store_id: &str,
        kind: Option<DocumentKind>,
        status: Option<DocumentStatus>,
    ) -> Result<Vec<DocumentSummary>, VitrineError> {
        self.ensure_read(store_id)?;
        self.store.list_documents(store_id, kind, status)
    }

    pub fn get_document(&self, store_id: &str, id: &str) -> Result<Document, VitrineError> {
        self.ensure_read(store_id)?;
        self.store.get_document(store_id, id)
    }

    pub fn draft_for_edit(
        &self,
        store_id: &str,
        kind: DocumentKind,
        key: &str,
    ) -> Result<Document, VitrineError> {
        self.ensure_read(store_id)?;
        self.store.draft_for_edit(store_id, kind, key)
    }

    pub fn delete_document(&self, store_id: &str, id: &str) -> Result<(), VitrineError> {
        self.ensure_write(store_id)?;
        self.store.delete_document(store_id, id)
    }
}
