//! Document data model: kinds, publish status, identity, template keys.
//!
//! A document is one versioned node tree for one store. DRAFT and
//! PUBLISHED rows for the same `(store_id, kind, key)` may diverge; the
//! editor reads DRAFT, the live storefront reads PUBLISHED.

use crate::core::node::Node;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// What a document's tree composes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// Page chrome wrapping other documents; its tree carries exactly one `Slot`.
    Layout,
    /// A standalone storefront page.
    Page,
    /// A per-product-type page, keyed `PDP:<schema_id>`.
    Template,
    /// A reusable subtree referenced (never copied) by `PrefabInstance` nodes.
    Prefab,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Layout => "LAYOUT",
            DocumentKind::Page => "PAGE",
            DocumentKind::Template => "TEMPLATE",
            DocumentKind::Prefab => "PREFAB",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "LAYOUT" => Some(DocumentKind::Layout),
            "PAGE" => Some(DocumentKind::Page),
            "TEMPLATE" => Some(DocumentKind::Template),
            "PREFAB" => Some(DocumentKind::Prefab),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Draft,
    Published,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::Published => "PUBLISHED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DRAFT" => Some(DocumentStatus::Draft),
            "PUBLISHED" => Some(DocumentStatus::Published),
            _ => None,
        }
    }
}

/// One persisted row of the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Row id (ULID). Empty for an editor-synthesized, never-saved draft.
    pub id: String,
    pub store_id: String,
    pub kind: DocumentKind,
    pub key: String,
    pub status: DocumentStatus,
    pub tree: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<JsonValue>,
    pub created_at: String,
    pub updated_at: String,
}

/// Listing row for the builder surface.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub kind: DocumentKind,
    pub key: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub updated_at: String,
}

/// Meta key naming the LAYOUT document a PAGE or TEMPLATE renders inside.
pub const META_LAYOUT: &str = "layout";
pub const META_TITLE: &str = "title";

pub const TEMPLATE_DEFAULT_KEY: &str = "PDP:default";

/// Template documents key off a product-schema id; no schema means the
/// store-wide default template.
pub fn template_key(schema_id: Option<&str>) -> String {
    match schema_id {
        Some(id) if !id.is_empty() => format!("PDP:{}", id),
        _ => TEMPLATE_DEFAULT_KEY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_key_derivation() {
        assert_eq!(template_key(Some("apparel")), "PDP:apparel");
        assert_eq!(template_key(Some("")), "PDP:default");
        assert_eq!(template_key(None), "PDP:default");
    }

    #[test]
    fn test_kind_round_trips_through_text() {
        for kind in [
            DocumentKind::Layout,
            DocumentKind::Page,
            DocumentKind::Template,
            DocumentKind::Prefab,
        ] {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentKind::parse("WIDGET"), None);
    }
}
