//! Navigation action handlers.

use crate::core::action::{ActionEntry, FieldKind, FieldSpec};
use crate::core::error::VitrineError;
use serde_json::{json, Value as JsonValue};

pub const NAVIGATE: &str = "NAVIGATE";

pub(crate) fn entries() -> Vec<ActionEntry> {
    vec![ActionEntry {
        id: NAVIGATE,
        fields: &[
            FieldSpec { name: "to", kind: FieldKind::Str, required: true, min: None },
            FieldSpec { name: "replace", kind: FieldKind::Bool, required: false, min: None },
        ],
        run: run_navigate,
    }]
}

fn run_navigate(payload: &JsonValue, store_id: &str) -> Result<JsonValue, VitrineError> {
    Ok(json!({
        "service": "navigation",
        "op": "go",
        "storeId": store_id,
        "args": payload,
    }))
}
