//! Discount action handlers.

use crate::core::action::{ActionEntry, FieldKind, FieldSpec};
use crate::core::error::VitrineError;
use serde_json::{json, Value as JsonValue};

pub const APPLY_DISCOUNT: &str = "APPLY_DISCOUNT";

pub(crate) fn entries() -> Vec<ActionEntry> {
    vec![ActionEntry {
        id: APPLY_DISCOUNT,
        fields: &[
            FieldSpec { name: "code", kind: FieldKind::Str, required: true, min: None },
        ],
        run: run_apply_discount,
    }]
}

fn run_apply_discount(payload: &JsonValue, store_id: &str) -> Result<JsonValue, VitrineError> {
    Ok(json!({
        "service": "discount",
        "op": "apply_code",
        "storeId": store_id,
        "args": payload,
    }))
}
