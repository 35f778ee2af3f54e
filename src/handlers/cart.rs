//! Cart action handlers.
//!
//! Handlers emit effect records for the cart collaborator service; they
//! do not mutate cart state themselves. The dispatcher has already
//! validated the payload and forced the store scope by the time `run`
//! executes.

use crate::core::action::{ActionEntry, FieldKind, FieldSpec};
use crate::core::error::VitrineError;
use serde_json::{json, Value as JsonValue};

pub const ADD_TO_CART: &str = "ADD_TO_CART";
pub const REMOVE_FROM_CART: &str = "REMOVE_FROM_CART";
pub const UPDATE_QUANTITY: &str = "UPDATE_QUANTITY";

pub(crate) fn entries() -> Vec<ActionEntry> {
    vec![
        ActionEntry {
            id: ADD_TO_CART,
            fields: &[
                FieldSpec { name: "variantId", kind: FieldKind::Str, required: true, min: None },
                FieldSpec { name: "quantity", kind: FieldKind::Int, required: false, min: Some(1) },
            ],
            run: run_add_to_cart,
        },
        ActionEntry {
            id: REMOVE_FROM_CART,
            fields: &[
                FieldSpec { name: "lineId", kind: FieldKind::Str, required: true, min: None },
            ],
            run: run_remove_from_cart,
        },
        ActionEntry {
            id: UPDATE_QUANTITY,
            fields: &[
                FieldSpec { name: "lineId", kind: FieldKind::Str, required: true, min: None },
                // Zero removes the line.
                FieldSpec { name: "quantity", kind: FieldKind::Int, required: true, min: Some(0) },
            ],
            run: run_update_quantity,
        },
    ]
}

fn run_add_to_cart(payload: &JsonValue, store_id: &str) -> Result<JsonValue, VitrineError> {
    Ok(json!({
        "service": "cart",
        "op": "add_line",
        "storeId": store_id,
        "args": payload,
    }))
}

fn run_remove_from_cart(payload: &JsonValue, store_id: &str) -> Result<JsonValue, VitrineError> {
    Ok(json!({
        "service": "cart",
        "op": "remove_line",
        "storeId": store_id,
        "args": payload,
    }))
}

fn run_update_quantity(payload: &JsonValue, store_id: &str) -> Result<JsonValue, VitrineError> {
    Ok(json!({
        "service": "cart",
        "op": "set_line_quantity",
        "storeId": store_id,
        "args": payload,
    }))
}
