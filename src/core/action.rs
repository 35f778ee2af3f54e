//! Declarative action descriptors and the store-scoped dispatcher.
//!
//! Actions are the only way an authored tree triggers an operation. The
//! catalogue is closed: every `actionId` maps to a registry entry with a
//! declared payload shape and an executor. Dispatch validates the merged
//! payload wholesale, forces the current store id, and delegates the side
//! effect to the handler — nothing in the authored document is ever
//! executed as code.

use crate::core::binding;
use crate::core::context::RenderContext;
use crate::core::error::VitrineError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// Declarative action reference on a node event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub action_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, JsonValue>>,
    /// Payload fields resolved from the runtime context at dispatch time;
    /// resolved bindings win over static payload fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_bindings: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Num,
    Bool,
}

impl FieldKind {
    fn as_str(self) -> &'static str {
        match self {
            FieldKind::Str => "string",
            FieldKind::Int => "integer",
            FieldKind::Num => "number",
            FieldKind::Bool => "boolean",
        }
    }

    fn matches(self, value: &JsonValue) -> bool {
        match self {
            FieldKind::Str => value.is_string(),
            FieldKind::Int => value.is_i64() || value.is_u64(),
            FieldKind::Num => value.is_number(),
            FieldKind::Bool => value.is_boolean(),
        }
    }
}

/// One field of an action's declared payload shape.
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Lower bound for integer fields.
    pub min: Option<i64>,
}

/// Executor signature: `(validated payload, store id) -> effect record`.
/// Side effects belong to the collaborator services; the handler's job
/// ends at producing the validated, scoped invocation.
pub type ActionRun = fn(&JsonValue, &str) -> Result<JsonValue, VitrineError>;

pub struct ActionEntry {
    pub id: &'static str,
    pub fields: &'static [FieldSpec],
    pub run: ActionRun,
}

/// Keys a payload may NOT use to smuggle a tenant: the dispatcher forces
/// the request's store id instead of trusting the payload.
const TENANT_KEYS: &[&str] = &["storeId", "store_id"];

#[derive(Default)]
pub struct ActionRegistry {
    entries: Vec<ActionEntry>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: ActionEntry) {
        self.entries.push(entry);
    }

    pub fn lookup(&self, action_id: &str) -> Option<&ActionEntry> {
        self.entries.iter().find(|e| e.id == action_id)
    }

    pub fn action_ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// Dispatch a descriptor against the current request.
    ///
    /// Unknown id → `UnknownAction` (a configuration error, distinct from
    /// payload validation). Payload mismatches are rejected wholesale —
    /// either every field validates and the handler runs, or nothing does.
    pub fn dispatch(
        &self,
        descriptor: &ActionDescriptor,
        ctx: &RenderContext,
    ) -> Result<JsonValue, VitrineError> {
        let entry = self
            .lookup(&descriptor.action_id)
            .ok_or_else(|| VitrineError::UnknownAction(descriptor.action_id.clone()))?;

        let payload = effective_payload(descriptor, ctx)?;
        validate_payload(entry, &payload)?;
        (entry.run)(&JsonValue::Object(payload), &ctx.store_id)
    }
}

/// Static payload merged with resolved bindings (bindings win), with the
/// tenant id forced to the current store.
fn effective_payload(
    descriptor: &ActionDescriptor,
    ctx: &RenderContext,
) -> Result<Map<String, JsonValue>, VitrineError> {
    let mut payload = descriptor.payload.clone().unwrap_or_default();
    if let Some(bindings) = &descriptor.payload_bindings {
        for (field, path) in bindings {
            if let Some(value) = binding::resolve(path, &ctx.data) {
                payload.insert(field.clone(), value);
            }
        }
    }
    for key in TENANT_KEYS {
        if let Some(claimed) = payload.remove(*key) {
            if claimed.as_str() != Some(ctx.store_id.as_str()) {
                return Err(VitrineError::CrossTenant(format!(
                    "action payload claims tenant {} but request is scoped to {}",
                    claimed, ctx.store_id
                )));
            }
        }
    }
    Ok(payload)
}

/// Validate a merged payload against an entry's declared shape. Collects
/// every offending field so the editor can surface them all at once.
pub fn validate_payload(
    entry: &ActionEntry,
    payload: &Map<String, JsonValue>,
) -> Result<(), VitrineError> {
    let mut fails = Vec::new();

    for spec in entry.fields {
        match payload.get(spec.name) {
            None => {
                if spec.required {
                    fails.push(format!("{}: required", spec.name));
                }
            }
            Some(value) => {
                if !spec.kind.matches(value) {
                    fails.push(format!("{}: expected {}", spec.name, spec.kind.as_str()));
                } else if let Some(min) = spec.min {
                    if value.as_i64().is_some_and(|v| v < min) {
                        fails.push(format!("{}: must be >= {}", spec.name, min));
                    }
                }
            }
        }
    }

    for key in payload.keys() {
        if !entry.fields.iter().any(|spec| spec.name == key) {
            fails.push(format!("{}: not part of this action's shape", key));
        }
    }

    if fails.is_empty() {
        Ok(())
    } else {
        Err(VitrineError::ValidationError(format!(
            "payload for {} rejected: {}",
            entry.id,
            fails.join("; ")
        )))
    }
}
