//! Save-time validation gates for document trees.
//!
//! Every structural invariant is checked before any DRAFT/PUBLISHED
//! write; a failed gate means zero writes. Failures accumulate so the
//! editor can surface all of them inline at once.
//!
//! # Gates
//!
//! - Node ids: non-empty, unique within the tree
//! - Component registry: every type registered, children only on containers
//! - Slot placement: exactly one in a LAYOUT, none anywhere else
//! - Prefab references: textual key present, no direct self-reference
//! - Style objects: the full style schema gate per node
//! - Events: action maps only use the closed event set

use crate::core::document::DocumentKind;
use crate::core::error::VitrineError;
use crate::core::node::{self, Node, NodeType, PROP_OVERRIDES};
use std::collections::HashSet;

/// Run the full gate for a document about to be written.
///
/// `key` is the document's own key; a PREFAB tree referencing it is a
/// direct self-reference and is rejected here (longer cycles are caught
/// at render time, since sibling documents change independently).
pub fn validate_document(
    kind: DocumentKind,
    key: &str,
    tree: &Node,
) -> Result<(), VitrineError> {
    let mut fails = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut slot_count = 0usize;
    check_node(kind, key, tree, &mut seen_ids, &mut slot_count, &mut fails);

    if kind == DocumentKind::Layout && slot_count != 1 {
        fails.push(format!(
            "a LAYOUT tree must contain exactly one Slot, found {}",
            slot_count
        ));
    }

    if fails.is_empty() {
        Ok(())
    } else {
        Err(VitrineError::ValidationError(format!(
            "document tree rejected: {}",
            fails.join("; ")
        )))
    }
}

fn check_node(
    kind: DocumentKind,
    own_key: &str,
    current: &Node,
    seen_ids: &mut HashSet<String>,
    slot_count: &mut usize,
    fails: &mut Vec<String>,
) {
    if current.id.is_empty() {
        fails.push("node with empty id".to_string());
    } else if !seen_ids.insert(current.id.clone()) {
        fails.push(format!("duplicate node id '{}'", current.id));
    }

    match node::component_spec(current.ty) {
        None => fails.push(format!(
            "node '{}': unregistered component type {}",
            current.id,
            current.ty.as_str()
        )),
        Some(spec) => {
            if !spec.container && current.children.as_ref().is_some_and(|c| !c.is_empty()) {
                fails.push(format!(
                    "node '{}': {} does not accept children",
                    current.id,
                    current.ty.as_str()
                ));
            }
        }
    }

    if current.ty == NodeType::Slot {
        *slot_count += 1;
        if kind != DocumentKind::Layout {
            fails.push(format!(
                "node '{}': Slot is only valid inside a LAYOUT tree",
                current.id
            ));
        }
    }

    if current.ty == NodeType::PrefabInstance {
        match current.prefab_key() {
            None | Some("") => fails.push(format!(
                "node '{}': PrefabInstance requires a textual 'prefab' prop",
                current.id
            )),
            Some(referenced) => {
                if kind == DocumentKind::Prefab && referenced == own_key {
                    fails.push(format!(
                        "node '{}': prefab references its own document '{}'",
                        current.id, referenced
                    ));
                }
            }
        }
        if let Some(overrides) = current.props.get(PROP_OVERRIDES) {
            if !overrides.is_object() {
                fails.push(format!(
                    "node '{}': 'overrides' must be an object",
                    current.id
                ));
            }
        }
    }

    if let Some(styles) = &current.styles {
        styles.collect_failures(&format!("node '{}'", current.id), fails);
    }

    if let Some(actions) = &current.actions {
        for event in actions.keys() {
            if !node::EVENTS.contains(&event.as_str()) {
                fails.push(format!(
                    "node '{}': unknown event '{}'",
                    current.id, event
                ));
            }
        }
    }

    for child in current.child_nodes() {
        check_node(kind, own_key, child, seen_ids, slot_count, fails);
    }
}
