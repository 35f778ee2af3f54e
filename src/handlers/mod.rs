//! Builtin action handlers — one module per collaborator service.
//!
//! Adding an action: append its entry in the owning module's `entries()`
//! and it is picked up here.

pub mod cart;
pub mod discount;
pub mod navigation;

use crate::core::action::ActionRegistry;

/// The closed builtin catalogue. Hosts may register further entries on
/// the returned registry.
pub fn builtin_registry() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    for entry in cart::entries() {
        registry.register(entry);
    }
    for entry in discount::entries() {
        registry.register(entry);
    }
    for entry in navigation::entries() {
        registry.register(entry);
    }
    registry
}
