//! Node trees and the closed component vocabulary.
//!
//! Components are a closed tagged union: the builder can only author types
//! listed in [`COMPONENTS`]. Unknown types fail deserialization, so no
//! runtime type inspection exists anywhere downstream.

use crate::core::action::ActionDescriptor;
use crate::core::style::StyleObject;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Section,
    Stack,
    Text,
    Image,
    Button,
    Link,
    ProductCard,
    ProductGallery,
    Price,
    Slot,
    PrefabInstance,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Section => "Section",
            NodeType::Stack => "Stack",
            NodeType::Text => "Text",
            NodeType::Image => "Image",
            NodeType::Button => "Button",
            NodeType::Link => "Link",
            NodeType::ProductCard => "ProductCard",
            NodeType::ProductGallery => "ProductGallery",
            NodeType::Price => "Price",
            NodeType::Slot => "Slot",
            NodeType::PrefabInstance => "PrefabInstance",
        }
    }
}

/// Per-type component contract consulted by validation and the renderer.
pub struct ComponentSpec {
    pub ty: NodeType,
    /// Whether the node may carry children.
    pub container: bool,
}

/// The component registry. Adding a component: append one entry here and
/// extend `NodeType`; everything else (validation, rendering) follows the
/// table.
pub const COMPONENTS: &[ComponentSpec] = &[
    ComponentSpec { ty: NodeType::Section, container: true },
    ComponentSpec { ty: NodeType::Stack, container: true },
    ComponentSpec { ty: NodeType::Text, container: false },
    ComponentSpec { ty: NodeType::Image, container: false },
    ComponentSpec { ty: NodeType::Button, container: true },
    ComponentSpec { ty: NodeType::Link, container: true },
    ComponentSpec { ty: NodeType::ProductCard, container: false },
    ComponentSpec { ty: NodeType::ProductGallery, container: false },
    ComponentSpec { ty: NodeType::Price, container: false },
    ComponentSpec { ty: NodeType::Slot, container: false },
    ComponentSpec { ty: NodeType::PrefabInstance, container: false },
];

pub fn component_spec(ty: NodeType) -> Option<&'static ComponentSpec> {
    COMPONENTS.iter().find(|c| c.ty == ty)
}

/// Closed set of interaction events a node may wire actions to.
pub const EVENTS: &[&str] = &["click", "hover", "focus", "submit"];

/// Prop key holding the PREFAB document key on a `PrefabInstance`.
pub const PROP_PREFAB: &str = "prefab";
/// Prop key holding the instance-local prop overrides on a `PrefabInstance`.
pub const PROP_OVERRIDES: &str = "overrides";

/// One element of a document tree.
///
/// `props` is an open bag: consumers treat unknown keys as inert data,
/// never as instructions. Everything else is closed vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub ty: NodeType,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<StyleObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeMap<String, ActionDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

impl Node {
    /// The PREFAB key a `PrefabInstance` references, when present and textual.
    pub fn prefab_key(&self) -> Option<&str> {
        self.props.get(PROP_PREFAB).and_then(|v| v.as_str())
    }

    /// Default tree synthesized for an editor read of a never-saved draft.
    pub fn default_tree() -> Node {
        Node {
            id: "root".to_string(),
            ty: NodeType::Section,
            props: Map::new(),
            styles: None,
            bindings: None,
            actions: None,
            children: None,
        }
    }

    pub fn child_nodes(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_component_type_fails_deserialization() {
        let raw = r#"{"id": "n1", "type": "Marquee"}"#;
        assert!(serde_json::from_str::<Node>(&raw).is_err());
    }

    #[test]
    fn test_absent_optional_fields_stay_absent_on_round_trip() {
        let raw = r#"{"id":"n1","type":"Text","props":{"text":"hi"}}"#;
        let node: Node = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_value(&node).unwrap();
        let obj = back.as_object().unwrap();
        assert!(!obj.contains_key("styles"));
        assert!(!obj.contains_key("bindings"));
        assert!(!obj.contains_key("actions"));
        assert!(!obj.contains_key("children"));
    }

    #[test]
    fn test_every_node_type_has_a_registry_entry() {
        for spec in COMPONENTS {
            assert_eq!(component_spec(spec.ty).map(|s| s.ty), Some(spec.ty));
        }
    }
}
