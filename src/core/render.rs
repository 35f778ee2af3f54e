//! Rendering runtime: walks a document's tree and composes the resolved
//! presentation per node.
//!
//! The runtime is the root of the composition flow. Per node it asks the
//! style compiler for one flat map per present layer, the binding
//! resolver for effective props, and the action registry for wired
//! actions. Layouts are composed by splicing the target tree into the
//! layout's single `Slot`; prefabs are resolved by reference at render
//! time, never inlined at save time.
//!
//! Store-authored content degrades instead of crashing a live page:
//! dangling or cyclic prefab references render a visible
//! `BrokenReference` placeholder, unknown action ids are wired broken,
//! and both are reported on the page's warning list.

use crate::core::action::{ActionDescriptor, ActionRegistry};
use crate::core::binding;
use crate::core::context::RenderContext;
use crate::core::document::{
    Document, DocumentKind, DocumentStatus, META_LAYOUT, TEMPLATE_DEFAULT_KEY, template_key,
};
use crate::core::error::VitrineError;
use crate::core::node::{Node, NodeType, PROP_OVERRIDES};
use crate::core::store::DocumentStore;
use crate::core::style_compiler::{self, FlatStyleMap};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// Which side of the draft/publish split a request renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// The live storefront: PUBLISHED rows only.
    Live,
    /// The builder preview: DRAFT rows, falling back to PUBLISHED for
    /// referenced layouts and prefabs that have no draft yet.
    Editor,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Live => "live",
            RenderMode::Editor => "editor",
        }
    }

    pub fn parse(raw: &str) -> Option<RenderMode> {
        match raw {
            "live" => Some(RenderMode::Live),
            "editor" => Some(RenderMode::Editor),
            _ => None,
        }
    }
}

/// Placeholder type emitted for dangling or cyclic prefab references.
pub const BROKEN_REFERENCE: &str = "BrokenReference";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub store_id: String,
    pub kind: DocumentKind,
    pub key: String,
    pub mode: String,
    /// Root-scope custom properties (`--token` → value).
    pub theme_vars: BTreeMap<String, String>,
    pub root: RenderedNode,
    /// Configuration problems encountered while rendering (unknown
    /// actions, broken references). Reported, never fatal.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    pub id: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, JsonValue>,
    /// One compiled flat map per layer the node's style object carries.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<&'static str, FlatStyleMap>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub actions: BTreeMap<String, WiredAction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WiredAction {
    pub action_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, JsonValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_bindings: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub broken: bool,
}

pub struct Renderer<'a> {
    store: &'a DocumentStore,
    registry: &'a ActionRegistry,
}

impl<'a> Renderer<'a> {
    pub fn new(store: &'a DocumentStore, registry: &'a ActionRegistry) -> Self {
        Self { store, registry }
    }

    pub fn render_page(
        &self,
        ctx: &RenderContext,
        key: &str,
        mode: RenderMode,
    ) -> Result<RenderedPage, VitrineError> {
        self.render_document(ctx, DocumentKind::Page, key, mode)
    }

    /// Render the template for a product-schema id. Live rendering falls
    /// back to `PDP:default` when no schema-specific template is
    /// published; the editor edits exactly the key it asked for.
    pub fn render_template(
        &self,
        ctx: &RenderContext,
        schema_id: Option<&str>,
        mode: RenderMode,
    ) -> Result<RenderedPage, VitrineError> {
        let key = template_key(schema_id);
        match mode {
            RenderMode::Editor => self.render_document(ctx, DocumentKind::Template, &key, mode),
            RenderMode::Live => {
                match self.render_document(ctx, DocumentKind::Template, &key, mode) {
                    Err(VitrineError::NotFound(_)) if key != TEMPLATE_DEFAULT_KEY => {
                        self.render_document(ctx, DocumentKind::Template, TEMPLATE_DEFAULT_KEY, mode)
                    }
                    other => other,
                }
            }
        }
    }

    pub fn render_document(
        &self,
        ctx: &RenderContext,
        kind: DocumentKind,
        key: &str,
        mode: RenderMode,
    ) -> Result<RenderedPage, VitrineError> {
        let doc = self.load_target(ctx, kind, key, mode)?;
        let tree = self.compose_layout(ctx, &doc, mode)?;

        let mut warnings = Vec::new();
        let mut prefab_chain = Vec::new();
        let root = self.walk(ctx, &tree, mode, &mut prefab_chain, &mut warnings);

        Ok(RenderedPage {
            store_id: ctx.store_id.clone(),
            kind,
            key: doc.key,
            mode: mode.as_str().to_string(),
            theme_vars: ctx.theme.css_custom_properties(),
            root,
            warnings,
        })
    }

    fn load_target(
        &self,
        ctx: &RenderContext,
        kind: DocumentKind,
        key: &str,
        mode: RenderMode,
    ) -> Result<Document, VitrineError> {
        match mode {
            RenderMode::Live => self.store.get(&ctx.store_id, kind, key, DocumentStatus::Published),
            RenderMode::Editor => self.store.draft_for_edit(&ctx.store_id, kind, key),
        }
    }

    /// Referenced documents (layouts, prefabs) never synthesize: a
    /// missing reference is a broken reference, not an empty tree.
    fn load_reference(
        &self,
        ctx: &RenderContext,
        kind: DocumentKind,
        key: &str,
        mode: RenderMode,
    ) -> Result<Document, VitrineError> {
        match mode {
            RenderMode::Live => self.store.get(&ctx.store_id, kind, key, DocumentStatus::Published),
            RenderMode::Editor => {
                match self.store.get(&ctx.store_id, kind, key, DocumentStatus::Draft) {
                    Err(VitrineError::NotFound(_)) => {
                        self.store.get(&ctx.store_id, kind, key, DocumentStatus::Published)
                    }
                    other => other,
                }
            }
        }
    }

    /// Wrap a PAGE/TEMPLATE tree in the layout named by `meta.layout`,
    /// replacing the layout's single `Slot`.
    fn compose_layout(
        &self,
        ctx: &RenderContext,
        doc: &Document,
        mode: RenderMode,
    ) -> Result<Node, VitrineError> {
        if !matches!(doc.kind, DocumentKind::Page | DocumentKind::Template) {
            return Ok(doc.tree.clone());
        }
        let layout_key = doc
            .meta
            .as_ref()
            .and_then(|m| m.get(META_LAYOUT))
            .and_then(|v| v.as_str());
        let Some(layout_key) = layout_key else {
            return Ok(doc.tree.clone());
        };
        let layout = self.load_reference(ctx, DocumentKind::Layout, layout_key, mode)?;
        Ok(splice_slot(&layout.tree, &doc.tree))
    }

    fn walk(
        &self,
        ctx: &RenderContext,
        node: &Node,
        mode: RenderMode,
        prefab_chain: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> RenderedNode {
        if node.ty == NodeType::PrefabInstance {
            return self.render_prefab(ctx, node, mode, prefab_chain, warnings);
        }

        let props = match &node.bindings {
            Some(bindings) => binding::resolve_bindings(bindings, &node.props, &ctx.data),
            None => node.props.clone(),
        };

        let styles = node
            .styles
            .as_ref()
            .map(|styles| {
                style_compiler::present_layers(styles)
                    .into_iter()
                    .map(|layer| (layer.as_str(), style_compiler::compile(styles, layer)))
                    .collect()
            })
            .unwrap_or_default();

        let actions = wire_actions(node, self.registry, warnings);

        let children = node
            .child_nodes()
            .iter()
            .map(|child| self.walk(ctx, child, mode, prefab_chain, warnings))
            .collect();

        RenderedNode {
            id: node.id.clone(),
            ty: node.ty.as_str().to_string(),
            props,
            styles,
            actions,
            children,
            detail: None,
        }
    }

    fn render_prefab(
        &self,
        ctx: &RenderContext,
        instance: &Node,
        mode: RenderMode,
        prefab_chain: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> RenderedNode {
        let Some(key) = instance.prefab_key().filter(|k| !k.is_empty()) else {
            return broken_node(
                &instance.id,
                format!("node '{}': PrefabInstance without a prefab key", instance.id),
                warnings,
            );
        };
        let key = key.to_string();

        if prefab_chain.iter().any(|seen| *seen == key) {
            return broken_node(
                &instance.id,
                format!(
                    "prefab cycle: {} -> {}",
                    prefab_chain.join(" -> "),
                    key
                ),
                warnings,
            );
        }

        let prefab = match self.load_reference(ctx, DocumentKind::Prefab, &key, mode) {
            Ok(doc) => doc,
            Err(VitrineError::NotFound(_)) => {
                return broken_node(
                    &instance.id,
                    format!("node '{}': prefab '{}' does not exist", instance.id, key),
                    warnings,
                );
            }
            Err(e) => {
                return broken_node(
                    &instance.id,
                    format!("node '{}': prefab '{}' failed to load: {}", instance.id, key, e),
                    warnings,
                );
            }
        };

        // Instance-local overrides layer onto the prefab root; the shared
        // prefab document itself is never mutated.
        let mut merged = prefab.tree;
        merged.id = instance.id.clone();
        if let Some(overrides) = instance.props.get(PROP_OVERRIDES).and_then(|v| v.as_object()) {
            for (prop, value) in overrides {
                merged.props.insert(prop.clone(), value.clone());
            }
        }
        if instance.styles.is_some() {
            merged.styles = instance.styles.clone();
        }
        if let Some(instance_bindings) = &instance.bindings {
            let bindings = merged.bindings.get_or_insert_with(Default::default);
            for (prop, path) in instance_bindings {
                bindings.insert(prop.clone(), path.clone());
            }
        }
        if let Some(instance_actions) = &instance.actions {
            let actions = merged.actions.get_or_insert_with(Default::default);
            for (event, descriptor) in instance_actions {
                actions.insert(event.clone(), descriptor.clone());
            }
        }

        prefab_chain.push(key);
        let rendered = self.walk(ctx, &merged, mode, prefab_chain, warnings);
        prefab_chain.pop();
        rendered
    }
}

fn wire_actions(
    node: &Node,
    registry: &ActionRegistry,
    warnings: &mut Vec<String>,
) -> BTreeMap<String, WiredAction> {
    let Some(actions) = &node.actions else {
        return BTreeMap::new();
    };
    actions
        .iter()
        .map(|(event, descriptor)| {
            (event.clone(), wire_action(&node.id, event, descriptor, registry, warnings))
        })
        .collect()
}

fn wire_action(
    node_id: &str,
    event: &str,
    descriptor: &ActionDescriptor,
    registry: &ActionRegistry,
    warnings: &mut Vec<String>,
) -> WiredAction {
    let broken = registry.lookup(&descriptor.action_id).is_none();
    if broken {
        warnings.push(format!(
            "node '{}' {}: unknown action '{}'",
            node_id, event, descriptor.action_id
        ));
    }
    WiredAction {
        action_id: descriptor.action_id.clone(),
        payload: descriptor.payload.clone(),
        payload_bindings: descriptor.payload_bindings.clone(),
        broken,
    }
}

fn broken_node(id: &str, detail: String, warnings: &mut Vec<String>) -> RenderedNode {
    warnings.push(detail.clone());
    RenderedNode {
        id: id.to_string(),
        ty: BROKEN_REFERENCE.to_string(),
        props: Map::new(),
        styles: BTreeMap::new(),
        actions: BTreeMap::new(),
        children: Vec::new(),
        detail: Some(detail),
    }
}

/// Replace the layout's single `Slot` with the wrapped tree. Layout
/// validation guarantees exactly one Slot exists.
fn splice_slot(layout_root: &Node, wrapped: &Node) -> Node {
    if layout_root.ty == NodeType::Slot {
        return wrapped.clone();
    }
    let mut out = layout_root.clone();
    replace_first_slot(&mut out, wrapped);
    out
}

fn replace_first_slot(node: &mut Node, wrapped: &Node) -> bool {
    if let Some(children) = &mut node.children {
        for child in children.iter_mut() {
            if child.ty == NodeType::Slot {
                *child = wrapped.clone();
                return true;
            }
            if replace_first_slot(child, wrapped) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(raw: serde_json::Value) -> Node {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_splice_replaces_the_slot_in_place() {
        let layout = node(serde_json::json!({
            "id": "shell", "type": "Section",
            "children": [
                {"id": "header", "type": "Text"},
                {"id": "outlet", "type": "Slot"}
            ]
        }));
        let page = node(serde_json::json!({"id": "page-root", "type": "Stack"}));
        let composed = splice_slot(&layout, &page);
        let children = composed.child_nodes();
        assert_eq!(children[0].id, "header");
        assert_eq!(children[1].id, "page-root");
        assert_eq!(children[1].ty, NodeType::Stack);
    }

    #[test]
    fn test_slot_as_layout_root_is_fully_replaced() {
        let layout = node(serde_json::json!({"id": "outlet", "type": "Slot"}));
        let page = node(serde_json::json!({"id": "page-root", "type": "Section"}));
        assert_eq!(splice_slot(&layout, &page).id, "page-root");
    }
}
