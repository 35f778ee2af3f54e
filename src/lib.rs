//! Vitrine: declarative page composition for multi-tenant storefronts
//!
//! **Vitrine is the rendering runtime a storefront platform embeds to turn
//! store-authored documents into live pages.**
//!
//! Store operators compose pages, layouts, reusable prefabs, and
//! per-product-type templates from a fixed component palette. The runtime
//! renders the draft or published version of each document and compiles
//! authored properties into a resolved presentation layer — styling, data
//! bindings, behavior — with no per-store deployment step.
//!
//! # Core Principles
//!
//! - **No code execution**: authored trees are data. The binding resolver
//!   walks plain JSON, the style compiler only sees a closed typed schema,
//!   and actions dispatch through a fixed catalogue.
//! - **Validate at save, never at render**: every structural and schema
//!   gate runs before a DRAFT/PUBLISHED write; render-time work is pure
//!   and total.
//! - **Atomic promotion**: publish copies the current draft onto the
//!   published row in one transaction — readers never see a mix of two
//!   drafts.
//! - **Strict tenant isolation**: every row, query, and dispatched action
//!   is scoped to one store id; cross-tenant references are rejected
//!   outright.
//! - **Degrade, don't crash**: missing bindings fall back to component
//!   defaults, broken prefab references render a visible placeholder.
//!
//! # Composition Flow
//!
//! A request loads a [`core::document::Document`] (draft or published) →
//! the [`core::render::Renderer`] walks its tree → per node the style
//! compiler resolves styles, the binding resolver resolves `bindings`,
//! and the action registry wires `actions` → the composed
//! [`core::render::RenderedPage`] is returned to the caller.
//!
//! # Crate Structure
//!
//! - [`core`]: document model and publish protocol, style schema and
//!   compiler, binding resolver, action dispatcher, rendering runtime
//! - [`handlers`]: builtin action handlers (cart, discount, navigation)
//! - [`cli`]: the operator command-line surface

pub mod cli;
pub mod core;
pub mod handlers;

pub use crate::core::action::{ActionDescriptor, ActionEntry, ActionRegistry, FieldKind, FieldSpec};
pub use crate::core::context::{RenderContext, ThemeTokens};
pub use crate::core::document::{Document, DocumentKind, DocumentStatus, DocumentSummary};
pub use crate::core::error::VitrineError;
pub use crate::core::gatekeeper::{AllowAll, Authorizer, Gatekeeper};
pub use crate::core::node::{Node, NodeType};
pub use crate::core::render::{RenderMode, RenderedPage, Renderer};
pub use crate::core::store::DocumentStore;
pub use crate::core::style::StyleObject;
pub use crate::core::style_compiler::{FlatStyleMap, LayerKey, compile};
