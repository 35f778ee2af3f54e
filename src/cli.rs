//! Operator CLI for the vitrine runtime.
//!
//! Mirrors the builder-facing surface one subcommand per operation. Every
//! command is store-scoped via `--store`. The CLI runs the gatekeeper
//! with `AllowAll`: platform operators reach this binary through their
//! own authenticated tooling, so authorization has already happened
//! upstream.

use crate::core::context::{RenderContext, ThemeTokens};
use crate::core::document::{DocumentKind, DocumentStatus};
use crate::core::error::VitrineError;
use crate::core::gatekeeper::{AllowAll, Gatekeeper};
use crate::core::node::Node;
use crate::core::render::{RenderMode, Renderer};
use crate::core::store::DocumentStore;
use crate::core::validate;
use crate::handlers;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_kind(raw: &str) -> Result<DocumentKind, String> {
    DocumentKind::parse(&raw.to_uppercase())
        .ok_or_else(|| format!("'{}' is not one of LAYOUT, PAGE, TEMPLATE, PREFAB", raw))
}

fn parse_status(raw: &str) -> Result<DocumentStatus, String> {
    DocumentStatus::parse(&raw.to_uppercase())
        .ok_or_else(|| format!("'{}' is not one of DRAFT, PUBLISHED", raw))
}

fn parse_mode(raw: &str) -> Result<RenderMode, String> {
    RenderMode::parse(raw).ok_or_else(|| format!("'{}' is not one of live, editor", raw))
}

#[derive(Parser, Debug)]
#[clap(
    name = "vitrine",
    version = env!("CARGO_PKG_VERSION"),
    about = "Declarative page composition and rendering for multi-tenant storefronts"
)]
pub struct Cli {
    /// Data directory holding the document store.
    #[clap(long, global = true, default_value = ".vitrine/data")]
    root: PathBuf,
    /// Store (tenant) the command acts on.
    #[clap(long, global = true, default_value = "dev")]
    store: String,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the document store.
    Init,
    /// Validate and create-or-overwrite a DRAFT from a tree file.
    Save {
        #[clap(long, value_parser = parse_kind)]
        kind: DocumentKind,
        #[clap(long)]
        key: String,
        /// JSON file holding the node tree.
        #[clap(long)]
        tree: PathBuf,
        /// Optional JSON file holding document meta (title, layout, ...).
        #[clap(long)]
        meta: Option<PathBuf>,
    },
    /// Atomically promote the current DRAFT to PUBLISHED.
    Publish {
        #[clap(long, value_parser = parse_kind)]
        kind: DocumentKind,
        #[clap(long)]
        key: String,
    },
    /// List the store's documents.
    List {
        #[clap(long, value_parser = parse_kind)]
        kind: Option<DocumentKind>,
        #[clap(long, value_parser = parse_status)]
        status: Option<DocumentStatus>,
        #[clap(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show one document by row id.
    Get {
        #[clap(long)]
        id: String,
    },
    /// Delete exactly one document row by id.
    Delete {
        #[clap(long)]
        id: String,
    },
    /// Run the validation gate against a tree file without writing.
    Validate {
        #[clap(long, value_parser = parse_kind)]
        kind: DocumentKind,
        /// Document key the tree would be saved under.
        #[clap(long, default_value = "")]
        key: String,
        #[clap(long)]
        tree: PathBuf,
    },
    /// Render a page or template to its resolved output tree.
    Render {
        /// PAGE or TEMPLATE.
        #[clap(long, value_parser = parse_kind)]
        kind: DocumentKind,
        /// Document key (PAGE rendering).
        #[clap(long)]
        key: Option<String>,
        /// Product-schema id (TEMPLATE rendering; omit for the default).
        #[clap(long)]
        schema: Option<String>,
        #[clap(long, value_parser = parse_mode, default_value = "live")]
        mode: RenderMode,
        /// JSON file with the runtime context data (product, cart, ...).
        #[clap(long)]
        context: Option<PathBuf>,
        /// TOML file with theme tokens (a flat [tokens] table).
        #[clap(long)]
        theme: Option<PathBuf>,
    },
}

fn read_json(path: &PathBuf) -> Result<JsonValue, VitrineError> {
    let raw = fs::read_to_string(path).map_err(VitrineError::IoError)?;
    Ok(serde_json::from_str(&raw)?)
}

fn read_tree(path: &PathBuf) -> Result<Node, VitrineError> {
    let raw = fs::read_to_string(path).map_err(VitrineError::IoError)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn run() -> Result<(), VitrineError> {
    let cli = Cli::parse();
    let store = DocumentStore::open(&cli.root)?;
    let gate = Gatekeeper::new(&store, AllowAll);
    let store_id = cli.store.as_str();

    match cli.command {
        Command::Init => {
            println!(
                "{} document store ready at {}",
                "●".bright_green(),
                cli.root.display()
            );
        }
        Command::Save { kind, key, tree, meta } => {
            let tree = read_tree(&tree)?;
            let meta = meta.as_ref().map(read_json).transpose()?;
            let doc = gate.save_draft(store_id, kind, &key, &tree, meta.as_ref())?;
            println!(
                "{} saved {} {} '{}' ({})",
                "●".bright_green(),
                doc.status.as_str().bright_white(),
                kind.as_str().bright_white(),
                key,
                doc.id.bright_black()
            );
        }
        Command::Publish { kind, key } => {
            let doc = gate.publish(store_id, kind, &key)?;
            println!(
                "{} published {} '{}' ({})",
                "●".bright_green(),
                kind.as_str().bright_white(),
                key,
                doc.id.bright_black()
            );
        }
        Command::List { kind, status, format } => {
            let summaries = gate.list_documents(store_id, kind, status)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                }
                OutputFormat::Text => {
                    if summaries.is_empty() {
                        println!("No documents in store '{}'.", store_id);
                    }
                    for s in summaries {
                        let title = s.title.as_deref().unwrap_or("-");
                        println!(
                            "{:<9} {:<10} {:<24} {}  {}",
                            s.kind.as_str(),
                            s.status.as_str(),
                            s.key,
                            title,
                            s.id.bright_black()
                        );
                    }
                }
            }
        }
        Command::Get { id } => {
            let doc = gate.get_document(store_id, &id)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Delete { id } => {
            gate.delete_document(store_id, &id)?;
            println!("{} deleted document {}", "●".bright_green(), id);
        }
        Command::Validate { kind, key, tree } => {
            let tree = read_tree(&tree)?;
            validate::validate_document(kind, &key, &tree)?;
            println!("{} tree passes the {} gate", "✓".bright_green(), kind.as_str());
        }
        Command::Render { kind, key, schema, mode, context, theme } => {
            let data = match &context {
                Some(path) => read_json(path)?,
                None => serde_json::json!({}),
            };
            let theme = match &theme {
                Some(path) => {
                    let raw = fs::read_to_string(path).map_err(VitrineError::IoError)?;
                    ThemeTokens::from_toml_str(&raw)?
                }
                None => ThemeTokens::new(),
            };

            let ctx = RenderContext::new(store_id, data, theme);
            let registry = handlers::builtin_registry();
            let renderer = Renderer::new(&store, &registry);

            let page = match kind {
                DocumentKind::Template => renderer.render_template(&ctx, schema.as_deref(), mode)?,
                _ => {
                    let key = key.ok_or_else(|| {
                        VitrineError::ValidationError("--key is required unless rendering a template".to_string())
                    })?;
                    renderer.render_document(&ctx, kind, &key, mode)?
                }
            };

            for warning in &page.warnings {
                eprintln!("{} {}", "⚠".bright_yellow(), warning);
            }
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }
    Ok(())
}
