//! Request-scoped rendering context: store identity, collaborator data,
//! theme tokens.
//!
//! There is no process-wide theme or context singleton. The host
//! assembles one immutable `RenderContext` per request and threads it
//! through the binding resolver, action dispatcher, and renderer.

use crate::core::error::VitrineError;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Flat token-name → raw-value map. Tokens are referenced symbolically
/// from style objects (`var(--name)`) and resolve at display time, not
/// compile time.
#[derive(Debug, Clone, Default)]
pub struct ThemeTokens {
    tokens: BTreeMap<String, String>,
}

impl ThemeTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.tokens.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(|s| s.as_str())
    }

    /// Parse a theme file: a flat `[tokens]` table of string values.
    pub fn from_toml_str(raw: &str) -> Result<Self, VitrineError> {
        let doc: toml::Value = toml::from_str(raw)
            .map_err(|e| VitrineError::ValidationError(format!("theme config: {}", e)))?;
        let table = doc
            .get("tokens")
            .and_then(|t| t.as_table())
            .ok_or_else(|| {
                VitrineError::ValidationError("theme config: missing [tokens] table".to_string())
            })?;
        let mut theme = Self::new();
        for (name, value) in table {
            match value.as_str() {
                Some(value) => theme.insert(name, value),
                None => {
                    return Err(VitrineError::ValidationError(format!(
                        "theme config: token '{}' must be a string",
                        name
                    )));
                }
            }
        }
        Ok(theme)
    }

    /// Root-scope custom properties (`--name` → value), injected ahead of
    /// node-level compilation.
    pub fn css_custom_properties(&self) -> BTreeMap<String, String> {
        self.tokens
            .iter()
            .map(|(name, value)| (format!("--{}", name), value.clone()))
            .collect()
    }
}

/// The immutable per-request context. `data` is plain enumerable JSON
/// supplied by the commerce/session collaborators (product, cart, user,
/// ui, store metadata) — no handles or secrets reachable from any field.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub store_id: String,
    pub data: JsonValue,
    pub theme: ThemeTokens,
}

impl RenderContext {
    pub fn new(store_id: &str, data: JsonValue, theme: ThemeTokens) -> Self {
        Self {
            store_id: store_id.to_string(),
            data,
            theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_tokens_from_toml() {
        let theme = ThemeTokens::from_toml_str(
            "[tokens]\nbrand = \"#336699\"\ngutter = \"24px\"\n",
        )
        .unwrap();
        assert_eq!(theme.get("brand"), Some("#336699"));
        let vars = theme.css_custom_properties();
        assert_eq!(vars.get("--gutter").map(|s| s.as_str()), Some("24px"));
    }

    #[test]
    fn test_non_string_token_is_rejected() {
        assert!(ThemeTokens::from_toml_str("[tokens]\ngutter = 24\n").is_err());
    }
}
