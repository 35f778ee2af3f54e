//! Safe dotted/bracket path resolution over request-scoped JSON contexts.
//!
//! This is the sandboxed half of the binding layer: it walks plain data
//! only, never invokes anything, and treats every malformed or hostile
//! path as an absent value. Hostile segments (`__proto__`, `constructor`,
//! `prototype`, anything `_`-prefixed) die at the parse step before the
//! context is touched — paths authored in the builder are forwarded to
//! JavaScript clients, so the guard holds on both sides of the wire.
//!
//! Resolution failures are not errors: a missing key, type mismatch, or
//! out-of-range index short-circuits to `None` and the component default
//! applies. The resolver is stateless and reentrant.

use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

const FORBIDDEN_SEGMENTS: &[&str] = &["constructor", "prototype"];

fn segment_allowed(raw: &str) -> bool {
    !raw.is_empty() && !raw.starts_with('_') && !FORBIDDEN_SEGMENTS.contains(&raw)
}

fn ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '-'
}

/// Parse `product.customData.material`, `items[0].title`,
/// `cart["lines"][2].qty`. Returns `None` for anything malformed or
/// hostile; all-digit dot segments parse as array indices.
pub fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut chars = path.chars().peekable();
    let mut expect_segment = true;

    while let Some(&c) = chars.peek() {
        if c == '.' {
            if expect_segment || segments.is_empty() {
                return None;
            }
            chars.next();
            expect_segment = true;
        } else if c == '[' {
            if segments.is_empty() && expect_segment {
                return None;
            }
            chars.next();
            let quote = match chars.peek() {
                Some(&c) if c == '\'' || c == '"' => {
                    chars.next();
                    Some(c)
                }
                _ => None,
            };
            let mut body = String::new();
            match quote {
                Some(q) => {
                    loop {
                        match chars.next() {
                            Some(c) if c == q => break,
                            Some(c) => body.push(c),
                            None => return None,
                        }
                    }
                    if chars.next() != Some(']') {
                        return None;
                    }
                    if !segment_allowed(&body) {
                        return None;
                    }
                    segments.push(Segment::Key(body));
                }
                None => {
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(c) if c.is_ascii_digit() => body.push(c),
                            _ => return None,
                        }
                    }
                    segments.push(Segment::Index(body.parse().ok()?));
                }
            }
            expect_segment = false;
        } else {
            if !expect_segment {
                return None;
            }
            let mut body = String::new();
            while let Some(&c) = chars.peek() {
                if ident_char(c) {
                    body.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if body.is_empty() {
                return None;
            }
            if body.chars().all(|c| c.is_ascii_digit()) {
                segments.push(Segment::Index(body.parse().ok()?));
            } else {
                if !segment_allowed(&body) {
                    return None;
                }
                segments.push(Segment::Key(body));
            }
            expect_segment = false;
        }
    }

    if expect_segment || segments.is_empty() {
        return None;
    }
    Some(segments)
}

/// Resolve a path against a read-only context. Only plain object fields
/// and array indices are read; everything else is `None`.
pub fn resolve(path: &str, context: &JsonValue) -> Option<JsonValue> {
    let segments = parse_path(path)?;
    let mut current = context;
    for segment in &segments {
        current = match (segment, current) {
            (Segment::Key(key), JsonValue::Object(map)) => map.get(key)?,
            (Segment::Index(index), JsonValue::Array(items)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current.clone())
}

/// A node's effective props: resolved bindings layered over static props.
/// An unresolved binding leaves the static prop (or its absence) untouched
/// so the component default applies.
pub fn resolve_bindings(
    bindings: &BTreeMap<String, String>,
    props: &Map<String, JsonValue>,
    context: &JsonValue,
) -> Map<String, JsonValue> {
    let mut effective = props.clone();
    for (prop, path) in bindings {
        if let Some(value) = resolve(path, context) {
            effective.insert(prop.clone(), value);
        }
    }
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dot_and_bracket_forms_agree() {
        let ctx = json!({"cart": {"lines": [{"qty": 2}]}});
        assert_eq!(resolve("cart.lines[0].qty", &ctx), Some(json!(2)));
        assert_eq!(resolve("cart[\"lines\"][0].qty", &ctx), Some(json!(2)));
        assert_eq!(resolve("cart.lines.0.qty", &ctx), Some(json!(2)));
    }

    #[test]
    fn test_hostile_segments_never_resolve() {
        let ctx = json!({"__proto__": {"polluted": true}, "_secret": 1});
        for path in [
            "__proto__",
            "__proto__.polluted",
            "constructor",
            "a.constructor.b",
            "prototype",
            "_secret",
            "a['__proto__']",
        ] {
            assert_eq!(resolve(path, &ctx), None, "path {path:?} must not resolve");
        }
    }

    #[test]
    fn test_malformed_paths_yield_none() {
        let ctx = json!({"a": {"b": 1}});
        for path in ["", ".", ".a", "a.", "a..b", "a[", "a[0", "a['b", "a]b", "a[b]"] {
            assert_eq!(resolve(path, &ctx), None, "path {path:?} must not parse");
        }
    }

    #[test]
    fn test_missing_tail_is_none_not_error() {
        let ctx = json!({"product": {"customData": {}}});
        assert_eq!(resolve("product.customData.material", &ctx), None);
        assert_eq!(resolve("product.missing.deeper.still", &ctx), None);
    }

    #[test]
    fn test_index_out_of_range_is_none() {
        let ctx = json!({"items": [1, 2]});
        assert_eq!(resolve("items[2]", &ctx), None);
        assert_eq!(resolve("items[0]", &ctx), Some(json!(1)));
    }

    #[test]
    fn test_type_mismatch_is_none() {
        let ctx = json!({"title": "hello"});
        assert_eq!(resolve("title.length", &ctx), None);
        assert_eq!(resolve("title[0]", &ctx), None);
    }
}
