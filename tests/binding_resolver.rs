use serde_json::{Map, Value as JsonValue, json};
use std::collections::BTreeMap;
use vitrine::core::binding::{resolve, resolve_bindings};

#[test]
fn resolves_nested_custom_data() {
    let ctx = json!({"product": {"customData": {"material": "Cotton"}}});
    assert_eq!(
        resolve("product.customData.material", &ctx),
        Some(json!("Cotton"))
    );
}

#[test]
fn missing_tail_segment_is_undefined_not_an_error() {
    let ctx = json!({"product": {}});
    assert_eq!(resolve("product.customData.material", &ctx), None);
}

#[test]
fn prefix_resolves_but_next_segment_does_not() {
    let ctx = json!({"cart": {"lines": [{"qty": 1}]}});
    assert_eq!(resolve("cart.lines[0].qty.units", &ctx), None);
    assert_eq!(resolve("cart.lines[3].qty", &ctx), None);
    assert_eq!(resolve("cart.total.amount", &ctx), None);
}

#[test]
fn prototype_chain_segments_never_resolve() {
    // Even a context that literally carries these keys must not expose them.
    let ctx = json!({
        "__proto__": {"admin": true},
        "constructor": {"name": "Object"},
        "prototype": {},
        "product": {"__proto__": {"admin": true}}
    });
    for path in [
        "__proto__",
        "__proto__.admin",
        "constructor",
        "constructor.name",
        "prototype",
        "product.__proto__",
        "product['__proto__'].admin",
    ] {
        assert_eq!(resolve(path, &ctx), None, "path {path:?} must stay unresolvable");
    }
}

#[test]
fn underscore_prefixed_fields_are_internal() {
    let ctx = json!({"session": {"_token": "secret", "locale": "en"}});
    assert_eq!(resolve("session._token", &ctx), None);
    assert_eq!(resolve("session.locale", &ctx), Some(json!("en")));
}

#[test]
fn concurrent_resolutions_share_a_context_safely() {
    let ctx = std::sync::Arc::new(json!({"ui": {"tab": "details"}, "items": [1, 2, 3]}));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let ctx = std::sync::Arc::clone(&ctx);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    assert_eq!(resolve("ui.tab", &ctx), Some(json!("details")));
                    assert_eq!(resolve(&format!("items[{}]", i % 3), &ctx), Some(json!(i % 3 + 1)));
                    assert_eq!(resolve("ui.missing", &ctx), None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("resolver thread");
    }
}

#[test]
fn resolved_bindings_override_static_props_and_misses_leave_them() {
    let ctx = json!({"product": {"title": "Aurora Lamp"}});
    let mut props = Map::new();
    props.insert("text".to_string(), JsonValue::String("placeholder".into()));
    props.insert("tone".to_string(), JsonValue::String("plain".into()));

    let mut bindings = BTreeMap::new();
    bindings.insert("text".to_string(), "product.title".to_string());
    bindings.insert("badge".to_string(), "product.badge".to_string());

    let effective = resolve_bindings(&bindings, &props, &ctx);
    assert_eq!(effective["text"], json!("Aurora Lamp"));
    assert_eq!(effective["tone"], json!("plain"));
    assert!(
        !effective.contains_key("badge"),
        "an unresolved binding leaves the prop absent so the component default applies"
    );
}
