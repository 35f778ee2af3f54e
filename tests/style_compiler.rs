use serde_json::json;
use vitrine::core::style_compiler::{LayerKey, compile};
use vitrine::StyleObject;

fn style(raw: serde_json::Value) -> StyleObject {
    let parsed: StyleObject = serde_json::from_value(raw).expect("well-typed style object");
    parsed.validate().expect("style object passes the gate");
    parsed
}

#[test]
fn padding_compiles_to_longhands_and_absent_sides_are_omitted() {
    let s = style(json!({
        "base": {"spacing": {"padding": {"top": 8, "left": 16}}}
    }));
    let map = compile(&s, LayerKey::Base);
    assert_eq!(map.get("padding-top").map(String::as_str), Some("8px"));
    assert_eq!(map.get("padding-left").map(String::as_str), Some("16px"));
    assert!(!map.contains_key("padding-right"), "absent sides are never zero-filled");
    assert!(!map.contains_key("padding-bottom"));
}

#[test]
fn theme_tokens_pass_through_verbatim() {
    let s = style(json!({
        "base": {
            "spacing": {"gap": "var(--gutter)"},
            "typography": {"color": "var(--brand-ink)", "fontFamily": "var(--font-body)"}
        }
    }));
    let map = compile(&s, LayerKey::Base);
    assert_eq!(map.get("gap").map(String::as_str), Some("var(--gutter)"));
    assert_eq!(map.get("color").map(String::as_str), Some("var(--brand-ink)"));
    assert_eq!(map.get("font-family").map(String::as_str), Some("var(--font-body)"));
}

#[test]
fn radius_always_emits_four_corners() {
    let s = style(json!({
        "base": {"border": {"radius": {"topLeft": 12}}}
    }));
    let map = compile(&s, LayerKey::Base);
    assert_eq!(map.get("border-top-left-radius").map(String::as_str), Some("12px"));
    assert_eq!(map.get("border-top-right-radius").map(String::as_str), Some("0px"));
    assert_eq!(map.get("border-bottom-right-radius").map(String::as_str), Some("0px"));
    assert_eq!(map.get("border-bottom-left-radius").map(String::as_str), Some("0px"));
}

#[test]
fn gradient_renders_stops_in_declared_order_at_the_declared_angle() {
    let s = style(json!({
        "base": {"background": {
            "type": "gradient",
            "angleDeg": 45,
            "stops": [
                {"color": "#ff0000", "position": 0},
                {"color": "#0000ff", "position": 100}
            ]
        }}
    }));
    let map = compile(&s, LayerKey::Base);
    assert_eq!(
        map.get("background-image").map(String::as_str),
        Some("linear-gradient(45deg, #ff0000 0%, #0000ff 100%)")
    );
}

#[test]
fn image_background_resolves_url_or_asset_id() {
    let by_url = style(json!({
        "base": {"background": {"type": "image", "url": "https://cdn.example/hero.webp", "size": "cover"}}
    }));
    let map = compile(&by_url, LayerKey::Base);
    assert_eq!(
        map.get("background-image").map(String::as_str),
        Some("url(https://cdn.example/hero.webp)")
    );
    assert_eq!(map.get("background-size").map(String::as_str), Some("cover"));

    let by_asset = style(json!({
        "base": {"background": {"type": "image", "assetId": "img_42", "repeat": false}}
    }));
    let map = compile(&by_asset, LayerKey::Base);
    assert_eq!(
        map.get("background-image").map(String::as_str),
        Some("url(asset://img_42)")
    );
    assert_eq!(map.get("background-repeat").map(String::as_str), Some("no-repeat"));
}

#[test]
fn shadow_default_color_applies_only_when_a_shadow_exists() {
    let with_shadow = style(json!({
        "base": {"effects": {"shadow": {"x": 0, "y": 4, "blur": 12}}}
    }));
    let map = compile(&with_shadow, LayerKey::Base);
    assert_eq!(
        map.get("box-shadow").map(String::as_str),
        Some("0px 4px 12px 0px #00000040")
    );

    let without_shadow = style(json!({"base": {"effects": {"opacity": 0.5}}}));
    let map = compile(&without_shadow, LayerKey::Base);
    assert!(!map.contains_key("box-shadow"), "absent shadow compiles to nothing");
}

#[test]
fn inset_shadow_keeps_its_declared_color() {
    let s = style(json!({
        "base": {"effects": {"shadow": {"y": 2, "color": "#11223344", "inset": true}}}
    }));
    let map = compile(&s, LayerKey::Base);
    assert_eq!(
        map.get("box-shadow").map(String::as_str),
        Some("inset 0px 2px 0px 0px #11223344")
    );
}

#[test]
fn transform_composes_in_fixed_order_with_any_subset() {
    let s = style(json!({
        "base": {"effects": {"transform": {"scale": 1.05, "translateX": 10, "rotateDeg": 3}}}
    }));
    let map = compile(&s, LayerKey::Base);
    assert_eq!(
        map.get("transform").map(String::as_str),
        Some("translateX(10px) rotate(3deg) scale(1.05)")
    );

    let only_y = style(json!({
        "base": {"effects": {"transform": {"translateY": -4}}}
    }));
    let map = compile(&only_y, LayerKey::Base);
    assert_eq!(map.get("transform").map(String::as_str), Some("translateY(-4px)"));
}

#[test]
fn transition_presets_map_to_fixed_durations() {
    for (preset, expected) in [
        ("fast", Some("all 120ms ease-out")),
        ("base", Some("all 200ms ease-in-out")),
        ("slow", Some("all 400ms ease-in-out")),
        ("none", None),
    ] {
        let s = style(json!({"base": {"transition": {"preset": preset}}}));
        let map = compile(&s, LayerKey::Base);
        assert_eq!(map.get("transition").map(String::as_str), expected, "preset {preset}");
    }
}

#[test]
fn non_base_layer_overlays_the_base_map() {
    let s = style(json!({
        "base": {
            "typography": {"color": "#111111", "fontSize": 14},
            "layout": {"display": "flex"}
        },
        "states": {"hover": {"typography": {"color": "#ff0000"}}}
    }));
    let hover = compile(&s, LayerKey::Hover);
    assert_eq!(hover.get("color").map(String::as_str), Some("#ff0000"));
    // Untouched base declarations survive the overlay.
    assert_eq!(hover.get("font-size").map(String::as_str), Some("14px"));
    assert_eq!(hover.get("display").map(String::as_str), Some("flex"));
}

#[test]
fn absent_overlay_layer_falls_back_to_base() {
    let s = style(json!({
        "base": {"layout": {"display": "grid"}},
        "breakpoints": {"md": {"grid": {"columns": 3}}}
    }));
    assert_eq!(compile(&s, LayerKey::Lg), compile(&s, LayerKey::Base));
    let md = compile(&s, LayerKey::Md);
    assert_eq!(
        md.get("grid-template-columns").map(String::as_str),
        Some("repeat(3, minmax(0, 1fr))")
    );
}

#[test]
fn compilation_is_deterministic() {
    let s = style(json!({
        "base": {
            "layout": {"display": "flex", "maxWidth": 1200},
            "spacing": {"padding": {"top": 24, "bottom": 24}, "gap": 16},
            "flex": {"direction": "column", "align": "center"},
            "border": {"width": 1, "style": "solid", "color": "#e5e5e5"},
            "effects": {"opacity": 0.9}
        }
    }));
    let first = compile(&s, LayerKey::Base);
    for _ in 0..16 {
        assert_eq!(compile(&s, LayerKey::Base), first);
    }
}

#[test]
fn flex_and_position_groups_compile_to_their_css_names() {
    let s = style(json!({
        "base": {
            "position": {"position": "sticky", "top": 0, "zIndex": 10},
            "flex": {"direction": "row-reverse", "justify": "space-between", "grow": 1}
        }
    }));
    let map = compile(&s, LayerKey::Base);
    assert_eq!(map.get("position").map(String::as_str), Some("sticky"));
    assert_eq!(map.get("top").map(String::as_str), Some("0px"));
    assert_eq!(map.get("z-index").map(String::as_str), Some("10"));
    assert_eq!(map.get("flex-direction").map(String::as_str), Some("row-reverse"));
    assert_eq!(map.get("justify-content").map(String::as_str), Some("space-between"));
    assert_eq!(map.get("flex-grow").map(String::as_str), Some("1"));
}
