//! Pure translation from validated style objects to flat renderer-native
//! style maps.
//!
//! Compilation is total and deterministic: validation happened once at save
//! time, so nothing here can fail at render time. Output is a `BTreeMap`
//! so iteration order (and serialized output) is stable.

use crate::core::style::{
    Background, BackgroundKind, BorderGroup, EffectsGroup, FlexGroup, GridGroup, LayoutGroup,
    Length, PositionGroup, SpacingGroup, StyleLayer, StyleObject, TransitionPreset,
    TypographyGroup,
};
use std::collections::BTreeMap;

pub type FlatStyleMap = BTreeMap<String, String>;

/// Which layer of a style object to compile. Unknown layer names parse to
/// `Base`; a selected overlay that is absent on the object also falls back
/// to base alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKey {
    Base,
    Sm,
    Md,
    Lg,
    Hover,
    Pressed,
    Focus,
    Disabled,
}

impl LayerKey {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKey::Base => "base",
            LayerKey::Sm => "sm",
            LayerKey::Md => "md",
            LayerKey::Lg => "lg",
            LayerKey::Hover => "hover",
            LayerKey::Pressed => "pressed",
            LayerKey::Focus => "focus",
            LayerKey::Disabled => "disabled",
        }
    }

    pub fn parse(raw: &str) -> LayerKey {
        match raw {
            "sm" => LayerKey::Sm,
            "md" => LayerKey::Md,
            "lg" => LayerKey::Lg,
            "hover" => LayerKey::Hover,
            "pressed" => LayerKey::Pressed,
            "focus" => LayerKey::Focus,
            "disabled" => LayerKey::Disabled,
            _ => LayerKey::Base,
        }
    }
}

/// Compile one layer of a style object into a flat map. Non-base keys
/// compile base first and overlay the selected layer's declarations on
/// top, per property.
pub fn compile(styles: &StyleObject, layer: LayerKey) -> FlatStyleMap {
    let mut map = compile_layer(&styles.base);
    if let Some(overlay) = select_layer(styles, layer) {
        map.extend(compile_layer(overlay));
    }
    map
}

/// The layers a style object actually carries, base first. The renderer
/// emits one compiled map per present layer.
pub fn present_layers(styles: &StyleObject) -> Vec<LayerKey> {
    let mut layers = vec![LayerKey::Base];
    for key in [
        LayerKey::Sm,
        LayerKey::Md,
        LayerKey::Lg,
        LayerKey::Hover,
        LayerKey::Pressed,
        LayerKey::Focus,
        LayerKey::Disabled,
    ] {
        if select_layer(styles, key).is_some() {
            layers.push(key);
        }
    }
    layers
}

fn select_layer(styles: &StyleObject, layer: LayerKey) -> Option<&StyleLayer> {
    match layer {
        LayerKey::Base => None,
        LayerKey::Sm => styles.breakpoints.as_ref()?.sm.as_ref(),
        LayerKey::Md => styles.breakpoints.as_ref()?.md.as_ref(),
        LayerKey::Lg => styles.breakpoints.as_ref()?.lg.as_ref(),
        LayerKey::Hover => styles.states.as_ref()?.hover.as_ref(),
        LayerKey::Pressed => styles.states.as_ref()?.pressed.as_ref(),
        LayerKey::Focus => styles.states.as_ref()?.focus.as_ref(),
        LayerKey::Disabled => styles.states.as_ref()?.disabled.as_ref(),
    }
}

fn compile_layer(layer: &StyleLayer) -> FlatStyleMap {
    let mut map = FlatStyleMap::new();
    if let Some(layout) = &layer.layout {
        compile_layout(layout, &mut map);
    }
    if let Some(spacing) = &layer.spacing {
        compile_spacing(spacing, &mut map);
    }
    if let Some(position) = &layer.position {
        compile_position(position, &mut map);
    }
    if let Some(flex) = &layer.flex {
        compile_flex(flex, &mut map);
    }
    if let Some(grid) = &layer.grid {
        compile_grid(grid, &mut map);
    }
    if let Some(background) = &layer.background {
        compile_background(background, &mut map);
    }
    if let Some(border) = &layer.border {
        compile_border(border, &mut map);
    }
    if let Some(effects) = &layer.effects {
        compile_effects(effects, &mut map);
    }
    if let Some(typography) = &layer.typography {
        compile_typography(typography, &mut map);
    }
    if let Some(transition) = &layer.transition {
        if let Some(preset) = transition.preset {
            compile_transition(preset, &mut map);
        }
    }
    map
}

/// Integral pixel values print without a decimal point (`8px`, `1.5px`).
fn length_css(len: &Length) -> String {
    match len {
        Length::Px(n) => format!("{}px", num(*n)),
        Length::Token(t) => t.clone(),
    }
}

fn num(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn put(map: &mut FlatStyleMap, key: &str, value: String) {
    map.insert(key.to_string(), value);
}

fn put_length(map: &mut FlatStyleMap, key: &str, len: &Option<Length>) {
    if let Some(len) = len {
        put(map, key, length_css(len));
    }
}

fn compile_layout(layout: &LayoutGroup, map: &mut FlatStyleMap) {
    if let Some(display) = layout.display {
        put(map, "display", display.as_css().to_string());
    }
    put_length(map, "width", &layout.width);
    put_length(map, "height", &layout.height);
    put_length(map, "min-width", &layout.min_width);
    put_length(map, "max-width", &layout.max_width);
    put_length(map, "min-height", &layout.min_height);
    put_length(map, "max-height", &layout.max_height);
    if let Some(overflow) = layout.overflow {
        put(map, "overflow", overflow.as_css().to_string());
    }
}

fn compile_spacing(spacing: &SpacingGroup, map: &mut FlatStyleMap) {
    if let Some(margin) = &spacing.margin {
        put_length(map, "margin-top", &margin.top);
        put_length(map, "margin-right", &margin.right);
        put_length(map, "margin-bottom", &margin.bottom);
        put_length(map, "margin-left", &margin.left);
    }
    if let Some(padding) = &spacing.padding {
        put_length(map, "padding-top", &padding.top);
        put_length(map, "padding-right", &padding.right);
        put_length(map, "padding-bottom", &padding.bottom);
        put_length(map, "padding-left", &padding.left);
    }
    put_length(map, "gap", &spacing.gap);
}

fn compile_position(position: &PositionGroup, map: &mut FlatStyleMap) {
    if let Some(kind) = position.position {
        put(map, "position", kind.as_css().to_string());
    }
    put_length(map, "top", &position.top);
    put_length(map, "right", &position.right);
    put_length(map, "bottom", &position.bottom);
    put_length(map, "left", &position.left);
    if let Some(z) = position.z_index {
        put(map, "z-index", format!("{}", z));
    }
}

fn compile_flex(flex: &FlexGroup, map: &mut FlatStyleMap) {
    if let Some(direction) = flex.direction {
        put(map, "flex-direction", direction.as_css().to_string());
    }
    if let Some(wrap) = flex.wrap {
        put(map, "flex-wrap", wrap.as_css().to_string());
    }
    if let Some(justify) = flex.justify {
        put(map, "justify-content", justify.as_css().to_string());
    }
    if let Some(align) = flex.align {
        put(map, "align-items", align.as_css().to_string());
    }
    if let Some(grow) = flex.grow {
        put(map, "flex-grow", num(grow));
    }
    if let Some(shrink) = flex.shrink {
        put(map, "flex-shrink", num(shrink));
    }
    put_length(map, "flex-basis", &flex.basis);
}

fn compile_grid(grid: &GridGroup, map: &mut FlatStyleMap) {
    if let Some(columns) = grid.columns {
        put(
            map,
            "grid-template-columns",
            format!("repeat({}, minmax(0, 1fr))", columns),
        );
    }
    if let Some(rows) = grid.rows {
        put(
            map,
            "grid-template-rows",
            format!("repeat({}, minmax(0, 1fr))", rows),
        );
    }
    put_length(map, "column-gap", &grid.column_gap);
    put_length(map, "row-gap", &grid.row_gap);
    if let Some(flow) = grid.auto_flow {
        put(map, "grid-auto-flow", flow.as_css().to_string());
    }
}

fn compile_background(background: &Background, map: &mut FlatStyleMap) {
    match background.kind {
        BackgroundKind::Color => {
            if let Some(color) = &background.color {
                put(map, "background-color", color.0.clone());
            }
        }
        BackgroundKind::Gradient => {
            if let Some(stops) = &background.stops {
                let angle = background.angle_deg.unwrap_or(0.0);
                let rendered = stops
                    .iter()
                    .map(|s| format!("{} {}%", s.color.0, num(s.position)))
                    .collect::<Vec<_>>()
                    .join(", ");
                put(
                    map,
                    "background-image",
                    format!("linear-gradient({}deg, {})", num(angle), rendered),
                );
            }
        }
        BackgroundKind::Image => {
            let src = background
                .url
                .clone()
                .or_else(|| background.asset_id.as_ref().map(|id| format!("asset://{}", id)));
            if let Some(src) = src {
                put(map, "background-image", format!("url({})", src));
            }
            if let Some(size) = background.size {
                put(map, "background-size", size.as_css().to_string());
            }
            if let Some(repeat) = background.repeat {
                let value = if repeat { "repeat" } else { "no-repeat" };
                put(map, "background-repeat", value.to_string());
            }
            if let Some(position) = background.position {
                put(map, "background-position", position.as_css().to_string());
            }
        }
    }
}

fn compile_border(border: &BorderGroup, map: &mut FlatStyleMap) {
    put_length(map, "border-width", &border.width);
    if let Some(style) = border.style {
        put(map, "border-style", style.as_css().to_string());
    }
    if let Some(color) = &border.color {
        put(map, "border-color", color.0.clone());
    }
    if let Some(radius) = &border.radius {
        // Radius is always emitted as four longhand corners; absent
        // corners compile to 0, unlike box sides.
        let corner = |len: &Option<Length>| {
            len.as_ref().map(length_css).unwrap_or_else(|| "0px".to_string())
        };
        put(map, "border-top-left-radius", corner(&radius.top_left));
        put(map, "border-top-right-radius", corner(&radius.top_right));
        put(map, "border-bottom-right-radius", corner(&radius.bottom_right));
        put(map, "border-bottom-left-radius", corner(&radius.bottom_left));
    }
}

/// Default shadow color, applied only when a shadow object exists at all.
const SHADOW_DEFAULT_COLOR: &str = "#00000040";

fn compile_effects(effects: &EffectsGroup, map: &mut FlatStyleMap) {
    if let Some(opacity) = effects.opacity {
        put(map, "opacity", num(opacity));
    }
    if let Some(shadow) = &effects.shadow {
        let color = shadow
            .color
            .as_ref()
            .map(|c| c.0.clone())
            .unwrap_or_else(|| SHADOW_DEFAULT_COLOR.to_string());
        let body = format!(
            "{}px {}px {}px {}px {}",
            num(shadow.x.unwrap_or(0.0)),
            num(shadow.y.unwrap_or(0.0)),
            num(shadow.blur.unwrap_or(0.0)),
            num(shadow.spread.unwrap_or(0.0)),
            color
        );
        let value = if shadow.inset.unwrap_or(false) {
            format!("inset {}", body)
        } else {
            body
        };
        put(map, "box-shadow", value);
    }
    if let Some(transform) = &effects.transform {
        // translateX, translateY, rotate, scale — fixed order, any subset.
        let mut parts = Vec::new();
        if let Some(x) = &transform.translate_x {
            parts.push(format!("translateX({})", length_css(x)));
        }
        if let Some(y) = &transform.translate_y {
            parts.push(format!("translateY({})", length_css(y)));
        }
        if let Some(deg) = transform.rotate_deg {
            parts.push(format!("rotate({}deg)", num(deg)));
        }
        if let Some(scale) = transform.scale {
            parts.push(format!("scale({})", num(scale)));
        }
        if !parts.is_empty() {
            put(map, "transform", parts.join(" "));
        }
    }
}

fn compile_typography(typography: &TypographyGroup, map: &mut FlatStyleMap) {
    put_length(map, "font-size", &typography.font_size);
    if let Some(weight) = typography.font_weight {
        put(map, "font-weight", format!("{}", weight));
    }
    if let Some(height) = typography.line_height {
        put(map, "line-height", num(height));
    }
    put_length(map, "letter-spacing", &typography.letter_spacing);
    if let Some(align) = typography.text_align {
        put(map, "text-align", align.as_css().to_string());
    }
    if let Some(transform) = typography.text_transform {
        put(map, "text-transform", transform.as_css().to_string());
    }
    if let Some(color) = &typography.color {
        put(map, "color", color.0.clone());
    }
    if let Some(family) = &typography.font_family {
        put(map, "font-family", family.clone());
    }
}

fn compile_transition(preset: TransitionPreset, map: &mut FlatStyleMap) {
    let value = match preset {
        TransitionPreset::None => return,
        TransitionPreset::Fast => "all 120ms ease-out",
        TransitionPreset::Base => "all 200ms ease-in-out",
        TransitionPreset::Slow => "all 400ms ease-in-out",
    };
    put(map, "transition", value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(raw: serde_json::Value) -> StyleObject {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_integral_pixels_print_without_decimals() {
        assert_eq!(length_css(&Length::Px(8.0)), "8px");
        assert_eq!(length_css(&Length::Px(1.5)), "1.5px");
        assert_eq!(length_css(&Length::Token("var(--gutter)".into())), "var(--gutter)");
    }

    #[test]
    fn test_absent_overlay_falls_back_to_base() {
        let s = style(serde_json::json!({
            "base": {"layout": {"display": "flex"}}
        }));
        assert_eq!(compile(&s, LayerKey::Md), compile(&s, LayerKey::Base));
    }

    #[test]
    fn test_present_layers_lists_base_first() {
        let s = style(serde_json::json!({
            "base": {},
            "breakpoints": {"md": {}},
            "states": {"hover": {}}
        }));
        assert_eq!(
            present_layers(&s),
            vec![LayerKey::Base, LayerKey::Md, LayerKey::Hover]
        );
    }
}
