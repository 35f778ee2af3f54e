//! The closed style schema: typed property groups across breakpoints and
//! interaction states.
//!
//! Every leaf value is a pixel number, a theme-token reference
//! (`var(--name)`), a literal hex color, or a closed enum — arbitrary
//! strings are unrepresentable, so compiled output needs no per-render
//! sanitization. `deny_unknown_fields` everywhere makes unknown properties
//! a deserialization error.
//!
//! Validation here is the save-time hard gate. The compiler
//! (`style_compiler`) assumes its input already passed it.

use crate::core::error::VitrineError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A length: device pixels or a theme token passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Px(f64),
    Token(String),
}

/// Literal `#rrggbb`/`#rrggbbaa` color or a theme token reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleObject {
    pub base: StyleLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Breakpoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<States>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Breakpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<StyleLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<StyleLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<StyleLayer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct States {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<StyleLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressed: Option<StyleLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<StyleLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<StyleLayer>,
}

/// A sparse map over the fixed property groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<SpacingGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex: Option<FlexGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectsGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<TypographyGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionGroup>,
}

// ===== Group definitions =====

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct LayoutGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Flex,
    Grid,
    Block,
    Inline,
    None,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Display::Flex => "flex",
            Display::Grid => "grid",
            Display::Block => "block",
            Display::Inline => "inline",
            Display::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Visible,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    pub fn as_css(self) -> &'static str {
        match self {
            Overflow::Visible => "visible",
            Overflow::Hidden => "hidden",
            Overflow::Scroll => "scroll",
            Overflow::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpacingGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<BoxSides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<BoxSides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<Length>,
}

/// Four independently-optional sides. Absent sides are omitted from
/// compiled output, never zero-filled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxSides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PositionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionKind {
    Static,
    Relative,
    Absolute,
    Sticky,
    Fixed,
}

impl PositionKind {
    pub fn as_css(self) -> &'static str {
        match self {
            PositionKind::Static => "static",
            PositionKind::Relative => "relative",
            PositionKind::Absolute => "absolute",
            PositionKind::Sticky => "sticky",
            PositionKind::Fixed => "fixed",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlexGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<FlexDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<FlexWrap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify: Option<Justify>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<Length>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn as_css(self) -> &'static str {
        match self {
            FlexDirection::Row => "row",
            FlexDirection::RowReverse => "row-reverse",
            FlexDirection::Column => "column",
            FlexDirection::ColumnReverse => "column-reverse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexWrap {
    Nowrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    pub fn as_css(self) -> &'static str {
        match self {
            FlexWrap::Nowrap => "nowrap",
            FlexWrap::Wrap => "wrap",
            FlexWrap::WrapReverse => "wrap-reverse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl Justify {
    pub fn as_css(self) -> &'static str {
        match self {
            Justify::Start => "flex-start",
            Justify::Center => "center",
            Justify::End => "flex-end",
            Justify::SpaceBetween => "space-between",
            Justify::SpaceAround => "space-around",
            Justify::SpaceEvenly => "space-evenly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    Start,
    Center,
    End,
    Stretch,
    Baseline,
}

impl Align {
    pub fn as_css(self) -> &'static str {
        match self {
            Align::Start => "flex-start",
            Align::Center => "center",
            Align::End => "flex-end",
            Align::Stretch => "stretch",
            Align::Baseline => "baseline",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GridGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_gap: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_gap: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_flow: Option<GridAutoFlow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridAutoFlow {
    Row,
    Column,
    Dense,
}

impl GridAutoFlow {
    pub fn as_css(self) -> &'static str {
        match self {
            GridAutoFlow::Row => "row",
            GridAutoFlow::Column => "column",
            GridAutoFlow::Dense => "dense",
        }
    }
}

/// Background, discriminated by `type`. Per-kind field requirements are
/// enforced by the validation gate, not by serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<Vec<GradientStop>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<BackgroundSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<BackgroundPosition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Gradient,
    Image,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientStop {
    pub color: Color,
    /// 0..=100 percent along the gradient axis.
    pub position: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSize {
    Cover,
    Contain,
    Auto,
}

impl BackgroundSize {
    pub fn as_css(self) -> &'static str {
        match self {
            BackgroundSize::Cover => "cover",
            BackgroundSize::Contain => "contain",
            BackgroundSize::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundPosition {
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl BackgroundPosition {
    pub fn as_css(self) -> &'static str {
        match self {
            BackgroundPosition::Center => "center",
            BackgroundPosition::Top => "top",
            BackgroundPosition::Bottom => "bottom",
            BackgroundPosition::Left => "left",
            BackgroundPosition::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<CornerRadii>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
    None,
}

impl BorderStyle {
    pub fn as_css(self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::None => "none",
        }
    }
}

/// Corner radii compile to four explicit longhands; absent corners emit 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CornerRadii {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_left: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_right: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<Length>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectsGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

/// A single optional shadow (not a list). The default color applies only
/// when the shadow object exists at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Shadow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inset: Option<bool>,
}

/// Compiled in the fixed order translateX, translateY, rotate, scale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Transform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TypographyGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    /// Unitless multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Theme-token reference only; raw font names are not accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextTransform {
    pub fn as_css(self) -> &'static str {
        match self {
            TextTransform::None => "none",
            TextTransform::Uppercase => "uppercase",
            TextTransform::Lowercase => "lowercase",
            TextTransform::Capitalize => "capitalize",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<TransitionPreset>,
}

/// Unknown preset strings deserialize as `Base`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPreset {
    None,
    Fast,
    Slow,
    #[default]
    #[serde(other)]
    Base,
}

// ===== Validation gate =====

fn is_hex_color(raw: &str) -> bool {
    Regex::new(r"^#[0-9a-fA-F]{6}([0-9a-fA-F]{2})?$")
        .unwrap()
        .is_match(raw)
}

fn is_token(raw: &str) -> bool {
    Regex::new(r"^var\(--[a-z0-9][a-z0-9-]*\)$").unwrap().is_match(raw)
}

impl StyleObject {
    /// The save-time hard gate. Failures name the offending path; any
    /// failure blocks the DRAFT/PUBLISHED write.
    pub fn validate(&self) -> Result<(), VitrineError> {
        let mut fails = Vec::new();
        self.collect_failures("", &mut fails);
        if fails.is_empty() {
            Ok(())
        } else {
            Err(VitrineError::ValidationError(format!(
                "invalid style object: {}",
                fails.join("; ")
            )))
        }
    }

    pub(crate) fn collect_failures(&self, prefix: &str, fails: &mut Vec<String>) {
        let at = |layer: &str| {
            if prefix.is_empty() {
                layer.to_string()
            } else {
                format!("{}.{}", prefix, layer)
            }
        };
        validate_layer(&self.base, &at("base"), fails);
        if let Some(bp) = &self.breakpoints {
            for (name, layer) in [("sm", &bp.sm), ("md", &bp.md), ("lg", &bp.lg)] {
                if let Some(layer) = layer {
                    validate_layer(layer, &at(&format!("breakpoints.{}", name)), fails);
                }
            }
        }
        if let Some(st) = &self.states {
            for (name, layer) in [
                ("hover", &st.hover),
                ("pressed", &st.pressed),
                ("focus", &st.focus),
                ("disabled", &st.disabled),
            ] {
                if let Some(layer) = layer {
                    validate_layer(layer, &at(&format!("states.{}", name)), fails);
                }
            }
        }
    }
}

fn validate_length(len: &Length, path: &str, fails: &mut Vec<String>) {
    match len {
        Length::Px(n) => {
            if !n.is_finite() {
                fails.push(format!("{}: length must be finite", path));
            }
        }
        Length::Token(t) => {
            if !is_token(t) {
                fails.push(format!("{}: not a theme token reference", path));
            }
        }
    }
}

fn validate_color(color: &Color, path: &str, fails: &mut Vec<String>) {
    if !is_hex_color(&color.0) && !is_token(&color.0) {
        fails.push(format!("{}: not a hex color or theme token", path));
    }
}

fn validate_sides(sides: &BoxSides, path: &str, fails: &mut Vec<String>) {
    for (name, len) in [
        ("top", &sides.top),
        ("right", &sides.right),
        ("bottom", &sides.bottom),
        ("left", &sides.left),
    ] {
        if let Some(len) = len {
            validate_length(len, &format!("{}.{}", path, name), fails);
        }
    }
}

fn validate_layer(layer: &StyleLayer, path: &str, fails: &mut Vec<String>) {
    if let Some(layout) = &layer.layout {
        for (name, len) in [
            ("width", &layout.width),
            ("height", &layout.height),
            ("minWidth", &layout.min_width),
            ("maxWidth", &layout.max_width),
            ("minHeight", &layout.min_height),
            ("maxHeight", &layout.max_height),
        ] {
            if let Some(len) = len {
                validate_length(len, &format!("{}.layout.{}", path, name), fails);
            }
        }
    }

    if let Some(spacing) = &layer.spacing {
        if let Some(margin) = &spacing.margin {
            validate_sides(margin, &format!("{}.spacing.margin", path), fails);
        }
        if let Some(padding) = &spacing.padding {
            validate_sides(padding, &format!("{}.spacing.padding", path), fails);
        }
        if let Some(gap) = &spacing.gap {
            validate_length(gap, &format!("{}.spacing.gap", path), fails);
        }
    }

    if let Some(position) = &layer.position {
        for (name, len) in [
            ("top", &position.top),
            ("right", &position.right),
            ("bottom", &position.bottom),
            ("left", &position.left),
        ] {
            if let Some(len) = len {
                validate_length(len, &format!("{}.position.{}", path, name), fails);
            }
        }
    }

    if let Some(flex) = &layer.flex {
        for (name, factor) in [("grow", &flex.grow), ("shrink", &flex.shrink)] {
            if let Some(factor) = factor {
                if !factor.is_finite() || *factor < 0.0 {
                    fails.push(format!("{}.flex.{}: must be >= 0", path, name));
                }
            }
        }
        if let Some(basis) = &flex.basis {
            validate_length(basis, &format!("{}.flex.basis", path), fails);
        }
    }

    if let Some(grid) = &layer.grid {
        for (name, tracks) in [("columns", &grid.columns), ("rows", &grid.rows)] {
            if let Some(tracks) = tracks {
                if !(1..=12).contains(tracks) {
                    fails.push(format!("{}.grid.{}: must be 1..=12", path, name));
                }
            }
        }
        for (name, len) in [("columnGap", &grid.column_gap), ("rowGap", &grid.row_gap)] {
            if let Some(len) = len {
                validate_length(len, &format!("{}.grid.{}", path, name), fails);
            }
        }
    }

    if let Some(background) = &layer.background {
        validate_background(background, &format!("{}.background", path), fails);
    }

    if let Some(border) = &layer.border {
        if let Some(width) = &border.width {
            validate_length(width, &format!("{}.border.width", path), fails);
        }
        if let Some(color) = &border.color {
            validate_color(color, &format!("{}.border.color", path), fails);
        }
        if let Some(radius) = &border.radius {
            for (name, len) in [
                ("topLeft", &radius.top_left),
                ("topRight", &radius.top_right),
                ("bottomRight", &radius.bottom_right),
                ("bottomLeft", &radius.bottom_left),
            ] {
                if let Some(len) = len {
                    validate_length(len, &format!("{}.border.radius.{}", path, name), fails);
                }
            }
        }
    }

    if let Some(effects) = &layer.effects {
        if let Some(opacity) = effects.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                fails.push(format!("{}.effects.opacity: must be 0..=1", path));
            }
        }
        if let Some(shadow) = &effects.shadow {
            if let Some(color) = &shadow.color {
                validate_color(color, &format!("{}.effects.shadow.color", path), fails);
            }
        }
        if let Some(transform) = &effects.transform {
            for (name, len) in [
                ("translateX", &transform.translate_x),
                ("translateY", &transform.translate_y),
            ] {
                if let Some(len) = len {
                    validate_length(len, &format!("{}.effects.transform.{}", path, name), fails);
                }
            }
            if let Some(scale) = transform.scale {
                if !scale.is_finite() || scale <= 0.0 {
                    fails.push(format!("{}.effects.transform.scale: must be > 0", path));
                }
            }
        }
    }

    if let Some(typography) = &layer.typography {
        if let Some(size) = &typography.font_size {
            validate_length(size, &format!("{}.typography.fontSize", path), fails);
        }
        if let Some(weight) = typography.font_weight {
            if !(100..=900).contains(&weight) || weight % 100 != 0 {
                fails.push(format!(
                    "{}.typography.fontWeight: must be a multiple of 100 in 100..=900",
                    path
                ));
            }
        }
        if let Some(height) = typography.line_height {
            if !height.is_finite() || height <= 0.0 {
                fails.push(format!("{}.typography.lineHeight: must be > 0", path));
            }
        }
        if let Some(spacing) = &typography.letter_spacing {
            validate_length(spacing, &format!("{}.typography.letterSpacing", path), fails);
        }
        if let Some(color) = &typography.color {
            validate_color(color, &format!("{}.typography.color", path), fails);
        }
        if let Some(family) = &typography.font_family {
            if !is_token(family) {
                fails.push(format!(
                    "{}.typography.fontFamily: must be a theme token reference",
                    path
                ));
            }
        }
    }
}

fn validate_background(background: &Background, path: &str, fails: &mut Vec<String>) {
    match background.kind {
        BackgroundKind::Color => {
            match &background.color {
                Some(color) => validate_color(color, &format!("{}.color", path), fails),
                None => fails.push(format!("{}: color background requires a color", path)),
            }
            if background.stops.is_some() || background.url.is_some() || background.asset_id.is_some() {
                fails.push(format!("{}: color background carries gradient/image fields", path));
            }
        }
        BackgroundKind::Gradient => {
            match &background.stops {
                Some(stops) => {
                    if !(2..=6).contains(&stops.len()) {
                        fails.push(format!("{}.stops: gradients need 2..=6 stops", path));
                    }
                    for (i, stop) in stops.iter().enumerate() {
                        validate_color(&stop.color, &format!("{}.stops[{}].color", path, i), fails);
                        if !(0.0..=100.0).contains(&stop.position) {
                            fails.push(format!("{}.stops[{}].position: must be 0..=100", path, i));
                        }
                    }
                }
                None => fails.push(format!("{}: gradient background requires stops", path)),
            }
            if background.url.is_some() || background.asset_id.is_some() {
                fails.push(format!("{}: gradient background carries image fields", path));
            }
        }
        BackgroundKind::Image => {
            if background.url.is_none() && background.asset_id.is_none() {
                fails.push(format!("{}: image background requires url or assetId", path));
            }
            if background.color.is_some() || background.stops.is_some() {
                fails.push(format!("{}: image background carries color/gradient fields", path));
            }
        }
    }
}
