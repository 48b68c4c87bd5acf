//! Value transforms
//!
//! Unit and format conversions. A transform returns `None` when the input is
//! not something it can convert (e.g. a non-numeric string handed to a unit
//! conversion); the pipeline then leaves the value untouched and records a
//! warning.

use serde_json::Value;

use super::{TransformDefinition, TransformFn, TransformedToken};
use crate::expr::{Dimension, parse_dimension, to_text};
use crate::tree::Attributes;

/// Root font size used for rem conversion
pub const BASE_FONT_SIZE: f64 = 16.0;

/// Categories measured in pixels on the web
const REM_CATEGORIES: &[&str] = &["spacing", "sizing", "fontSize", "lineHeight", "borderRadius"];

/// Categories that become density-independent pixels on Android
const DP_CATEGORIES: &[&str] = &["spacing", "sizing", "borderRadius", "borderWidth"];

/// Built-in value transforms
pub fn definitions() -> Vec<TransformDefinition> {
    vec![
        TransformDefinition {
            name: "size/pxToRem",
            matcher: |attrs| attrs.category_in(REM_CATEGORIES),
            apply: TransformFn::Value(|token| size_to_rem(&token.value)),
        },
        TransformDefinition {
            name: "size/androidDp",
            matcher: |attrs| attrs.category_in(DP_CATEGORIES) || is_font_size(attrs),
            apply: TransformFn::Value(size_to_android),
        },
        TransformDefinition {
            name: "time/msToSeconds",
            matcher: |attrs| attrs.category_in(&["duration"]),
            apply: TransformFn::Value(|token| duration_to_seconds(&token.value)),
        },
        TransformDefinition {
            name: "color/css",
            matcher: is_color,
            apply: TransformFn::Value(|token| color_css(&token.value)),
        },
        TransformDefinition {
            name: "color/swift",
            matcher: is_color,
            apply: TransformFn::Value(|token| {
                let hex = parse_hex_color(token.value.as_str()?)?;
                Some(Value::String(hex.to_swift()))
            }),
        },
        TransformDefinition {
            name: "color/hex8android",
            matcher: is_color,
            apply: TransformFn::Value(|token| {
                let hex = parse_hex_color(token.value.as_str()?)?;
                Some(Value::String(hex.to_hex8_android()))
            }),
        },
        TransformDefinition {
            name: "opacity/decimal",
            matcher: |attrs| attrs.category_in(&["opacity"]),
            apply: TransformFn::Value(|token| opacity_decimal(&token.value)),
        },
        TransformDefinition {
            name: "cubicBezier/css",
            matcher: |attrs| attrs.category_in(&["easing"]),
            apply: TransformFn::Value(|token| cubic_bezier_css(&token.value)),
        },
        TransformDefinition {
            name: "typography/cssShorthand",
            matcher: |attrs| attrs.category_in(&["typography"]),
            apply: TransformFn::Value(|token| typography_shorthand(&token.value)),
        },
    ]
}

fn is_color(attrs: &Attributes) -> bool {
    attrs.category_in(&["color"])
}

fn is_font_size(attrs: &Attributes) -> bool {
    attrs.category_in(&["fontSize"])
}

fn dimension_of(value: &Value) -> Option<Dimension> {
    match value {
        Value::Number(n) => n.as_f64().map(|value| Dimension {
            value,
            unit: String::new(),
        }),
        Value::String(s) => parse_dimension(s),
        _ => None,
    }
}

/// Format with at most `decimals` places, trailing zeros removed
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `16` to `1rem`, `24` to `1.5rem`, `10` to `0.625rem`
pub fn px_to_rem(px: f64) -> String {
    format!("{}rem", format_number(px / BASE_FONT_SIZE, 4))
}

/// `300` to `0.30s`
pub fn ms_to_seconds(ms: f64) -> String {
    format!("{:.2}s", ms / 1000.0)
}

fn size_to_rem(value: &Value) -> Option<Value> {
    let dimension = dimension_of(value)?;
    match dimension.unit.as_str() {
        "" | "px" => Some(Value::String(px_to_rem(dimension.value))),
        _ => Some(value.clone()),
    }
}

fn size_to_android(token: &TransformedToken) -> Option<Value> {
    let dimension = dimension_of(&token.value)?;
    let unit = if is_font_size(&token.attributes) { "sp" } else { "dp" };
    match dimension.unit.as_str() {
        "" | "px" | "dp" | "sp" => Some(Value::String(format!(
            "{}{unit}",
            format_number(dimension.value, 4)
        ))),
        _ => Some(token.value.clone()),
    }
}

fn duration_to_seconds(value: &Value) -> Option<Value> {
    let dimension = dimension_of(value)?;
    match dimension.unit.as_str() {
        "" | "ms" => Some(Value::String(ms_to_seconds(dimension.value))),
        "s" => Some(value.clone()),
        _ => None,
    }
}

fn color_css(value: &Value) -> Option<Value> {
    let text = value.as_str()?;
    if text.starts_with('#') {
        parse_hex_color(text)?;
        Some(Value::String(text.to_ascii_lowercase()))
    } else {
        Some(value.clone())
    }
}

fn opacity_decimal(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => {
            let dimension = parse_dimension(s)?;
            let fraction = match dimension.unit.as_str() {
                "%" => dimension.value / 100.0,
                "" => dimension.value,
                _ => return None,
            };
            serde_json::Number::from_f64(fraction).map(Value::Number)
        }
        _ => None,
    }
}

fn cubic_bezier_css(value: &Value) -> Option<Value> {
    match value {
        Value::Array(points) if points.len() == 4 => {
            let points: Vec<String> = points
                .iter()
                .map(|p| p.as_f64().map(|n| format_number(n, 4)))
                .collect::<Option<_>>()?;
            Some(Value::String(format!("cubic-bezier({})", points.join(", "))))
        }
        Value::String(_) => Some(value.clone()),
        _ => None,
    }
}

fn typography_shorthand(value: &Value) -> Option<Value> {
    let fields = value.as_object()?;
    let size = fields.get("fontSize").and_then(dimension_of)?;
    let family = fields.get("fontFamily").map(to_text)?;

    let unit = if size.unit.is_empty() { "px" } else { size.unit.as_str() };
    let mut shorthand = String::new();
    if let Some(weight) = fields.get("fontWeight") {
        shorthand.push_str(&to_text(weight));
        shorthand.push(' ');
    }
    shorthand.push_str(&format_number(size.value, 4));
    shorthand.push_str(unit);
    if let Some(line_height) = fields.get("lineHeight") {
        shorthand.push('/');
        shorthand.push_str(&to_text(line_height));
    }
    shorthand.push(' ');
    shorthand.push_str(&family);
    Some(Value::String(shorthand))
}

/// An sRGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel, 255 when the source had none
    pub a: u8,
}

impl Rgba {
    /// Fractional channels, e.g. `Color(red: 1.000, green: 0.000, blue: 0.333, opacity: 1.000)`
    pub fn to_swift(&self) -> String {
        let channel = |c: u8| f64::from(c) / 255.0;
        format!(
            "Color(red: {:.3}, green: {:.3}, blue: {:.3}, opacity: {:.3})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a)
        )
    }

    /// Alpha-first hex, e.g. `#ffff0055`
    pub fn to_hex8_android(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.a, self.r, self.g, self.b
        )
    }
}

/// Parse `#rgb`, `#rgba`, `#rrggbb`, or `#rrggbbaa`
pub fn parse_hex_color(input: &str) -> Option<Rgba> {
    let hex = input.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgba {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
        a: if expanded.len() == 8 { channel(6)? } else { 255 },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(16.0, "1rem")]
    #[case(24.0, "1.5rem")]
    #[case(10.0, "0.625rem")]
    #[case(0.0, "0rem")]
    #[case(1.0, "0.0625rem")]
    #[case(3.0, "0.1875rem")]
    #[case(160.0, "10rem")]
    fn test_px_to_rem(#[case] px: f64, #[case] expected: &str) {
        assert_eq!(px_to_rem(px), expected);
    }

    #[test]
    fn test_ms_to_seconds() {
        assert_eq!(ms_to_seconds(300.0), "0.30s");
        assert_eq!(ms_to_seconds(1500.0), "1.50s");
    }

    #[test]
    fn test_size_to_rem_accepts_px_and_numbers() {
        assert_eq!(size_to_rem(&json!(24)), Some(json!("1.5rem")));
        assert_eq!(size_to_rem(&json!("8px")), Some(json!("0.5rem")));
        assert_eq!(size_to_rem(&json!("1.5em")), Some(json!("1.5em")));
        assert_eq!(size_to_rem(&json!("auto")), None);
    }

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(duration_to_seconds(&json!(300)), Some(json!("0.30s")));
        assert_eq!(duration_to_seconds(&json!("150ms")), Some(json!("0.15s")));
        assert_eq!(duration_to_seconds(&json!("fast")), None);
    }

    #[test]
    fn test_hex_color_six_digits_is_opaque() {
        let c = parse_hex_color("#FF0055").unwrap();
        assert_eq!(c, Rgba { r: 255, g: 0, b: 85, a: 255 });
        assert_eq!(
            c.to_swift(),
            "Color(red: 1.000, green: 0.000, blue: 0.333, opacity: 1.000)"
        );
        assert_eq!(c.to_hex8_android(), "#ffff0055");
    }

    #[test]
    fn test_hex_color_eight_digits_has_alpha() {
        let c = parse_hex_color("#00000080").unwrap();
        assert_eq!(c.a, 128);
        assert_eq!(
            c.to_swift(),
            "Color(red: 0.000, green: 0.000, blue: 0.000, opacity: 0.502)"
        );
        assert_eq!(c.to_hex8_android(), "#80000000");
    }

    #[test]
    fn test_short_hex_expands() {
        assert_eq!(
            parse_hex_color("#fff"),
            Some(Rgba { r: 255, g: 255, b: 255, a: 255 })
        );
    }

    #[rstest]
    #[case("rgba(0,0,0,0.5)")]
    #[case("#ggg")]
    #[case("#12345")]
    #[case("red")]
    fn test_invalid_hex(#[case] input: &str) {
        assert!(parse_hex_color(input).is_none());
    }

    #[test]
    fn test_color_css_lowercases_hex_only() {
        assert_eq!(color_css(&json!("#FF0055")), Some(json!("#ff0055")));
        assert_eq!(color_css(&json!("rgba(0,0,0,.5)")), Some(json!("rgba(0,0,0,.5)")));
        assert_eq!(color_css(&json!(12)), None);
    }

    #[test]
    fn test_opacity_decimal() {
        assert_eq!(opacity_decimal(&json!("50%")), Some(json!(0.5)));
        assert_eq!(opacity_decimal(&json!(0.4)), Some(json!(0.4)));
        assert_eq!(opacity_decimal(&json!("half")), None);
    }

    #[test]
    fn test_cubic_bezier_css() {
        assert_eq!(
            cubic_bezier_css(&json!([0.4, 0, 0.2, 1])),
            Some(json!("cubic-bezier(0.4, 0, 0.2, 1)"))
        );
        assert_eq!(cubic_bezier_css(&json!([1, 2])), None);
    }

    #[test]
    fn test_typography_shorthand() {
        let value = json!({
            "fontFamily": "Inter",
            "fontWeight": "600",
            "fontSize": 24,
            "lineHeight": "1.25"
        });
        assert_eq!(typography_shorthand(&value), Some(json!("600 24px/1.25 Inter")));
        assert_eq!(typography_shorthand(&json!({"fontSize": 12})), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.5, 4), "1.5");
        assert_eq!(format_number(2.0, 4), "2");
        assert_eq!(format_number(-0.00001, 4), "0");
        assert_eq!(format_number(0.33333, 4), "0.3333");
    }
}
