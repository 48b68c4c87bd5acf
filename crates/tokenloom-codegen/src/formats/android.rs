//! Android resources and Jetpack Compose

use minijinja::context;
use serde::Serialize;
use serde_json::Value;
use tokenloom_core::TransformedToken;
use tokenloom_core::expr::{parse_dimension, to_text};
use tokenloom_core::transforms::value::format_number;

use super::css::css_value;
use super::{CommentStyle, FormatContext, environment, file_header};
use crate::error::Result;

/// Package used when the file sets none
pub const DEFAULT_PACKAGE_NAME: &str = "com.example.design.tokens";

/// Object name used when the file sets none
pub const DEFAULT_OBJECT_NAME: &str = "DesignTokens";

/// Nested object for tokens without a category
const UNCATEGORIZED: &str = "Misc";

#[derive(Serialize)]
struct Entry {
    name: String,
    value: String,
}

#[derive(Serialize)]
struct Group {
    name: String,
    tokens: Vec<Entry>,
}

/// `android/colors`: `<color>` resources
pub fn colors(ctx: &FormatContext<'_>) -> Result<String> {
    resources(ctx, "color")
}

/// `android/dimens`: `<dimen>` resources
pub fn dimens(ctx: &FormatContext<'_>) -> Result<String> {
    resources(ctx, "dimen")
}

/// `android/strings`: `<string>` resources
pub fn strings(ctx: &FormatContext<'_>) -> Result<String> {
    resources(ctx, "string")
}

fn resources(ctx: &FormatContext<'_>, element: &str) -> Result<String> {
    let entries: Vec<Entry> = ctx
        .selection
        .iter()
        .map(|token| Entry {
            name: token.name.clone(),
            value: css_value(&token.value),
        })
        .collect();

    let env = environment()?;
    let rendered = env.get_template("resources.xml")?.render(context! {
        header => file_header(ctx.options, CommentStyle::Xml),
        element,
        tokens => entries,
    })?;
    Ok(rendered)
}

/// `android/compose`: one Kotlin object with a nested object per category
pub fn compose(ctx: &FormatContext<'_>) -> Result<String> {
    let package_name = ctx
        .options
        .package_name
        .as_deref()
        .unwrap_or(DEFAULT_PACKAGE_NAME);
    let valid_package = package_name
        .split('.')
        .all(|part| !part.is_empty() && is_identifier(part));
    if !valid_package {
        return Err(ctx.invalid_option(
            "package_name",
            format!("'{package_name}' is not a Kotlin package"),
        ));
    }
    let object_name = ctx.options.object_name.as_deref().unwrap_or(DEFAULT_OBJECT_NAME);
    if !is_identifier(object_name) {
        return Err(ctx.invalid_option(
            "object_name",
            format!("'{object_name}' is not a Kotlin identifier"),
        ));
    }

    let env = environment()?;
    let rendered = env.get_template("compose.kt")?.render(context! {
        header => file_header(ctx.options, CommentStyle::Line),
        package_name,
        object_name,
        groups => group_by_category(ctx.selection),
    })?;
    Ok(rendered)
}

fn is_identifier(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Groups in order of first appearance
fn group_by_category(selection: &[&TransformedToken]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for token in selection {
        let name = token
            .attributes
            .category
            .as_deref()
            .map(pascal_case)
            .filter(|n| is_identifier(n))
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let entry = Entry {
            name: token.name.clone(),
            value: kotlin_literal(&token.value),
        };
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.tokens.push(entry),
            None => groups.push(Group {
                name,
                tokens: vec![entry],
            }),
        }
    }
    groups
}

fn pascal_case(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Kotlin source for an Android-transformed value: `#aarrggbb` colors become
/// `ComposeColor(0xAARRGGBB)`, `dp`/`sp` dimensions use the unit extensions.
pub fn kotlin_literal(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => {
            if let Some(argb) = color_argb(s) {
                return format!("ComposeColor(0x{argb})");
            }
            match parse_dimension(s) {
                Some(d) if d.unit == "dp" || d.unit == "sp" => {
                    format!("{}.{}", format_number(d.value, 4), d.unit)
                }
                Some(d) if d.unit.is_empty() => format_number(d.value, 4),
                _ => quoted(s),
            }
        }
        other => quoted(&to_text(other)),
    }
}

fn color_argb(text: &str) -> Option<String> {
    let hex = text.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        8 => Some(hex.to_ascii_uppercase()),
        6 => Some(format!("FF{}", hex.to_ascii_uppercase())),
        _ => None,
    }
}

fn quoted(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$");
    format!("\"{escaped}\"")
}
