//! SwiftUI classes

use minijinja::context;
use serde::Serialize;
use serde_json::Value;
use tokenloom_core::expr::parse_dimension;
use tokenloom_core::transforms::value::format_number;

use super::css::css_value;
use super::{CommentStyle, FormatContext, environment, file_header};
use crate::error::Result;

/// Class name used when the file sets none
pub const DEFAULT_CLASS_NAME: &str = "DesignTokens";

const ACCESS_LEVELS: &[&str] = &["open", "public", "internal", "fileprivate", "private"];

#[derive(Serialize)]
struct Member {
    name: String,
    value: String,
    comment: Vec<String>,
}

/// `ios-swift/class.swift`: one `static let` per token
pub fn class(ctx: &FormatContext<'_>) -> Result<String> {
    let class_name = ctx.options.class_name.as_deref().unwrap_or(DEFAULT_CLASS_NAME);
    if !is_identifier(class_name) {
        return Err(ctx.invalid_option("class_name", format!("'{class_name}' is not a Swift identifier")));
    }
    let access_control = ctx.options.access_control.as_deref().unwrap_or("public");
    if !ACCESS_LEVELS.contains(&access_control) {
        return Err(ctx.invalid_option(
            "access_control",
            format!("expected one of {}", ACCESS_LEVELS.join(", ")),
        ));
    }

    let members: Vec<Member> = ctx
        .selection
        .iter()
        .map(|token| Member {
            name: token.name.clone(),
            value: swift_literal(&token.value),
            comment: doc_lines(token.description.as_deref()),
        })
        .collect();

    let env = environment()?;
    let rendered = env.get_template("class.swift")?.render(context! {
        header => file_header(ctx.options, CommentStyle::Line),
        access_control,
        class_name,
        tokens => members,
    })?;
    Ok(rendered)
}

/// One `///` line per description line
fn doc_lines(description: Option<&str>) -> Vec<String> {
    description
        .map(|text| text.lines().map(|line| line.trim_end().to_string()).collect())
        .unwrap_or_default()
}

fn is_identifier(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Swift source for a value. `Color(...)` initializers pass through, plain,
/// `px`, `pt`, and `s` dimensions become numbers, anything else a string.
pub fn swift_literal(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) if s.starts_with("Color(") => s.clone(),
        Value::String(s) => match parse_dimension(s) {
            Some(d) if matches!(d.unit.as_str(), "" | "px" | "pt" | "s") => format_number(d.value, 4),
            _ => quoted(s),
        },
        other => quoted(&css_value(other)),
    }
}

fn quoted(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
