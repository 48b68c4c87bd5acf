//! CSS custom properties

use serde_json::Value;
use tokenloom_core::TransformedToken;
use tokenloom_core::expr::to_text;

use super::{CommentStyle, FormatContext, file_header};
use crate::error::Result;

/// Selector used when the file sets none
pub const DEFAULT_SELECTOR: &str = ":root";

/// `css/variables`: one `--name: value;` declaration per token
pub fn variables(ctx: &FormatContext<'_>) -> Result<String> {
    let selector = ctx.options.selector.as_deref().unwrap_or(DEFAULT_SELECTOR);
    if selector.trim().is_empty() {
        return Err(ctx.invalid_option("selector", "must not be empty"));
    }

    let mut out = file_header(ctx.options, CommentStyle::Block);
    out.push_str(selector);
    out.push_str(" {\n");
    for token in ctx.selection {
        out.push_str(&format!("  --{}: {};\n", token.name, declaration_value(ctx, token)));
    }
    out.push_str("}\n");
    Ok(out)
}

fn declaration_value(ctx: &FormatContext<'_>, token: &TransformedToken) -> String {
    if ctx.options.output_references {
        let target = token.reference().and_then(|path| ctx.dictionary.get(&path));
        if let Some(target) = target {
            return format!("var(--{})", target.name);
        }
    }
    css_value(&token.value)
}

/// Text of a value as a CSS declaration value.
///
/// Composite values that no transform flattened are joined with spaces in field
/// order (`{x, y, blur, color}` becomes `0 2px 4px #000`), lists with commas.
pub fn css_value(value: &Value) -> String {
    match value {
        Value::Object(fields) => fields
            .values()
            .map(css_value)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Array(items) => items.iter().map(css_value).collect::<Vec<_>>().join(", "),
        other => to_text(other),
    }
}
