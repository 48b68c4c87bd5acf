//! JavaScript module and TypeScript declarations
//!
//! Both formats share one nesting so the declaration file always describes
//! the module exactly.

use serde_json::Value;

use super::{CommentStyle, FormatContext, file_header, nest};
use crate::error::Result;

/// Export name used when the file sets none
pub const DEFAULT_EXPORT_NAME: &str = "tokens";

fn export_name<'a>(ctx: &'a FormatContext<'_>) -> Result<&'a str> {
    let name = ctx.options.export_name.as_deref().unwrap_or(DEFAULT_EXPORT_NAME);
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        Ok(name)
    } else {
        Err(ctx.invalid_option("export_name", format!("'{name}' is not a JavaScript identifier")))
    }
}

/// `javascript/es6`: a nested `export const` plus a default export
pub fn es6(ctx: &FormatContext<'_>) -> Result<String> {
    let name = export_name(ctx)?;
    let tree = nest(ctx.selection, |token| token.value.clone());

    let mut out = file_header(ctx.options, CommentStyle::Block);
    out.push_str(&format!(
        "export const {name} = {};\n\nexport default {name};\n",
        serde_json::to_string_pretty(&tree)?
    ));
    Ok(out)
}

/// `typescript/es6-declarations`: declarations matching [`es6`]
pub fn es6_declarations(ctx: &FormatContext<'_>) -> Result<String> {
    let name = export_name(ctx)?;
    let tree = nest(ctx.selection, |token| token.value.clone());

    let mut out = file_header(ctx.options, CommentStyle::Block);
    out.push_str(&format!("export declare const {name}: "));
    write_type(&tree, 0, &mut out)?;
    out.push_str(&format!(";\n\nexport default {name};\n"));
    Ok(out)
}

fn write_type(value: &Value, depth: usize, out: &mut String) -> Result<()> {
    match value {
        Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Object(fields) => {
            let indent = "  ".repeat(depth + 1);
            out.push_str("{\n");
            for (key, field) in fields {
                out.push_str(&indent);
                out.push_str(&serde_json::to_string(key)?);
                out.push_str(": ");
                write_type(field, depth + 1, out)?;
                out.push_str(";\n");
            }
            out.push_str(&"  ".repeat(depth));
            out.push('}');
        }
        Value::Array(items) => {
            let element = match items.first() {
                Some(Value::Number(_)) if items.iter().all(Value::is_number) => "number",
                _ => "string",
            };
            out.push_str(element);
            out.push_str("[]");
        }
        Value::Number(_) => out.push_str("number"),
        Value::Bool(_) => out.push_str("boolean"),
        _ => out.push_str("string"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::test_support::transformed;
    use serde_json::json;
    use tokenloom_core::{FileOptions, TransformedTokens, route};

    fn tokens() -> TransformedTokens {
        transformed(
            "web",
            None,
            json!({
                "core": {
                    "color": {"brand": {"primary": {"value": "#FF0055", "type": "color"}}},
                    "opacity": {"muted": {"value": 0.5, "type": "opacity"}},
                    "easing": {"standard": {"value": "ease-in-out", "type": "cubicBezier"}}
                }
            }),
        )
    }

    fn options() -> FileOptions {
        FileOptions {
            show_file_header: false,
            ..Default::default()
        }
    }

    fn context<'a>(
        selection: &'a [&'a tokenloom_core::TransformedToken],
        tokens: &'a TransformedTokens,
        options: &'a FileOptions,
    ) -> FormatContext<'a> {
        FormatContext {
            selection,
            dictionary: tokens,
            options,
            destination: "tokens.js",
        }
    }

    #[test]
    fn test_es6_module() {
        let tokens = tokens();
        let selection = route(tokens.tokens(), None);
        let options = options();
        let js = es6(&context(&selection, &tokens, &options)).unwrap();

        assert!(js.starts_with("export const tokens = {\n  \"color\": {\n"));
        assert!(js.contains("\"primary\": \"#ff0055\""));
        assert!(js.contains("\"muted\": 0.5"));
        assert!(js.ends_with("};\n\nexport default tokens;\n"));
    }

    #[test]
    fn test_declarations_match_module_shape() {
        let tokens = tokens();
        let selection = route(tokens.tokens(), None);
        let options = options();
        let dts = es6_declarations(&context(&selection, &tokens, &options)).unwrap();

        assert_eq!(
            dts,
            "export declare const tokens: {\n  \"color\": {\n    \"brand\": {\n      \"primary\": string;\n    };\n  };\n  \"opacity\": {\n    \"muted\": number;\n  };\n  \"easing\": {\n    \"standard\": string;\n  };\n};\n\nexport default tokens;\n"
        );
    }

    #[test]
    fn test_export_name_must_be_identifier() {
        let tokens = tokens();
        let selection = route(tokens.tokens(), None);
        let options = FileOptions {
            export_name: Some("design-tokens".into()),
            ..Default::default()
        };
        assert!(es6(&context(&selection, &tokens, &options)).is_err());

        let options = FileOptions {
            export_name: Some("designTokens".into()),
            ..Default::default()
        };
        let js = es6(&context(&selection, &tokens, &options)).unwrap();
        assert!(js.contains("export default designTokens;"));
    }
}
