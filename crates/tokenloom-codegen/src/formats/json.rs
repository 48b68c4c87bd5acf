//! Nested JSON

use super::{FormatContext, nest};
use crate::error::Result;

/// `json/nested`: the path hierarchy with transformed values as leaves.
/// JSON has no comments, so no header is written.
pub fn nested(ctx: &FormatContext<'_>) -> Result<String> {
    let tree = nest(ctx.selection, |token| token.value.clone());
    let mut out = serde_json::to_string_pretty(&tree)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::test_support::transformed;
    use serde_json::{Value, json};
    use tokenloom_core::{FileOptions, route};

    #[test]
    fn test_nested_json() {
        let tokens = transformed(
            "web",
            None,
            json!({
                "core": {
                    "spacing": {"sm": {"value": 8, "type": "spacing"}, "lg": {"value": "{spacing.sm} * 3", "type": "spacing"}},
                    "font": {"body": {"value": {"fontFamily": "Inter", "fontSize": "16px"}, "type": "typography"}}
                }
            }),
        );
        let selection = route(tokens.tokens(), None);
        let options = FileOptions::default();
        let out = nested(&FormatContext {
            selection: &selection,
            dictionary: &tokens,
            options: &options,
            destination: "tokens.json",
        })
        .unwrap();

        assert!(out.ends_with("}\n"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            json!({
                "spacing": {"sm": "0.5rem", "lg": "1.5rem"},
                "font": {"body": "16px Inter"}
            })
        );
    }
}
