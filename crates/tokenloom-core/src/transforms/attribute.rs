//! Attribute transforms

use super::{TransformDefinition, TransformFn, TransformedToken, match_all};
use crate::tree::Attributes;

/// Built-in attribute transforms
pub fn definitions() -> Vec<TransformDefinition> {
    vec![TransformDefinition {
        name: "attribute/cti",
        matcher: match_all,
        apply: TransformFn::Attribute(category_type_item),
    }]
}

/// Category from the explicit token type when present, otherwise the first
/// path segment; type and item from the next two segments.
fn category_type_item(token: &TransformedToken) -> Attributes {
    let category = token
        .token_type
        .as_deref()
        .map(normalize_type)
        .or_else(|| token.path.first().cloned());

    Attributes {
        category,
        kind: token.path.get(1).cloned(),
        item: token.path.get(2).cloned(),
    }
}

/// Map authoring-tool type names onto canonical categories
pub fn normalize_type(token_type: &str) -> String {
    match token_type {
        "fontSizes" => "fontSize",
        "lineHeights" => "lineHeight",
        "fontWeights" => "fontWeight",
        "fontFamilies" => "fontFamily",
        "letterSpacings" => "letterSpacing",
        "dimension" => "sizing",
        "cubicBezier" => "easing",
        "boxShadow" => "shadow",
        "borderRadii" => "borderRadius",
        other => other,
    }
    .to_string()
}
