//! Name transforms
//!
//! Each platform names tokens in its own convention:
//!
//! | Transform    | `["color", "brand", "primary"]` |
//! |--------------|---------------------------------|
//! | `name/kebab` | `color-brand-primary`           |
//! | `name/camel` | `colorBrandPrimary`             |
//! | `name/snake` | `color_brand_primary`           |

use once_cell::sync::Lazy;
use regex::Regex;

use super::{TransformContext, TransformDefinition, TransformFn, TransformedToken, match_all};

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid regex"));

static DASH_THEN_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-([A-Za-z0-9])").expect("valid regex"));

static NOT_SNAKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("valid regex"));

/// Built-in name transforms
pub fn definitions() -> Vec<TransformDefinition> {
    vec![
        TransformDefinition {
            name: "name/kebab",
            matcher: match_all,
            apply: TransformFn::Name(|token, ctx| kebab_case(&segments(token, ctx))),
        },
        TransformDefinition {
            name: "name/camel",
            matcher: match_all,
            apply: TransformFn::Name(|token, ctx| camel_case(&segments(token, ctx))),
        },
        TransformDefinition {
            name: "name/snake",
            matcher: match_all,
            apply: TransformFn::Name(|token, ctx| snake_case(&segments(token, ctx))),
        },
    ]
}

fn segments<'a>(token: &'a TransformedToken, ctx: &'a TransformContext) -> Vec<&'a str> {
    ctx.prefix
        .as_deref()
        .filter(|p| !p.is_empty())
        .into_iter()
        .chain(token.path.iter().map(String::as_str))
        .collect()
}

/// Split a segment into lowercase words at separators and lower-to-upper boundaries
fn words(segment: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for c in segment.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }
        let boundary = c.is_ascii_uppercase()
            && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
        previous = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `["color", "brandPrimary"]` to `color-brand-primary`
pub fn kebab_case(segments: &[&str]) -> String {
    segments
        .iter()
        .flat_map(|s| words(s))
        .collect::<Vec<_>>()
        .join("-")
}

/// `["color", "brand", "primary"]` to `colorBrandPrimary`
pub fn camel_case(segments: &[&str]) -> String {
    let dashed = segments.join("-");
    let joined = NON_ALPHANUMERIC.replace_all(&dashed, "-");
    let joined = joined.trim_matches('-');
    let camel = DASH_THEN_CHAR.replace_all(joined, |caps: &regex::Captures| caps[1].to_uppercase());

    let mut chars = camel.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// `["color", "brand", "primary"]` to `color_brand_primary`
pub fn snake_case(segments: &[&str]) -> String {
    NOT_SNAKE
        .replace_all(&segments.join("_"), "_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PATH: &[&str] = &["color", "brand", "primary"];

    #[test]
    fn test_platform_names_for_same_path() {
        assert_eq!(kebab_case(PATH), "color-brand-primary");
        assert_eq!(camel_case(PATH), "colorBrandPrimary");
        assert_eq!(snake_case(PATH), "color_brand_primary");
    }

    #[rstest]
    #[case(&["font", "fontSize", "lg"], "font-font-size-lg")]
    #[case(&["space", "2xl"], "space-2xl")]
    #[case(&["Brand Colors", "Blue 500"], "brand-colors-blue-500")]
    #[case(&["vbr", "color", "primary"], "vbr-color-primary")]
    fn test_kebab(#[case] segments: &[&str], #[case] expected: &str) {
        assert_eq!(kebab_case(segments), expected);
    }

    #[rstest]
    #[case(&["space", "2xl"], "space2xl")]
    #[case(&["Brand Colors", "blue 500"], "brandColorsBlue500")]
    #[case(&["500", "blue"], "_500Blue")]
    fn test_camel(#[case] segments: &[&str], #[case] expected: &str) {
        assert_eq!(camel_case(segments), expected);
    }

    #[rstest]
    #[case(&["space", "2xl"], "space_2xl")]
    #[case(&["Brand Colors", "blue-500"], "brand_colors_blue_500")]
    #[case(&["font", "family.sans"], "font_family_sans")]
    fn test_snake(#[case] segments: &[&str], #[case] expected: &str) {
        assert_eq!(snake_case(segments), expected);
    }

    #[test]
    fn test_prefix_is_applied() {
        let token = TransformedToken {
            path: vec!["color".into(), "primary".into()],
            name: "color.primary".into(),
            value: serde_json::json!("#fff"),
            raw_value: serde_json::json!("#fff"),
            attributes: Default::default(),
            token_type: None,
            description: None,
            source_collection: "core".into(),
        };
        let ctx = TransformContext {
            prefix: Some("vbr".into()),
        };
        assert_eq!(kebab_case(&segments(&token, &ctx)), "vbr-color-primary");
        assert_eq!(camel_case(&segments(&token, &ctx)), "vbrColorPrimary");
    }
}
