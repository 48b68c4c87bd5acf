//! Output formats
//!
//! A format is a pure function from a [`FormatContext`] to file contents. Formats
//! never convert units or rename tokens; they only serialize what the
//! platform's transforms produced.
//!
//! # Built-in Formats
//!
//! | Name                          | Output                                  |
//! |-------------------------------|-----------------------------------------|
//! | `css/variables`               | custom properties under a selector      |
//! | `javascript/es6`              | nested `export const` object            |
//! | `typescript/es6-declarations` | matching `.d.ts` declarations           |
//! | `json/nested`                 | nested JSON                             |
//! | `ios-swift/class.swift`       | SwiftUI class with static members       |
//! | `android/colors`              | `<color>` resources                     |
//! | `android/dimens`              | `<dimen>` resources                     |
//! | `android/strings`             | `<string>` resources                    |
//! | `android/compose`             | Kotlin object grouped by category       |

pub mod android;
pub mod css;
pub mod javascript;
pub mod json;
pub mod swift;

use minijinja::{AutoEscape, Environment};
use serde_json::{Map, Value};
use tokenloom_core::{FileOptions, TransformedToken, TransformedTokens};

use crate::error::{Error, Result};

/// Emitter signature
pub type FormatFn = fn(&FormatContext<'_>) -> Result<String>;

/// Everything a format may read
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    /// Tokens routed to this file, in tree order
    pub selection: &'a [&'a TransformedToken],
    /// All of the platform's tokens, for resolving reference names
    pub dictionary: &'a TransformedTokens,
    /// The file's options
    pub options: &'a FileOptions,
    /// The file's destination, relative to the build path
    pub destination: &'a str,
}

impl FormatContext<'_> {
    /// Error for an unusable option value
    pub fn invalid_option(&self, option: &str, message: impl Into<String>) -> Error {
        Error::InvalidOption {
            option: option.to_string(),
            destination: self.destination.to_string(),
            message: message.into(),
        }
    }
}

/// Lines of the generated-file header
pub const HEADER_LINES: &[&str] = &[
    "Do not edit directly, this file was generated by tokenloom.",
    "Edit the token source and rebuild instead.",
];

/// Comment syntax used for the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/** ... */`
    Block,
    /// `// ...`
    Line,
    /// `<!-- ... -->`
    Xml,
}

/// Header comment, or an empty string when `show_file_header` is off.
/// Non-empty headers end with a blank line.
pub fn file_header(options: &FileOptions, style: CommentStyle) -> String {
    if !options.show_file_header {
        return String::new();
    }
    let mut out = String::new();
    match style {
        CommentStyle::Block => {
            out.push_str("/**\n");
            for line in HEADER_LINES {
                out.push_str(&format!(" * {line}\n"));
            }
            out.push_str(" */\n");
        }
        CommentStyle::Line => {
            for line in HEADER_LINES {
                out.push_str(&format!("// {line}\n"));
            }
        }
        CommentStyle::Xml => {
            out.push_str("<!--\n");
            for line in HEADER_LINES {
                out.push_str(&format!("  {line}\n"));
            }
            out.push_str("-->\n");
        }
    }
    out.push('\n');
    out
}

/// Rebuild the path hierarchy of a selection, with `leaf` producing each leaf.
///
/// A token whose path runs through another token's leaf is skipped.
pub fn nest(selection: &[&TransformedToken], leaf: impl Fn(&TransformedToken) -> Value) -> Value {
    let mut root = Map::new();
    'tokens: for token in selection {
        let Some((last, parents)) = token.path.split_last() else {
            continue;
        };
        let mut node = &mut root;
        for segment in parents {
            let child = node
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            match child {
                Value::Object(inner) => node = inner,
                _ => {
                    tracing::warn!(
                        "Skipping '{}': '{}' is already a token",
                        token.id(),
                        segment
                    );
                    continue 'tokens;
                }
            }
        }
        node.insert(last.clone(), leaf(token));
    }
    Value::Object(root)
}

/// Template environment for the mobile formats
pub(crate) fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("xml_escape", |value: String| xml_escape(&value));
    env.add_filter("android_string", |value: String| android_string(&value));
    env.add_template("class.swift", include_str!("../templates/class.swift.jinja"))?;
    env.add_template("resources.xml", include_str!("../templates/resources.xml.jinja"))?;
    env.add_template("compose.kt", include_str!("../templates/compose.kt.jinja"))?;
    Ok(env)
}

/// Escape the five XML special characters
pub fn xml_escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// XML-escaped text with the extra escaping Android string resources need
fn android_string(text: &str) -> String {
    xml_escape(&text.replace('\\', "\\\\"))
        .replace("&apos;", "\\'")
        .replace("&quot;", "\\\"")
}

/// Name-to-emitter table
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: Vec<(String, FormatFn)>,
}

impl FormatRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in format
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("css/variables", css::variables);
        registry.register("javascript/es6", javascript::es6);
        registry.register("typescript/es6-declarations", javascript::es6_declarations);
        registry.register("json/nested", json::nested);
        registry.register("ios-swift/class.swift", swift::class);
        registry.register("android/colors", android::colors);
        registry.register("android/dimens", android::dimens);
        registry.register("android/strings", android::strings);
        registry.register("android/compose", android::compose);
        registry
    }

    /// Add a format; a format with the same name is replaced
    pub fn register(&mut self, name: impl Into<String>, format: FormatFn) {
        let name = name.into();
        match self.formats.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = format,
            None => self.formats.push((name, format)),
        }
    }

    /// Look up a format by name
    pub fn get(&self, name: &str) -> Option<FormatFn> {
        self.formats
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, format)| *format)
    }

    /// Registered format names
    pub fn names(&self) -> Vec<&str> {
        self.formats.iter().map(|(n, _)| n.as_str()).collect()
    }
}
