//! Token tree loading
//!
//! Parses a token document into a tree of collections, groups, and leaves.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "$metadata": { "tokenSetOrder": ["01 - Primitives"] },
//!   "01 - Primitives": {
//!     "color": {
//!       "brand": {
//!         "primary": { "value": "#0055ff", "type": "color" }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Top-level keys starting with `$` are reserved and never tokens. Every other
//! top-level key is a collection. Below that, an object with a direct `value`
//! key is a leaf; any other object is a group.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Marker that starts reserved keys
pub const RESERVED_PREFIX: char = '$';

/// Key that turns an object into a leaf token
pub const VALUE_KEY: &str = "value";

/// Classification of a token, filled in by attribute transforms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Broad category (`color`, `spacing`, `fontSize`, ...)
    pub category: Option<String>,
    /// Second-level classification
    pub kind: Option<String>,
    /// Third-level classification
    pub item: Option<String>,
}

impl Attributes {
    /// Whether the category equals any of `names`
    pub fn category_in(&self, names: &[&str]) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| names.contains(&c))
    }
}

/// A leaf token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenNode {
    /// Name segments from the collection root to the leaf
    pub path: Vec<String>,

    /// Value as written in the document
    pub raw_value: Value,

    /// Value after alias resolution; `None` until resolved
    pub resolved_value: Option<Value>,

    /// Derived classification
    pub attributes: Attributes,

    /// Explicit `type` field
    pub token_type: Option<String>,

    /// Explicit `description` field
    pub description: Option<String>,

    /// Name of the top-level collection this token came from
    pub source_collection: String,
}

impl TokenNode {
    /// Dotted path, the form used inside references
    pub fn id(&self) -> String {
        self.path.join(".")
    }

    /// Resolved value if available, raw value otherwise
    pub fn value(&self) -> &Value {
        self.resolved_value.as_ref().unwrap_or(&self.raw_value)
    }
}

/// A node in a collection: either a leaf token or a group of named children
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf token
    Leaf(TokenNode),
    /// Ordered named children
    Group(Vec<(String, Node)>),
}

/// A named top-level collection
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Collection name as written in the document
    pub name: String,

    /// Ordered top-level children
    pub children: Vec<(String, Node)>,
}

impl Collection {
    /// Leaves in document order
    pub fn leaves(&self) -> Vec<&TokenNode> {
        let mut out = Vec::new();
        collect_leaves(&self.children, &mut out);
        out
    }
}

fn collect_leaves<'a>(children: &'a [(String, Node)], out: &mut Vec<&'a TokenNode>) {
    for (_, node) in children {
        match node {
            Node::Leaf(token) => out.push(token),
            Node::Group(inner) => collect_leaves(inner, out),
        }
    }
}

/// The loaded token document
#[derive(Debug, Clone, Default)]
pub struct TokenTree {
    collections: Vec<Collection>,
    tokens: Vec<TokenNode>,
    index: HashMap<String, usize>,
}

impl TokenTree {
    /// Load a token document from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&contents)
    }

    /// Parse a token document from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::structural("<document>", format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Build a tree from an already-parsed document
    pub fn from_value(document: Value) -> Result<Self> {
        let Value::Object(root) = document else {
            return Err(Error::structural(
                "<document>",
                "top level must be an object",
            ));
        };

        let mut collections = Vec::new();
        for (name, body) in root {
            if name.starts_with(RESERVED_PREFIX) {
                tracing::trace!("Skipping reserved key {}", name);
                continue;
            }
            let Value::Object(body) = body else {
                return Err(Error::structural(name, "collection must be an object"));
            };
            let children = parse_group(&name, &[], body)?;
            collections.push(Collection { name, children });
        }

        Ok(Self::from_collections(collections))
    }

    fn from_collections(collections: Vec<Collection>) -> Self {
        let mut tokens: Vec<TokenNode> = Vec::new();
        let mut index = HashMap::new();

        for collection in &collections {
            for token in collection.leaves() {
                let id = token.id();
                match index.get(&id) {
                    Some(&slot) => {
                        let previous: &TokenNode = &tokens[slot];
                        tracing::debug!(
                            "Token '{}' from '{}' overrides the one from '{}'",
                            id,
                            token.source_collection,
                            previous.source_collection
                        );
                        tokens[slot] = token.clone();
                    }
                    None => {
                        index.insert(id, tokens.len());
                        tokens.push(token.clone());
                    }
                }
            }
        }

        Self {
            collections,
            tokens,
            index,
        }
    }

    /// Collections in document order
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Collection names in document order
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name.as_str()).collect()
    }

    /// Merged leaf tokens in document order; for duplicate paths the last collection wins
    pub fn tokens(&self) -> &[TokenNode] {
        &self.tokens
    }

    /// Look up a token by dotted path
    pub fn get(&self, path: &str) -> Option<&TokenNode> {
        self.index.get(path).map(|&i| &self.tokens[i])
    }

    /// Number of merged tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the tree has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Whether an object is a leaf token
pub fn is_leaf(object: &Map<String, Value>) -> bool {
    object.contains_key(VALUE_KEY)
}

/// Whether a scalar key inside a group is metadata rather than content
fn is_group_metadata(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX) || key == "type" || key == "description"
}

fn location(collection: &str, path: &[String]) -> String {
    if path.is_empty() {
        collection.to_string()
    } else {
        format!("{}.{}", collection, path.join("."))
    }
}

fn parse_group(
    collection: &str,
    path: &[String],
    body: Map<String, Value>,
) -> Result<Vec<(String, Node)>> {
    let mut children = Vec::new();

    for (key, child) in body {
        if key.starts_with(RESERVED_PREFIX) {
            continue;
        }

        let mut child_path = path.to_vec();
        child_path.push(key.clone());

        match child {
            Value::Object(object) if is_leaf(&object) => {
                let leaf = parse_leaf(collection, child_path, object)?;
                children.push((key, Node::Leaf(leaf)));
            }
            Value::Object(object) => {
                let inner = parse_group(collection, &child_path, object)?;
                if inner.is_empty() {
                    return Err(Error::structural(
                        location(collection, &child_path),
                        "token has no value and group has no children",
                    ));
                }
                children.push((key, Node::Group(inner)));
            }
            _ if is_group_metadata(&key) => {}
            _ => {
                return Err(Error::structural(
                    location(collection, &child_path),
                    "expected a token object with a 'value' field",
                ));
            }
        }
    }

    Ok(children)
}

fn parse_leaf(
    collection: &str,
    path: Vec<String>,
    mut object: Map<String, Value>,
) -> Result<TokenNode> {
    let raw_value = object.remove(VALUE_KEY).unwrap_or(Value::Null);

    let token_type = match object.remove("type") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            return Err(Error::structural(
                location(collection, &path),
                "'type' must be a string",
            ));
        }
    };

    let description = match object.remove("description") {
        Some(Value::String(s)) => Some(s),
        _ => None,
    };

    Ok(TokenNode {
        path,
        raw_value,
        resolved_value: None,
        attributes: Attributes::default(),
        token_type,
        description,
        source_collection: collection.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reserved_keys_are_skipped() {
        let tree = TokenTree::from_value(json!({
            "$themes": [],
            "$metadata": {"tokenSetOrder": ["core"]},
            "core": {"space": {"sm": {"value": "4"}}}
        }))
        .unwrap();
        assert_eq!(tree.collection_names(), vec!["core"]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_leaf_detected_by_value_field() {
        let tree = TokenTree::from_value(json!({
            "core": {
                "color": {
                    "type": "color",
                    "brand": {
                        "primary": {"value": "#0055ff", "type": "color", "description": "Main"}
                    }
                }
            }
        }))
        .unwrap();

        let token = tree.get("color.brand.primary").unwrap();
        assert_eq!(token.path, vec!["color", "brand", "primary"]);
        assert_eq!(token.raw_value, json!("#0055ff"));
        assert_eq!(token.token_type.as_deref(), Some("color"));
        assert_eq!(token.description.as_deref(), Some("Main"));
        assert_eq!(token.source_collection, "core");
        assert!(token.resolved_value.is_none());
    }

    #[test]
    fn test_composite_value_is_a_leaf() {
        let tree = TokenTree::from_value(json!({
            "type": {
                "heading": {
                    "value": {"fontSize": "24", "fontFamily": "Inter"},
                    "type": "typography"
                }
            }
        }))
        .unwrap();
        let token = tree.get("heading").unwrap();
        assert!(token.raw_value.is_object());
    }

    #[test]
    fn test_empty_group_is_structural_error() {
        let err = TokenTree::from_value(json!({
            "core": {"color": {"red": {"type": "color"}}}
        }))
        .unwrap_err();
        match err {
            Error::Structural { location, .. } => assert_eq!(location, "core.color.red"),
            other => panic!("expected structural error, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_scalar_is_structural_error() {
        let err = TokenTree::from_value(json!({"core": {"color": {"red": "#ff0000"}}}))
            .unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
    }

    #[test]
    fn test_invalid_json_is_structural_error() {
        let err = TokenTree::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
    }

    #[test]
    fn test_non_object_collection_is_structural_error() {
        let err = TokenTree::from_value(json!({"core": [1, 2]})).unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
    }

    #[test]
    fn test_last_collection_wins_for_duplicates() {
        let tree = TokenTree::from_value(json!({
            "light": {
                "bg": {"value": "#ffffff"},
                "fg": {"value": "#000000"}
            },
            "dark": {
                "bg": {"value": "#111111"}
            }
        }))
        .unwrap();

        assert_eq!(tree.len(), 2);
        let bg = tree.get("bg").unwrap();
        assert_eq!(bg.raw_value, json!("#111111"));
        assert_eq!(bg.source_collection, "dark");
        // the override keeps the first occurrence's position
        assert_eq!(tree.tokens()[0].id(), "bg");
        assert_eq!(tree.tokens()[1].id(), "fg");
    }

    #[test]
    fn test_collection_leaves_keep_document_order() {
        let tree = TokenTree::from_value(json!({
            "core": {
                "b": {"value": "1"},
                "a": {"x": {"value": "2"}},
                "c": {"value": "3"}
            }
        }))
        .unwrap();
        let ids: Vec<String> = tree.collections()[0]
            .leaves()
            .iter()
            .map(|t| t.id())
            .collect();
        assert_eq!(ids, vec!["b", "a.x", "c"]);
    }

    #[test]
    fn test_empty_collection_is_allowed() {
        let tree = TokenTree::from_value(json!({"core": {}})).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.collection_names(), vec!["core"]);
    }
}
