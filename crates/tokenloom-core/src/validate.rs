//! Structural validation
//!
//! A quick pass over a token document that reports which collections are
//! present, how many tokens each holds, which leaves are empty, and how many
//! values are aliases. Missing collections and empty values are warnings;
//! only a malformed document is an error.

use serde_json::Value;
use std::fmt;

use crate::error::{Result, Warning};
use crate::tree::{TokenNode, TokenTree};

/// Token count of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Collection name
    pub name: String,
    /// Leaf tokens in the collection, before duplicate merging
    pub token_count: usize,
}

/// Outcome of validating a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Collections found, in document order
    pub collections: Vec<CollectionSummary>,
    /// Expected collection names that were found
    pub expected_found: Vec<String>,
    /// Expected collection names that were not found
    pub expected_missing: Vec<String>,
    /// Dotted paths (collection first) of leaves with empty values
    pub empty_values: Vec<String>,
    /// Number of leaves whose value contains a reference
    pub alias_count: usize,
    /// Collected warnings
    pub warnings: Vec<Warning>,
}

impl ValidationReport {
    /// Total leaf tokens across collections
    pub fn total_tokens(&self) -> usize {
        self.collections.iter().map(|c| c.token_count).sum()
    }

    /// Token count of a collection, if present
    pub fn token_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .iter()
            .find(|c| c.name == collection)
            .map(|c| c.token_count)
    }

    /// Whether any warning was raised
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collections:")?;
        for name in &self.expected_found {
            let count = self.token_count(name).unwrap_or_default();
            writeln!(f, "  ok    \"{name}\" ({count} tokens)")?;
        }
        for name in &self.expected_missing {
            writeln!(f, "  warn  \"{name}\" not found")?;
        }
        for summary in self
            .collections
            .iter()
            .filter(|c| !self.expected_found.contains(&c.name))
        {
            writeln!(
                f,
                "  extra \"{}\" ({} tokens)",
                summary.name, summary.token_count
            )?;
        }

        writeln!(f, "Empty values:")?;
        if self.empty_values.is_empty() {
            writeln!(f, "  none")?;
        }
        for path in &self.empty_values {
            writeln!(f, "  warn  {path}")?;
        }

        writeln!(f, "Alias references: {}", self.alias_count)?;
        write!(
            f,
            "Summary: {} collections, {} tokens, 0 errors, {} warnings",
            self.collections.len(),
            self.total_tokens(),
            self.warnings.len()
        )
    }
}

/// Whether a leaf value counts as empty. `0` and `false` are values.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Whether a raw value is an alias: a string that opens with a reference.
///
/// Text with an embedded reference (`1px solid {x}`) and composites are not
/// counted.
pub fn is_alias(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.starts_with('{'))
}

fn leaf_location(collection: &str, token: &TokenNode) -> String {
    format!("{}.{}", collection, token.id())
}

/// Validate a loaded tree against the expected collection names
pub fn validate_tree(tree: &TokenTree, expected: &[String]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for collection in tree.collections() {
        let leaves = collection.leaves();
        report.collections.push(CollectionSummary {
            name: collection.name.clone(),
            token_count: leaves.len(),
        });

        for token in leaves {
            if is_empty_value(&token.raw_value) {
                let path = leaf_location(&collection.name, token);
                report.warnings.push(Warning::EmptyValue { path: path.clone() });
                report.empty_values.push(path);
            }
            if is_alias(&token.raw_value) {
                report.alias_count += 1;
            }
        }
    }

    for name in expected {
        if report.token_count(name).is_some() {
            report.expected_found.push(name.clone());
        } else {
            report.warnings.push(Warning::CollectionMissing {
                collection: name.clone(),
            });
            report.expected_missing.push(name.clone());
        }
    }

    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }

    report
}

/// Parse and validate a JSON token document. Malformed documents are errors.
pub fn validate_document(json: &str, expected: &[String]) -> Result<ValidationReport> {
    let tree = TokenTree::from_json_str(json)?;
    Ok(validate_tree(&tree, expected))
}
