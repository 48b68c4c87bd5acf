//! Output file routing
//!
//! Each output file selects its tokens with an optional filter. Filters are
//! evaluated independently per file, so one token may land in several files.
//!
//! # Example
//!
//! ```yaml
//! filter:
//!   any:
//!     - category: [color]
//!     - collection: [semantic, components]
//! ```

use serde::{Deserialize, Serialize};

use crate::transforms::TransformedToken;

/// Predicate over a transformed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterConfig {
    /// Attribute category is one of the names
    Category {
        /// Accepted categories
        category: Vec<String>,
    },

    /// Explicit token `type` is one of the names
    Type {
        /// Accepted types
        #[serde(rename = "type")]
        token_type: Vec<String>,
    },

    /// Source collection contains one of the fragments (case-insensitive)
    Collection {
        /// Collection name fragments
        collection: Vec<String>,
    },

    /// Dotted path starts with one of the prefixes
    PathPrefix {
        /// Path prefixes
        path_prefix: Vec<String>,
    },

    /// Every inner filter matches
    All {
        /// Inner filters
        all: Vec<FilterConfig>,
    },

    /// At least one inner filter matches
    Any {
        /// Inner filters
        any: Vec<FilterConfig>,
    },

    /// The inner filter does not match
    Not {
        /// Inner filter
        not: Box<FilterConfig>,
    },
}

fn names<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl FilterConfig {
    /// Match on attribute category
    pub fn category<I: IntoIterator<Item = S>, S: Into<String>>(categories: I) -> Self {
        Self::Category {
            category: names(categories),
        }
    }

    /// Match on explicit token type
    pub fn token_type<I: IntoIterator<Item = S>, S: Into<String>>(types: I) -> Self {
        Self::Type {
            token_type: names(types),
        }
    }

    /// Match on source collection fragments
    pub fn collection<I: IntoIterator<Item = S>, S: Into<String>>(fragments: I) -> Self {
        Self::Collection {
            collection: names(fragments),
        }
    }

    /// Match on dotted path prefixes
    pub fn path_prefix<I: IntoIterator<Item = S>, S: Into<String>>(prefixes: I) -> Self {
        Self::PathPrefix {
            path_prefix: names(prefixes),
        }
    }

    /// Negate a filter
    pub fn negate(inner: FilterConfig) -> Self {
        Self::Not {
            not: Box::new(inner),
        }
    }

    /// Evaluate against a token
    pub fn matches(&self, token: &TransformedToken) -> bool {
        match self {
            Self::Category { category: names } => token
                .attributes
                .category
                .as_ref()
                .is_some_and(|c| names.contains(c)),
            Self::Type { token_type: names } => token
                .token_type
                .as_ref()
                .is_some_and(|t| names.contains(t)),
            Self::Collection {
                collection: fragments,
            } => {
                let collection = token.source_collection.to_lowercase();
                fragments
                    .iter()
                    .any(|f| collection.contains(&f.to_lowercase()))
            }
            Self::PathPrefix {
                path_prefix: prefixes,
            } => {
                let id = token.id();
                prefixes
                    .iter()
                    .any(|p| id == *p || id.starts_with(&format!("{p}.")))
            }
            Self::All { all: filters } => filters.iter().all(|f| f.matches(token)),
            Self::Any { any: filters } => filters.iter().any(|f| f.matches(token)),
            Self::Not { not: inner } => !inner.matches(token),
        }
    }
}

/// Select the tokens for one file, keeping token order. No filter accepts all.
pub fn route<'t>(
    tokens: &'t [TransformedToken],
    filter: Option<&FilterConfig>,
) -> Vec<&'t TransformedToken> {
    match filter {
        Some(filter) => tokens.iter().filter(|t| filter.matches(t)).collect(),
        None => tokens.iter().collect(),
    }
}
