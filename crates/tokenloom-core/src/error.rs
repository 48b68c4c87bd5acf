//! Error types for tokenloom-core

use thiserror::Error;

/// Result type alias for tokenloom-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tokenloom-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The token document is not well-formed
    #[error("malformed token document at '{location}': {message}")]
    Structural {
        /// Dotted location of the problem (collection and path)
        location: String,
        /// Description of what's wrong
        message: String,
    },

    /// A reference points at a path that does not exist
    #[error("unresolved reference '{{{path}}}' in token '{referenced_by}'")]
    UnresolvedReference {
        /// The missing token path
        path: String,
        /// The token whose value contains the reference
        referenced_by: String,
    },

    /// References form a cycle
    #[error("circular reference: {}", .chain.join(" -> "))]
    Cycle {
        /// Full reference chain, ending with the repeated path
        chain: Vec<String>,
    },

    /// An arithmetic expression could not be evaluated
    #[error("invalid expression in token '{token}': {message}")]
    InvalidExpression {
        /// Token whose value holds the expression
        token: String,
        /// Description of the error
        message: String,
    },

    /// A transform group names a transform that isn't registered
    #[error("unknown transform '{name}' in group '{group}'")]
    UnknownTransform {
        /// Transform name
        name: String,
        /// Group that referenced it
        group: String,
    },

    /// A platform names a transform group that isn't registered
    #[error("unknown transform group '{0}'")]
    UnknownTransformGroup(String),

    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Build a structural error at a dotted location
    pub fn structural(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Structural {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Whether the error is a reference resolution failure
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedReference { .. } | Self::Cycle { .. } | Self::InvalidExpression { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

/// Non-fatal conditions collected during validation and transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An expected collection is absent from the document
    CollectionMissing {
        /// Collection name
        collection: String,
    },

    /// A leaf token has an empty value
    EmptyValue {
        /// Dotted path including the collection name
        path: String,
    },

    /// A value transform was given input it cannot convert; the value passed through
    UnsupportedTransformValue {
        /// Transform name
        transform: String,
        /// Token path
        token: String,
        /// The value that was left untouched
        value: String,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CollectionMissing { collection } => {
                write!(f, "collection \"{collection}\" not found")
            }
            Self::EmptyValue { path } => write!(f, "empty value: {path}"),
            Self::UnsupportedTransformValue {
                transform,
                token,
                value,
            } => write!(
                f,
                "transform '{transform}' left '{token}' unchanged: unsupported value '{value}'"
            ),
        }
    }
}
