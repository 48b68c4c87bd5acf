//! Error types for format emission and builds

use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while emitting or writing artifacts
#[derive(Error, Debug)]
pub enum Error {
    /// Loading, resolving, or transforming tokens failed
    #[error(transparent)]
    Core(#[from] tokenloom_core::Error),

    /// A file names a format that isn't registered
    #[error("unknown format '{format}' for '{destination}'")]
    UnknownFormat {
        /// Format name
        format: String,
        /// File that requested it
        destination: String,
    },

    /// A format option has an unusable value
    #[error("invalid option '{option}' for '{destination}': {message}")]
    InvalidOption {
        /// Option name
        option: String,
        /// File that carries it
        destination: String,
        /// Error description
        message: String,
    },

    /// Template rendering failed
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
