//! tokenloom Core Library
//!
//! This crate provides the platform-independent half of tokenloom:
//! - Token document loading into an ordered collection tree
//! - Reference, arithmetic, and composite alias resolution
//! - Named transforms grouped per platform
//! - Per-file token routing through filters
//! - Configuration and structural validation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  TokenTree  │────▶│  Resolver   │────▶│  Transform  │────▶│   Router    │
//! │   (JSON)    │     │  (aliases)  │     │  Pipeline   │     │  (filters)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tokenloom_core::{TokenTree, TransformPipeline, TransformRegistry, resolve_tree};
//!
//! let tree = TokenTree::load("tokens/tokens.json")?;
//! let resolved = resolve_tree(&tree)?;
//! let registry = TransformRegistry::builtin();
//! let web = TransformPipeline::for_group(&registry, "web")?
//!     .apply(&resolved, &Default::default());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod expr;
pub mod pipeline;
pub mod resolver;
pub mod router;
pub mod transforms;
pub mod tree;
pub mod validate;

pub use config::{Config, FileConfig, FileOptions, PlatformConfig, ProjectConfig};
pub use error::{Error, Result, Warning};
pub use pipeline::{TransformPipeline, TransformedTokens};
pub use resolver::{ResolvedTree, Resolver, resolve_tree};
pub use router::{FilterConfig, route};
pub use transforms::{TransformContext, TransformRegistry, TransformedToken};
pub use tree::TokenTree;
pub use validate::{ValidationReport, validate_document, validate_tree};
