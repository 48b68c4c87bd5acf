//! tokenloom Code Generation
//!
//! This crate turns transformed tokens into platform files and drives whole
//! builds.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌─────────┐     ┌──────────┐     ┌─────────┐     ┌─────────┐
//! │ Tokens  │────▶│ Resolve │────▶│Transform │────▶│  Route  │────▶│  Emit   │
//! │ (JSON)  │     │ (once)  │     │(platform)│     │ (files) │     │(formats)│
//! └─────────┘     └─────────┘     └──────────┘     └─────────┘     └─────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tokenloom_codegen::Builder;
//! use tokenloom_core::Config;
//!
//! let builder = Builder::new(Config::load_or_default(".")?);
//! let tokens = builder.load_tokens()?;
//! let report = builder.build(&tokens).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod formats;

pub use builder::{Artifact, BuildOptions, BuildReport, Builder, PlatformReport, WriteStatus};
pub use error::{Error, Result};
pub use formats::{FormatContext, FormatRegistry};
