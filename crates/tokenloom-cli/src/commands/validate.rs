//! Validate the token document

use anyhow::{Context, Result};
use std::path::Path;
use tokenloom_core::{Config, validate_document};

/// Run the validate command
///
/// Prints the report to stdout. Warnings never fail the command; a malformed
/// document does.
pub async fn run(config_path: &str, tokens: Option<&str>) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let source = match tokens {
        Some(path) => Path::new(path).to_path_buf(),
        None => config.source_path(),
    };
    tracing::info!("Validating {}", source.display());

    let contents = std::fs::read_to_string(&source)
        .with_context(|| format!("Failed to read {}", source.display()))?;
    let report = validate_document(&contents, &config.project.expected_collections)
        .context("Token document is malformed")?;

    println!("{report}");

    if report.has_warnings() {
        tracing::info!("Validation passed with {} warnings", report.warnings.len());
    } else {
        tracing::info!("✓ Token document is valid");
    }
    Ok(())
}
