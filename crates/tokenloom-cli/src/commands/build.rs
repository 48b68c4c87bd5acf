//! Build platform files

use anyhow::{Context, Result};
use std::path::Path;
use tokenloom_codegen::{BuildOptions, Builder};
use tokenloom_core::{Config, TokenTree};

/// Run the build command
pub async fn run(config_path: &str, tokens: Option<&str>, force: bool) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);

    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let source = match tokens {
        Some(path) => Path::new(path).to_path_buf(),
        None => config.source_path(),
    };

    let builder = Builder::with_options(config, BuildOptions { force });
    let tree = TokenTree::load(&source)
        .with_context(|| format!("Failed to load tokens from {}", source.display()))?;
    tracing::info!(
        "Loaded {} tokens from {} collections",
        tree.len(),
        tree.collections().len()
    );

    let report = builder.build(&tree).await.context("Failed to write build output")?;

    for platform in &report.platforms {
        match &platform.result {
            Ok(artifacts) => {
                tracing::info!("✓ {} ({} files)", platform.name, artifacts.len());
                for (artifact, _) in artifacts {
                    tracing::debug!("  {} ({}...)", artifact.destination, &artifact.hash[..8]);
                }
            }
            Err(err) => tracing::error!("✗ {}: {}", platform.name, err),
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!(
            "{} of {} platforms failed",
            failed,
            report.platforms.len()
        );
    }

    tracing::info!("Build complete");
    Ok(())
}
