//! Initialize a new tokenloom project

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tokenloom_core::config::{CONFIG_FILE, starter_config};

const STARTER_TOKENS: &str = r##"{
  "$metadata": {
    "tokenSetOrder": ["01 - Primitives", "02 - Semantic"]
  },
  "01 - Primitives": {
    "color": {
      "blue": {
        "500": { "value": "#0055FF", "type": "color" }
      },
      "white": { "value": "#FFFFFF", "type": "color" }
    },
    "spacing": {
      "base": { "value": "4", "type": "spacing" }
    }
  },
  "02 - Semantic": {
    "color": {
      "primary": { "value": "{color.blue.500}", "type": "color" },
      "on-primary": { "value": "{color.white}", "type": "color" }
    },
    "spacing": {
      "md": { "value": "{spacing.base} * 4", "type": "spacing" }
    }
  }
}
"##;

/// Run the init command
pub async fn run(path: &str, name: Option<&str>) -> Result<()> {
    let project_dir = Path::new(path);

    // Create directory if it doesn't exist
    if !project_dir.exists() {
        fs::create_dir_all(project_dir)?;
    }

    let abs_path = project_dir.canonicalize()?;
    let project_name = match name {
        Some(n) => n.to_string(),
        None => abs_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Could not determine project name from path"))?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "Directory '{}' already contains a {}",
            project_dir.display(),
            CONFIG_FILE
        );
    }

    tracing::info!("Creating new tokenloom project: {}", project_name);

    fs::write(
        project_dir.join(CONFIG_FILE),
        starter_config(&project_name).context("Failed to render configuration")?,
    )?;

    let tokens_path = project_dir.join("tokens/tokens.json");
    if tokens_path.exists() {
        tracing::info!("Keeping existing {}", tokens_path.display());
    } else {
        fs::create_dir_all(project_dir.join("tokens"))?;
        fs::write(&tokens_path, STARTER_TOKENS)?;
    }

    tracing::info!("✓ Project initialized at {}", abs_path.display());
    tracing::info!("  Run `tokenloom --config {} build` to generate outputs", path);
    Ok(())
}
