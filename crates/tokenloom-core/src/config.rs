//! Configuration parsing and validation
//!
//! This module handles loading and validating tokenloom configuration files.
//!
//! # Configuration Files
//!
//! - `tokenloom.yaml` - Project configuration: token source, expected
//!   collections, extra transform groups, and platforms
//!
//! Without a `tokenloom.yaml` the built-in configuration is used. A file that
//! declares no platforms gets the built-in platforms.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::router::FilterConfig;
use crate::transforms::{TransformGroup, TransformRegistry};

/// File name looked up inside a project directory
pub const CONFIG_FILE: &str = "tokenloom.yaml";

const DEFAULT_CONFIG: &str = include_str!("default_config.yaml");

/// Root project configuration from `tokenloom.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,

    /// Token document, relative to the project directory
    #[serde(default = "default_source")]
    pub source: String,

    /// Collections the validation pass expects to find
    #[serde(default)]
    pub expected_collections: Vec<String>,

    /// Additional or replacement transform groups
    #[serde(default)]
    pub transform_groups: BTreeMap<String, Vec<String>>,

    /// Output platforms
    #[serde(default)]
    pub platforms: Vec<PlatformConfig>,
}

fn default_name() -> String {
    "design-tokens".to_string()
}

fn default_source() -> String {
    "tokens/tokens.json".to_string()
}

/// One output platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform name, e.g. `web/css`
    pub name: String,

    /// Transform group applied to every token
    pub transform_group: String,

    /// Name prefix passed to name transforms
    #[serde(default)]
    pub prefix: Option<String>,

    /// Output directory, relative to the project directory
    pub build_path: String,

    /// Output files, in emission order
    pub files: Vec<FileConfig>,
}

/// One output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Path relative to the platform's build path
    pub destination: String,

    /// Format name, e.g. `css/variables`
    pub format: String,

    /// Token selection; absent selects everything
    #[serde(default)]
    pub filter: Option<FilterConfig>,

    /// Format options
    #[serde(default)]
    pub options: FileOptions,
}

/// Options read by formats. Each format ignores the options it doesn't use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOptions {
    /// CSS selector wrapping the variables
    #[serde(default)]
    pub selector: Option<String>,

    /// Emit `var(--name)` for tokens that alias another token
    #[serde(default)]
    pub output_references: bool,

    /// Swift class name
    #[serde(default)]
    pub class_name: Option<String>,

    /// Swift access modifier
    #[serde(default)]
    pub access_control: Option<String>,

    /// Kotlin package
    #[serde(default)]
    pub package_name: Option<String>,

    /// Kotlin object name
    #[serde(default)]
    pub object_name: Option<String>,

    /// JavaScript export name
    #[serde(default)]
    pub export_name: Option<String>,

    /// Prepend the "do not edit" header
    #[serde(default = "default_true")]
    pub show_file_header: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            selector: None,
            output_references: false,
            class_name: None,
            access_control: None,
            package_name: None,
            object_name: None,
            export_name: None,
            show_file_header: true,
        }
    }
}

impl ProjectConfig {
    /// The embedded default configuration
    pub fn builtin() -> Result<Self> {
        Ok(serde_yaml::from_str(DEFAULT_CONFIG)?)
    }

    /// Parse a configuration document, filling gaps from the built-in one
    pub fn parse(contents: &str) -> Result<Self> {
        let mut project: ProjectConfig = serde_yaml::from_str(contents)?;
        if project.platforms.is_empty() || project.expected_collections.is_empty() {
            let builtin = Self::builtin()?;
            if project.platforms.is_empty() {
                project.platforms = builtin.platforms;
            }
            if project.expected_collections.is_empty() {
                project.expected_collections = builtin.expected_collections;
            }
        }
        project.validate()?;
        Ok(project)
    }

    /// Check platform and file settings
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for platform in &self.platforms {
            if !names.insert(platform.name.as_str()) {
                return Err(Error::ConfigInvalid {
                    message: format!("duplicate platform '{}'", platform.name),
                });
            }
            if platform.files.is_empty() {
                return Err(Error::ConfigInvalid {
                    message: format!("platform '{}' has no files", platform.name),
                });
            }
            let mut destinations = HashSet::new();
            for file in &platform.files {
                if file.destination.trim().is_empty() {
                    return Err(Error::ConfigInvalid {
                        message: format!("platform '{}' has a file without destination", platform.name),
                    });
                }
                if !destinations.insert(file.destination.as_str()) {
                    return Err(Error::ConfigInvalid {
                        message: format!(
                            "platform '{}' writes '{}' twice",
                            platform.name, file.destination
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Built-in transforms and groups plus the configured groups
    pub fn transform_registry(&self) -> TransformRegistry {
        let mut registry = TransformRegistry::builtin();
        for (name, transforms) in &self.transform_groups {
            registry.register_group(TransformGroup::new(name.clone(), transforms.clone()));
        }
        registry
    }

    /// Look up a platform by name
    pub fn platform(&self, name: &str) -> Option<&PlatformConfig> {
        self.platforms.iter().find(|p| p.name == name)
    }
}

/// The built-in configuration as YAML text, renamed to `name`
pub fn starter_config(name: &str) -> Result<String> {
    let quoted = serde_json::to_string(name).map_err(|e| Error::ConfigInvalid {
        message: format!("invalid project name: {e}"),
    })?;
    Ok(DEFAULT_CONFIG.replacen(
        &format!("name: {}", default_name()),
        &format!("name: {quoted}"),
        1,
    ))
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

fn split_config_path(path: &Path) -> (PathBuf, PathBuf) {
    if path.is_dir() {
        (path.join(CONFIG_FILE), path.to_path_buf())
    } else {
        (
            path.to_path_buf(),
            path.parent().unwrap_or(Path::new(".")).to_path_buf(),
        )
    }
}

impl Config {
    /// Load configuration from a directory or a `tokenloom.yaml` path
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = Config::load("./design-system")?;
    /// println!("Source: {}", config.source_path().display());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (config_path, base_path) = split_config_path(path.as_ref());

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project = ProjectConfig::parse(&contents)?;
        tracing::debug!("Loaded configuration from {}", config_path.display());

        Ok(Self { project, base_path })
    }

    /// Like [`Config::load`], falling back to the built-in configuration when the file is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path.as_ref()) {
            Err(Error::ConfigNotFound { path: missing }) => {
                tracing::debug!("{} not found, using built-in configuration", missing);
                let (_, base_path) = split_config_path(path.as_ref());
                Ok(Self {
                    project: ProjectConfig::builtin()?,
                    base_path,
                })
            }
            other => other,
        }
    }

    /// Built-in configuration rooted at a directory
    pub fn builtin<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        Ok(Self {
            project: ProjectConfig::builtin()?,
            base_path: base_path.as_ref().to_path_buf(),
        })
    }

    /// Absolute location of the token document
    pub fn source_path(&self) -> PathBuf {
        self.base_path.join(&self.project.source)
    }

    /// Output directory of a platform
    pub fn build_dir(&self, platform: &PlatformConfig) -> PathBuf {
        self.base_path.join(&platform.build_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config() {
        let config = ProjectConfig::builtin().unwrap();
        assert_eq!(config.source, "tokens/tokens.json");
        assert_eq!(config.expected_collections.len(), 12);
        assert_eq!(config.expected_collections[11], "11 - Motion & Effects");

        let names: Vec<_> = config.platforms.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "web/css",
                "web/js",
                "web/json",
                "ios/swift",
                "android/xml",
                "android/compose"
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builtin_dark_css_file() {
        let config = ProjectConfig::builtin().unwrap();
        let css = config.platform("web/css").unwrap();
        assert_eq!(css.prefix.as_deref(), Some("vbr"));
        let dark = &css.files[1];
        assert_eq!(dark.destination, "tokens.dark.css");
        assert_eq!(dark.options.selector.as_deref(), Some("[data-theme=\"dark\"]"));
        assert!(dark.options.output_references);
        assert_eq!(
            dark.filter,
            Some(FilterConfig::collection(["semantic", "components"]))
        );
    }

    #[test]
    fn test_builtin_android_strings_carry_easing() {
        let config = ProjectConfig::builtin().unwrap();
        let strings = &config.platform("android/xml").unwrap().files[2];
        assert_eq!(strings.destination, "res/values/design_strings.xml");
        assert_eq!(
            strings.filter,
            Some(FilterConfig::category(["fontFamily", "easing"]))
        );
    }

    #[test]
    fn test_parse_minimal_config_fills_defaults() {
        let config = ProjectConfig::parse("name: test-project\n").unwrap();
        assert_eq!(config.name, "test-project");
        assert_eq!(config.platforms.len(), 6);
        assert_eq!(config.expected_collections.len(), 12);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: brand
source: design/tokens.json
expected_collections: [core]
transform_groups:
  web-plain: [attribute/cti, name/kebab]
platforms:
  - name: css
    transform_group: web-plain
    build_path: dist
    files:
      - destination: vars.css
        format: css/variables
        options:
          selector: ".theme"
          show_file_header: false
"#;
        let config = ProjectConfig::parse(yaml).unwrap();
        assert_eq!(config.expected_collections, vec!["core"]);
        let file = &config.platforms[0].files[0];
        assert_eq!(file.options.selector.as_deref(), Some(".theme"));
        assert!(!file.options.show_file_header);
        assert!(!file.options.output_references);

        let registry = config.transform_registry();
        assert_eq!(
            registry.group("web-plain").unwrap().transforms,
            vec!["attribute/cti", "name/kebab"]
        );
        assert!(registry.group("web").is_some());
    }

    #[test]
    fn test_duplicate_destination_is_invalid() {
        let yaml = r#"
platforms:
  - name: css
    transform_group: web
    build_path: dist
    files:
      - destination: a.css
        format: css/variables
      - destination: a.css
        format: css/variables
"#;
        let err = ProjectConfig::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_starter_config_round_trips() {
        let yaml = starter_config("acme: tokens").unwrap();
        let config = ProjectConfig::parse(&yaml).unwrap();
        assert_eq!(config.name, "acme: tokens");
        assert_eq!(config.platforms, ProjectConfig::builtin().unwrap().platforms);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ProjectConfig::parse("platforms: [").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
