//! Build orchestration
//!
//! Resolves the token tree once, then for each platform transforms, routes,
//! and emits every file into memory. Only after a platform rendered all of its
//! files are they written; a platform that fails leaves nothing behind, and
//! the other platforms are unaffected.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokenloom_core::{
    Config, PlatformConfig, ResolvedTree, TokenTree, TransformContext, TransformPipeline,
    TransformRegistry, Warning, resolve_tree, route,
};

use crate::error::{Error, Result};
use crate::formats::{FormatContext, FormatRegistry};

/// Options for the builder
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Rewrite files whose contents are unchanged
    pub force: bool,
}

/// One rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Full output path
    pub path: PathBuf,

    /// Destination as configured, relative to the platform's build path
    pub destination: String,

    /// File contents
    pub contents: String,

    /// SHA-256 of the contents, hex encoded
    pub hash: String,
}

impl Artifact {
    fn new(path: PathBuf, destination: &str, contents: String) -> Self {
        Self {
            path,
            destination: destination.to_string(),
            hash: content_hash(&contents),
            contents,
        }
    }
}

/// Hex SHA-256 of file contents
pub fn content_hash(contents: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents.as_bytes());
    hex::encode(hasher.finalize())
}

/// What happened to an artifact on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Not written yet
    Pending,
    /// Written to disk
    Written,
    /// Existing file already had identical contents
    Unchanged,
}

/// Outcome of one platform
#[derive(Debug)]
pub struct PlatformReport {
    /// Platform name
    pub name: String,

    /// Rendered artifacts with their write status, or the error that stopped the platform
    pub result: std::result::Result<Vec<(Artifact, WriteStatus)>, Error>,

    /// Warnings raised while transforming
    pub warnings: Vec<Warning>,
}

impl PlatformReport {
    /// Whether the platform rendered all of its files
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Rendered artifacts; empty for a failed platform
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.result
            .as_ref()
            .map(|artifacts| artifacts.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|(artifact, _)| artifact)
    }
}

/// Outcome of a build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Per-platform outcomes, in configuration order
    pub platforms: Vec<PlatformReport>,
}

impl BuildReport {
    /// Whether every platform succeeded
    pub fn is_success(&self) -> bool {
        self.platforms.iter().all(PlatformReport::is_success)
    }

    /// Artifacts of all successful platforms
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.platforms.iter().flat_map(PlatformReport::artifacts)
    }

    /// Failed platforms with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.platforms
            .iter()
            .filter_map(|p| p.result.as_ref().err().map(|e| (p.name.as_str(), e)))
    }

    /// Look up a platform outcome by name
    pub fn platform(&self, name: &str) -> Option<&PlatformReport> {
        self.platforms.iter().find(|p| p.name == name)
    }

    /// Warnings of every platform
    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.platforms.iter().flat_map(|p| p.warnings.iter())
    }

    /// Count of artifacts with the given status
    pub fn count(&self, status: WriteStatus) -> usize {
        self.platforms
            .iter()
            .filter_map(|p| p.result.as_ref().ok())
            .flatten()
            .filter(|(_, s)| *s == status)
            .count()
    }
}

/// Token build orchestrator
pub struct Builder {
    config: Config,
    options: BuildOptions,
    transforms: TransformRegistry,
    formats: FormatRegistry,
}

impl Builder {
    /// Create a builder with the built-in formats and the configured transform groups
    pub fn new(config: Config) -> Self {
        Self::with_options(config, BuildOptions::default())
    }

    /// Create a builder with explicit options
    pub fn with_options(config: Config, options: BuildOptions) -> Self {
        Self {
            transforms: config.project.transform_registry(),
            formats: FormatRegistry::builtin(),
            config,
            options,
        }
    }

    /// Replace the format registry
    pub fn with_formats(mut self, formats: FormatRegistry) -> Self {
        self.formats = formats;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the configured token source
    pub fn load_tokens(&self) -> Result<TokenTree> {
        let source = self.config.source_path();
        tracing::debug!("Loading tokens from {}", source.display());
        Ok(TokenTree::load(source)?)
    }

    /// Render every platform into memory
    pub fn render(&self, tree: &TokenTree) -> BuildReport {
        let resolved = resolve_tree(tree);
        if let Err(err) = &resolved {
            tracing::error!("Token resolution failed: {}", err);
        }

        let platforms = self
            .config
            .project
            .platforms
            .iter()
            .map(|platform| {
                let outcome = match &resolved {
                    Ok(resolved) => self.render_platform(platform, resolved),
                    Err(err) => Err(Error::Core(err.clone())),
                };
                match outcome {
                    Ok((artifacts, warnings)) => {
                        tracing::debug!(
                            "Rendered platform '{}': {} files",
                            platform.name,
                            artifacts.len()
                        );
                        PlatformReport {
                            name: platform.name.clone(),
                            result: Ok(artifacts
                                .into_iter()
                                .map(|a| (a, WriteStatus::Pending))
                                .collect()),
                            warnings,
                        }
                    }
                    Err(err) => {
                        tracing::error!("Platform '{}' failed: {}", platform.name, err);
                        PlatformReport {
                            name: platform.name.clone(),
                            result: Err(err),
                            warnings: Vec::new(),
                        }
                    }
                }
            })
            .collect();

        BuildReport { platforms }
    }

    fn render_platform(
        &self,
        platform: &PlatformConfig,
        resolved: &ResolvedTree,
    ) -> Result<(Vec<Artifact>, Vec<Warning>)> {
        let pipeline = TransformPipeline::for_group(&self.transforms, &platform.transform_group)?;
        let ctx = TransformContext {
            prefix: platform.prefix.clone(),
        };
        let dictionary = pipeline.apply(resolved, &ctx);
        let build_dir = self.config.build_dir(platform);

        let mut artifacts = Vec::with_capacity(platform.files.len());
        for file in &platform.files {
            let format = self
                .formats
                .get(&file.format)
                .ok_or_else(|| Error::UnknownFormat {
                    format: file.format.clone(),
                    destination: file.destination.clone(),
                })?;

            let selection = route(dictionary.tokens(), file.filter.as_ref());
            if selection.is_empty() {
                tracing::debug!("No tokens routed to {}", file.destination);
            }

            let contents = format(&FormatContext {
                selection: &selection,
                dictionary: &dictionary,
                options: &file.options,
                destination: &file.destination,
            })?;

            artifacts.push(Artifact::new(
                build_dir.join(&file.destination),
                &file.destination,
                contents,
            ));
        }

        Ok((artifacts, dictionary.warnings().to_vec()))
    }

    /// Render every platform and write the artifacts of the successful ones.
    ///
    /// Platform failures are recorded in the report; IO errors abort the build.
    pub async fn build(&self, tree: &TokenTree) -> Result<BuildReport> {
        let mut report = self.render(tree);

        for platform in &mut report.platforms {
            let Ok(artifacts) = platform.result.as_mut() else {
                continue;
            };
            for (artifact, status) in artifacts.iter_mut() {
                *status = self.write_artifact(artifact).await?;
            }
        }

        tracing::info!(
            "Build finished: {} written, {} unchanged, {} platforms failed",
            report.count(WriteStatus::Written),
            report.count(WriteStatus::Unchanged),
            report.failures().count()
        );
        Ok(report)
    }

    async fn write_artifact(&self, artifact: &Artifact) -> Result<WriteStatus> {
        if !self.options.force
            && let Ok(existing) = tokio::fs::read_to_string(&artifact.path).await
            && content_hash(&existing) == artifact.hash
        {
            tracing::debug!("Unchanged: {}", artifact.path.display());
            return Ok(WriteStatus::Unchanged);
        }

        if let Some(parent) = artifact.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&artifact.path, &artifact.contents).await?;
        tracing::info!(
            "Wrote {} ({})",
            artifact.path.display(),
            &artifact.hash[..12]
        );
        Ok(WriteStatus::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokenloom_core::ProjectConfig;

    fn builder(yaml: &str) -> Builder {
        Builder::new(Config {
            project: ProjectConfig::parse(yaml).unwrap(),
            base_path: PathBuf::from("/project"),
        })
    }

    fn tree() -> TokenTree {
        TokenTree::from_value(json!({
            "core": {
                "color": {"primary": {"value": "#0055FF", "type": "color"}},
                "spacing": {"md": {"value": 16, "type": "spacing"}}
            }
        }))
        .unwrap()
    }

    const TWO_PLATFORMS: &str = r#"
platforms:
  - name: css
    transform_group: web
    build_path: dist/web
    files:
      - destination: tokens.css
        format: css/variables
  - name: broken
    transform_group: web
    build_path: dist/broken
    files:
      - destination: a.json
        format: json/nested
      - destination: b.scss
        format: scss/variables
"#;

    #[test]
    fn test_content_hash() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_failed_platform_keeps_no_artifacts() {
        let report = builder(TWO_PLATFORMS).render(&tree());

        assert!(!report.is_success());
        let css = report.platform("css").unwrap();
        assert!(css.is_success());
        assert_eq!(
            css.artifacts().next().unwrap().path,
            PathBuf::from("/project/dist/web/tokens.css")
        );

        let broken = report.platform("broken").unwrap();
        assert_eq!(broken.artifacts().count(), 0);
        assert!(matches!(
            broken.result,
            Err(Error::UnknownFormat { ref format, .. }) if format == "scss/variables"
        ));
        assert_eq!(report.artifacts().count(), 1);
    }

    #[test]
    fn test_unknown_group_fails_only_that_platform() {
        let yaml = r#"
platforms:
  - name: desktop
    transform_group: desktop
    build_path: dist
    files:
      - destination: t.json
        format: json/nested
  - name: json
    transform_group: web
    build_path: dist
    files:
      - destination: tokens.json
        format: json/nested
"#;
        let report = builder(yaml).render(&tree());
        let failures: Vec<_> = report.failures().map(|(name, _)| name).collect();
        assert_eq!(failures, vec!["desktop"]);
        assert!(report.platform("json").unwrap().is_success());
    }

    #[test]
    fn test_resolution_error_fails_every_platform() {
        let tree = TokenTree::from_value(json!({
            "core": {"a": {"value": "{b}"}, "b": {"value": "{a}"}}
        }))
        .unwrap();
        let report = builder(TWO_PLATFORMS).render(&tree);
        assert_eq!(report.failures().count(), 2);
        for (_, err) in report.failures() {
            assert!(matches!(
                err,
                Error::Core(tokenloom_core::Error::Cycle { .. })
            ));
        }
    }

    fn name_list(ctx: &FormatContext<'_>) -> Result<String> {
        Ok(ctx
            .selection
            .iter()
            .map(|token| format!("{}\n", token.name))
            .collect())
    }

    #[test]
    fn test_custom_format_registry() {
        let yaml = r#"
platforms:
  - name: names
    transform_group: web
    prefix: ds
    build_path: dist
    files:
      - destination: names.txt
        format: text/names
"#;
        let mut formats = FormatRegistry::builtin();
        formats.register("text/names", name_list);
        let b = builder(yaml).with_formats(formats);
        assert_eq!(b.config().project.platforms[0].name, "names");

        let report = b.render(&tree());
        let artifact = report.artifacts().next().unwrap();
        assert_eq!(artifact.contents, "ds-color-primary\nds-spacing-md\n");
        assert_eq!(artifact.hash, content_hash(&artifact.contents));
    }

    #[test]
    fn test_render_is_deterministic() {
        let b = builder("name: defaults\n");
        let first: Vec<_> = b.render(&tree()).artifacts().cloned().collect();
        let second: Vec<_> = b.render(&tree()).artifacts().cloned().collect();
        assert_eq!(first.len(), 14);
        assert_eq!(first, second);
    }
}
