//! End-to-end build tests against temporary project directories

use tempfile::TempDir;
use tokenloom_codegen::{BuildOptions, Builder, Error, WriteStatus};
use tokenloom_core::config::CONFIG_FILE;
use tokenloom_core::Config;

const TOKENS: &str = r##"{
  "$metadata": {"tokenSetOrder": ["01 - Primitives", "02 - Semantic", "03 - Spacing", "11 - Motion & Effects"]},
  "01 - Primitives": {
    "color": {
      "blue": {"500": {"value": "#0055FF", "type": "color"}},
      "white": {"value": "#FFFFFF", "type": "color"}
    },
    "font": {
      "family": {"sans": {"value": "Inter, sans-serif", "type": "fontFamilies"}},
      "size": {"body": {"value": "16", "type": "fontSizes"}}
    }
  },
  "02 - Semantic": {
    "color": {
      "primary": {"value": "{color.blue.500}", "type": "color", "description": "Brand primary"},
      "on-primary": {"value": "{color.white}", "type": "color"}
    }
  },
  "03 - Spacing": {
    "spacing": {
      "base": {"value": "4", "type": "spacing"},
      "md": {"value": "{spacing.base} * 4", "type": "spacing"}
    }
  },
  "11 - Motion & Effects": {
    "duration": {"fast": {"value": "300", "type": "duration"}},
    "easing": {"standard": {"value": [0.4, 0, 0.2, 1], "type": "cubicBezier"}}
  }
}"##;

fn setup_project(tokens: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("tokens")).unwrap();
    std::fs::write(dir.path().join("tokens/tokens.json"), tokens).unwrap();
    dir
}

fn read(dir: &TempDir, path: &str) -> String {
    std::fs::read_to_string(dir.path().join(path)).unwrap()
}

#[tokio::test]
async fn test_default_build_writes_every_platform() {
    let dir = setup_project(TOKENS);
    let builder = Builder::new(Config::load_or_default(dir.path()).unwrap());
    let tokens = builder.load_tokens().unwrap();
    let report = builder.build(&tokens).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.count(WriteStatus::Written), 14);

    let css = read(&dir, "build/web/tokens.css");
    assert!(css.contains(":root {\n"));
    assert!(css.contains("  --vbr-color-primary: var(--vbr-color-blue-500);\n"));
    assert!(css.contains("  --vbr-spacing-md: 1rem;\n"));
    assert!(css.contains("  --vbr-duration-fast: 0.30s;\n"));
    assert!(css.contains("  --vbr-easing-standard: cubic-bezier(0.4, 0, 0.2, 1);\n"));

    let json: serde_json::Value =
        serde_json::from_str(&read(&dir, "build/web/tokens.json")).unwrap();
    assert_eq!(json["color"]["primary"], "#0055ff");
    assert_eq!(json["font"]["size"]["body"], "1rem");

    let swift = read(&dir, "build/ios/DesignTokens+Colors.swift");
    assert!(swift.contains("public class DesignColors {"));
    assert!(swift.contains("    /// Brand primary\n"));
    assert!(swift.contains("public static let colorOnPrimary = Color(red: 1.000, green: 1.000, blue: 1.000, opacity: 1.000)"));
    let motion = read(&dir, "build/ios/DesignTokens+Motion.swift");
    assert!(motion.contains("public static let durationFast = 0.3\n"));

    let colors = read(&dir, "build/android/res/values/design_colors.xml");
    assert!(colors.contains("<color name=\"color_primary\">#ff0055ff</color>"));
    let dimens = read(&dir, "build/android/res/values/design_dimens.xml");
    assert!(dimens.contains("<dimen name=\"spacing_md\">16dp</dimen>"));
    assert!(dimens.contains("<dimen name=\"font_size_body\">16sp</dimen>"));
    let strings = read(&dir, "build/android/res/values/design_strings.xml");
    assert!(strings.contains("<string name=\"font_family_sans\">Inter, sans-serif</string>"));
    assert!(strings.contains("<string name=\"easing_standard\">0.4, 0, 0.2, 1</string>"));

    let kotlin = read(&dir, "build/android/DesignTokens.kt");
    assert!(kotlin.starts_with("// Do not edit directly"));
    assert!(kotlin.contains("package com.vibors.design.tokens\n"));
    assert!(kotlin.contains("val color_primary = ComposeColor(0xFF0055FF)"));
}

#[tokio::test]
async fn test_build_is_idempotent() {
    let dir = setup_project(TOKENS);
    let builder = Builder::new(Config::load_or_default(dir.path()).unwrap());
    let tokens = builder.load_tokens().unwrap();

    let first = builder.build(&tokens).await.unwrap();
    let snapshot: Vec<(std::path::PathBuf, Vec<u8>)> = first
        .artifacts()
        .map(|a| (a.path.clone(), std::fs::read(&a.path).unwrap()))
        .collect();

    let second = builder.build(&tokens).await.unwrap();
    assert_eq!(second.count(WriteStatus::Written), 0);
    assert_eq!(second.count(WriteStatus::Unchanged), snapshot.len());
    for (path, bytes) in &snapshot {
        assert_eq!(&std::fs::read(path).unwrap(), bytes);
    }

    let forced = Builder::with_options(
        Config::load_or_default(dir.path()).unwrap(),
        BuildOptions { force: true },
    );
    let third = forced.build(&tokens).await.unwrap();
    assert_eq!(third.count(WriteStatus::Written), snapshot.len());
    for (path, bytes) in &snapshot {
        assert_eq!(&std::fs::read(path).unwrap(), bytes);
    }
}

#[tokio::test]
async fn test_overlapping_filters_emit_token_twice() {
    let dir = setup_project(TOKENS);
    let builder = Builder::new(Config::load_or_default(dir.path()).unwrap());
    let tokens = builder.load_tokens().unwrap();
    let report = builder.build(&tokens).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.warnings().count(), 0);
    assert_eq!(report.platform("web/css").unwrap().artifacts().count(), 2);

    let light = read(&dir, "build/web/tokens.css");
    let dark = read(&dir, "build/web/tokens.dark.css");
    assert!(light.contains("--vbr-color-primary:"));
    assert!(dark.contains("[data-theme=\"dark\"] {\n  --vbr-color-primary: var(--vbr-color-blue-500);\n"));
    assert!(!dark.contains("--vbr-spacing-md"));
}

#[tokio::test]
async fn test_failed_platform_writes_nothing() {
    let dir = setup_project(TOKENS);
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        r#"
name: isolation
platforms:
  - name: web
    transform_group: web
    build_path: out/web
    files:
      - destination: tokens.css
        format: css/variables
  - name: ios
    transform_group: ios
    build_path: out/ios
    files:
      - destination: Colors.swift
        format: ios-swift/class.swift
        filter:
          category: [color]
      - destination: Broken.swift
        format: ios-swift/class.swift
        options:
          class_name: "not a class"
"#,
    )
    .unwrap();

    let builder = Builder::new(Config::load(dir.path()).unwrap());
    let tokens = builder.load_tokens().unwrap();
    let report = builder.build(&tokens).await.unwrap();

    assert!(!report.is_success());
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "ios");
    assert!(matches!(failures[0].1, Error::InvalidOption { option, .. } if option == "class_name"));

    assert!(dir.path().join("out/web/tokens.css").exists());
    assert!(!dir.path().join("out/ios").exists());
}

#[tokio::test]
async fn test_unresolved_reference_fails_build_platforms() {
    let dir = setup_project(r#"{"core": {"a": {"value": "{missing.token}"}}}"#);
    let builder = Builder::new(Config::load_or_default(dir.path()).unwrap());
    let tokens = builder.load_tokens().unwrap();
    let report = builder.build(&tokens).await.unwrap();

    assert_eq!(report.failures().count(), 6);
    let (_, err) = report.failures().next().unwrap();
    assert!(err.to_string().contains("{missing.token}"));
    assert!(!dir.path().join("build").exists());
}
