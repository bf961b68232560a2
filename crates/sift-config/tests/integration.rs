//! Integration tests for sift-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge -> validate.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use sift_config::{Config, ConfigError, ConfigWarning, FieldKind, local_template};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    /// Owned temporary directory.
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_from_no_files_returns_default() {
    let config = Config::load_from_files(&[]).unwrap();
    assert!(config.config_root.is_none());
    assert_eq!(config.index.partition_field, "blog_id");
    assert_eq!(config.search.facet_size, 100);
    assert_eq!(config.fields.analyzer_language, "english");
}

#[test]
fn test_load_root_config() {
    let env = TestEnv::new();
    env.create_file(
        ".sift.toml",
        r#"
root = true

[index]
partition = 4

[fields]
fields = ["post_title", "price"]
taxonomies = "category"
facets = ["category", "price"]
numeric = ["price"]

[fields.scores.field]
post_title = 3

[[fields.ranges.price]]
from = 0
to = 25
"#,
    );

    let config = Config::load(env.path()).unwrap();
    assert_eq!(config.config_root.as_deref(), Some(env.path()));
    assert_eq!(config.index.partition, "4");
    assert_eq!(config.fields.taxonomies, vec!["category"]);
    assert_eq!(config.fields.score(FieldKind::Field, "post_title"), Some(3.0));
    assert!(config.fields.is_range_facet("price"));
    assert!(config.fields.range_by_key("price", "0-25").is_some());
    assert!(config.validate().is_empty());
}

#[test]
fn test_nested_config_overrides_parent() {
    let env = TestEnv::new();
    env.create_file(
        ".sift.toml",
        r#"
root = true

[search]
facet_size = 50
suggest_size = 3

[fields]
fields = ["post_title"]
numeric = ["price"]
"#,
    );
    env.create_file(
        "shop/.sift.toml",
        r#"
[search]
facet_size = 10

[fields]
fields = ["post_title", "price"]
numeric = ["weight"]
"#,
    );
    let cwd = env.create_dir("shop/theme");

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.config_root, Some(env.path().join("shop")));
    assert_eq!(config.search.facet_size, 10);
    assert_eq!(config.search.suggest_size, 3);
    assert_eq!(config.fields.fields, vec!["post_title", "price"]);
    assert!(config.fields.is_numeric("price"));
    assert!(config.fields.is_numeric("weight"));
}

#[test]
fn test_load_invalid_file_reports_path() {
    let env = TestEnv::new();
    let path = env.create_file(".sift.toml", "root = true\n[fields\n");

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_missing_file() {
    let err = Config::load_from_files(&[PathBuf::from("/nonexistent/.sift.toml")]).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_validation_warnings_surface_through_load() {
    let env = TestEnv::new();
    env.create_file(
        ".sift.toml",
        r#"
root = true

[fields]
fields = ["post_title"]
facets = ["color"]
"#,
    );

    let config = Config::load(env.path()).unwrap();
    assert_eq!(
        config.validate(),
        vec![ConfigWarning::UndeclaredFacet {
            facet: "color".into()
        }]
    );
}

#[test]
fn test_uncommented_template_loads() {
    let env = TestEnv::new();
    let uncommented: String = local_template()
        .lines()
        .filter_map(|line| line.strip_prefix("# "))
        .filter(|line| !line.starts_with("root") && line.contains(['=', '[']))
        .map(|line| format!("{line}\n"))
        .collect();
    env.create_file(".sift.toml", &format!("root = true\n{uncommented}"));

    let config = Config::load(env.path()).unwrap();
    assert_eq!(config.fields.taxonomies, vec!["category", "post_tag"]);
    assert!(!config.fields.includes_ancestors("post_tag"));
    assert_eq!(config.fields.ranges("price").len(), 3);
}
