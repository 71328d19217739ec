use figma_pull::load_config::load_config;
use figma_pull_core::config::ImageFormat;
use figma_pull_core::filename::DuplicatePolicy;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

/// A full config maps every section onto the core types and picks up the token from env.
#[test]
#[serial]
fn test_load_config_full() {
    let file = config_file(
        r#"
file_key: UTd0VGhnFYgvkn6NLepGAM
output_dir: ./tmp/design
images:
  ids: ["2036:4956", "2036:4904"]
  format: svg
  scale: 2
  auto: true
split:
  types: [frame, COMPONENT]
  output_dir: ./tmp/nodes
  name_template: "{type}-{name}.json"
  duplicates: numeric_suffix
  max_files: 10
"#,
    );
    env::set_var("FIGMA_TOKEN", "  figd_test  ");

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.token, "figd_test");
    assert_eq!(config.file_key, "UTd0VGhnFYgvkn6NLepGAM");
    assert_eq!(config.output_dir, PathBuf::from("./tmp/design"));
    assert_eq!(config.images.ids, ["2036:4956", "2036:4904"]);
    assert_eq!(config.images.format, ImageFormat::Svg);
    assert_eq!(config.images.scale, 2);
    assert!(config.images.auto);

    let split = config.split.as_ref().expect("split section");
    assert_eq!(Vec::<String>::from(split.types.clone()), ["COMPONENT", "FRAME"]);
    assert_eq!(split.name_template, "{type}-{name}.json");
    assert_eq!(split.duplicates, DuplicatePolicy::NumericSuffix);
    assert_eq!(split.max_files, Some(10));
    assert_eq!(config.split_dir(), Some(PathBuf::from("./tmp/nodes")));
}

/// Only the file key is required; everything else falls back to defaults.
#[test]
#[serial]
fn test_load_config_defaults() {
    let file = config_file("file_key: ABC\nsplit: {}\n");
    env::set_var("FIGMA_TOKEN", "figd_test");

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.output_dir, PathBuf::from("design"));
    assert!(config.images.ids.is_empty());
    assert_eq!(config.images.format, ImageFormat::Png);
    assert_eq!(config.images.scale, 1);
    assert!(!config.images.auto);

    let split = config.split.as_ref().expect("split enabled");
    assert_eq!(
        Vec::<String>::from(split.types.clone()),
        ["COMPONENT", "FRAME", "INSTANCE"]
    );
    assert_eq!(split.name_template, "{name}.json");
    assert_eq!(split.duplicates, DuplicatePolicy::IdSuffix);
    assert_eq!(split.max_files, None);
    assert_eq!(config.split_dir(), Some(PathBuf::from("design/nodes")));
    assert_eq!(config.image_dir(), PathBuf::from("design/images"));
}

#[test]
#[serial]
fn test_load_config_without_split_section() {
    let file = config_file("file_key: ABC\n");
    env::set_var("FIGMA_TOKEN", "figd_test");

    let config = load_config(file.path()).expect("Config should load");
    assert!(config.split.is_none());
    assert_eq!(config.split_dir(), None);
}

#[test]
#[serial]
fn test_load_config_errors_without_token() {
    let file = config_file("file_key: ABC\n");
    env::remove_var("FIGMA_TOKEN");

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("FIGMA_TOKEN"), "got: {err}");
}

#[test]
#[serial]
fn test_load_config_errors_for_invalid_file() {
    let file = config_file("not-yaml: [:::");
    env::set_var("FIGMA_TOKEN", "figd_test");

    let msg = load_config(file.path()).unwrap_err().to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn test_load_config_errors_for_unknown_image_format() {
    let file = config_file("file_key: ABC\nimages:\n  format: gif\n");
    env::set_var("FIGMA_TOKEN", "figd_test");

    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_load_config_errors_for_missing_file() {
    let msg = load_config("/definitely/not/here.yaml")
        .unwrap_err()
        .to_string();
    assert!(msg.contains("Failed to read config file"), "got: {msg}");
}
