//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;
use wayfinder_common::ConfigError;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_wayfinder_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[engine]
model = "gpt-4o-mini"
max_steps = 5

[places]
max_results = 8
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.engine.model, "gpt-4o-mini");
    assert_eq!(config.engine.max_steps, 5);
    assert_eq!(config.places.max_results, Some(8));
    // Defaults preserved
    assert_eq!(config.engine.credential_env, "GITHUB_TOKEN");
    assert_eq!(config.places.radius_m, 15_000);
    assert_eq!(config.http.retries, 0);
    assert!(config.http.timeout_secs.is_none());
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_is_returned_as_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[engine]\nmax_steps = 0\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.engine.max_steps, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wayfinder").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.engine.model, "gpt-4o");
    assert_eq!(config.places.categories.len(), 4);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::WayfinderConfig;

    let config: WayfinderConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.engine.max_steps, 15);
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("wayfinder"));
        assert!(path_str.ends_with("config.toml"));
    }
}
