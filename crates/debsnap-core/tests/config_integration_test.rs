/// Integration tests for configuration loading
///
/// These tests load config files from temporary directories and combine
/// them with environment values supplied through the loader.

use debsnap_core::config::{Config, ConfigLoader, ConfigSource, ENV_ARCHITECTURES, ENV_ROOT};
use debsnap_core::DebsnapError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("debsnap.json");
    fs::write(
        &path,
        r#"{
            "rootDir": "/var/lib/debsnap",
            "architectures": ["amd64", "arm64"],
            "dependencyFollowSource": true
        }"#,
    )
    .unwrap();

    let config = Config::build_with(&ConfigLoader::new(false), Some(&path)).unwrap();

    assert_eq!(config.get_root_dir(), PathBuf::from("/var/lib/debsnap"));
    assert_eq!(config.architectures, vec!["amd64", "arm64"]);
    assert!(config.dependency_options().follow_source);
    assert_eq!(config.source_of("architectures"), ConfigSource::File(path));
}

#[test]
fn test_relative_root_is_resolved_against_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("debsnap.json");
    fs::write(&path, r#"{"rootDir": "store"}"#).unwrap();

    let config = Config::build_with(&ConfigLoader::new(false), Some(&path)).unwrap();

    assert_eq!(config.get_root_dir(), dir.path().join("store"));
}

#[test]
fn test_environment_beats_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("debsnap.json");
    fs::write(&path, r#"{"rootDir": "/from/file", "architectures": ["amd64"]}"#).unwrap();

    let loader = ConfigLoader::new(false)
        .with_var(ENV_ROOT, "/from/env")
        .with_var(ENV_ARCHITECTURES, "i386");
    let config = Config::build_with(&loader, Some(&path)).unwrap();

    assert_eq!(config.get_root_dir(), PathBuf::from("/from/env"));
    assert_eq!(config.architectures, vec!["i386"]);
}

#[test]
fn test_missing_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let result = Config::build_with(&ConfigLoader::new(false), Some(&path));
    assert!(matches!(result, Err(DebsnapError::Config(_))));
}

#[test]
fn test_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("debsnap.json");
    fs::write(&path, "{ not json").unwrap();

    let result = Config::build_with(&ConfigLoader::new(false), Some(&path));
    match result {
        Err(DebsnapError::Config(message)) => assert!(message.contains("Failed to parse")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn test_unknown_keys_are_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("debsnap.json");
    fs::write(&path, r#"{"architectures": ["amd64"], "gpgKeyring": "x"}"#).unwrap();

    let config = Config::build_with(&ConfigLoader::new(false), Some(&path)).unwrap();
    assert_eq!(config.architectures, vec!["amd64"]);
}
