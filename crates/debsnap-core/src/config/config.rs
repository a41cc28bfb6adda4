use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::source::{ConfigLoader, ConfigSource, ENV_ARCHITECTURES, ENV_ROOT};
use crate::error::{DebsnapError, Result};
use crate::package::DependencyOptions;

/// Settings of a debsnap installation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Store root; relative paths in a config file are resolved against
    /// the file's directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,

    /// Architectures to process; empty means "whatever the destination has"
    pub architectures: Vec<String>,

    pub dependency_follow_recommends: bool,
    pub dependency_follow_suggests: bool,
    pub dependency_follow_source: bool,
    pub dependency_follow_all_variants: bool,

    #[serde(skip)]
    sources: HashMap<String, ConfigSource>,
}

impl Config {
    /// Build configuration from the config file and, if `use_environment`
    /// is set, the process environment.
    ///
    /// An explicit `config_path` must exist; the default one is optional.
    pub fn build(config_path: Option<&Path>, use_environment: bool) -> Result<Self> {
        Self::build_with(&ConfigLoader::new(use_environment), config_path)
    }

    /// Build configuration with a prepared loader
    pub fn build_with(loader: &ConfigLoader, config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(DebsnapError::Config(format!(
                        "Config file {} does not exist",
                        path.display()
                    )));
                }
                Self::load_file(path)?
            }
            None => match loader.default_config_path() {
                Some(path) if path.exists() => Self::load_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(loader);

        if config.root_dir.is_none() {
            config.root_dir = Some(loader.default_root_dir());
            config.sources.insert("root-dir".to_string(), ConfigSource::Default);
        }

        log::debug!("Using store root {}", config.get_root_dir().display());
        Ok(config)
    }

    /// Load a config file without applying any other source
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DebsnapError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut config: Config = serde_json::from_str(&contents)
            .map_err(|e| DebsnapError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        let source = ConfigSource::File(path.to_path_buf());

        if let Some(root) = config.root_dir.take() {
            let root = if root.is_relative() {
                path.parent().map(|dir| dir.join(&root)).unwrap_or(root)
            } else {
                root
            };
            config.root_dir = Some(root);
            config.sources.insert("root-dir".to_string(), source.clone());
        }

        if !config.architectures.is_empty() {
            config.sources.insert("architectures".to_string(), source);
        }

        Ok(config)
    }

    fn apply_env_overrides(&mut self, loader: &ConfigLoader) {
        if let Some(root) = loader.get_env(ENV_ROOT) {
            self.root_dir = Some(PathBuf::from(root));
            self.sources
                .insert("root-dir".to_string(), ConfigSource::Environment(ENV_ROOT.to_string()));
        }

        if let Some(architectures) = loader.get_env_list(ENV_ARCHITECTURES) {
            self.architectures = architectures;
            self.sources.insert(
                "architectures".to_string(),
                ConfigSource::Environment(ENV_ARCHITECTURES.to_string()),
            );
        }
    }

    /// Apply command line values, which win over every other source
    pub fn apply_command_line(&mut self, root_dir: Option<PathBuf>, architectures: &[String]) {
        if let Some(root) = root_dir {
            self.root_dir = Some(root);
            self.sources.insert("root-dir".to_string(), ConfigSource::Command);
        }

        if !architectures.is_empty() {
            self.architectures = architectures.to_vec();
            self.sources.insert("architectures".to_string(), ConfigSource::Command);
        }
    }

    /// Store root directory
    pub fn get_root_dir(&self) -> PathBuf {
        self.root_dir.clone().unwrap_or_else(|| PathBuf::from(".debsnap"))
    }

    /// Where a setting came from (`root-dir`, `architectures`)
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.sources.get(key).cloned().unwrap_or(ConfigSource::Default)
    }

    pub fn dependency_options(&self) -> DependencyOptions {
        DependencyOptions {
            follow_recommends: self.dependency_follow_recommends,
            follow_suggests: self.dependency_follow_suggests,
            follow_source: self.dependency_follow_source,
            follow_all_variants: self.dependency_follow_all_variants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.architectures.is_empty());
        assert_eq!(config.dependency_options(), DependencyOptions::default());
        assert_eq!(config.source_of("architectures"), ConfigSource::Default);
    }

    #[test]
    fn test_parse_camel_case() {
        let config: Config = serde_json::from_str(
            r#"{"architectures": ["amd64"], "dependencyFollowRecommends": true, "dependencyFollowAllVariants": true}"#,
        )
        .unwrap();

        let options = config.dependency_options();
        assert!(options.follow_recommends);
        assert!(options.follow_all_variants);
        assert!(!options.follow_suggests);
        assert_eq!(config.architectures, vec!["amd64"]);
    }

    #[test]
    fn test_environment_overrides() {
        let loader = ConfigLoader::new(false)
            .with_var(ENV_ROOT, "/srv/debsnap")
            .with_var(ENV_ARCHITECTURES, "i386,amd64");
        let mut config = Config::default();
        config.apply_env_overrides(&loader);

        assert_eq!(config.get_root_dir(), PathBuf::from("/srv/debsnap"));
        assert_eq!(config.architectures, vec!["i386", "amd64"]);
        assert_eq!(
            config.source_of("root-dir"),
            ConfigSource::Environment("DEBSNAP_ROOT".to_string())
        );
    }

    #[test]
    fn test_command_line_wins() {
        let loader = ConfigLoader::new(false).with_var(ENV_ARCHITECTURES, "i386");
        let mut config = Config::default();
        config.apply_env_overrides(&loader);
        config.apply_command_line(Some(PathBuf::from("/tmp/store")), &["arm64".to_string()]);

        assert_eq!(config.architectures, vec!["arm64"]);
        assert_eq!(config.get_root_dir(), PathBuf::from("/tmp/store"));
        assert_eq!(config.source_of("architectures"), ConfigSource::Command);
    }

    #[test]
    fn test_command_line_empty_keeps_values() {
        let mut config = Config {
            architectures: vec!["amd64".to_string()],
            ..Default::default()
        };
        config.apply_command_line(None, &[]);
        assert_eq!(config.architectures, vec!["amd64"]);
    }
}
