use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Name of the config file looked up in the config directory
pub const CONFIG_FILE_NAME: &str = "debsnap.json";

/// Overrides the store root directory
pub const ENV_ROOT: &str = "DEBSNAP_ROOT";

/// Comma-separated architecture list
pub const ENV_ARCHITECTURES: &str = "DEBSNAP_ARCHITECTURES";

/// Represents the source of a configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default built-in value
    Default,
    /// From a config file
    File(PathBuf),
    /// From environment variable
    Environment(String),
    /// From the command line
    Command,
}

impl ConfigSource {
    pub fn as_str(&self) -> String {
        match self {
            ConfigSource::Default => "default".to_string(),
            ConfigSource::File(path) => path.display().to_string(),
            ConfigSource::Environment(var) => var.clone(),
            ConfigSource::Command => "command".to_string(),
        }
    }
}

/// Looks up environment values and platform directories
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    use_environment: bool,
    overrides: HashMap<String, String>,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self {
            use_environment,
            overrides: HashMap::new(),
        }
    }

    /// Provide a variable that takes precedence over the process environment
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Get a `DEBSNAP_*` variable, ignoring empty values
    pub fn get_env(&self, var: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(var) {
            return Some(value.clone()).filter(|s| !s.is_empty());
        }

        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    /// Get a comma-separated list variable
    pub fn get_env_list(&self, var: &str) -> Option<Vec<String>> {
        self.get_env(var).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
    }

    /// Default location of the config file
    pub fn default_config_path(&self) -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "debsnap").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Default store root when nothing else is configured
    pub fn default_root_dir(&self) -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("", "", "debsnap") {
            dirs.data_dir().to_path_buf()
        } else if let Some(base) = directories::BaseDirs::new() {
            base.home_dir().join(".debsnap")
        } else {
            PathBuf::from(".debsnap")
        }
    }
}
