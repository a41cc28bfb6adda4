//! Configuration for debsnap
//!
//! Values are merged from several sources, highest priority first:
//!
//! 1. Command line (`--root`, `--architectures`), applied by the caller
//! 2. Environment variables (`DEBSNAP_ROOT`, `DEBSNAP_ARCHITECTURES`)
//! 3. Config file (`--config` path, else `<config dir>/debsnap.json`)
//! 4. Built-in defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use debsnap_core::config::Config;
//!
//! let config = Config::build(None, true).unwrap();
//! println!("Store: {}", config.get_root_dir().display());
//! ```

mod config;
mod source;

pub use config::Config;
pub use source::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME, ENV_ARCHITECTURES, ENV_ROOT};
