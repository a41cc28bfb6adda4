use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebsnapError {
    // Input errors
    #[error("Malformed dependency: {text}")]
    MalformedDependency { text: String },

    #[error("Invalid version: {0}")]
    Version(#[from] debsnap_version::VersionError),

    // Lookup errors
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Unable to determine list of architectures, please specify explicitly")]
    NoArchitectures,

    // Resolution errors
    #[error("Dependency {dependency} can't be satisfied with source {source_name}")]
    Unsatisfiable { dependency: String, source_name: String },

    #[error("Invalid relation in package {package}: {message}")]
    InvalidRelation { package: String, message: String },

    #[error("Stopped resolving {architecture} after {limit} dependencies")]
    IterationLimit { architecture: String, limit: usize },

    // Snapshot errors
    #[error("Snapshot with name {name} already exists")]
    DuplicateName { name: String },

    #[error("Invalid snapshot name \"{name}\"")]
    InvalidName { name: String },

    // Import errors
    #[error("Invalid control stanza #{index}: {message}")]
    InvalidStanza { index: usize, message: String },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DebsnapError {
    pub fn snapshot_not_found(name: impl Into<String>) -> Self {
        DebsnapError::NotFound { kind: "Snapshot", name: name.into() }
    }

    pub fn package_not_found(key: impl Into<String>) -> Self {
        DebsnapError::NotFound { kind: "Package", name: key.into() }
    }
}

pub type Result<T> = std::result::Result<T, DebsnapError>;
