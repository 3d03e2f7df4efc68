//! Error types for envcheck.

use std::path::PathBuf;
use thiserror::Error;

/// Setup failures. Any of these aborts a run before findings are produced.
#[derive(Error, Debug)]
pub enum EnvCheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load rules from {path}: {source}")]
    Rules {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid environment name: {0}")]
    InvalidEnvironment(String),

    #[error("Failed to build environment pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Why a single configuration file could not be flattened.
///
/// These never abort a run: the engine turns them into warning findings.
#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid properties: {0}")]
    Properties(#[from] java_properties::PropertiesError),

    #[error("top-level value is a bare scalar, expected a mapping or sequence")]
    NotAStructure,
}

pub type Result<T, E = EnvCheckError> = std::result::Result<T, E>;
