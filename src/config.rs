//! Configuration management for envcheck.
//!
//! An optional YAML file supplies defaults for every `check` flag. Values
//! given on the command line take precedence.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::DriftScope;
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::rules::DEFAULT_ENVIRONMENTS;
use crate::validation::validate_env_name;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "envcheck.yaml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory tree to scan for configuration files
    pub scan_dir: PathBuf,

    /// Directory holding one `<env>.txt` allow-list per environment
    pub rules_dir: PathBuf,

    /// Baseline environment for structural comparison
    pub baseline: Option<String>,

    /// Environments that trigger cross-environment leakage checks
    pub critical_envs: Vec<String>,

    /// Environments assumed when the rules directory has no rule files
    pub default_environments: Vec<String>,

    /// Which environment pairs the drift check covers
    pub drift_scope: DriftScope,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_dir: PathBuf::from("."),
            rules_dir: PathBuf::from("envs"),
            baseline: None,
            critical_envs: Vec::new(),
            default_environments: DEFAULT_ENVIRONMENTS.iter().map(|s| s.to_string()).collect(),
            drift_scope: DriftScope::default(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_from(real_fs(), path.as_ref())
    }

    /// Load configuration through `fs`.
    pub fn load_from(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.validate()?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_or_default_from(real_fs(), path.as_ref())
    }

    pub fn load_or_default_from(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if fs.exists(path) {
            Self::load_from(fs, path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.default_environments.is_empty() {
            anyhow::bail!("default_environments cannot be empty");
        }
        for env in &self.default_environments {
            validate_env_name(env).context("Invalid entry in default_environments")?;
        }
        for env in &self.critical_envs {
            validate_env_name(env).context("Invalid entry in critical_envs")?;
        }
        if let Some(baseline) = &self.baseline {
            validate_env_name(baseline).context("Invalid baseline")?;
        }
        Ok(())
    }
}
