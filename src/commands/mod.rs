//! CLI command implementations.
//!
//! Each command returns the process exit code on success. Errors returned
//! from here are setup failures.

pub mod check;
pub mod flatten;
pub mod groups;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cli::ScanArgs;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::rules::{derive_environments, RuleCatalog};
use crate::validation::{ambiguous_pairs, validate_env_name};

/// Inputs shared by commands that scan a tree.
#[derive(Debug)]
pub struct ScanContext {
    pub scan_dir: PathBuf,
    pub catalog: RuleCatalog,
    /// Working environment list, sorted
    pub envs: Vec<String>,
}

impl ScanContext {
    /// Load the rule catalog and derive the working environment list.
    pub fn load(config: &Config, args: &ScanArgs) -> Result<Self> {
        let scan_dir = args.dir.clone().unwrap_or_else(|| config.scan_dir.clone());
        let rules_dir = args
            .envs_dir
            .clone()
            .unwrap_or_else(|| config.rules_dir.clone());

        let catalog = RuleCatalog::load(&rules_dir).context("Failed to load rules")?;
        let envs = derive_environments(&catalog, &config.default_environments);
        for env in &envs {
            validate_env_name(env).context("Invalid entry in default_environments")?;
        }
        for (short, long) in ambiguous_pairs(&envs) {
            warn!(
                "Environment '{}' is contained in '{}'; files are matched to the longest name",
                short, long
            );
        }
        debug!("Environments: {}", envs.join(", "));

        Ok(Self {
            scan_dir,
            catalog,
            envs,
        })
    }
}

/// Load the explicit config file, or `envcheck.yaml` if present, or defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(DEFAULT_CONFIG_FILE),
    }
}
