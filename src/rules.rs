//! Per-environment address allow-lists.
//!
//! A rules directory holds one `<environment>.txt` file per environment.
//! Every trimmed, non-blank line not starting with `#` is one address
//! literal belonging to that environment. Matching is by exact string.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{EnvCheckError, Result};
use crate::validation::{validate_env_name, validate_ip};

/// Environments used when no rule files exist.
pub const DEFAULT_ENVIRONMENTS: &[&str] = &["test", "uat", "prod"];

/// Preferred baseline environment when none is given explicitly.
pub const PREFERRED_BASELINE: &str = "uat";

/// Critical environment used when none is given explicitly.
pub const PREFERRED_CRITICAL: &str = "prod";

/// Mapping from environment name to its set of address literals.
///
/// Loaded once per run and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCatalog {
    sets: BTreeMap<String, BTreeSet<String>>,
}

impl RuleCatalog {
    /// Load every `*.txt` file directly inside `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let rules_err = |source| EnvCheckError::Rules {
            path: dir.to_path_buf(),
            source,
        };

        let mut catalog = Self::default();
        for entry in std::fs::read_dir(dir).map_err(rules_err)? {
            let entry = entry.map_err(rules_err)?;
            let path = entry.path();
            if path.is_dir() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let Some(env) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Err(e) = validate_env_name(env) {
                warn!("Ignoring rules file {}: {}", path.display(), e);
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|source| EnvCheckError::Rules {
                path: path.clone(),
                source,
            })?;
            let set = parse_rule_lines(&content);
            for literal in &set {
                if validate_ip(literal).is_err() {
                    warn!("{}: '{}' is not a valid IP address", path.display(), literal);
                }
            }
            debug!("Loaded {} addresses for environment '{}'", set.len(), env);
            catalog.sets.insert(env.to_string(), set);
        }
        Ok(catalog)
    }

    /// Build a catalog from in-memory sets.
    pub fn from_sets<I, E, A>(sets: I) -> Self
    where
        I: IntoIterator<Item = (E, A)>,
        E: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            sets: sets
                .into_iter()
                .map(|(env, addrs)| (env.into(), addrs.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Environment names with a rule file, sorted.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn addresses(&self, env: &str) -> Option<&BTreeSet<String>> {
        self.sets.get(env)
    }

    pub fn contains(&self, env: &str, address: &str) -> bool {
        self.sets.get(env).is_some_and(|set| set.contains(address))
    }

    /// Environments whose rule set lists `address`, sorted.
    pub fn owners<'a>(&'a self, address: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.sets
            .iter()
            .filter(move |(_, set)| set.contains(address))
            .map(|(env, _)| env.as_str())
    }

    /// True if any environment lists `address`.
    pub fn is_known(&self, address: &str) -> bool {
        self.sets.values().any(|set| set.contains(address))
    }
}

fn parse_rule_lines(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Working environment list: catalog keys, or `defaults` when the catalog is
/// empty. Always sorted and de-duplicated.
pub fn derive_environments(catalog: &RuleCatalog, defaults: &[String]) -> Vec<String> {
    let envs: BTreeSet<String> = if catalog.is_empty() {
        defaults.iter().cloned().collect()
    } else {
        catalog.environments().map(str::to_string).collect()
    };
    envs.into_iter().collect()
}

/// Explicit baseline if given, else `uat` if known, else the first known
/// environment.
pub fn determine_baseline(envs: &[String], explicit: Option<&str>) -> Option<String> {
    if let Some(baseline) = explicit.filter(|b| !b.is_empty()) {
        return Some(baseline.to_string());
    }
    if envs.iter().any(|e| e == PREFERRED_BASELINE) {
        return Some(PREFERRED_BASELINE.to_string());
    }
    envs.first().cloned()
}

/// Explicit critical list if given (may name unknown environments), else
/// `prod` if known, else nothing.
pub fn derive_critical_environments(envs: &[String], explicit: &[String]) -> BTreeSet<String> {
    if !explicit.is_empty() {
        return explicit.iter().cloned().collect();
    }
    envs.iter()
        .filter(|e| e.as_str() == PREFERRED_CRITICAL)
        .cloned()
        .collect()
}
