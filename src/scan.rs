//! Discovery and grouping of per-environment configuration files.
//!
//! A file named `<prefix>-<env>.<suffix>` belongs to group `<prefix>.<suffix>`
//! (qualified by its directory relative to the scan root) and environment
//! `<env>`. Files that do not follow the convention are skipped.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{EnvCheckError, Result};

/// group key -> environment -> file path
pub type Groups = BTreeMap<String, BTreeMap<String, PathBuf>>;

/// A discovered configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub group: String,
    pub env: String,
    pub path: PathBuf,
}

/// Classifies file names against the known environment names.
#[derive(Debug, Clone)]
pub struct EnvMatcher {
    /// `<env>.<suffix>`, anchored; applied to the text after each `-`
    tail: Regex,
}

impl EnvMatcher {
    /// Build the matcher. Alternatives are tried longest name first so that
    /// `svc-prod.eu.yaml` resolves to `prod.eu` rather than `prod`.
    pub fn new(envs: &[String]) -> Result<Self> {
        if envs.is_empty() {
            return Err(EnvCheckError::Config(
                "no environments to match files against".to_string(),
            ));
        }
        let mut alternatives: Vec<&String> = envs.iter().collect();
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        alternatives.dedup();
        let pattern = alternatives
            .iter()
            .map(|e| regex::escape(e))
            .collect::<Vec<_>>()
            .join("|");
        let tail = Regex::new(&format!(r"^({})\.(.+)$", pattern))?;
        Ok(Self { tail })
    }

    /// Split a base file name into `(prefix, env, suffix)`.
    ///
    /// Every `-` with a non-empty prefix is a candidate split. The candidate
    /// with the longest environment name wins, so `svc-pre-prod.yaml` is
    /// `pre-prod` even when `prod` is also known. Among equally long names
    /// the last `-` wins.
    pub fn classify<'a>(&self, file_name: &'a str) -> Option<(&'a str, &'a str, &'a str)> {
        let mut best: Option<(&'a str, &'a str, &'a str)> = None;
        for (idx, _) in file_name.match_indices('-').filter(|(idx, _)| *idx > 0) {
            let Some(caps) = self.tail.captures(&file_name[idx + 1..]) else {
                continue;
            };
            let (Some(env), Some(suffix)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let env = env.as_str();
            if best.map_or(true, |(_, current, _)| env.len() >= current.len()) {
                best = Some((&file_name[..idx], env, suffix.as_str()));
            }
        }
        best
    }
}

/// Walk `root` and return every file that follows the naming convention,
/// in walk order (sorted by file name within each directory).
pub fn discover(root: &Path, envs: &[String]) -> Result<Vec<ConfigFile>> {
    let matcher = EnvMatcher::new(envs)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| EnvCheckError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non UTF-8 file name: {}", entry.path().display());
            continue;
        };
        let Some((prefix, env, suffix)) = matcher.classify(name) else {
            debug!("Skipping {}: no environment tag", entry.path().display());
            continue;
        };

        let file_base = format!("{}.{}", prefix, suffix);
        let group = match entry
            .path()
            .parent()
            .and_then(|dir| dir.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
        {
            Some(rel) => format!("{}/{}", to_slash(rel), file_base),
            None => file_base,
        };

        files.push(ConfigFile {
            group,
            env: env.to_string(),
            path: entry.path().to_path_buf(),
        });
    }
    Ok(files)
}

/// Discover and group files: group key -> environment -> path.
pub fn find_groups(root: &Path, envs: &[String]) -> Result<Groups> {
    Ok(group_files(discover(root, envs)?))
}

/// Group discovered files. A later file for the same group and environment
/// replaces an earlier one.
pub fn group_files(files: Vec<ConfigFile>) -> Groups {
    let mut groups = Groups::new();
    for file in files {
        let envs = groups.entry(file.group.clone()).or_default();
        if let Some(previous) = envs.insert(file.env.clone(), file.path) {
            warn!(
                "group={} env={} has more than one file, ignoring {}",
                file.group,
                file.env,
                previous.display()
            );
        }
    }
    groups
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
