//! Cross-environment comparison of flattened configuration groups.
//!
//! Per group, in this order:
//! 1. every file is flattened; failures become warnings
//! 2. the baseline's keys are compared against the other environments
//! 3. address literals are checked for cross-environment leakage (critical
//!    environments only) and for being unknown to every allow-list
//!
//! Missing-environment findings for all groups are produced before any
//! per-group check. Groups, environments and addresses are visited in
//! sorted order, so the findings list is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::finding::{Finding, FindingKind, FindingSink, Report};
use crate::flatten::{flatten_file, FlatConfig};
use crate::fs_abstraction::FileSystem;
use crate::rules::RuleCatalog;
use crate::scan::Groups;

/// Which ordered environment pairs the structural drift check covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftScope {
    /// Baseline against every other environment.
    #[default]
    Downstream,
    /// Only `uat` (as baseline) against `prod`.
    Legacy,
}

impl DriftScope {
    const LEGACY_BASELINE: &'static str = "uat";
    const LEGACY_TARGET: &'static str = "prod";

    fn covers(self, baseline: &str, env: &str) -> bool {
        match self {
            DriftScope::Downstream => baseline != env,
            DriftScope::Legacy => baseline == Self::LEGACY_BASELINE && env == Self::LEGACY_TARGET,
        }
    }
}

impl std::str::FromStr for DriftScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "downstream" | "all" => Ok(DriftScope::Downstream),
            "legacy" => Ok(DriftScope::Legacy),
            _ => Err(format!(
                "Unknown drift scope: {}. Use downstream or legacy",
                s
            )),
        }
    }
}

/// Run-wide settings for the comparison.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Environment whose keys are the reference. `None` disables drift checks.
    pub baseline: Option<String>,
    /// Environments subject to cross-environment leakage checks.
    pub critical: BTreeSet<String>,
    pub drift_scope: DriftScope,
}

/// Evaluates groups against the rule catalog.
pub struct ComparisonEngine<'a> {
    catalog: &'a RuleCatalog,
    options: &'a CheckOptions,
    fs: &'a dyn FileSystem,
}

impl<'a> ComparisonEngine<'a> {
    pub fn new(catalog: &'a RuleCatalog, options: &'a CheckOptions, fs: &'a dyn FileSystem) -> Self {
        Self {
            catalog,
            options,
            fs,
        }
    }

    /// Check every group. Missing-environment findings come first.
    pub fn check_groups(
        &self,
        groups: &Groups,
        envs: &[String],
        sink: &mut dyn FindingSink,
    ) -> Report {
        let mut report = check_missing_environments(groups, envs, sink);
        for (group, files) in groups {
            report.extend(self.check_group(group, files, sink));
        }
        info!(
            "Checked {} groups: {} critical, {} warnings",
            groups.len(),
            report.criticals.len(),
            report.warnings.len()
        );
        report
    }

    /// Flatten, drift-check and address-check one group.
    pub fn check_group(
        &self,
        group: &str,
        files: &BTreeMap<String, PathBuf>,
        sink: &mut dyn FindingSink,
    ) -> Report {
        info!("Checking group: {}", group);
        let mut report = Report::default();
        let mut emit = |kind: FindingKind| {
            let finding = Finding::new(kind);
            sink.record(&finding);
            report.push(finding);
        };

        let mut flattened: BTreeMap<&str, (&Path, FlatConfig)> = BTreeMap::new();
        for (env, path) in files {
            debug!(" - {}: {}", env, path.display());
            match flatten_file(self.fs, path) {
                Ok(flat) => {
                    flattened.insert(env.as_str(), (path.as_path(), flat));
                }
                Err(e) => emit(FindingKind::Unparseable {
                    group: group.to_string(),
                    env: env.clone(),
                    path: path.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        if let Some(baseline) = self.options.baseline.as_deref() {
            if let Some((_, base)) = flattened.get(baseline) {
                for (env, (_, flat)) in &flattened {
                    if !self.options.drift_scope.covers(baseline, env) {
                        continue;
                    }
                    for key in base.keys().filter(|k| !flat.contains_key(k)) {
                        emit(FindingKind::MissingKey {
                            group: group.to_string(),
                            env: env.to_string(),
                            key: key.to_string(),
                            baseline: baseline.to_string(),
                        });
                    }
                }
            }
        }

        for (env, (path, flat)) in &flattened {
            let critical = self.options.critical.contains(*env);
            for address in flat.addresses() {
                if critical {
                    for owner in self.catalog.owners(&address).filter(|o| o != env) {
                        emit(FindingKind::AddressLeak {
                            path: path.to_path_buf(),
                            address: address.clone(),
                            owner: owner.to_string(),
                        });
                    }
                }
                if !self.catalog.is_known(&address) {
                    emit(FindingKind::UnknownAddress {
                        path: path.to_path_buf(),
                        address,
                    });
                }
            }
        }

        report
    }
}

/// One critical finding per group per known environment without a file.
pub fn check_missing_environments(
    groups: &Groups,
    envs: &[String],
    sink: &mut dyn FindingSink,
) -> Report {
    let mut report = Report::default();
    for (group, files) in groups {
        for env in envs.iter().filter(|e| !files.contains_key(*e)) {
            let finding = Finding::new(FindingKind::MissingEnvironment {
                group: group.clone(),
                env: env.clone(),
            });
            sink.record(&finding);
            report.push(finding);
        }
    }
    report
}
