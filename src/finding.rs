//! Findings produced by a check run.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Build-breaking
    Critical,
    /// Advisory
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// What was found, with the data identifying where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    /// A group has no file for a known environment.
    MissingEnvironment { group: String, env: String },
    /// A key present in the baseline is absent from another environment.
    MissingKey {
        group: String,
        env: String,
        key: String,
        baseline: String,
    },
    /// A critical environment's file contains an address from another
    /// environment's allow-list.
    AddressLeak {
        path: PathBuf,
        address: String,
        owner: String,
    },
    /// An address listed by no environment.
    UnknownAddress { path: PathBuf, address: String },
    /// A file could not be read or parsed.
    Unparseable {
        group: String,
        env: String,
        path: PathBuf,
        reason: String,
    },
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::MissingEnvironment { .. }
            | FindingKind::MissingKey { .. }
            | FindingKind::AddressLeak { .. } => Severity::Critical,
            FindingKind::UnknownAddress { .. } | FindingKind::Unparseable { .. } => {
                Severity::Warning
            }
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingKind::MissingEnvironment { group, env } => {
                write!(f, "group={} missing file for env '{}'", group, env)
            }
            FindingKind::MissingKey {
                group,
                env,
                key,
                baseline,
            } => write!(
                f,
                "group={} {} missing key '{}' (baseline={})",
                group, env, key, baseline
            ),
            FindingKind::AddressLeak {
                path,
                address,
                owner,
            } => write!(
                f,
                "{} contains IP {} from {} rules",
                path.display(),
                address,
                owner
            ),
            FindingKind::UnknownAddress { path, address } => {
                write!(f, "{} contains unknown IP {}", path.display(), address)
            }
            FindingKind::Unparseable {
                group,
                env,
                path,
                reason,
            } => write!(
                f,
                "group={} {} could not parse {}: {}",
                group,
                env,
                path.display(),
                reason
            ),
        }
    }
}

/// An immutable reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    severity: Severity,
    message: String,
    #[serde(flatten)]
    kind: FindingKind,
}

impl Finding {
    pub fn new(kind: FindingKind) -> Self {
        Self {
            severity: kind.severity(),
            message: kind.to_string(),
            kind,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn kind(&self) -> &FindingKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Streaming consumer of findings, called once per finding as it is found.
#[cfg_attr(test, automock)]
pub trait FindingSink {
    fn record(&mut self, finding: &Finding);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FindingSink for NullSink {
    fn record(&mut self, _finding: &Finding) {}
}

/// Process exit code for a run.
pub mod exit_code {
    pub const CLEAN: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const CRITICAL: i32 = 2;
    pub const SETUP_FAILURE: i32 = 3;
}

/// Aggregated findings, split by severity, each in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub criticals: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl Report {
    pub fn push(&mut self, finding: Finding) {
        match finding.severity() {
            Severity::Critical => self.criticals.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    pub fn extend(&mut self, other: Report) {
        self.criticals.extend(other.criticals);
        self.warnings.extend(other.warnings);
    }

    pub fn is_clean(&self) -> bool {
        self.criticals.is_empty() && self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criticals.len() + self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.is_clean()
    }

    /// 0 = no findings, 1 = warnings only, 2 = at least one critical.
    pub fn exit_code(&self) -> i32 {
        if !self.criticals.is_empty() {
            exit_code::CRITICAL
        } else if !self.warnings.is_empty() {
            exit_code::WARNINGS
        } else {
            exit_code::CLEAN
        }
    }

    /// All findings, criticals first.
    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.criticals.iter().chain(self.warnings.iter())
    }
}
