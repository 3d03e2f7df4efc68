//! # envcheck - Cross-Environment Configuration Checker
//!
//! Validates a tree of per-environment configuration files for two kinds of
//! drift: keys that disappear between a baseline environment and the others,
//! and network addresses that leak across environment boundaries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        envcheck                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: check, groups, flatten, version            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml) + Rules (<env>.txt allow-lists)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scan (walkdir + regex)                                     │
//! │    └── <prefix>-<env>.<ext>  ->  group <prefix>.<ext>       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Flatten (serde_yaml, toml, java-properties, serde_json)    │
//! │    └── nested values -> dotted-path keys                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Engine                                                     │
//! │    ├── missing environments / missing keys  (critical)      │
//! │    ├── cross-environment address leakage    (critical)      │
//! │    └── unknown addresses, unparseable files (warning)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use envcheck::engine::{CheckOptions, ComparisonEngine};
//! use envcheck::finding::NullSink;
//! use envcheck::fs_abstraction::real_fs;
//! use envcheck::rules::{derive_environments, determine_baseline, RuleCatalog, DEFAULT_ENVIRONMENTS};
//! use envcheck::scan::find_groups;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let catalog = RuleCatalog::load("envs")?;
//!     let defaults: Vec<String> = DEFAULT_ENVIRONMENTS.iter().map(|s| s.to_string()).collect();
//!     let envs = derive_environments(&catalog, &defaults);
//!
//!     let options = CheckOptions {
//!         baseline: determine_baseline(&envs, None),
//!         ..CheckOptions::default()
//!     };
//!     let groups = find_groups(Path::new("deploy"), &envs)?;
//!     let report = ComparisonEngine::new(&catalog, &options, real_fs())
//!         .check_groups(&groups, &envs, &mut NullSink);
//!
//!     std::process::exit(report.exit_code());
//! }
//! ```
//!
//! ## Exit codes
//!
//! - `0` - no findings
//! - `1` - warnings only
//! - `2` - at least one critical finding
//! - `3` - setup failure (rules directory unreadable, scan root unwalkable)
//!
//! ## Modules
//!
//! - [`address`] - IPv4 literal extraction
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration file parsing and validation
//! - [`engine`] - Cross-environment comparison rules
//! - [`error`] - Error types
//! - [`finding`] - Findings, severities and the aggregated report
//! - [`flatten`] - Format detection and flattening
//! - [`fs_abstraction`] - Filesystem seam for tests
//! - [`report`] - Terminal and JSON rendering
//! - [`rules`] - Per-environment address allow-lists
//! - [`scan`] - File discovery and grouping
//! - [`validation`] - Input validation helpers

pub mod address;
pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod finding;
pub mod flatten;
pub mod fs_abstraction;
pub mod report;
pub mod rules;
pub mod scan;
pub mod validation;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{EnvCheckError, FlattenError};
pub use finding::{Finding, FindingKind, Report, Severity};
