//! Check command implementation.

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use super::ScanContext;
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::engine::{CheckOptions, ComparisonEngine, DriftScope};
use crate::finding::NullSink;
use crate::fs_abstraction::real_fs;
use crate::report::{print_summary, JsonReport, ReportFormat, Summary, TerminalSink};
use crate::rules::{derive_critical_environments, determine_baseline};
use crate::scan::find_groups;
use crate::validation::parse_env_list;

/// Flags of the check command
#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    pub scan: ScanArgs,
    pub baseline: Option<String>,
    pub critical_env: Option<String>,
    pub drift_scope: Option<String>,
    pub format: String,
}

/// Run the check command and return the exit code
pub fn run(args: CheckArgs, config: &Config) -> Result<i32> {
    let format: ReportFormat = args.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let drift_scope = match &args.drift_scope {
        Some(raw) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.drift_scope,
    };
    let explicit_critical = match &args.critical_env {
        Some(raw) => parse_env_list(raw)?,
        None => config.critical_envs.clone(),
    };

    let ctx = ScanContext::load(config, &args.scan)?;
    let options = resolve_options(&ctx.envs, &args, config, &explicit_critical, drift_scope);
    info!(
        "Baseline: {}, critical: [{}]",
        options.baseline.as_deref().unwrap_or("-"),
        options.critical.iter().cloned().collect::<Vec<_>>().join(", ")
    );

    let groups = find_groups(&ctx.scan_dir, &ctx.envs)?;
    let engine = ComparisonEngine::new(&ctx.catalog, &options, real_fs());

    let report = match format {
        ReportFormat::Text => {
            let report = engine.check_groups(&groups, &ctx.envs, &mut TerminalSink);
            print_summary(&report);
            report
        }
        ReportFormat::Json => {
            let report = engine.check_groups(&groups, &ctx.envs, &mut NullSink);
            let json = JsonReport {
                generated_at: Utc::now(),
                scan_dir: ctx.scan_dir.clone(),
                environments: &ctx.envs,
                baseline: options.baseline.as_deref(),
                critical_envs: &options.critical,
                drift_scope: options.drift_scope,
                groups: groups.len(),
                summary: Summary::of(&report),
                findings: report.iter().collect(),
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
            report
        }
    };

    Ok(report.exit_code())
}

fn resolve_options(
    envs: &[String],
    args: &CheckArgs,
    config: &Config,
    explicit_critical: &[String],
    drift_scope: DriftScope,
) -> CheckOptions {
    let explicit_baseline = args.baseline.as_deref().or(config.baseline.as_deref());
    CheckOptions {
        baseline: determine_baseline(envs, explicit_baseline),
        critical: derive_critical_environments(envs, explicit_critical),
        drift_scope,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn envs() -> Vec<String> {
        ["prod", "test", "uat"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_options_defaults() {
        let options = resolve_options(
            &envs(),
            &CheckArgs::default(),
            &Config::default(),
            &[],
            DriftScope::Downstream,
        );
        assert_eq!(options.baseline.as_deref(), Some("uat"));
        assert_eq!(options.critical, BTreeSet::from(["prod".to_string()]));
    }

    #[test]
    fn test_resolve_options_flag_overrides_config() {
        let config = Config {
            baseline: Some("prod".into()),
            ..Config::default()
        };
        let args = CheckArgs {
            baseline: Some("test".into()),
            ..CheckArgs::default()
        };
        let options = resolve_options(&envs(), &args, &config, &["uat".into()], DriftScope::Legacy);
        assert_eq!(options.baseline.as_deref(), Some("test"));
        assert_eq!(options.critical, BTreeSet::from(["uat".to_string()]));
        assert_eq!(options.drift_scope, DriftScope::Legacy);

        let options = resolve_options(
            &envs(),
            &CheckArgs::default(),
            &config,
            &[],
            DriftScope::Downstream,
        );
        assert_eq!(options.baseline.as_deref(), Some("prod"));
    }

    #[test]
    fn test_run_rejects_unknown_format() {
        let args = CheckArgs {
            format: "xml".into(),
            ..CheckArgs::default()
        };
        assert!(run(args, &Config::default()).is_err());
    }
}
