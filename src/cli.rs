//! CLI argument parsing with clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "envcheck")]
#[command(
    author,
    version,
    about = "Detect configuration drift and address leakage across environments"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (defaults to ./envcheck.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only on stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where to look for configuration files and allow-lists.
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Target directory to scan
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Rules directory (uat.txt, prod.txt, ...)
    #[arg(long = "envs")]
    pub envs_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory tree and report drift and address leakage
    Check {
        #[command(flatten)]
        scan: ScanArgs,

        /// Baseline environment for structural comparison (default: uat if present)
        #[arg(long)]
        baseline: Option<String>,

        /// Comma-separated environments that trigger cross-environment checks (default: prod if present)
        #[arg(long = "critical-env")]
        critical_env: Option<String>,

        /// Environment pairs covered by the drift check (downstream, legacy)
        #[arg(long)]
        drift_scope: Option<String>,

        /// Output format (text, json)
        #[arg(long, short, default_value = "text")]
        format: String,
    },

    /// List discovered configuration groups and their environment files
    Groups {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Print the flattened key/value pairs of a single file
    Flatten {
        /// File to flatten
        file: PathBuf,

        /// Output format (text, json)
        #[arg(long, short, default_value = "text")]
        format: String,
    },

    /// Show version
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::parse_from([
            "envcheck",
            "check",
            "--dir",
            "deploy",
            "--envs",
            "rules",
            "--baseline",
            "test",
            "--critical-env",
            "prod,prod-eu",
            "--drift-scope",
            "legacy",
            "-f",
            "json",
        ]);
        match cli.command {
            Commands::Check {
                scan,
                baseline,
                critical_env,
                drift_scope,
                format,
            } => {
                assert_eq!(scan.dir, Some(PathBuf::from("deploy")));
                assert_eq!(scan.envs_dir, Some(PathBuf::from("rules")));
                assert_eq!(baseline.as_deref(), Some("test"));
                assert_eq!(critical_env.as_deref(), Some("prod,prod-eu"));
                assert_eq!(drift_scope.as_deref(), Some("legacy"));
                assert_eq!(format, "json");
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["envcheck", "groups", "-v", "--config", "ci.yaml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("ci.yaml")));
    }
}
