//! envcheck - Cross-Environment Configuration Checker
//!
//! Detects missing keys and leaked network addresses across per-environment
//! configuration files.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use envcheck::cli::{Cli, Commands};
use envcheck::commands::{self, check::CheckArgs};
use envcheck::finding::exit_code;

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code::SETUP_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    if let Commands::Version = cli.command {
        println!("envcheck {}", env!("CARGO_PKG_VERSION"));
        return Ok(exit_code::CLEAN);
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            scan,
            baseline,
            critical_env,
            drift_scope,
            format,
        } => commands::check::run(
            CheckArgs {
                scan,
                baseline,
                critical_env,
                drift_scope,
                format,
            },
            &config,
        ),
        Commands::Groups { scan } => commands::groups::run(scan, &config),
        Commands::Flatten { file, format } => commands::flatten::run(&file, &format),
        Commands::Version => Ok(exit_code::CLEAN),
    }
}
