//! Groups command implementation.
//!
//! Lists every discovered group with its environment files, marking the
//! environments that have no file.

use anyhow::Result;
use console::style;

use super::ScanContext;
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::finding::exit_code;
use crate::scan::{find_groups, Groups};

/// Run the groups command
pub fn run(args: ScanArgs, config: &Config) -> Result<i32> {
    let ctx = ScanContext::load(config, &args)?;
    let groups = find_groups(&ctx.scan_dir, &ctx.envs)?;

    for line in render(&groups, &ctx.envs) {
        println!("{}", line);
    }
    println!();
    println!(
        "{} groups across {} environments",
        style(groups.len()).bold(),
        ctx.envs.len()
    );
    Ok(exit_code::CLEAN)
}

fn render(groups: &Groups, envs: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for (group, files) in groups {
        lines.push(group.clone());
        for env in envs {
            match files.get(env) {
                Some(path) => lines.push(format!("  {:<10} {}", env, path.display())),
                None => lines.push(format!("  {:<10} (missing)", env)),
            }
        }
    }
    lines
}
