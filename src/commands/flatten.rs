//! Flatten command implementation.

use anyhow::Result;
use std::path::Path;

use crate::finding::exit_code;
use crate::flatten::{flatten_file, Format};
use crate::fs_abstraction::real_fs;
use crate::report::ReportFormat;

/// Run the flatten command
pub fn run(path: &Path, format: &str) -> Result<i32> {
    let format: ReportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let flat = flatten_file(real_fs(), path)
        .map_err(|e| anyhow::anyhow!("Failed to flatten {}: {}", path.display(), e))?;

    match format {
        ReportFormat::Text => {
            println!("# {} ({})", path.display(), Format::from_path(path));
            for (key, value) in flat.iter() {
                println!("{}={}", key, value);
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&flat)?),
    }
    Ok(exit_code::CLEAN)
}
