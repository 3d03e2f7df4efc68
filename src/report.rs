//! Rendering of findings: streamed terminal lines or a JSON document.

use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::engine::DriftScope;
use crate::finding::{Finding, FindingSink, Report, Severity};

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

/// Prints each finding to stdout as soon as it is recorded.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl FindingSink for TerminalSink {
    fn record(&mut self, finding: &Finding) {
        println!("  {}", styled_line(finding));
    }
}

fn styled_line(finding: &Finding) -> String {
    match finding.severity() {
        Severity::Critical => style(finding.to_string()).red().to_string(),
        Severity::Warning => style(finding.to_string()).yellow().to_string(),
    }
}

/// One-line run summary.
pub fn summary_line(report: &Report) -> String {
    if !report.criticals.is_empty() {
        format!("Found {} critical issues", report.criticals.len())
    } else if !report.warnings.is_empty() {
        format!("Found {} warnings", report.warnings.len())
    } else {
        "No issues found".to_string()
    }
}

pub fn print_summary(report: &Report) {
    let line = summary_line(report);
    let styled = if !report.criticals.is_empty() {
        style(line).red()
    } else if !report.warnings.is_empty() {
        style(line).yellow()
    } else {
        style(line).green()
    };
    println!("{}", styled);
}

/// Report data structure for JSON serialization
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub scan_dir: PathBuf,
    pub environments: &'a [String],
    pub baseline: Option<&'a str>,
    pub critical_envs: &'a BTreeSet<String>,
    pub drift_scope: DriftScope,
    pub groups: usize,
    pub summary: Summary,
    pub findings: Vec<&'a Finding>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub criticals: usize,
    pub warnings: usize,
    pub exit_code: i32,
}

impl Summary {
    pub fn of(report: &Report) -> Self {
        Self {
            criticals: report.criticals.len(),
            warnings: report.warnings.len(),
            exit_code: report.exit_code(),
        }
    }
}
