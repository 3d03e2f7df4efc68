//! Centralized validation functions for envcheck.
//!
//! This module provides unified validation for:
//! - Environment names and comma-separated environment lists
//! - IP address literals found in rule files
//! - Ambiguity between environment names

use anyhow::{bail, Result};
use std::net::IpAddr;

/// Validate an environment name.
///
/// Environment names become part of file names (`<prefix>-<env>.<ext>`) and
/// rule file stems (`<env>.txt`), so they must be non-empty and free of
/// whitespace and path separators.
///
/// # Examples
/// ```
/// use envcheck::validation::validate_env_name;
/// assert!(validate_env_name("prod").is_ok());
/// assert!(validate_env_name("prod-eu").is_ok());
/// assert!(validate_env_name("").is_err());
/// assert!(validate_env_name("a/b").is_err());
/// ```
pub fn validate_env_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Environment name cannot be empty");
    }
    if name.chars().any(|c| c.is_whitespace()) {
        bail!("Invalid environment name '{}'. Whitespace is not allowed", name);
    }
    if name.contains('/') || name.contains('\\') {
        bail!(
            "Invalid environment name '{}'. Path separators are not allowed",
            name
        );
    }
    Ok(())
}

/// Parse a comma-separated environment list.
///
/// Entries are trimmed and blank entries dropped. Every remaining entry must
/// pass [`validate_env_name`].
///
/// # Examples
/// ```
/// use envcheck::validation::parse_env_list;
/// assert_eq!(parse_env_list(" prod, ,uat ").unwrap(), vec!["prod", "uat"]);
/// assert!(parse_env_list("").unwrap().is_empty());
/// ```
pub fn parse_env_list(raw: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        validate_env_name(entry)?;
        out.push(entry.to_string());
    }
    Ok(out)
}

/// Validate an IP address string and return the parsed IpAddr.
///
/// # Examples
/// ```
/// use envcheck::validation::validate_ip;
/// assert!(validate_ip("192.168.1.1").is_ok());
/// assert!(validate_ip("::1").is_ok());
/// assert!(validate_ip("invalid").is_err());
/// ```
pub fn validate_ip(ip_str: &str) -> Result<IpAddr> {
    ip_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid IP address: {}", ip_str))
}

/// Find pairs of environment names where one name contains the other.
///
/// Such pairs are still classified deterministically (longest name wins),
/// but they are worth a warning since a file name typo can flip an
/// environment. Returned pairs are `(shorter, longer)` in input order.
///
/// # Examples
/// ```
/// use envcheck::validation::ambiguous_pairs;
/// let envs = vec!["prod".to_string(), "prod-eu".to_string(), "uat".to_string()];
/// assert_eq!(ambiguous_pairs(&envs), vec![("prod".to_string(), "prod-eu".to_string())]);
/// ```
pub fn ambiguous_pairs(envs: &[String]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (i, a) in envs.iter().enumerate() {
        for b in envs.iter().skip(i + 1) {
            if a == b {
                continue;
            }
            if b.contains(a.as_str()) {
                pairs.push((a.clone(), b.clone()));
            } else if a.contains(b.as_str()) {
                pairs.push((b.clone(), a.clone()));
            }
        }
    }
    pairs
}
