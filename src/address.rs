//! IPv4 literal extraction.

use regex::Regex;
use std::sync::LazyLock;

/// Dotted-quad literal. Octet ranges are not checked: rule files are matched
/// by exact string, so `999.1.1.1` is still a literal worth reporting.
/// Boundaries are ASCII word boundaries, so a non-ASCII letter next to a
/// literal does not hide it.
static IPV4_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)(?:[0-9]{1,3}\.){3}[0-9]{1,3}(?-u:\b)")
        .expect("IPv4 literal pattern is valid")
});

/// All IPv4 literals in `text`, in order of appearance.
///
/// # Examples
/// ```
/// use envcheck::address::extract_addresses;
/// assert_eq!(
///     extract_addresses("jdbc:postgresql://10.0.0.5:5432/app"),
///     vec!["10.0.0.5".to_string()]
/// );
/// assert!(extract_addresses("db.internal").is_empty());
/// ```
pub fn extract_addresses(text: &str) -> Vec<String> {
    IPV4_LITERAL
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
