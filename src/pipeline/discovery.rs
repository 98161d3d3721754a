//! Job discovery over the raw document text
//!
//! This is a line-based heuristic, independent of the YAML parser: every
//! line made of one space-free word followed by a final `:` is a job, the
//! same rule as `grep -E "^([^ ]+):$"`. Global sections such as
//! `variables:` or `stages:` match too and are checked as jobs, and so do
//! comment lines like `#name:` and keys such as `a:b:` (found as `a:b`).
//! Keys followed by a value or an anchor on the same line (`.base: &base`),
//! indented keys and names containing spaces do not match.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static TOP_LEVEL_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^ ]+):$").expect("valid top-level key pattern"));

/// Returns every top-level `name:` key in order of first appearance
#[must_use]
pub fn discover_jobs(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.lines()
        .filter_map(|line| TOP_LEVEL_KEY.captures(line.trim_end()))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
