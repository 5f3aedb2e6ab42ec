// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template variable interpolation

use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// `${name}` placeholders in generated scripts
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// `@{name}` placeholders in bulk command templates
#[allow(clippy::expect_used)]
pub static BULK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("constant regex pattern is valid")
});

/// Interpolate `${name}` placeholders with values from the vars map.
///
/// Unknown variables are left as-is, so shell syntax such as `$?` or
/// `$(pwd)` passes through untouched.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    replace_with(&VAR_PATTERN, template, vars)
}

/// Interpolate `@{name}` placeholders
pub fn interpolate_bulk(template: &str, vars: &HashMap<String, String>) -> String {
    replace_with(&BULK_PATTERN, template, vars)
}

/// Names of all `@{name}` placeholders in `template`
pub fn bulk_names(template: &str) -> BTreeSet<String> {
    BULK_PATTERN.captures_iter(template).map(|caps| caps[1].to_string()).collect()
}

fn replace_with(pattern: &Regex, template: &str, vars: &HashMap<String, String>) -> String {
    pattern
        .replace_all(template, |caps: &regex::Captures| match vars.get(&caps[1]) {
            Some(val) => val.clone(),
            None => caps[0].to_string(),
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
