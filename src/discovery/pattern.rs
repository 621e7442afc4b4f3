//! Expansion of install-location patterns.
//!
//! Patterns are Windows-style: `%VAR%` references are replaced from the
//! process environment, then `*`, `?` and `[...]` are matched
//! case-insensitively against the filesystem.

use glob::MatchOptions;
use std::path::PathBuf;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Replace `%NAME%` references with environment values. Unknown names are
/// left as written.
pub fn expand_env_vars(pattern: &str) -> String {
    expand_env_vars_with(pattern, |name| std::env::var(name).ok())
}

/// [`expand_env_vars`] with a custom variable source.
pub fn expand_env_vars_with<F>(pattern: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('%') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => {
                out.push('%');
                out.push_str(name);
                out.push('%');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Expand `pattern` to the existing paths it names, sorted.
pub fn expand(pattern: &str) -> Vec<PathBuf> {
    let expanded = expand_env_vars(pattern);

    let paths = match glob::glob_with(&expanded, MATCH_OPTIONS) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::debug!("Ignoring malformed pattern {}: {}", pattern, e);
            return Vec::new();
        }
    };

    let mut found: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::trace!("Cannot list {}: {}", e.path().display(), e.error());
                None
            }
        })
        .collect();
    found.sort();
    found
}
