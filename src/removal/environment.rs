//! Persistent environment cleanup in the user and machine scopes.

use crate::profile::EnvironmentCleanup;
use crate::registry::{is_not_found, Hive, Registry};

/// Name of the search-path variable as stored in the registry.
pub const PATH_VARIABLE: &str = "Path";

/// One change made (or planned) to a persistent variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentChange {
    Deleted {
        hive: Hive,
        name: String,
    },
    PathRewritten {
        hive: Hive,
        removed: Vec<String>,
    },
}

impl std::fmt::Display for EnvironmentChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvironmentChange::Deleted { hive, name } => write!(f, "{}: deleted {}", hive, name),
            EnvironmentChange::PathRewritten { hive, removed } => {
                write!(f, "{}: removed from {}: {}", hive, PATH_VARIABLE, removed.join(";"))
            }
        }
    }
}

/// Drop every `;`-separated segment that is empty or contains one of
/// `keywords` (case-insensitive). Order is preserved.
pub fn filter_path_value(value: &str, keywords: &[&str]) -> String {
    value
        .split(';')
        .filter(|segment| !segment.trim().is_empty() && !matches_keyword(segment, keywords))
        .collect::<Vec<_>>()
        .join(";")
}

fn matches_keyword(segment: &str, keywords: &[&str]) -> bool {
    let lowered = segment.to_lowercase();
    keywords.iter().any(|kw| lowered.contains(&kw.to_lowercase()))
}

/// Reverts the variables of one runtime in both scopes.
pub struct EnvironmentCleaner<'a> {
    pub registry: &'a dyn Registry,
    pub dry_run: bool,
}

impl EnvironmentCleaner<'_> {
    pub fn clean(&self, cleanup: &EnvironmentCleanup) -> Vec<EnvironmentChange> {
        let mut changes = Vec::new();
        for hive in Hive::ENVIRONMENT_SCOPES {
            self.delete_variables(hive, cleanup.variables, &mut changes);
            if let Some(change) = self.rewrite_path(hive, cleanup.path_keywords) {
                changes.push(change);
            }
        }
        changes
    }

    fn delete_variables(&self, hive: Hive, names: &[&str], changes: &mut Vec<EnvironmentChange>) {
        let key = hive.environment_key();
        for name in names {
            match self.registry.read_string(hive, key, name) {
                Ok(_) => {}
                Err(e) => {
                    if !is_not_found(&e) {
                        tracing::warn!("Cannot read {} in {}: {}", name, hive, e);
                    }
                    continue;
                }
            }

            if self.dry_run {
                tracing::info!("Would delete {} in {}", name, hive);
            } else if let Err(e) = self.registry.delete_value(hive, key, name) {
                if !is_not_found(&e) {
                    tracing::warn!("Cannot delete {} in {}: {}", name, hive, e);
                }
                continue;
            } else {
                tracing::info!("Deleted {} in {}", name, hive);
            }
            changes.push(EnvironmentChange::Deleted {
                hive,
                name: name.to_string(),
            });
        }
    }

    fn rewrite_path(&self, hive: Hive, keywords: &[&str]) -> Option<EnvironmentChange> {
        let key = hive.environment_key();
        let value = match self.registry.read_string(hive, key, PATH_VARIABLE) {
            Ok(value) => value,
            Err(e) => {
                if !is_not_found(&e) {
                    tracing::warn!("Cannot read {} in {}: {}", PATH_VARIABLE, hive, e);
                }
                return None;
            }
        };

        let filtered = filter_path_value(&value.data, keywords);
        let removed: Vec<String> = value
            .data
            .split(';')
            .filter(|segment| !segment.trim().is_empty() && matches_keyword(segment, keywords))
            .map(str::to_string)
            .collect();

        if filtered == value.data {
            return None;
        }

        if self.dry_run {
            tracing::info!("Would rewrite {} in {}", PATH_VARIABLE, hive);
        } else if let Err(e) =
            self.registry
                .write_string(hive, key, PATH_VARIABLE, &value.with_data(filtered))
        {
            tracing::warn!("Cannot rewrite {} in {}: {}", PATH_VARIABLE, hive, e);
            return None;
        } else {
            tracing::info!("Rewrote {} in {}", PATH_VARIABLE, hive);
        }

        Some(EnvironmentChange::PathRewritten { hive, removed })
    }
}
