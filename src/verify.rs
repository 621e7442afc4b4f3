//! Post-removal verification.

use crate::discovery::{Discover, InstallationRecord};

/// Outcome of re-running discovery after a removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Clean,
    Remaining(Vec<InstallationRecord>),
}

impl Verification {
    pub fn passed(&self) -> bool {
        matches!(self, Verification::Clean)
    }

    /// One `- <kind> <version> @ <path>` line per leftover installation.
    pub fn report_lines(&self) -> Vec<String> {
        match self {
            Verification::Clean => Vec::new(),
            Verification::Remaining(records) => records
                .iter()
                .map(|r| format!("- {}", r.short_summary()))
                .collect(),
        }
    }
}

/// Run discovery again and compare with what was removed.
///
/// Anything found now counts as remaining, whether or not it was part of
/// `prior`. The prior list is only used for logging.
pub fn verify(
    discovery: &(impl Discover + ?Sized),
    prior: &[InstallationRecord],
) -> Verification {
    let remaining = discovery.discover();
    if remaining.is_empty() {
        tracing::info!("Verification passed, {} installation(s) removed", prior.len());
        return Verification::Clean;
    }

    for record in &remaining {
        if prior.iter().any(|p| p.same_location(&record.path)) {
            tracing::warn!("Still present: {}", record.summary());
        } else {
            tracing::warn!("Newly found: {}", record.summary());
        }
    }
    Verification::Remaining(remaining)
}
