//! The discovered-installation record.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Version placeholder used when the executable could not be queried.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Coarse classification of an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InstallKind {
    /// Java development kit (compiler present).
    Jdk,
    /// Java runtime only.
    Jre,
    /// Python installed machine-wide by the official installer.
    System,
    /// Python installed per-user under the profile directory.
    User,
    /// Anaconda / Miniconda distribution or environment.
    Conda,
    /// Python virtual environment.
    Virtualenv,
}

impl InstallKind {
    pub fn label(&self) -> &'static str {
        match self {
            InstallKind::Jdk => "JDK",
            InstallKind::Jre => "JRE",
            InstallKind::System => "System",
            InstallKind::User => "User",
            InstallKind::Conda => "Conda",
            InstallKind::Virtualenv => "Virtualenv",
        }
    }
}

impl fmt::Display for InstallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One installation found on the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationRecord {
    /// Normalized installation root.
    pub path: PathBuf,
    /// Version reported by the executable, or [`UNKNOWN_VERSION`].
    pub version: String,
    pub kind: InstallKind,
    /// Which discovery source found it first.
    pub source: String,
    /// Runtime executable that validated the installation.
    pub executable: PathBuf,
}

impl InstallationRecord {
    /// Listing line: `<kind> <version> @ <path> (<source>)`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} @ {} ({})",
            self.kind,
            self.version,
            self.path.display(),
            self.source
        )
    }

    /// Verification line: `<kind> <version> @ <path>`.
    pub fn short_summary(&self) -> String {
        format!("{} {} @ {}", self.kind, self.version, self.path.display())
    }

    pub fn has_unknown_version(&self) -> bool {
        self.version == UNKNOWN_VERSION
    }

    /// True when `other` refers to the same directory.
    pub fn same_location(&self, other: &Path) -> bool {
        dedup_key(&self.path) == dedup_key(other)
    }
}

/// Comparison key for installation roots. Windows paths are case-insensitive.
pub(crate) fn dedup_key(path: &Path) -> String {
    path.to_string_lossy()
        .trim_end_matches(['\\', '/'])
        .to_lowercase()
}
