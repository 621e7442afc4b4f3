//! Runtime profiles.
//!
//! A [`RuntimeProfile`] is the value that configures the discovery and
//! removal engine for one runtime: where to look, how to recognise an
//! installation, how to classify it and what to clean afterwards.

mod java;
mod python;

pub use java::java;
pub use python::python;

use crate::discovery::InstallKind;
use crate::registry::Hive;
use std::fmt;
use std::path::Path;

/// Runtimes the tool knows how to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Runtime {
    Java,
    Python,
}

impl Runtime {
    pub fn profile(&self) -> RuntimeProfile {
        match self {
            Runtime::Java => java(),
            Runtime::Python => python(),
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runtime::Java => write!(f, "Java"),
            Runtime::Python => write!(f, "Python"),
        }
    }
}

/// A well-known install location. `%VAR%` references and `*`, `?`, `[...]`
/// wildcards are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    pub pattern: String,
    pub label: String,
}

impl PathPattern {
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }
}

/// What to read from each subkey of a registry subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryLookup {
    /// A named value of the subkey itself (`JavaHome`).
    Value(&'static str),
    /// The default value of a child key (`InstallPath`).
    ChildDefault(&'static str),
}

/// A registry subtree whose immediate subkeys describe installations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySource {
    pub hive: Hive,
    pub subtree: &'static str,
    pub vendor: &'static str,
    pub lookup: RegistryLookup,
}

/// One classification hint, checked in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindHint {
    /// The lower-cased root path contains the text.
    PathContains(&'static str, InstallKind),
    /// The root contains this file.
    MarkerFile(&'static str, InstallKind),
}

/// How to tell installation kinds apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindRule {
    /// `with` when `companion` sits next to the runtime executable.
    Companion {
        companion: &'static str,
        with: InstallKind,
        without: InstallKind,
    },
    /// First matching hint wins, `fallback` otherwise.
    Hints {
        hints: &'static [KindHint],
        fallback: InstallKind,
    },
}

impl KindRule {
    /// Classify the installation at `root` validated by `executable`.
    pub fn classify(&self, root: &Path, executable: &Path) -> InstallKind {
        match self {
            KindRule::Companion {
                companion,
                with,
                without,
            } => {
                let has_companion = executable
                    .parent()
                    .map(|dir| dir.join(companion).is_file())
                    .unwrap_or(false);
                if has_companion {
                    *with
                } else {
                    *without
                }
            }
            KindRule::Hints { hints, fallback } => {
                let lowered = root.to_string_lossy().to_lowercase();
                hints
                    .iter()
                    .find_map(|hint| match hint {
                        KindHint::PathContains(text, kind) => {
                            lowered.contains(text).then_some(*kind)
                        }
                        KindHint::MarkerFile(file, kind) => {
                            root.join(file).is_file().then_some(*kind)
                        }
                    })
                    .unwrap_or(*fallback)
            }
        }
    }
}

/// Directory-walk settings for runtimes that live in virtual environments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvWalk {
    /// File that marks an environment root.
    pub marker_file: &'static str,
    /// Conventional environment directory names (lower case).
    pub dir_names: &'static [&'static str],
    pub label: &'static str,
}

/// How the vendor's own uninstall is triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallStrategy {
    /// One OS-level query-and-uninstall command covering every product.
    Bulk {
        program: &'static str,
        args: &'static [&'static str],
    },
    /// An uninstaller shipped inside each installation of the given kinds.
    Bundled {
        executable: &'static str,
        args: &'static [&'static str],
        kinds: &'static [InstallKind],
    },
    None,
}

/// Environment state reverted after removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentCleanup {
    /// Variables deleted outright.
    pub variables: &'static [&'static str],
    /// `Path` segments containing any of these (case-insensitive) are dropped.
    pub path_keywords: &'static [&'static str],
}

/// Everything the engine needs to know about one runtime.
#[derive(Debug, Clone)]
pub struct RuntimeProfile {
    pub runtime: Runtime,
    /// Runtime executable file name (`java.exe`).
    pub executable: &'static str,
    /// Directories that hold the executable below an installation root.
    pub container_dirs: &'static [&'static str],
    /// Flag that makes the executable print its version.
    pub version_flag: &'static str,
    pub fixed_paths: Vec<PathPattern>,
    /// PATH entries containing any of these are candidates.
    pub scan_keywords: &'static [&'static str],
    pub registry: Vec<RegistrySource>,
    pub venv_walk: Option<VenvWalk>,
    pub kind_rule: KindRule,
    pub uninstall: UninstallStrategy,
    pub environment: EnvironmentCleanup,
}

impl RuntimeProfile {
    /// True when `name` is one of the executable-container directories.
    pub fn is_container_dir(&self, name: &str) -> bool {
        self.container_dirs
            .iter()
            .any(|dir| dir.eq_ignore_ascii_case(name))
    }

    /// True when a PATH entry mentions this runtime.
    pub fn matches_scan_keyword(&self, entry: &str) -> bool {
        let lowered = entry.to_lowercase();
        self.scan_keywords.iter().any(|kw| lowered.contains(kw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn runtime_resolves_profiles() {
        assert_eq!(Runtime::Java.profile().executable, "java.exe");
        assert_eq!(Runtime::Python.profile().executable, "python.exe");
        assert_eq!(Runtime::Python.to_string(), "Python");
    }

    #[test]
    fn companion_rule_checks_executable_dir() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        fs::create_dir(&bin).unwrap();
        fs::write(bin.join("java.exe"), "").unwrap();

        let rule = KindRule::Companion {
            companion: "javac.exe",
            with: InstallKind::Jdk,
            without: InstallKind::Jre,
        };
        let exe = bin.join("java.exe");
        assert_eq!(rule.classify(tmp.path(), &exe), InstallKind::Jre);

        fs::write(bin.join("javac.exe"), "").unwrap();
        assert_eq!(rule.classify(tmp.path(), &exe), InstallKind::Jdk);
    }

    #[test]
    fn hint_rule_first_match_wins() {
        const HINTS: &[KindHint] = &[
            KindHint::PathContains("conda", InstallKind::Conda),
            KindHint::PathContains("venv", InstallKind::Virtualenv),
        ];
        let rule = KindRule::Hints {
            hints: HINTS,
            fallback: InstallKind::System,
        };
        let exe = Path::new("python.exe");

        assert_eq!(
            rule.classify(Path::new(r"C:\Miniconda3\envs\venv"), exe),
            InstallKind::Conda
        );
        assert_eq!(
            rule.classify(Path::new(r"C:\work\.venv"), exe),
            InstallKind::Virtualenv
        );
        assert_eq!(
            rule.classify(Path::new(r"C:\Python312"), exe),
            InstallKind::System
        );
    }

    #[test]
    fn container_dir_match_is_case_insensitive() {
        let profile = python();
        assert!(profile.is_container_dir("scripts"));
        assert!(profile.is_container_dir("Scripts"));
        assert!(!profile.is_container_dir("Lib"));
    }

    #[test]
    fn scan_keywords_are_case_insensitive() {
        let profile = java();
        assert!(profile.matches_scan_keyword(r"C:\Program Files\Java\jdk-17\bin"));
        assert!(profile.matches_scan_keyword(r"D:\tools\OpenJDK\bin"));
        assert!(!profile.matches_scan_keyword(r"C:\Windows\System32"));
    }
}
