//! Installation removal.
//!
//! [`Remover::remove`] runs three phases in order, each over every record:
//! vendor uninstallers, forced directory deletion, then environment cleanup.
//! Every failure is logged and recorded in the [`RemovalReport`]; nothing
//! aborts the remaining work.

pub mod delete;
pub mod environment;
pub mod uninstall;

pub use environment::{filter_path_value, EnvironmentChange};
pub use uninstall::{UninstallOutcome, UninstallStatus};

use crate::config::RemovalConfig;
use crate::discovery::InstallationRecord;
use crate::profile::RuntimeProfile;
use crate::registry::Registry;
use environment::EnvironmentCleaner;
use std::path::PathBuf;
use std::time::Duration;
use uninstall::Uninstaller;

/// Options for a removal run.
#[derive(Debug, Clone)]
pub struct RemovalOptions {
    /// If true, report what would happen and touch nothing.
    pub dry_run: bool,
    pub run_uninstallers: bool,
    pub bulk_timeout: Duration,
    pub uninstaller_timeout: Duration,
    /// Broadcast the environment change to running applications.
    pub broadcast: bool,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self::from_config(&RemovalConfig::default())
    }
}

impl RemovalOptions {
    pub fn from_config(config: &RemovalConfig) -> Self {
        Self {
            dry_run: false,
            run_uninstallers: config.run_uninstallers,
            bulk_timeout: config.bulk_uninstall_timeout(),
            uninstaller_timeout: config.uninstaller_timeout(),
            broadcast: config.broadcast_environment_change,
        }
    }
}

/// A directory that was (or would be) deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedDirectory {
    pub path: PathBuf,
    pub freed_bytes: u64,
}

/// A directory that could not be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Everything a removal run did.
#[derive(Debug, Clone, Default)]
pub struct RemovalReport {
    pub dry_run: bool,
    pub uninstalls: Vec<UninstallOutcome>,
    pub deleted: Vec<DeletedDirectory>,
    pub failed: Vec<DeletionFailure>,
    pub environment: Vec<EnvironmentChange>,
}

impl RemovalReport {
    pub fn freed_bytes(&self) -> u64 {
        self.deleted.iter().map(|d| d.freed_bytes).sum()
    }

    /// True when a directory could not be deleted. Uninstaller failures
    /// are not counted: the directories are deleted regardless.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Removal engine for one runtime.
pub struct Remover<'a> {
    profile: &'a RuntimeProfile,
    registry: &'a dyn Registry,
    options: RemovalOptions,
}

impl<'a> Remover<'a> {
    pub fn new(
        profile: &'a RuntimeProfile,
        registry: &'a dyn Registry,
        options: RemovalOptions,
    ) -> Self {
        Self {
            profile,
            registry,
            options,
        }
    }

    pub fn remove(&self, records: &[InstallationRecord]) -> RemovalReport {
        tracing::info!(
            "Removing {} {} installation(s){}",
            records.len(),
            self.profile.runtime,
            if self.options.dry_run { " (dry run)" } else { "" }
        );

        let mut report = RemovalReport {
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        if self.options.run_uninstallers {
            let uninstaller = Uninstaller {
                dry_run: self.options.dry_run,
                bulk_timeout: self.options.bulk_timeout,
                bundled_timeout: self.options.uninstaller_timeout,
            };
            report.uninstalls = uninstaller.run_all(&self.profile.uninstall, records);
        } else {
            tracing::debug!("Skipping vendor uninstallers");
        }

        self.delete_directories(records, &mut report);

        let cleaner = EnvironmentCleaner {
            registry: self.registry,
            dry_run: self.options.dry_run,
        };
        report.environment = cleaner.clean(&self.profile.environment);

        if !report.environment.is_empty() && !self.options.dry_run && self.options.broadcast {
            tracing::debug!("Broadcasting environment change");
            self.registry.broadcast_environment_change();
        }

        report
    }

    fn delete_directories(&self, records: &[InstallationRecord], report: &mut RemovalReport) {
        for record in records {
            let path = &record.path;
            if !path.exists() {
                tracing::debug!("{} is already gone", path.display());
                continue;
            }

            let freed_bytes = delete::dir_size(path);
            if self.options.dry_run {
                tracing::info!("Would delete {}", path.display());
            } else if let Err(e) = delete::remove_dir_forced(path) {
                tracing::warn!("Failed to delete {}: {}", path.display(), e);
                report.failed.push(DeletionFailure {
                    path: path.clone(),
                    error: e.to_string(),
                });
                continue;
            } else {
                tracing::info!("Deleted {}", path.display());
            }

            report.deleted.push(DeletedDirectory {
                path: path.clone(),
                freed_bytes,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::InstallKind;
    use crate::profile::python;
    use crate::registry::{Hive, MemoryRegistry};
    use std::cell::Cell;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn record(path: PathBuf) -> InstallationRecord {
        InstallationRecord {
            executable: path.join("python.exe"),
            path,
            version: "3.11.4".into(),
            kind: InstallKind::Virtualenv,
            source: "test".into(),
        }
    }

    fn make_install(root: &std::path::Path) {
        fs::create_dir_all(root.join("Lib")).unwrap();
        fs::write(root.join("python.exe"), "x".repeat(64)).unwrap();
        fs::write(root.join("Lib/os.py"), "x".repeat(36)).unwrap();
    }

    /// Registry that counts broadcasts.
    struct CountingRegistry {
        inner: MemoryRegistry,
        broadcasts: Cell<usize>,
    }

    impl Registry for CountingRegistry {
        fn subkeys(&self, hive: Hive, path: &str) -> io::Result<Vec<String>> {
            self.inner.subkeys(hive, path)
        }
        fn read_string(
            &self,
            hive: Hive,
            path: &str,
            name: &str,
        ) -> io::Result<crate::registry::StringValue> {
            self.inner.read_string(hive, path, name)
        }
        fn write_string(
            &self,
            hive: Hive,
            path: &str,
            name: &str,
            value: &crate::registry::StringValue,
        ) -> io::Result<()> {
            self.inner.write_string(hive, path, name, value)
        }
        fn delete_value(&self, hive: Hive, path: &str, name: &str) -> io::Result<()> {
            self.inner.delete_value(hive, path, name)
        }
        fn broadcast_environment_change(&self) {
            self.broadcasts.set(self.broadcasts.get() + 1);
        }
    }

    fn counting(inner: MemoryRegistry) -> CountingRegistry {
        CountingRegistry {
            inner,
            broadcasts: Cell::new(0),
        }
    }

    #[test]
    fn deletes_directories_and_cleans_environment() {
        let tmp = TempDir::new().unwrap();
        let env = tmp.path().join("venv");
        make_install(&env);

        let profile = python();
        let registry = counting(
            MemoryRegistry::new()
                .with_string(Hive::CurrentUser, "Environment", "PYTHONPATH", r"C:\libs")
                .with_string(
                    Hive::CurrentUser,
                    "Environment",
                    "Path",
                    r"C:\bin;C:\Python312\Scripts",
                ),
        );
        let remover = Remover::new(&profile, &registry, RemovalOptions::default());

        let report = remover.remove(&[record(env.clone())]);

        assert!(!env.exists());
        assert_eq!(report.deleted.len(), 1);
        assert_eq!(report.freed_bytes(), 100);
        assert!(!report.has_failures());
        assert_eq!(report.environment.len(), 2);
        assert_eq!(
            registry
                .inner
                .value(Hive::CurrentUser, "Environment", "Path")
                .unwrap()
                .data,
            r"C:\bin"
        );
        assert_eq!(registry.broadcasts.get(), 1);
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let env = tmp.path().join("venv");
        make_install(&env);

        let profile = python();
        let registry = counting(MemoryRegistry::new().with_string(
            Hive::CurrentUser,
            "Environment",
            "PYTHONHOME",
            r"C:\Python312",
        ));
        let options = RemovalOptions {
            dry_run: true,
            ..Default::default()
        };
        let report = Remover::new(&profile, &registry, options).remove(&[record(env.clone())]);

        assert!(env.exists());
        assert!(report.dry_run);
        assert_eq!(report.deleted.len(), 1);
        assert_eq!(report.environment.len(), 1);
        assert!(registry
            .inner
            .value(Hive::CurrentUser, "Environment", "PYTHONHOME")
            .is_some());
        assert_eq!(registry.broadcasts.get(), 0);
    }

    #[test]
    fn failed_deletion_does_not_stop_later_records() {
        let tmp = TempDir::new().unwrap();
        let not_a_dir = tmp.path().join("python.exe");
        fs::write(&not_a_dir, "x").unwrap();
        let env = tmp.path().join("venv");
        make_install(&env);

        let profile = python();
        let registry = counting(MemoryRegistry::new().with_string(
            Hive::CurrentUser,
            "Environment",
            "PYTHONPATH",
            r"C:\libs",
        ));
        let report = Remover::new(&profile, &registry, RemovalOptions::default())
            .remove(&[record(not_a_dir.clone()), record(env.clone())]);

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, not_a_dir);
        assert_eq!(report.deleted.len(), 1);
        assert_eq!(report.deleted[0].path, env);
        assert!(!env.exists());
        assert!(report.has_failures());

        assert_eq!(report.environment.len(), 1);
        assert!(registry
            .inner
            .value(Hive::CurrentUser, "Environment", "PYTHONPATH")
            .is_none());
        assert_eq!(registry.broadcasts.get(), 1);
    }

    #[test]
    fn missing_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let profile = python();
        let registry = MemoryRegistry::new();

        let report = Remover::new(&profile, &registry, RemovalOptions::default())
            .remove(&[record(tmp.path().join("gone"))]);

        assert!(report.deleted.is_empty());
        assert!(report.failed.is_empty());
    }

    #[test]
    fn no_broadcast_without_changes() {
        let profile = python();
        let registry = counting(MemoryRegistry::new());

        Remover::new(&profile, &registry, RemovalOptions::default()).remove(&[]);
        assert_eq!(registry.broadcasts.get(), 0);
    }

    #[test]
    fn uninstallers_can_be_disabled() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("Python312");
        make_install(&root);
        fs::write(root.join("Uninstall.exe"), "").unwrap();

        let mut rec = record(root);
        rec.kind = InstallKind::System;
        let profile = python();
        let registry = MemoryRegistry::new();
        let options = RemovalOptions {
            run_uninstallers: false,
            dry_run: true,
            ..Default::default()
        };

        let report = Remover::new(&profile, &registry, options).remove(&[rec]);
        assert!(report.uninstalls.is_empty());
    }
}
