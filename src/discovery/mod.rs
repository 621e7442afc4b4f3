//! Installation discovery.
//!
//! A [`Discoverer`] runs the sources of a [`RuntimeProfile`] in a fixed
//! order (install-location table, `PATH`, registry, virtual environment
//! walk) and feeds every candidate directory through one record step that
//! validates, deduplicates and describes it.

pub mod pattern;
mod record;
pub mod venv;
mod version;

pub use record::{InstallKind, InstallationRecord, UNKNOWN_VERSION};
pub use venv::WalkOptions;
pub use version::{parse_version, CommandProbe, VersionProbe};

use crate::config::DiscoveryConfig;
use crate::profile::{RegistryLookup, RegistrySource, RuntimeProfile};
use crate::registry::{is_not_found, Registry};
use normpath::PathExt;
use std::path::{Path, PathBuf};

pub const PATH_SOURCE: &str = "PATH environment variable";
pub const CONFIG_SOURCE: &str = "config";

/// Anything that can produce a fresh list of installations.
pub trait Discover {
    fn discover(&self) -> Vec<InstallationRecord>;
}

impl<F> Discover for F
where
    F: Fn() -> Vec<InstallationRecord>,
{
    fn discover(&self) -> Vec<InstallationRecord> {
        self()
    }
}

/// Knobs that are not part of the runtime profile.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    pub walk: WalkOptions,
    /// Run the virtual environment walk for profiles that have one.
    pub walk_enabled: bool,
    /// Extra install-location patterns, reported with the `config` source.
    pub extra_paths: Vec<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            walk: WalkOptions {
                roots: WalkOptions::default_roots(),
                ..Default::default()
            },
            walk_enabled: true,
            extra_paths: Vec::new(),
        }
    }
}

impl DiscoveryOptions {
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let roots = if config.walk_roots.is_empty() {
            WalkOptions::default_roots()
        } else {
            config.walk_roots.clone()
        };

        Self {
            walk: WalkOptions {
                roots,
                max_depth: config.walk_max_depth,
                exclude: config.walk_exclude.clone(),
            },
            walk_enabled: true,
            extra_paths: config.extra_paths.clone(),
        }
    }
}

/// Discovery engine for one runtime.
pub struct Discoverer<'a> {
    profile: &'a RuntimeProfile,
    registry: &'a dyn Registry,
    probe: Box<dyn VersionProbe + 'a>,
    options: DiscoveryOptions,
    path_var: Option<String>,
}

impl<'a> Discoverer<'a> {
    /// Create a discoverer reading `PATH` from the process environment.
    pub fn new(
        profile: &'a RuntimeProfile,
        registry: &'a dyn Registry,
        probe: impl VersionProbe + 'a,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            profile,
            registry,
            probe: Box::new(probe),
            options,
            path_var: std::env::var("PATH").ok(),
        }
    }

    /// Use `path_var` instead of the inherited `PATH`.
    pub fn with_path_var(mut self, path_var: Option<String>) -> Self {
        self.path_var = path_var;
        self
    }

    fn scan_fixed_paths(&self, records: &mut Vec<InstallationRecord>) {
        for location in &self.profile.fixed_paths {
            for candidate in pattern::expand(&location.pattern) {
                self.consider(&candidate, &location.label, records);
            }
        }
        for extra in &self.options.extra_paths {
            for candidate in pattern::expand(extra) {
                self.consider(&candidate, CONFIG_SOURCE, records);
            }
        }
    }

    fn scan_path_var(&self, records: &mut Vec<InstallationRecord>) {
        let Some(path_var) = &self.path_var else {
            tracing::debug!("PATH is not set");
            return;
        };

        for entry in path_var.split(';') {
            let entry = entry.trim().trim_matches('"');
            if entry.is_empty() || !self.profile.matches_scan_keyword(entry) {
                continue;
            }
            self.consider(Path::new(entry), PATH_SOURCE, records);
        }
    }

    fn scan_registry(&self, records: &mut Vec<InstallationRecord>) {
        for source in &self.profile.registry {
            let subkeys = match self.registry.subkeys(source.hive, source.subtree) {
                Ok(subkeys) => subkeys,
                Err(e) => {
                    if !is_not_found(&e) {
                        tracing::debug!("Cannot open {}\\{}: {}", source.hive, source.subtree, e);
                    }
                    continue;
                }
            };

            let label = format!("Registry ({})", source.vendor);
            for subkey in subkeys {
                if let Some(home) = self.lookup_home(source, &subkey) {
                    self.consider(&home, &label, records);
                }
            }
        }
    }

    fn lookup_home(&self, source: &RegistrySource, subkey: &str) -> Option<PathBuf> {
        let key = format!("{}\\{}", source.subtree, subkey);
        let result = match source.lookup {
            RegistryLookup::Value(name) => self.registry.read_string(source.hive, &key, name),
            RegistryLookup::ChildDefault(child) => {
                self.registry
                    .read_string(source.hive, &format!("{}\\{}", key, child), "")
            }
        };

        match result {
            Ok(value) => {
                let data = pattern::expand_env_vars(value.data.trim());
                (!data.is_empty()).then(|| PathBuf::from(data))
            }
            Err(e) => {
                if !is_not_found(&e) {
                    tracing::debug!("Cannot read {}\\{}: {}", source.hive, key, e);
                }
                None
            }
        }
    }

    fn scan_environments(&self, records: &mut Vec<InstallationRecord>) {
        let Some(walk) = &self.profile.venv_walk else {
            return;
        };
        if !self.options.walk_enabled {
            tracing::debug!("Virtual environment walk disabled");
            return;
        }

        for candidate in venv::find_environments(walk, self.profile.container_dirs, &self.options.walk)
        {
            self.consider(&candidate, walk.label, records);
        }
    }

    /// Runtime executable at `root` or in one of its container directories.
    fn locate_executable(&self, root: &Path) -> Option<PathBuf> {
        let direct = root.join(self.profile.executable);
        if direct.is_file() {
            return Some(direct);
        }
        self.profile
            .container_dirs
            .iter()
            .map(|dir| root.join(dir).join(self.profile.executable))
            .find(|path| path.is_file())
    }

    /// The shared record step. Appends nothing when the candidate is not an
    /// installation or is already listed.
    fn consider(&self, candidate: &Path, source: &str, records: &mut Vec<InstallationRecord>) {
        let root = match candidate.file_name() {
            Some(name) if self.profile.is_container_dir(&name.to_string_lossy()) => {
                candidate.parent().unwrap_or(candidate)
            }
            _ => candidate,
        };

        let Some(executable) = self.locate_executable(root) else {
            tracing::trace!("No {} under {}", self.profile.executable, root.display());
            return;
        };

        let path = root
            .normalize()
            .map(|p| p.into_path_buf())
            .unwrap_or_else(|_| root.to_path_buf());

        if records.iter().any(|r| r.same_location(&path)) {
            tracing::trace!("{} already listed", path.display());
            return;
        }

        let version = self
            .probe
            .probe(&executable, self.profile.version_flag)
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
        let kind = self.profile.kind_rule.classify(&path, &executable);

        let record = InstallationRecord {
            path,
            version,
            kind,
            source: source.to_string(),
            executable,
        };
        tracing::info!("Found {}", record.summary());
        records.push(record);
    }
}

impl Discover for Discoverer<'_> {
    fn discover(&self) -> Vec<InstallationRecord> {
        tracing::info!("Discovering {} installations", self.profile.runtime);

        let mut records = Vec::new();
        self.scan_fixed_paths(&mut records);
        self.scan_path_var(&mut records);
        self.scan_registry(&mut records);
        self.scan_environments(&mut records);

        tracing::info!(
            "Found {} {} installation(s)",
            records.len(),
            self.profile.runtime
        );
        records
    }
}
