//! Filesystem walk for virtual environments.
//!
//! This is the slow part of discovery: with no depth limit it visits every
//! directory below each root.

use crate::profile::VenvWalk;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Bounds of the virtual environment walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Directories to walk. Missing ones are skipped.
    pub roots: Vec<PathBuf>,
    /// Maximum depth below each root (None = unlimited).
    pub max_depth: Option<usize>,
    /// Directory names never descended into.
    pub exclude: Vec<String>,
}

impl WalkOptions {
    /// Home directory plus the usual drive roots.
    pub fn default_roots() -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = dirs::home_dir().into_iter().collect();
        roots.push(PathBuf::from(r"C:\"));
        roots.push(PathBuf::from(r"D:\"));
        roots
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|e| e.eq_ignore_ascii_case(name))
    }
}

fn is_environment(walk: &VenvWalk, path: &Path, name: &str) -> bool {
    walk.dir_names.iter().any(|d| d.eq_ignore_ascii_case(name))
        || path.join(walk.marker_file).is_file()
}

/// Candidate environment directories below the configured roots.
///
/// Directories holding the marker file or carrying a conventional
/// environment name are reported and not descended into. Directories named
/// like one of `container_dirs` are reported as well; the record step maps
/// them to their parent.
pub fn find_environments(
    walk: &VenvWalk,
    container_dirs: &[&str],
    options: &WalkOptions,
) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for root in &options.roots {
        if !root.is_dir() {
            tracing::debug!("Skipping missing walk root {}", root.display());
            continue;
        }
        tracing::info!("Walking {} for virtual environments", root.display());

        let mut walker = WalkDir::new(root).follow_links(false);
        if let Some(depth) = options.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut entries = walker.into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::trace!("Walk error: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if entry.depth() > 0 && options.is_excluded(&name) {
                entries.skip_current_dir();
                continue;
            }

            let path = entry.path();
            if is_environment(walk, path, &name)
                || container_dirs.iter().any(|d| d.eq_ignore_ascii_case(&name))
            {
                found.push(path.to_path_buf());
                entries.skip_current_dir();
            }
        }
    }

    found
}
