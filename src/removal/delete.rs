//! Forced recursive directory removal.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Total size of the files below `path`.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Clear the read-only attribute on `path` and everything below it.
#[allow(clippy::permissions_set_readonly_false)]
fn clear_readonly(path: &Path) {
    for entry in WalkDir::new(path).follow_links(false).into_iter().flatten() {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            if let Err(e) = fs::set_permissions(entry.path(), permissions) {
                tracing::trace!("Cannot clear read-only on {}: {}", entry.path().display(), e);
            }
        }
    }
}

/// Delete `path` recursively. A failed first attempt is retried once after
/// clearing read-only attributes.
pub fn remove_dir_forced(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            tracing::debug!(
                "Removing {} failed ({}), retrying without read-only attributes",
                path.display(),
                e
            );
            clear_readonly(path);
            fs::remove_dir_all(path)
        }
    }
}
