//! Vendor uninstaller invocation.

use crate::discovery::InstallationRecord;
use crate::process;
use crate::profile::UninstallStrategy;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// What happened to one uninstall command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallStatus {
    Succeeded,
    /// Not run because of a dry run.
    Planned,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallOutcome {
    /// Command line as shown to the user.
    pub command: String,
    pub status: UninstallStatus,
}

fn describe(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn run(program: &Path, args: &[&str], timeout: Duration) -> UninstallStatus {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = program.parent().filter(|d| !d.as_os_str().is_empty()) {
        cmd.current_dir(dir);
    }

    match process::run_with_timeout(&mut cmd, timeout) {
        Ok(output) if output.status.success() => UninstallStatus::Succeeded,
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut reason = match output.status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
            if !stderr.trim().is_empty() {
                reason.push_str(": ");
                reason.push_str(stderr.trim());
            }
            UninstallStatus::Failed(reason)
        }
        Err(e) => UninstallStatus::Failed(e.to_string()),
    }
}

/// Runs the uninstall phase of a removal.
pub struct Uninstaller {
    pub dry_run: bool,
    pub bulk_timeout: Duration,
    pub bundled_timeout: Duration,
}

impl Uninstaller {
    pub fn run_all(
        &self,
        strategy: &UninstallStrategy,
        records: &[InstallationRecord],
    ) -> Vec<UninstallOutcome> {
        match strategy {
            UninstallStrategy::Bulk { program, args } => {
                if records.is_empty() {
                    return Vec::new();
                }
                vec![self.invoke(Path::new(program), args, self.bulk_timeout)]
            }
            UninstallStrategy::Bundled {
                executable,
                args,
                kinds,
            } => records
                .iter()
                .filter(|record| kinds.contains(&record.kind))
                .filter_map(|record| {
                    let uninstaller = record.path.join(executable);
                    if uninstaller.is_file() {
                        Some(self.invoke(&uninstaller, args, self.bundled_timeout))
                    } else {
                        tracing::debug!("No {} in {}", executable, record.path.display());
                        None
                    }
                })
                .collect(),
            UninstallStrategy::None => Vec::new(),
        }
    }

    fn invoke(&self, program: &Path, args: &[&str], timeout: Duration) -> UninstallOutcome {
        let command = describe(&program.to_string_lossy(), args);

        if self.dry_run {
            tracing::info!("Would run: {}", command);
            return UninstallOutcome {
                command,
                status: UninstallStatus::Planned,
            };
        }

        tracing::info!("Running: {}", command);
        let status = run(program, args, timeout);
        if let UninstallStatus::Failed(reason) = &status {
            tracing::warn!("Uninstaller failed ({}): {}", command, reason);
        }
        UninstallOutcome { command, status }
    }
}
