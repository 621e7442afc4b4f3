//! Version extraction from runtime executables.

use crate::process;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use std::time::Duration;

/// `java -version` prints the version quoted: `openjdk version "17.0.2"`.
static QUOTED_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(\d+(?:\.\d+)*)"#).expect("quoted version pattern"));

/// `python --version` prints it bare: `Python 3.12.1`.
static BARE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+\.\d+(?:\.\d+)*)").expect("bare version pattern"));

/// Pull the first version number out of version-flag output.
pub fn parse_version(output: &str) -> Option<String> {
    QUOTED_VERSION
        .captures(output)
        .or_else(|| BARE_VERSION.captures(output))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Source of version strings for discovered executables.
pub trait VersionProbe {
    /// Version of `executable`, or `None` when it cannot be determined.
    fn probe(&self, executable: &Path, flag: &str) -> Option<String>;
}

impl<F> VersionProbe for F
where
    F: Fn(&Path, &str) -> Option<String>,
{
    fn probe(&self, executable: &Path, flag: &str) -> Option<String> {
        self(executable, flag)
    }
}

/// Runs the executable with its version flag.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    timeout: Duration,
}

impl CommandProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for CommandProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl VersionProbe for CommandProbe {
    fn probe(&self, executable: &Path, flag: &str) -> Option<String> {
        let output =
            match process::output_with_timeout(Command::new(executable).arg(flag), self.timeout) {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!("Version query failed for {}: {}", executable.display(), e);
                    return None;
                }
            };

        // Java writes to stderr, Python 3 to stdout.
        let text = format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let version = parse_version(&text);
        if version.is_none() {
            tracing::debug!(
                "No version in output of {} {}: {:?}",
                executable.display(),
                flag,
                text.trim()
            );
        }
        version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_oracle_java_version() {
        let out = "java version \"1.8.0_301\"\nJava(TM) SE Runtime Environment (build 1.8.0_301-b09)";
        assert_eq!(parse_version(out).as_deref(), Some("1.8.0"));
    }

    #[test]
    fn parses_openjdk_single_number_version() {
        let out = "openjdk version \"17\" 2021-09-14\nOpenJDK Runtime Environment";
        assert_eq!(parse_version(out).as_deref(), Some("17"));
    }

    #[test]
    fn parses_python_version() {
        assert_eq!(parse_version("Python 3.12.1\n").as_deref(), Some("3.12.1"));
    }

    #[test]
    fn no_version_in_garbage() {
        assert_eq!(parse_version("'java' is not recognized"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn closures_are_probes() {
        let probe = |_: &Path, flag: &str| Some(format!("flag {}", flag));
        assert_eq!(
            probe.probe(Path::new("java.exe"), "-version").as_deref(),
            Some("flag -version")
        );
    }

    #[test]
    fn command_probe_failure_is_none() {
        let probe = CommandProbe::new(Duration::from_secs(1));
        assert_eq!(
            probe.probe(Path::new("/definitely/not/here/java.exe"), "-version"),
            None
        );
    }
}
