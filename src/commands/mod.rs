//! Subcommand implementations.

pub mod remove;
pub mod scan;

use crate::cli::WalkArgs;
use crate::config::Config;
use crate::console::Console;
use crate::discovery::{Discover, DiscoveryOptions, InstallationRecord};
use crate::profile::Runtime;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Ask for a runtime with the numbered menu. `None` means exit.
pub fn choose_runtime(console: &dyn Console) -> Option<Runtime> {
    loop {
        console.print("");
        console.print("Select a runtime:");
        console.print("1. Python");
        console.print("2. Java");
        console.print("3. Exit");

        let choice = console.read_line("Enter a choice (1-3): ")?;
        match choice.trim() {
            "1" => return Some(Runtime::Python),
            "2" => return Some(Runtime::Java),
            "3" => return None,
            _ => console.print("Invalid choice, please try again."),
        }
    }
}

/// `<index>. <kind> <version> @ <path> (<source>)`, numbered from 1.
pub fn listing_lines(records: &[InstallationRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("{}. {}", i + 1, record.summary()))
        .collect()
}

/// Print the discovery result. Returns false when nothing was found.
pub fn print_listing(
    console: &dyn Console,
    runtime: Runtime,
    records: &[InstallationRecord],
) -> bool {
    if records.is_empty() {
        console.print(&format!("No {} installations found.", runtime));
        return false;
    }

    console.print(&format!("Found the following {} installations:", runtime));
    for line in listing_lines(records) {
        console.print(&line);
    }
    true
}

/// Configured discovery options with command-line overrides applied.
pub(crate) fn discovery_options(config: &Config, walk: &WalkArgs) -> DiscoveryOptions {
    let mut options = DiscoveryOptions::from_config(&config.discovery);
    walk.apply(&mut options);
    options
}

/// Shows a spinner on stderr while the wrapped discovery runs.
pub struct WithSpinner<'a> {
    inner: &'a dyn Discover,
    message: String,
    enabled: bool,
}

impl<'a> WithSpinner<'a> {
    pub fn new(inner: &'a dyn Discover, runtime: Runtime, enabled: bool) -> Self {
        Self {
            inner,
            message: format!("Scanning for {} installations...", runtime),
            enabled,
        }
    }
}

impl Discover for WithSpinner<'_> {
    fn discover(&self) -> Vec<InstallationRecord> {
        if !self.enabled {
            return self.inner.discover();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
            spinner.set_style(style);
        }
        spinner.set_message(self.message.clone());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let records = self.inner.discover();
        spinner.finish_and_clear();
        records
    }
}
