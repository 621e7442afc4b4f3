//! Remove command implementation.

use super::{choose_runtime, discovery_options, print_listing, WithSpinner};
use crate::cli::RemoveArgs;
use crate::config::Config;
use crate::console::{Console, StdConsole};
use crate::discovery::{CommandProbe, Discover, Discoverer};
use crate::elevation::{ensure_elevated, Elevation};
use crate::error::PurgeError;
use crate::profile::Runtime;
use crate::registry;
use crate::removal::{RemovalOptions, RemovalReport, Remover, UninstallStatus};
use crate::verify::{verify, Verification};
use anyhow::Result;
use humansize::{format_size, BINARY};

/// How an interactive removal ended.
#[derive(Debug)]
pub enum RemoveOutcome {
    NothingFound,
    /// The user did not confirm.
    Aborted,
    Completed {
        report: RemovalReport,
        /// Not run for dry runs.
        verification: Option<Verification>,
    },
}

impl RemoveOutcome {
    /// True when something is known to be left behind.
    pub fn is_incomplete(&self) -> bool {
        match self {
            RemoveOutcome::Completed {
                report,
                verification,
            } => {
                report.has_failures()
                    || verification.as_ref().is_some_and(|v| !v.passed())
            }
            _ => false,
        }
    }
}

/// Discovery, confirmation, removal, verification and report.
pub fn execute(
    console: &dyn Console,
    runtime: Runtime,
    discovery: &dyn Discover,
    remover: &Remover<'_>,
    force: bool,
) -> RemoveOutcome {
    console.print(&format!("=== {} removal ===", runtime));

    let records = discovery.discover();
    if !print_listing(console, runtime, &records) {
        return RemoveOutcome::NothingFound;
    }

    if !force
        && !console.confirm(&format!(
            "Remove all of the {} installations above?",
            runtime
        ))
    {
        console.print("Cancelled.");
        return RemoveOutcome::Aborted;
    }

    let report = remover.remove(&records);
    print_report(console, &report);

    if report.dry_run {
        console.print("Dry run: nothing was changed.");
        return RemoveOutcome::Completed {
            report,
            verification: None,
        };
    }

    console.print(&format!("=== Verifying {} removal ===", runtime));
    let verification = verify(discovery, &records);
    match &verification {
        Verification::Clean => {
            console.print(&format!("All {} installations were removed.", runtime));
        }
        Verification::Remaining(_) => {
            console.print(&format!(
                "The following {} installations were not fully removed:",
                runtime
            ));
            for line in verification.report_lines() {
                console.print(&line);
            }
            console.print(&format!(
                "Warning: some {} installations may not have been fully removed.",
                runtime
            ));
            console.print("Suggestion: inspect the leftovers above manually and restart the computer.");
        }
    }

    RemoveOutcome::Completed {
        report,
        verification: Some(verification),
    }
}

fn print_report(console: &dyn Console, report: &RemovalReport) {
    let (deleted_verb, run_verb) = if report.dry_run {
        ("Would delete", "Would run")
    } else {
        ("Deleted", "Ran")
    };

    for outcome in &report.uninstalls {
        match &outcome.status {
            UninstallStatus::Failed(reason) => {
                console.print(&format!("Uninstaller failed: {} ({})", outcome.command, reason))
            }
            _ => console.print(&format!("{}: {}", run_verb, outcome.command)),
        }
    }
    for dir in &report.deleted {
        console.print(&format!(
            "{}: {} ({})",
            deleted_verb,
            dir.path.display(),
            format_size(dir.freed_bytes, BINARY)
        ));
    }
    for failure in &report.failed {
        console.print(&format!(
            "Failed to delete {}: {}",
            failure.path.display(),
            failure.error
        ));
    }
    for change in &report.environment {
        console.print(&format!("Environment: {}", change));
    }

    console.print(&format!(
        "Freed: {} in {} director{}",
        format_size(report.freed_bytes(), BINARY),
        report.deleted.len(),
        if report.deleted.len() == 1 { "y" } else { "ies" }
    ));
}

/// Run the remove command.
pub fn run(args: RemoveArgs, config: &Config, quiet: bool) -> Result<()> {
    args.walk.validate()?;

    let console = StdConsole;

    // Before the menu, so the elevated copy is the one that asks.
    if !args.dry_run {
        match ensure_elevated().map_err(PurgeError::from)? {
            Elevation::AlreadyElevated => {}
            Elevation::Relaunched => {
                console.print("Continuing in an elevated window.");
                return Ok(());
            }
        }
    }

    let Some(runtime) = args.runtime.or_else(|| choose_runtime(&console)) else {
        return Ok(());
    };

    let profile = runtime.profile();
    let registry = registry::system();
    let discoverer = Discoverer::new(
        &profile,
        &*registry,
        CommandProbe::new(config.discovery.version_timeout()),
        discovery_options(config, &args.walk),
    );
    let discovery = WithSpinner::new(&discoverer, runtime, !quiet);

    let mut options = RemovalOptions::from_config(&config.removal);
    options.dry_run = args.dry_run;
    options.run_uninstallers &= !args.no_uninstallers;
    let remover = Remover::new(&profile, &*registry, options);

    tracing::info!(%runtime, dry_run = args.dry_run, "Starting removal");
    let outcome = execute(&console, runtime, &discovery, &remover, args.force);

    if !args.no_pause {
        console.pause();
    }

    if outcome.is_incomplete() {
        std::process::exit(5); // Partial failure
    }

    Ok(())
}
