//! Scan command implementation

use super::{choose_runtime, discovery_options, print_listing, WithSpinner};
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::console::{Console, StdConsole};
use crate::discovery::{CommandProbe, Discover, Discoverer, InstallationRecord};
use crate::profile::Runtime;
use crate::registry;
use anyhow::Result;

/// Render the scan result, as a listing or as JSON.
pub fn render(
    console: &dyn Console,
    runtime: Runtime,
    records: &[InstallationRecord],
    json: bool,
) -> Result<()> {
    if json {
        console.print(&serde_json::to_string_pretty(records)?);
    } else {
        print_listing(console, runtime, records);
    }
    Ok(())
}

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config, quiet: bool) -> Result<()> {
    args.walk.validate()?;

    let console = StdConsole;
    let Some(runtime) = args.runtime.or_else(|| choose_runtime(&console)) else {
        return Ok(());
    };

    let profile = runtime.profile();
    let registry = registry::system();
    let options = discovery_options(config, &args.walk);
    let discoverer = Discoverer::new(
        &profile,
        &*registry,
        CommandProbe::new(config.discovery.version_timeout()),
        options,
    );

    tracing::info!(%runtime, "Scanning");
    let records = WithSpinner::new(&discoverer, runtime, !quiet && !args.json).discover();

    render(&console, runtime, &records, args.json)
}
