use crate::discovery::DiscoveryOptions;
use crate::error::{PurgeError, Result};
use crate::profile::Runtime;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Runtime Purge - find and completely remove Java or Python installations
#[derive(Parser, Debug)]
#[command(name = "runtime-purge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every installation of a runtime
    Scan(ScanArgs),

    /// Uninstall and delete every installation of a runtime
    Remove(RemoveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Bounds of the virtual environment walk.
#[derive(Args, Debug, Clone, Default)]
pub struct WalkArgs {
    /// Skip the virtual environment walk
    #[arg(long)]
    pub no_walk: bool,

    /// Maximum walk depth below each root
    #[arg(long, value_name = "N")]
    pub walk_depth: Option<usize>,

    /// Walk this directory instead of the defaults (repeatable)
    #[arg(long, value_name = "DIR")]
    pub walk_root: Vec<PathBuf>,
}

impl WalkArgs {
    pub fn validate(&self) -> Result<()> {
        if self.walk_depth == Some(0) {
            return Err(PurgeError::InvalidArgument(
                "--walk-depth must be at least 1".to_string(),
            ));
        }
        for root in &self.walk_root {
            std::fs::metadata(root).map_err(|source| PurgeError::Io {
                path: root.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Override configured discovery options with the command-line flags.
    pub fn apply(&self, options: &mut DiscoveryOptions) {
        if self.no_walk {
            options.walk_enabled = false;
        }
        if let Some(depth) = self.walk_depth {
            options.walk.max_depth = Some(depth);
        }
        if !self.walk_root.is_empty() {
            options.walk.roots = self.walk_root.clone();
        }
    }
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Runtime to look for (asks when omitted)
    #[arg(value_enum)]
    pub runtime: Option<Runtime>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub walk: WalkArgs,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Runtime to remove (asks when omitted)
    #[arg(value_enum)]
    pub runtime: Option<Runtime>,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub force: bool,

    /// Show what would be removed without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub walk: WalkArgs,

    /// Delete directories without running vendor uninstallers
    #[arg(long)]
    pub no_uninstallers: bool,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Validates the CLI definition is correct
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_scan_command() {
        let cli = Cli::parse_from(["runtime-purge", "scan", "java", "--json"]);
        match cli.command {
            Command::Scan(args) => {
                assert_eq!(args.runtime, Some(Runtime::Java));
                assert!(args.json);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn runtime_is_optional() {
        let cli = Cli::parse_from(["runtime-purge", "remove"]);
        match cli.command {
            Command::Remove(args) => assert_eq!(args.runtime, None),
            _ => panic!("Expected Remove command"),
        }
    }

    #[test]
    fn parse_remove_with_options() {
        let cli = Cli::parse_from([
            "runtime-purge",
            "remove",
            "python",
            "--dry-run",
            "--force",
            "--walk-depth",
            "6",
            "--walk-root",
            "D:\\work",
            "--walk-root",
            "E:\\",
            "--no-pause",
        ]);
        match cli.command {
            Command::Remove(args) => {
                assert_eq!(args.runtime, Some(Runtime::Python));
                assert!(args.dry_run);
                assert!(args.force);
                assert!(args.no_pause);
                assert!(!args.no_uninstallers);
                assert_eq!(args.walk.walk_depth, Some(6));
                assert_eq!(args.walk.walk_root.len(), 2);
            }
            _ => panic!("Expected Remove command"),
        }
    }

    #[test]
    fn walk_args_override_options() {
        let mut options = DiscoveryOptions::default();
        let args = WalkArgs {
            no_walk: true,
            walk_depth: Some(3),
            walk_root: vec![PathBuf::from("D:\\")],
        };
        args.apply(&mut options);

        assert!(!options.walk_enabled);
        assert_eq!(options.walk.max_depth, Some(3));
        assert_eq!(options.walk.roots, vec![PathBuf::from("D:\\")]);
    }

    #[test]
    fn zero_walk_depth_is_invalid() {
        let args = WalkArgs {
            walk_depth: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            args.validate(),
            Err(PurgeError::InvalidArgument(_))
        ));
        assert!(WalkArgs::default().validate().is_ok());
    }

    #[test]
    fn missing_walk_root_is_an_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let args = WalkArgs {
            walk_root: vec![tmp.path().to_path_buf(), missing.clone()],
            ..Default::default()
        };

        match args.validate() {
            Err(PurgeError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected an IO error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_runtime() {
        assert!(Cli::try_parse_from(["runtime-purge", "scan", "ruby"]).is_err());
    }

    #[test]
    fn global_verbose_flag() {
        let cli = Cli::parse_from(["runtime-purge", "-vvv", "scan"]);
        assert_eq!(cli.verbose, 3);
    }
}
