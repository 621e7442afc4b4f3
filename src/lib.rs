//! Runtime Purge - find and completely remove Java or Python installations
//!
//! This crate provides functionality for:
//! - Discovering runtime installations from install locations, `PATH`, the
//!   registry and virtual environments
//! - Uninstalling and deleting them, then reverting environment variables
//! - Verifying that nothing was left behind

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod discovery;
pub mod elevation;
pub mod error;
pub mod process;
pub mod profile;
pub mod registry;
pub mod removal;
pub mod verify;

// Re-export commonly used types
pub use config::Config;
pub use discovery::{Discover, Discoverer, InstallationRecord};
pub use error::{PurgeError, Result};
pub use profile::{Runtime, RuntimeProfile};
