//! Access to the Windows registry.
//!
//! Discovery reads vendor subtrees and removal rewrites the `Environment`
//! keys. Both go through the [`Registry`] trait so the engine can run against
//! [`MemoryRegistry`] in tests and on hosts without a registry.

mod memory;
#[cfg(windows)]
mod win32;

pub use memory::MemoryRegistry;
#[cfg(windows)]
pub use win32::WindowsRegistry;

use std::fmt;
use std::io;

/// Top-level registry hive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
}

impl Hive {
    /// Both scopes that carry environment variables, user scope first.
    pub const ENVIRONMENT_SCOPES: [Hive; 2] = [Hive::CurrentUser, Hive::LocalMachine];

    /// Key holding the persistent environment variables of this scope.
    pub fn environment_key(&self) -> &'static str {
        match self {
            Hive::CurrentUser => "Environment",
            Hive::LocalMachine => r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment",
        }
    }
}

impl fmt::Display for Hive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hive::LocalMachine => write!(f, "HKLM"),
            Hive::CurrentUser => write!(f, "HKCU"),
        }
    }
}

/// Storage type of a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// `REG_SZ`
    String,
    /// `REG_EXPAND_SZ`, `%VAR%` references are expanded by readers
    ExpandString,
}

/// A string value together with its storage type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
    pub data: String,
    pub value_type: ValueType,
}

impl StringValue {
    pub fn new(data: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            data: data.into(),
            value_type,
        }
    }

    /// Same storage type, different data.
    pub fn with_data(&self, data: impl Into<String>) -> Self {
        Self::new(data, self.value_type)
    }
}

/// Registry operations used by discovery and removal.
///
/// Missing keys and values are reported as [`io::ErrorKind::NotFound`];
/// use [`is_not_found`] to tell them apart from real failures. The empty
/// value name addresses a key's default value.
pub trait Registry {
    /// Names of the immediate subkeys of `path`.
    fn subkeys(&self, hive: Hive, path: &str) -> io::Result<Vec<String>>;

    /// Read a string value.
    fn read_string(&self, hive: Hive, path: &str, name: &str) -> io::Result<StringValue>;

    /// Write a string value, keeping the given storage type.
    fn write_string(&self, hive: Hive, path: &str, name: &str, value: &StringValue)
        -> io::Result<()>;

    /// Delete a value.
    fn delete_value(&self, hive: Hive, path: &str, name: &str) -> io::Result<()>;

    /// Tell running applications that the persistent environment changed.
    fn broadcast_environment_change(&self) {}
}

/// True for the "key or value does not exist" condition.
pub fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// The registry of the running system.
#[cfg(windows)]
pub fn system() -> Box<dyn Registry> {
    Box::new(WindowsRegistry)
}

/// The registry of the running system.
///
/// Non-Windows hosts have none; an empty in-memory registry stands in so
/// discovery still covers the filesystem sources.
#[cfg(not(windows))]
pub fn system() -> Box<dyn Registry> {
    tracing::debug!("No system registry on this platform, using an empty one");
    Box::new(MemoryRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hive_display() {
        assert_eq!(Hive::LocalMachine.to_string(), "HKLM");
        assert_eq!(Hive::CurrentUser.to_string(), "HKCU");
    }

    #[test]
    fn environment_keys_differ_per_scope() {
        assert_eq!(Hive::CurrentUser.environment_key(), "Environment");
        assert!(Hive::LocalMachine
            .environment_key()
            .ends_with(r"Session Manager\Environment"));
    }

    #[test]
    fn with_data_keeps_value_type() {
        let value = StringValue::new("%JAVA_HOME%\\bin", ValueType::ExpandString);
        let rewritten = value.with_data("C:\\tools");
        assert_eq!(rewritten.value_type, ValueType::ExpandString);
        assert_eq!(rewritten.data, "C:\\tools");
    }

    #[test]
    fn not_found_detection() {
        assert!(is_not_found(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_not_found(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
    }
}
