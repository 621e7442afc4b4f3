//! In-memory registry.

use super::{Hive, Registry, StringValue, ValueType};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;

#[derive(Debug, Default, Clone)]
struct Key {
    /// Path as first written, for reporting subkey names.
    path: String,
    /// Lower-cased value name -> (original name, value).
    values: BTreeMap<String, (String, StringValue)>,
}

/// Registry kept in memory.
///
/// Key paths and value names are case-insensitive, as in the real registry.
/// Writing a value creates the key and all its parents.
///
/// # Example
/// ```
/// use runtime_purge::registry::{Hive, MemoryRegistry, Registry};
///
/// let registry = MemoryRegistry::new()
///     .with_string(Hive::CurrentUser, "Environment", "JAVA_HOME", r"C:\jdk");
/// let value = registry.read_string(Hive::CurrentUser, "environment", "java_home").unwrap();
/// assert_eq!(value.data, r"C:\jdk");
/// ```
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: RefCell<BTreeMap<(Hive, String), Key>>,
}

fn normalize(path: &str) -> String {
    path.trim_matches('\\').to_lowercase()
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Registry::write_string`] for a `REG_SZ` value.
    pub fn with_string(self, hive: Hive, path: &str, name: &str, data: &str) -> Self {
        self.insert(hive, path, name, StringValue::new(data, ValueType::String));
        self
    }

    /// Builder form of [`Registry::write_string`] for a `REG_EXPAND_SZ` value.
    pub fn with_expand_string(self, hive: Hive, path: &str, name: &str, data: &str) -> Self {
        self.insert(hive, path, name, StringValue::new(data, ValueType::ExpandString));
        self
    }

    /// Builder that creates an empty key.
    pub fn with_key(self, hive: Hive, path: &str) -> Self {
        self.ensure_key(hive, path);
        self
    }

    /// Current value, if any. Convenient for assertions.
    pub fn value(&self, hive: Hive, path: &str, name: &str) -> Option<StringValue> {
        self.read_string(hive, path, name).ok()
    }

    fn ensure_key(&self, hive: Hive, path: &str) {
        let trimmed = path.trim_matches('\\');
        let mut keys = self.keys.borrow_mut();
        let mut prefix = String::new();
        for part in trimmed.split('\\').filter(|p| !p.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('\\');
            }
            prefix.push_str(part);
            keys.entry((hive, normalize(&prefix))).or_insert_with(|| Key {
                path: prefix.clone(),
                values: BTreeMap::new(),
            });
        }
    }

    fn insert(&self, hive: Hive, path: &str, name: &str, value: StringValue) {
        self.ensure_key(hive, path);
        let mut keys = self.keys.borrow_mut();
        if let Some(key) = keys.get_mut(&(hive, normalize(path))) {
            key.values
                .insert(name.to_lowercase(), (name.to_string(), value));
        }
    }
}

impl Registry for MemoryRegistry {
    fn subkeys(&self, hive: Hive, path: &str) -> io::Result<Vec<String>> {
        let keys = self.keys.borrow();
        let parent = normalize(path);
        if !keys.contains_key(&(hive, parent.clone())) {
            return Err(io::ErrorKind::NotFound.into());
        }

        let prefix = format!("{}\\", parent);
        Ok(keys
            .iter()
            .filter(|((h, p), _)| *h == hive && p.starts_with(&prefix))
            .filter(|((_, p), _)| !p[prefix.len()..].contains('\\'))
            .filter_map(|(_, key)| key.path.rsplit('\\').next().map(str::to_string))
            .collect())
    }

    fn read_string(&self, hive: Hive, path: &str, name: &str) -> io::Result<StringValue> {
        self.keys
            .borrow()
            .get(&(hive, normalize(path)))
            .and_then(|key| key.values.get(&name.to_lowercase()))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| io::ErrorKind::NotFound.into())
    }

    fn write_string(
        &self,
        hive: Hive,
        path: &str,
        name: &str,
        value: &StringValue,
    ) -> io::Result<()> {
        if !self.keys.borrow().contains_key(&(hive, normalize(path))) {
            return Err(io::ErrorKind::NotFound.into());
        }
        self.insert(hive, path, name, value.clone());
        Ok(())
    }

    fn delete_value(&self, hive: Hive, path: &str, name: &str) -> io::Result<()> {
        self.keys
            .borrow_mut()
            .get_mut(&(hive, normalize(path)))
            .and_then(|key| key.values.remove(&name.to_lowercase()))
            .map(|_| ())
            .ok_or_else(|| io::ErrorKind::NotFound.into())
    }
}
