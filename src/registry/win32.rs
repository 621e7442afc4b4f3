//! Registry backed by the Win32 registry API.

use super::{Hive, Registry, StringValue, ValueType};
use std::io;
use winreg::enums::{
    RegType, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, KEY_SET_VALUE,
};
use winreg::types::{FromRegValue, ToRegValue};
use winreg::RegKey;

/// The machine registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsRegistry;

fn root(hive: Hive) -> RegKey {
    match hive {
        Hive::LocalMachine => RegKey::predef(HKEY_LOCAL_MACHINE),
        Hive::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
    }
}

impl Registry for WindowsRegistry {
    fn subkeys(&self, hive: Hive, path: &str) -> io::Result<Vec<String>> {
        let key = root(hive).open_subkey_with_flags(path, KEY_READ)?;
        key.enum_keys().collect()
    }

    fn read_string(&self, hive: Hive, path: &str, name: &str) -> io::Result<StringValue> {
        let key = root(hive).open_subkey_with_flags(path, KEY_READ)?;
        let raw = key.get_raw_value(name)?;
        let value_type = match raw.vtype {
            RegType::REG_SZ => ValueType::String,
            RegType::REG_EXPAND_SZ => ValueType::ExpandString,
            ref other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{}\\{} has non-string type {:?}", path, name, other),
                ))
            }
        };
        let data = String::from_reg_value(&raw)?;
        Ok(StringValue { data, value_type })
    }

    fn write_string(
        &self,
        hive: Hive,
        path: &str,
        name: &str,
        value: &StringValue,
    ) -> io::Result<()> {
        let key = root(hive).open_subkey_with_flags(path, KEY_SET_VALUE)?;
        let mut raw = value.data.to_reg_value();
        raw.vtype = match value.value_type {
            ValueType::String => RegType::REG_SZ,
            ValueType::ExpandString => RegType::REG_EXPAND_SZ,
        };
        key.set_raw_value(name, &raw)
    }

    fn delete_value(&self, hive: Hive, path: &str, name: &str) -> io::Result<()> {
        let key = root(hive).open_subkey_with_flags(path, KEY_SET_VALUE)?;
        key.delete_value(name)
    }

    fn broadcast_environment_change(&self) {
        use windows::core::w;
        use windows::Win32::Foundation::{LPARAM, WPARAM};
        use windows::Win32::UI::WindowsAndMessaging::{
            SendMessageTimeoutW, HWND_BROADCAST, SMTO_ABORTIFHUNG, WM_SETTINGCHANGE,
        };

        let mut result = 0usize;
        // SAFETY: the lParam string is a static, nul-terminated UTF-16 literal.
        unsafe {
            SendMessageTimeoutW(
                HWND_BROADCAST,
                WM_SETTINGCHANGE,
                WPARAM(0),
                LPARAM(w!("Environment").as_ptr() as isize),
                SMTO_ABORTIFHUNG,
                5000,
                Some(&mut result as *mut usize),
            );
        }
        tracing::debug!("Broadcast WM_SETTINGCHANGE for Environment");
    }
}
