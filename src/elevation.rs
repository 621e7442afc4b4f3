//! Administrator elevation.

use crate::error::ElevationError;

/// Result of [`ensure_elevated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// The process already has administrator rights.
    AlreadyElevated,
    /// An elevated copy was started; this process should exit.
    Relaunched,
}

/// Make sure destructive work runs with administrator rights.
///
/// When the process is not elevated, the same executable is started again
/// with the `runas` verb and the original arguments.
#[cfg(windows)]
pub fn ensure_elevated() -> Result<Elevation, ElevationError> {
    use windows::core::{w, HSTRING, PCWSTR};
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Shell::{IsUserAnAdmin, ShellExecuteW};
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    if unsafe { IsUserAnAdmin() }.as_bool() {
        tracing::debug!("Already running as administrator");
        return Ok(Elevation::AlreadyElevated);
    }

    let exe = std::env::current_exe()
        .map_err(|e| ElevationError::Refused(format!("cannot locate executable: {}", e)))?;
    let args = relaunch_arguments(std::env::args().skip(1));

    tracing::info!("Requesting administrator rights");
    let exe = HSTRING::from(exe.as_os_str());
    let params = HSTRING::from(args.as_str());
    let instance = unsafe {
        ShellExecuteW(
            HWND::default(),
            w!("runas"),
            PCWSTR(exe.as_ptr()),
            PCWSTR(params.as_ptr()),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };

    // Values above 32 mean success.
    if instance.0 as isize > 32 {
        Ok(Elevation::Relaunched)
    } else {
        Err(ElevationError::Refused(format!(
            "ShellExecute returned {}",
            instance.0 as isize
        )))
    }
}

#[cfg(not(windows))]
pub fn ensure_elevated() -> Result<Elevation, ElevationError> {
    Err(ElevationError::Unsupported)
}

/// Quote arguments for a Windows command line.
#[cfg_attr(not(windows), allow(dead_code))]
fn relaunch_arguments<I>(args: I) -> String
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains([' ', '\t', '"']) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_arguments_with_spaces() {
        let args = vec![
            "remove".to_string(),
            "java".to_string(),
            "--walk-root".to_string(),
            r"C:\My Projects".to_string(),
        ];
        assert_eq!(
            relaunch_arguments(args),
            r#"remove java --walk-root "C:\My Projects""#
        );
    }

    #[test]
    fn quotes_empty_argument() {
        assert_eq!(relaunch_arguments(vec![String::new()]), "\"\"");
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_off_windows() {
        assert!(matches!(
            ensure_elevated(),
            Err(ElevationError::Unsupported)
        ));
    }
}
