//! Python profile.

use super::{
    EnvironmentCleanup, KindHint, KindRule, PathPattern, RegistryLookup, RegistrySource,
    Runtime, RuntimeProfile, UninstallStrategy, VenvWalk,
};
use crate::discovery::InstallKind;
use crate::registry::Hive;

const INSTALL_ROOTS: &[(&str, &str)] = &[
    (r"C:\Python*", "Official installer"),
    (r"C:\Program Files\Python*", "Program Files install"),
    (r"C:\Program Files (x86)\Python*", "Program Files install (32-bit)"),
    (r"%LOCALAPPDATA%\Programs\Python\Python*", "User install"),
    (r"%USERPROFILE%\anaconda3", "Conda environment"),
    (r"%USERPROFILE%\miniconda3", "Conda environment"),
    (r"%USERPROFILE%\anaconda3\envs\*", "Conda environment"),
    (r"%USERPROFILE%\miniconda3\envs\*", "Conda environment"),
    (r"C:\ProgramData\anaconda3", "Conda environment"),
    (r"C:\ProgramData\miniconda3", "Conda environment"),
    (r"%USERPROFILE%\.pyenv\pyenv-win\versions\*", "pyenv-win"),
    (r"%USERPROFILE%\.virtualenvs\*", "Virtual environment"),
];

const KIND_HINTS: &[KindHint] = &[
    KindHint::PathContains("conda", InstallKind::Conda),
    KindHint::MarkerFile("pyvenv.cfg", InstallKind::Virtualenv),
    KindHint::PathContains("virtualenv", InstallKind::Virtualenv),
    KindHint::PathContains("venv", InstallKind::Virtualenv),
    KindHint::PathContains("appdata", InstallKind::User),
];

fn registry_sources() -> Vec<RegistrySource> {
    let core = RegistryLookup::ChildDefault("InstallPath");
    vec![
        RegistrySource {
            hive: Hive::LocalMachine,
            subtree: r"SOFTWARE\Python\PythonCore",
            vendor: "PythonCore",
            lookup: core,
        },
        RegistrySource {
            hive: Hive::LocalMachine,
            subtree: r"SOFTWARE\WOW6432Node\Python\PythonCore",
            vendor: "PythonCore (32-bit)",
            lookup: core,
        },
        RegistrySource {
            hive: Hive::CurrentUser,
            subtree: r"Software\Python\PythonCore",
            vendor: "PythonCore (per-user)",
            lookup: core,
        },
        RegistrySource {
            hive: Hive::LocalMachine,
            subtree: r"SOFTWARE\Python\ContinuumAnalytics",
            vendor: "Anaconda",
            lookup: core,
        },
        RegistrySource {
            hive: Hive::CurrentUser,
            subtree: r"Software\Python\ContinuumAnalytics",
            vendor: "Anaconda (per-user)",
            lookup: core,
        },
    ]
}

/// Profile for CPython, Conda distributions and virtual environments.
///
/// `python.exe` sits in the root of regular installs and under `Scripts\` in
/// virtual environments.
pub fn python() -> RuntimeProfile {
    RuntimeProfile {
        runtime: Runtime::Python,
        executable: "python.exe",
        container_dirs: &["Scripts"],
        version_flag: "--version",
        fixed_paths: INSTALL_ROOTS
            .iter()
            .map(|(pattern, label)| PathPattern::new(*pattern, *label))
            .collect(),
        scan_keywords: &["python", "conda"],
        registry: registry_sources(),
        venv_walk: Some(VenvWalk {
            marker_file: "pyvenv.cfg",
            dir_names: &["venv", "virtualenv", ".venv"],
            label: "Virtual environment scan",
        }),
        kind_rule: KindRule::Hints {
            hints: KIND_HINTS,
            fallback: InstallKind::System,
        },
        uninstall: UninstallStrategy::Bundled {
            executable: "Uninstall.exe",
            args: &["/quiet"],
            kinds: &[InstallKind::System, InstallKind::User],
        },
        environment: EnvironmentCleanup {
            variables: &["PYTHONPATH", "PYTHONHOME"],
            path_keywords: &["python", "conda"],
        },
    }
}
