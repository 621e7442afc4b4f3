//! Java profile.

use super::{
    EnvironmentCleanup, KindRule, PathPattern, RegistryLookup, RegistrySource, Runtime,
    RuntimeProfile, UninstallStrategy,
};
use crate::discovery::InstallKind;
use crate::registry::Hive;

const INSTALL_ROOTS: &[(&str, &str)] = &[
    (r"C:\Program Files\Java\*", "Oracle JRE/JDK"),
    (r"C:\Program Files (x86)\Java\*", "Oracle JRE/JDK (32-bit)"),
    (r"C:\JDK*", "Custom JDK"),
    (r"C:\Program Files\Eclipse Foundation\*", "Eclipse Temurin"),
    (r"C:\Program Files\Eclipse Adoptium\*", "Eclipse Adoptium"),
    (r"C:\Program Files\Microsoft\jdk*", "Microsoft JDK"),
    (r"C:\Program Files\AdoptOpenJDK\*", "AdoptOpenJDK"),
    (r"C:\Program Files\Zulu\*", "Azul Zulu"),
    (r"C:\Program Files\Amazon Corretto\*", "Amazon Corretto"),
    (r"%USERPROFILE%\scoop\apps\openjdk*\*", "Scoop"),
    (r"%USERPROFILE%\.jdks\*", "IDE-managed JDK"),
];

const REGISTRY_ROOTS: &[(&str, &str)] = &[
    (r"SOFTWARE\JavaSoft\Java Runtime Environment", "Oracle Java"),
    (r"SOFTWARE\JavaSoft\Java Development Kit", "Oracle Java"),
    (r"SOFTWARE\JavaSoft\JRE", "Oracle Java"),
    (r"SOFTWARE\JavaSoft\JDK", "Oracle Java"),
    (r"SOFTWARE\Eclipse Foundation", "Eclipse Temurin"),
    (r"SOFTWARE\Microsoft\JDK", "Microsoft JDK"),
    (r"SOFTWARE\AdoptOpenJDK", "AdoptOpenJDK"),
    (
        r"SOFTWARE\WOW6432Node\JavaSoft\Java Runtime Environment",
        "Oracle Java (32-bit)",
    ),
    (r"SOFTWARE\WOW6432Node\JavaSoft\JDK", "Oracle Java (32-bit)"),
];

/// Profile for Oracle, OpenJDK and vendor Java builds.
///
/// Java installs put `java.exe` under `bin\`; a `javac.exe` next to it makes
/// the installation a JDK.
pub fn java() -> RuntimeProfile {
    RuntimeProfile {
        runtime: Runtime::Java,
        executable: "java.exe",
        container_dirs: &["bin"],
        version_flag: "-version",
        fixed_paths: INSTALL_ROOTS
            .iter()
            .map(|(pattern, label)| PathPattern::new(*pattern, *label))
            .collect(),
        scan_keywords: &["java", "jdk", "jre"],
        registry: REGISTRY_ROOTS
            .iter()
            .map(|&(subtree, vendor)| RegistrySource {
                hive: Hive::LocalMachine,
                subtree,
                vendor,
                lookup: RegistryLookup::Value("JavaHome"),
            })
            .collect(),
        venv_walk: None,
        kind_rule: KindRule::Companion {
            companion: "javac.exe",
            with: InstallKind::Jdk,
            without: InstallKind::Jre,
        },
        uninstall: UninstallStrategy::Bulk {
            program: "wmic",
            args: &[
                "product",
                "where",
                "name like '%Java%'",
                "call",
                "uninstall",
                "/nointeractive",
            ],
        },
        environment: EnvironmentCleanup {
            variables: &["JAVA_HOME", "JRE_HOME"],
            path_keywords: &["java", "jdk", "jre"],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_profile_properties() {
        let profile = java();

        assert_eq!(profile.runtime, Runtime::Java);
        assert_eq!(profile.version_flag, "-version");
        assert!(profile.venv_walk.is_none());
        assert!(profile.is_container_dir("bin"));
    }

    #[test]
    fn test_java_registry_reads_java_home() {
        let profile = java();

        assert!(!profile.registry.is_empty());
        assert!(profile
            .registry
            .iter()
            .all(|s| s.lookup == RegistryLookup::Value("JavaHome")
                && s.hive == Hive::LocalMachine));
    }

    #[test]
    fn test_java_cleans_home_variables() {
        let profile = java();

        assert!(profile.environment.variables.contains(&"JAVA_HOME"));
        assert!(profile.environment.variables.contains(&"JRE_HOME"));
        assert!(profile.environment.path_keywords.contains(&"jre"));
    }

    #[test]
    fn test_java_uses_bulk_uninstall() {
        assert!(matches!(
            java().uninstall,
            UninstallStrategy::Bulk { program: "wmic", .. }
        ));
    }
}
