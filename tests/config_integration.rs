use runtime_purge::config::Config;
use runtime_purge::discovery::DiscoveryOptions;
use runtime_purge::removal::RemovalOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

fn load(content: &str) -> Result<Config, runtime_purge::error::ConfigError> {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    Config::load(Some(file.path()))
}

#[test]
fn parse_complete_config_file() {
    let config = load(
        r#"
[discovery]
version_timeout_secs = 10
walk_max_depth = 12
walk_roots = ['D:\work']
walk_exclude = ["node_modules", ".git"]
extra_paths = ['E:\portable\jdk*']

[removal]
bulk_uninstall_timeout_secs = 60
uninstaller_timeout_secs = 300
run_uninstallers = false
broadcast_environment_change = false
"#,
    )
    .unwrap();

    assert_eq!(config.discovery.version_timeout(), Duration::from_secs(10));
    assert_eq!(config.discovery.walk_max_depth, Some(12));
    assert_eq!(config.discovery.walk_exclude.len(), 2);
    assert!(!config.removal.run_uninstallers);

    let discovery = DiscoveryOptions::from_config(&config.discovery);
    assert_eq!(discovery.walk.roots, vec![PathBuf::from(r"D:\work")]);
    assert_eq!(discovery.extra_paths, vec![r"E:\portable\jdk*".to_string()]);

    let removal = RemovalOptions::from_config(&config.removal);
    assert_eq!(removal.bulk_timeout, Duration::from_secs(60));
    assert_eq!(removal.uninstaller_timeout, Duration::from_secs(300));
    assert!(!removal.broadcast);
    assert!(!removal.dry_run);
}

#[test]
fn parse_partial_config_uses_defaults() {
    let config = load(
        r#"
[discovery]
walk_max_depth = 8
"#,
    )
    .unwrap();

    // Explicit value
    assert_eq!(config.discovery.walk_max_depth, Some(8));
    // Default values
    assert_eq!(config.discovery.version_timeout_secs, 5);
    assert_eq!(config.removal.bulk_uninstall_timeout_secs, 30);
    assert!(config.removal.run_uninstallers);
}

#[test]
fn empty_config_walks_default_roots() {
    let config = load("").unwrap();
    let options = DiscoveryOptions::from_config(&config.discovery);

    assert!(options.walk_enabled);
    assert!(options.walk.max_depth.is_none());
    assert!(options.walk.roots.contains(&PathBuf::from(r"C:\")));
}

#[test]
fn parse_invalid_toml_returns_error() {
    assert!(load("this is not valid toml [[[").is_err());
}

#[test]
fn zero_timeout_returns_error() {
    let result = load(
        r#"
[discovery]
version_timeout_secs = 0
"#,
    );
    assert!(result.is_err());
}

#[test]
fn missing_explicit_file_is_an_error() {
    let result = Config::load(Some(std::path::Path::new("/nonexistent/config.toml")));
    assert!(result.is_err());
}
