use ito_core::config::AppConfig;
use std::io::Write;

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ito.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[database]
url = "neo4j+s://example.databases.neo4j.io"
username = "reader"
password = "secret"

[api]
max_hops = 3
query_timeout_ms = 2500
"#
    )
    .unwrap();

    let config = AppConfig::from_file(&path).unwrap();
    assert_eq!(config.database.url, "neo4j+s://example.databases.neo4j.io");
    assert_eq!(config.database.username, "reader");
    assert_eq!(config.api.max_hops, 3);
    assert_eq!(config.api.query_timeout_ms, Some(2500));
    // Untouched sections fall back to defaults.
    assert_eq!(config.api.max_limit, 1000);
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.app.name, "ITO Server");
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = AppConfig::from_file(&dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_invalid_value_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[api]\nmax_hops = \"many\"\n").unwrap();
    assert!(AppConfig::from_file(&path).is_err());
}
