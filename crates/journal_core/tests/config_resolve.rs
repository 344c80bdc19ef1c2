use journal_core::config::{ConfigChain, MapProvider, SecretsFileProvider};
use journal_core::{default_log_level, AppConfig, ConfigError, StoreBackend};
use std::path::PathBuf;

#[test]
fn sqlite_backend_requires_dbname() {
    let chain = ConfigChain::new().push(MapProvider::new().with("log_level", "info"));

    let err = AppConfig::resolve(&chain).unwrap_err();
    assert_eq!(err, ConfigError::MissingKey("dbname"));
    assert!(err.to_string().contains("JOURNAL_DBNAME"));
}

#[test]
fn minimal_config_applies_defaults() {
    let chain = ConfigChain::new().push(MapProvider::new().with("dbname", "journal.db"));

    let config = AppConfig::resolve(&chain).unwrap();
    assert_eq!(
        config.backend,
        StoreBackend::Sqlite {
            path: PathBuf::from("journal.db")
        }
    );
    assert_eq!(config.log_level, default_log_level());
    assert_eq!(config.log_dir, None);
    assert_eq!(config.display.offset.local_minus_utc(), 0);
}

#[test]
fn memory_backend_needs_no_database() {
    let chain = ConfigChain::new().push(MapProvider::new().with("backend", "Memory"));
    assert_eq!(
        AppConfig::resolve(&chain).unwrap().backend,
        StoreBackend::Memory
    );
}

#[test]
fn secrets_take_precedence_over_later_providers() {
    let secrets = SecretsFileProvider::from_toml_str(
        "secrets.toml",
        r#"
dbname = "from-secrets.db"
display_offset = "+09:00"
"#,
    )
    .unwrap();
    let fallback = MapProvider::new()
        .with("dbname", "from-env.db")
        .with("log_level", "WARNING");
    let chain = ConfigChain::new().push(secrets).push(fallback);

    let config = AppConfig::resolve(&chain).unwrap();
    assert_eq!(
        config.backend,
        StoreBackend::Sqlite {
            path: PathBuf::from("from-secrets.db")
        }
    );
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.display.offset.local_minus_utc(), 9 * 3600);
    assert_eq!(chain.lookup("dbname").map(|(_, source)| source), Some("secrets"));
}

#[test]
fn invalid_values_are_reported_with_their_key() {
    let cases = [
        ("backend", "postgres"),
        ("log_level", "loud"),
        ("log_dir", "relative/logs"),
        ("display_offset", "Mars/Olympus"),
    ];

    for (key, value) in cases {
        let chain = ConfigChain::new().push(
            MapProvider::new()
                .with("dbname", "journal.db")
                .with(key, value),
        );
        match AppConfig::resolve(&chain) {
            Err(ConfigError::InvalidValue {
                key: reported,
                value: reported_value,
                ..
            }) => {
                assert_eq!(reported, key);
                assert_eq!(reported_value, value);
            }
            other => panic!("expected invalid `{key}`, got {other:?}"),
        }
    }
}

#[test]
fn load_reads_secrets_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let secrets_path = dir.path().join("secrets.toml");
    let db_path = dir.path().join("journal.db");
    std::fs::write(
        &secrets_path,
        format!("[journal]\ndbname = {:?}\n", db_path.to_str().unwrap()),
    )
    .unwrap();

    let config = AppConfig::load(&secrets_path).unwrap();
    assert_eq!(config.backend, StoreBackend::Sqlite { path: db_path });
}

#[test]
fn load_rejects_malformed_secrets_file() {
    let dir = tempfile::tempdir().unwrap();
    let secrets_path = dir.path().join("secrets.toml");
    std::fs::write(&secrets_path, "dbname = [unterminated").unwrap();

    assert!(matches!(
        AppConfig::load(&secrets_path),
        Err(ConfigError::SecretsFile { .. })
    ));
}
