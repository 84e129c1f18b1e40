use clinica_client::config::{CURRENT_VERSION, DEFAULT_TIMEOUT_SECS, load_config_from, save_config_to};
use clinica_client::{ClientConfig, ClientError};

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ClientConfig::new("https://clinic.example.org/api", "u-42");
    config.config_version = 0;

    let path = save_config_to(dir.path(), &config).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert_eq!(loaded.config_version, CURRENT_VERSION);
    assert_eq!(loaded.api_base_url, config.api_base_url);
    assert_eq!(loaded.author_id, "u-42");
    assert_eq!(loaded.created_at, config.created_at);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn saved_config_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = save_config_to(dir.path(), &ClientConfig::new("http://localhost:8080", "u-1")).unwrap();
    let mode = std::fs::metadata(path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn unversioned_config_gets_default_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "api_base_url": "http://localhost:8080",
            "author_id": "u-7",
            "created_at": "2026-01-05T10:00:00Z"
        }"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
}

#[test]
fn newer_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "config_version": 9, "api_base_url": "x", "timeout_secs": 5, "author_id": "u", "created_at": "2026-01-05T10:00:00Z" }"#,
    )
    .unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(matches!(
        err,
        ClientError::UnsupportedConfigVersion { found: 9, supported: 1 }
    ));
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config_from(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}
