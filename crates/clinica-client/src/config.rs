use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    /// Added in v1.
    pub timeout_secs: u64,
    /// Recorded as the author of every submitted record.
    pub author_id: String,
    pub created_at: jiff::Timestamp,
}

impl ClientConfig {
    pub fn new(api_base_url: &str, author_id: &str) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: api_base_url.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            author_id: author_id.to_string(),
            created_at: jiff::Timestamp::now(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn config_dir() -> Result<PathBuf, ClientError> {
    let base = dirs::config_dir().ok_or_else(|| ClientError::Config("no config directory found".to_string()))?;
    Ok(base.join("com.clinica.console"))
}

pub fn config_path() -> Result<PathBuf, ClientError> {
    Ok(config_dir()?.join(FILE_NAME))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

pub fn load_config() -> Result<ClientConfig, ClientError> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<ClientConfig, ClientError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ClientError::Config(format!("failed to read config at {}: {e}", path.display())))?;

    // Parse as raw JSON so migrations run before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> Result<serde_json::Value, ClientError> {
    if from_version > CURRENT_VERSION {
        return Err(ClientError::UnsupportedConfigVersion {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }

    // v0 → v1: add timeout_secs
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ClientError::Config("config is not a JSON object".to_string()))?;
        obj.entry("timeout_secs")
            .or_insert(serde_json::Value::from(DEFAULT_TIMEOUT_SECS));
        obj.insert("config_version".to_string(), serde_json::Value::from(1u32));
        tracing::info!("migrated config v0 → v1 (added timeout_secs)");
    }

    Ok(json)
}

pub fn save_config(config: &ClientConfig) -> Result<PathBuf, ClientError> {
    save_config_to(&config_dir()?, config)
}

/// Write `config.json` into `dir`, stamped with the current version.
pub fn save_config_to(dir: &Path, config: &ClientConfig) -> Result<PathBuf, ClientError> {
    std::fs::create_dir_all(dir)?;

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join(FILE_NAME);
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

pub fn delete_config() -> Result<(), ClientError> {
    let path = config_path()?;
    if path.exists() {
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}
