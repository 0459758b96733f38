use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::args::DEFAULT_CONFIG_FILES;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Section that `appsettings.json` style documents nest the settings under.
const CONFIG_SECTION: &str = "Config";

/// Loads a configuration file from the provided path or default locations.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    if let Some(path) = path {
        let path = PathBuf::from(path);
        return Ok(Some(load_config_file(&path)?));
    }

    for candidate in DEFAULT_CONFIG_FILES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            tracing::debug!("Using config file {}", path.display());
            return Ok(Some(load_config_file(&path)?));
        }
    }

    Ok(None)
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let document: Value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => {
            let table: toml::Value = toml::from_str(&content).map_err(|err| {
                AppError::config(ConfigError::ParseToml {
                    path: path.to_path_buf(),
                    source: err,
                })
            })?;
            serde_json::to_value(table).map_err(|err| {
                AppError::config(ConfigError::InvalidSettings {
                    path: path.to_path_buf(),
                    source: err,
                })
            })?
        }
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        })?,
        Some(ext) => {
            return Err(AppError::config(ConfigError::UnsupportedExtension {
                ext: ext.to_owned(),
            }));
        }
        None => return Err(AppError::config(ConfigError::MissingExtension)),
    };
    settings_from_document(path, document)
}

fn settings_from_document(path: &Path, mut document: Value) -> AppResult<ConfigFile> {
    let settings = match document.get_mut(CONFIG_SECTION) {
        Some(section) => section.take(),
        None => document,
    };
    ConfigFile::deserialize(&settings).map_err(|err| {
        let error = match offending_key(&settings) {
            Some(field) => ConfigError::InvalidSetting {
                path: path.to_path_buf(),
                field,
                source: err,
            },
            None => ConfigError::InvalidSettings {
                path: path.to_path_buf(),
                source: err,
            },
        };
        AppError::config(error)
    })
}

/// First key whose value alone fails to deserialize. Every setting is
/// optional, so a single-entry document isolates the bad value.
fn offending_key(settings: &Value) -> Option<String> {
    settings
        .as_object()?
        .iter()
        .find(|(key, value)| {
            let mut single = Map::new();
            single.insert((*key).clone(), (*value).clone());
            ConfigFile::deserialize(&Value::Object(single)).is_err()
        })
        .map(|(key, _)| key.clone())
}
