use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{FluxoError, Result},
    utils::{
        fs::{ensure_dir, tmp_path, write_atomic},
        paths,
    },
};

/// How the host page mints identifiers for new expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    #[default]
    Uuid,
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    #[serde(default)]
    pub id_style: IdStyle,
}

fn default_autosave() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            data_file: None,
            autosave: true,
            id_style: IdStyle::Uuid,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`].
    pub const KEYS: [&'static str; 4] = ["currency", "data_file", "autosave", "id_style"];

    /// Applies a `config <key> <value>` style update.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "currency" => {
                let code = value.trim().to_ascii_uppercase();
                if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    return Err(FluxoError::Config(format!(
                        "currency must be a three-letter code, got `{}`",
                        value
                    )));
                }
                self.currency = code;
            }
            "data_file" => {
                let trimmed = value.trim();
                self.data_file = if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("default")
                {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
            }
            "autosave" => {
                self.autosave = parse_flag(value).ok_or_else(|| {
                    FluxoError::Config(format!("autosave expects on/off, got `{}`", value))
                })?;
            }
            "id_style" => {
                self.id_style = match value.trim().to_ascii_lowercase().as_str() {
                    "uuid" => IdStyle::Uuid,
                    "sequential" => IdStyle::Sequential,
                    other => {
                        return Err(FluxoError::Config(format!(
                            "id_style must be `uuid` or `sequential`, got `{}`",
                            other
                        )))
                    }
                };
            }
            other => {
                return Err(FluxoError::Config(format!(
                    "unknown configuration key `{}`",
                    other
                )))
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency", self.currency.clone()),
            (
                "data_file",
                self.data_file
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "default".into()),
            ),
            ("autosave", if self.autosave { "on" } else { "off" }.into()),
            (
                "id_style",
                match self.id_style {
                    IdStyle::Uuid => "uuid",
                    IdStyle::Sequential => "sequential",
                }
                .into(),
            ),
        ]
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| FluxoError::Config(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Expense file for `config`, relative paths resolved against the base dir.
    pub fn data_file(&self, config: &Config) -> PathBuf {
        match &config.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base.join(path),
            None => paths::default_data_file_in(&self.base),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_keeps_updates() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("currency", "brl").unwrap();
        config.set("autosave", "off").unwrap();
        config.set("id_style", "sequential").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.currency, "BRL");
        assert!(!loaded.autosave);
        assert_eq!(loaded.id_style, IdStyle::Sequential);
    }

    #[test]
    fn data_file_resolves_relative_to_base() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        assert_eq!(manager.data_file(&config), dir.path().join("expenses.json"));

        config.set("data_file", "books/home.json").unwrap();
        assert_eq!(manager.data_file(&config), dir.path().join("books/home.json"));
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("currency", "dollars").is_err());
        assert!(config.set("autosave", "maybe").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn listed_keys_match_entries() {
        let shown: Vec<_> = Config::default().entries().into_iter().map(|(key, _)| key).collect();
        assert_eq!(shown, Config::KEYS);
    }
}
