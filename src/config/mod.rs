use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::LedgerError, store::DEFAULT_STORAGE_KEY, utils::files};

const HOME_ENV: &str = "FINANCE_TRACKER_HOME";
const DEFAULT_DIR_NAME: &str = ".finance_tracker";
const CONFIG_FILE: &str = "config.json";
const DATA_DIR: &str = "data";

/// User preferences for the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage key the ledger is kept under.
    pub storage_key: String,
    /// Label printed in front of amounts.
    pub currency_symbol: String,
    /// `chrono` format string used when displaying transaction dates.
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            currency_symbol: "R$".into(),
            date_format: "%Y-%m-%d".into(),
        }
    }
}

/// Returns the application data directory, defaulting to `~/.finance_tracker`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the key-value files under a base directory.
pub fn data_dir_in(base: &Path) -> PathBuf {
    base.join(DATA_DIR)
}

/// Loads and saves [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the config file, falling back to defaults when it is absent.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            LedgerError::Config(format!("{}: {}", self.path.display(), err))
        })?;
        validate(&config)?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        validate(config)?;
        let json = serde_json::to_string_pretty(config)?;
        files::replace_file(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn validate(config: &Config) -> Result<(), LedgerError> {
    if config.storage_key.trim().is_empty() {
        return Err(LedgerError::Config("storage_key must not be empty".into()));
    }
    if config.date_format.trim().is_empty() {
        return Err(LedgerError::Config("date_format must not be empty".into()));
    }
    if StrftimeItems::new(&config.date_format).any(|item| matches!(item, Item::Error)) {
        return Err(LedgerError::Config(format!(
            "date_format `{}` is not a valid strftime pattern",
            config.date_format
        )));
    }
    Ok(())
}
