use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::StoreError,
    storage::json_backend::write_atomic_replace,
};

/// User-tunable settings for reports, listings, and backups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub currency_symbol: String,
    pub report_window_days: u32,
    pub trend_months: u32,
    pub backup_retention: usize,
    pub low_balance_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            report_window_days: 30,
            trend_months: 6,
            backup_retention: 5,
            low_balance_threshold: 2.0,
        }
    }
}

impl Config {
    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        match key {
            "currency_symbol" | "currency" => self.currency_symbol = value.to_string(),
            "report_window_days" => self.report_window_days = parse_setting(key, value)?,
            "trend_months" => {
                let months: u32 = parse_setting(key, value)?;
                if months == 0 {
                    return Err("trend_months must be at least 1".into());
                }
                self.trend_months = months;
            }
            "backup_retention" => {
                let retention: usize = parse_setting(key, value)?;
                self.backup_retention = retention.max(1);
            }
            "low_balance_threshold" => {
                let threshold: f64 = parse_setting(key, value)?;
                if !threshold.is_finite() || threshold < 0.0 {
                    return Err("low_balance_threshold must be a non-negative number".into());
                }
                self.low_balance_threshold = threshold;
            }
            other => return Err(format!("unknown setting `{}`", other)),
        }
        Ok(())
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("invalid value `{}` for {}", value, key))
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, StoreError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, StoreError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, StoreError> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, StoreError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic_replace(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
