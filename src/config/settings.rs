//! Console settings for FeeDesk
//!
//! Manages school-wide preferences: the school name, the currency statements
//! are computed in, the USD/ZIG exchange rate, and display options.

use serde::{Deserialize, Serialize};

use super::paths::FeeDeskPaths;
use crate::error::FeeDeskError;
use crate::models::{Currency, ExchangeRate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// School name shown in report headers
    #[serde(default = "default_school_name")]
    pub school_name: String,

    /// Currency fee statements and the dashboard are computed in
    #[serde(default)]
    pub base_currency: Currency,

    /// Rate used to convert payments into the statement currency
    #[serde(default)]
    pub exchange_rate: ExchangeRate,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Number of payments listed on the dashboard
    #[serde(default = "default_recent_payments")]
    pub recent_payments: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_school_name() -> String {
    "Nhaka School".to_string()
}

fn default_date_format() -> String {
    "%b %-d, %Y".to_string()
}

fn default_recent_payments() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            school_name: default_school_name(),
            base_currency: Currency::default(),
            exchange_rate: ExchangeRate::default(),
            date_format: default_date_format(),
            recent_payments: default_recent_payments(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &FeeDeskPaths) -> Result<Self, FeeDeskError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FeeDeskError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FeeDeskError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FeeDeskPaths) -> Result<(), FeeDeskError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FeeDeskError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            FeeDeskError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Format a date with the configured display format
    pub fn format_date(&self, date: chrono::NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}
