//! Path management for FeeDesk
//!
//! Provides XDG-compliant path resolution for configuration, data and the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `FEEDESK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/feedesk` or `~/.config/feedesk`
//! 3. Windows: `%APPDATA%\feedesk`

use std::path::PathBuf;

use crate::error::FeeDeskError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "FEEDESK_DATA_DIR";

/// Manages all paths used by FeeDesk
#[derive(Debug, Clone)]
pub struct FeeDeskPaths {
    base_dir: PathBuf,
}

impl FeeDeskPaths {
    /// Create a new FeeDeskPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, FeeDeskError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create FeeDeskPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/feedesk/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/feedesk/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn students_file(&self) -> PathBuf {
        self.data_dir().join("students.json")
    }

    pub fn fees_file(&self) -> PathBuf {
        self.data_dir().join("fees.json")
    }

    pub fn payments_file(&self) -> PathBuf {
        self.data_dir().join("payments.json")
    }

    pub fn terms_file(&self) -> PathBuf {
        self.data_dir().join("terms.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), FeeDeskError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FeeDeskError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FeeDeskError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if FeeDesk has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FeeDeskError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                FeeDeskError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("feedesk"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FeeDeskError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| FeeDeskError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("feedesk"))
}
