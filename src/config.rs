// Application configuration
//
// The app name only exists to derive data file names: `<data_dir>/<app_name>.<ext>`.
// It is passed explicitly to whoever needs it, never read from global state.

use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_APP_NAME: &str = "CreditCardTracker";

pub const APP_NAME_VAR: &str = "CREDIT_CARD_TRACKER_NAME";
pub const DATA_DIR_VAR: &str = "CREDIT_CARD_TRACKER_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Display name, also the stem of every data file
    pub app_name: String,

    /// Directory data files are read from and written to
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn new(app_name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        AppConfig {
            app_name: app_name.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Read config from `CREDIT_CARD_TRACKER_NAME` / `CREDIT_CARD_TRACKER_DIR`.
    ///
    /// Unset or blank variables fall back to the defaults.
    pub fn from_env() -> Self {
        let app_name = non_blank_var(APP_NAME_VAR).unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        let data_dir = non_blank_var(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        AppConfig { app_name, data_dir }
    }

    /// Override the data directory (e.g. from the command line)
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// File name for a format token, e.g. `"json"` -> `CreditCardTracker.json`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.app_name, extension)
    }

    /// Full path for a format token
    pub fn file_path(&self, extension: &str) -> PathBuf {
        self.data_dir.join(self.file_name(extension))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::new(DEFAULT_APP_NAME, ".")
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
