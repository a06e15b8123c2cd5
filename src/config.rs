//! Process-wide settings.
//!
//! Settings are built once at startup, from defaults, an optional JSON file
//! and `CSVGATE_*` environment variables, then installed with
//! [`init_global`]. Components that need them, such as
//! [`ErrorLog`](crate::ErrorLog), take them explicitly or read
//! [`global`].
//!
//! ```no_run
//! use csvgate::config::{self, Settings};
//!
//! # fn main() -> csvgate::Result<()> {
//! let settings = Settings::from_json_file("csvgate.json")?.with_env_overrides()?;
//! config::init_global(settings);
//! # Ok(())
//! # }
//! ```

use crate::error::{CsvError, Result};
use crate::record::ConcurrencyLimit;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const ENV_ERROR_LOG: &str = "CSVGATE_ERROR_LOG";
pub const ENV_LIMIT: &str = "CSVGATE_LIMIT";
pub const ENV_LOG: &str = "CSVGATE_LOG";

pub const DEFAULT_ERROR_LOG: &str = "errors.csv";

static GLOBAL: OnceLock<Settings> = OnceLock::new();

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// CSV file that [`ErrorLog`](crate::ErrorLog) appends to.
    pub error_log_path: PathBuf,
    /// Concurrency limit for [`TableIo::from_settings`](crate::TableIo::from_settings).
    pub default_limit: usize,
    /// `tracing` filter directive, e.g. `info` or `csvgate=debug`.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            error_log_path: PathBuf::from(DEFAULT_ERROR_LOG),
            default_limit: num_cpus::get().max(1),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`CsvError::Config`] if the file cannot be read or parsed, or holds a
    /// zero `default_limit`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |message: String| CsvError::Config {
            path: path.to_path_buf(),
            message,
        };
        let text = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let settings: Self = serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))?;
        settings.validated().map_err(|e| config_err(e.to_string()))
    }

    /// Apply `CSVGATE_ERROR_LOG`, `CSVGATE_LIMIT` and `CSVGATE_LOG`.
    ///
    /// # Errors
    ///
    /// [`CsvError::Config`] if `CSVGATE_LIMIT` is not a positive integer.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup(ENV_ERROR_LOG) {
            self.error_log_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_LIMIT) {
            let limit = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| CsvError::Config {
                    path: PathBuf::from(ENV_LIMIT),
                    message: format!("not a positive integer: {raw:?}"),
                })?;
            self.default_limit = limit;
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = level;
        }
        self.validated()
    }

    fn validated(self) -> Result<Self> {
        ConcurrencyLimit::new(self.default_limit)?;
        Ok(self)
    }

    /// The default limit as a [`ConcurrencyLimit`].
    ///
    /// # Errors
    ///
    /// [`CsvError::InvalidLimit`] if the settings were built by hand with a
    /// zero limit.
    pub fn limit(&self) -> Result<ConcurrencyLimit> {
        ConcurrencyLimit::new(self.default_limit)
    }
}

/// Install the process-wide settings. Only the first call has any effect;
/// returns `false` if settings were already installed.
pub fn init_global(settings: Settings) -> bool {
    let installed = GLOBAL.set(settings).is_ok();
    if !installed {
        tracing::debug!("global settings already initialised, keeping the first");
    }
    installed
}

/// The process-wide settings, falling back to defaults if
/// [`init_global`] was never called.
pub fn global() -> &'static Settings {
    GLOBAL.get_or_init(Settings::default)
}
