//! `tracing` subscriber setup.
//!
//! The library only emits events; binaries and tests decide where they go.
//! [`init`] installs a `tracing-subscriber` fmt layer filtered by
//! `RUST_LOG` when set, otherwise by the configured level.
//!
//! Levels used by this crate:
//!
//! - `error`: a record failed in the unbounded append writer
//! - `warn`: a record failed in a bounded operation, a table was discarded
//! - `info`: metric reports
//! - `debug`: one span and summary per table operation
//! - `trace`: one event per record decoded, encoded or written

use crate::config::Settings;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
    pub with_target: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
            with_target: true,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            filter: settings.log_level.clone(),
            ..Self::default()
        }
    }
}

/// Install a global subscriber. Returns `false` if one was already set,
/// which lets tests call this repeatedly.
pub fn init(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(config.with_target)
                    .with_ansi(config.with_ansi),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(config.with_target)
                    .with_ansi(config.with_ansi),
            )
            .try_init(),
    };
    installed.is_ok()
}

/// Subscriber for tests: writes through the test harness's captured output.
pub fn init_for_tests() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init()
        .is_ok()
}
