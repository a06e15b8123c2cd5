//! Append-only CSV log of errors.
//!
//! Each entry is one row: `[RFC 3339 timestamp, error message, fields...]`,
//! written through [`write_table`](crate::write_table) with a limit of 1.
//! The destination comes from [`Settings`](crate::config::Settings) or is
//! passed explicitly.

use crate::config::{self, Settings};
use crate::error::Result;
use crate::io::TableIo;
use crate::record::{ConcurrencyLimit, Record};
use chrono::{SecondsFormat, Utc};
use std::fmt::Display;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    /// Log to the CSV file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log to [`Settings::error_log_path`].
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.error_log_path)
    }

    /// Log to the path from the process-wide settings.
    #[must_use]
    pub fn global() -> Self {
        Self::from_settings(config::global())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row describing `err`.
    ///
    /// # Errors
    ///
    /// Any error from writing the row.
    pub fn record<E: Display + ?Sized>(&self, err: &E, fields: &[&str]) -> Result<()> {
        let row = entry(err, fields);
        TableIo::with_limit(ConcurrencyLimit::SEQUENTIAL).write(&[row], &self.path)
    }

    /// Like [`ErrorLog::record`], but a failure to write is only reported
    /// through `tracing` and otherwise ignored.
    pub fn handle<E: Display + ?Sized>(&self, err: &E, fields: &[&str]) {
        if let Err(write_err) = self.record(err, fields) {
            tracing::warn!(
                path = %self.path.display(),
                error = %write_err,
                logged = %err,
                "failed to write error to CSV log"
            );
        }
    }
}

fn entry<E: Display + ?Sized>(err: &E, fields: &[&str]) -> Record {
    let mut row = Vec::with_capacity(fields.len() + 2);
    row.push(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    row.push(err.to_string());
    row.extend(fields.iter().map(|f| (*f).to_string()));
    row
}
