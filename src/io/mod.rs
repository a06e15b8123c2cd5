//! Table reads and writes.
//!
//! - [`read_table`] / [`TableIo::read_with`]: concurrent reader, file order kept
//! - [`write_table`] / [`TableIo::write_with`]: concurrent writer, table order kept
//! - [`append_all_sequential`]: unbounded fan-out writer
//!
//! Writers open the destination in append mode, so repeated writes to one
//! path accumulate.

pub mod append;
mod read;
pub(crate) mod sink;
mod write;

pub use append::{append_all_sequential, append_all_sequential_with};

use crate::codec::{CsvEncoder, RecordEncoder};
use crate::config::{self, Settings};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::record::{ConcurrencyLimit, Record, Table};
use std::path::Path;

/// Bounded table I/O with a fixed concurrency limit.
///
/// ```no_run
/// use csvgate::TableIo;
///
/// # fn main() -> csvgate::Result<()> {
/// let io = TableIo::new(4)?;
/// let table = vec![
///     vec!["Name".to_string(), "Age".to_string()],
///     vec!["Alice".to_string(), "30".to_string()],
/// ];
/// io.write(&table, "people.csv")?;
/// let upper = io.read_with("people.csv", |_, rec| {
///     Ok(rec.into_iter().map(|f| f.to_uppercase()).collect())
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TableIo {
    limit: ConcurrencyLimit,
    metrics: Option<MetricsCollector>,
}

impl TableIo {
    /// Table I/O running at most `limit` record operations at once.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidLimit`](crate::CsvError::InvalidLimit) when
    /// `limit` is zero.
    pub fn new(limit: usize) -> Result<Self> {
        Ok(Self::with_limit(ConcurrencyLimit::new(limit)?))
    }

    /// Table I/O using [`Settings::default_limit`].
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidLimit`](crate::CsvError::InvalidLimit) when
    /// the settings were built by hand with a zero limit.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::with_limit(settings.limit()?))
    }

    /// Table I/O using the process-wide settings.
    ///
    /// # Errors
    ///
    /// See [`TableIo::from_settings`].
    pub fn global() -> Result<Self> {
        Self::from_settings(config::global())
    }

    /// Table I/O with an already validated limit.
    #[must_use]
    pub fn with_limit(limit: ConcurrencyLimit) -> Self {
        Self {
            limit,
            metrics: None,
        }
    }

    /// Record counters and timing into `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The concurrency limit in force.
    #[must_use]
    pub fn limit(&self) -> ConcurrencyLimit {
        self.limit
    }

    /// Read `path` into a table in file order.
    ///
    /// # Errors
    ///
    /// [`CsvError::File`](crate::CsvError::File) if the file cannot be opened,
    /// [`CsvError::Decode`](crate::CsvError::Decode) on a malformed record.
    /// No partial table is ever returned.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Table> {
        self.read_with(path, |_, record| Ok(record))
    }

    /// Read `path`, running `process` on each decoded record concurrently.
    ///
    /// `process` receives the 0-based record index. The first error it
    /// returns stops further dispatch and becomes the result.
    ///
    /// # Errors
    ///
    /// See [`TableIo::read`]; processor errors are returned as-is.
    pub fn read_with<F>(&self, path: impl AsRef<Path>, process: F) -> Result<Table>
    where
        F: Fn(usize, Record) -> Result<Record> + Sync,
    {
        self.timed(|metrics| read::read_table_in(path.as_ref(), self.limit, metrics, process))
    }

    /// Append `table` to `path` in table order.
    ///
    /// # Errors
    ///
    /// [`CsvError::File`](crate::CsvError::File) if the file cannot be opened,
    /// otherwise the first record error, otherwise a flush error.
    pub fn write(&self, table: &[Record], path: impl AsRef<Path>) -> Result<()> {
        self.write_with(table, path, &CsvEncoder)
    }

    /// [`TableIo::write`] with a custom encoder.
    ///
    /// # Errors
    ///
    /// See [`TableIo::write`].
    pub fn write_with<E: RecordEncoder>(
        &self,
        table: &[Record],
        path: impl AsRef<Path>,
        encoder: &E,
    ) -> Result<()> {
        self.timed(|metrics| write::write_table_in(table, path.as_ref(), self.limit, metrics, encoder))
    }

    fn timed<R>(&self, op: impl FnOnce(Option<&MetricsCollector>) -> R) -> R {
        let metrics = self.metrics.as_ref();
        if let Some(m) = metrics {
            m.record_start();
        }
        let out = op(metrics);
        if let Some(m) = metrics {
            m.record_end();
        }
        out
    }
}

/// Read a whole CSV file into a table using at most `limit` concurrent
/// record operations.
///
/// # Errors
///
/// See [`TableIo::new`] and [`TableIo::read`].
pub fn read_table(path: impl AsRef<Path>, limit: usize) -> Result<Table> {
    TableIo::new(limit)?.read(path)
}

/// Append `table` to the CSV file at `path` using at most `limit` concurrent
/// record operations.
///
/// # Errors
///
/// See [`TableIo::new`] and [`TableIo::write`].
pub fn write_table(table: &[Record], path: impl AsRef<Path>, limit: usize) -> Result<()> {
    TableIo::new(limit)?.write(table, path)
}
