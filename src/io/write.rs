//! Concurrent table writer.
//!
//! Encoding runs on the workers in parallel; it is pure and shares nothing.
//! Physical writes all pass through one [`OrderedSink`], which serializes
//! them and restores table order. A record that fails leaves a gap, its
//! error becomes the operation's result if it was the first, and every
//! other record is still written. Output is always flushed before
//! returning.

use crate::codec::RecordEncoder;
use crate::error::{CsvError, Result};
use crate::first_error::FirstError;
use crate::io::sink::OrderedSink;
use crate::metrics::{MetricsCollector, RECORDS_FAILED, RECORDS_WRITTEN};
use crate::pool::BoundedPool;
use crate::record::{ConcurrencyLimit, Record};
use std::fs::{File, OpenOptions, create_dir_all};
use std::io::BufWriter;
use std::path::Path;

pub(crate) fn write_table_in<E: RecordEncoder>(
    table: &[Record],
    path: &Path,
    limit: ConcurrencyLimit,
    metrics: Option<&MetricsCollector>,
    encoder: &E,
) -> Result<()> {
    let span = tracing::debug_span!("write_table", path = %path.display(), limit = limit.get(), records = table.len());
    let _enter = span.enter();

    let file = open_append(path)?;
    let pool = BoundedPool::new(limit)?;
    let sink = OrderedSink::new(BufWriter::new(file));
    let errors = FirstError::new();

    pool.run(|s| {
        for (index, record) in table.iter().enumerate() {
            let permit = pool.gate().acquire();
            let (sink, errors) = (&sink, &errors);
            s.spawn(move |_| {
                let _permit = permit;
                let line = match encoder.encode(index, record) {
                    Ok(line) => {
                        tracing::trace!(record = index + 1, bytes = line.len(), "record encoded");
                        Some(line)
                    }
                    Err(err) => {
                        tracing::warn!(record = index + 1, error = %err, "CSV record encode failed");
                        errors.report(err);
                        None
                    }
                };
                sink.submit(index, line, errors);
            });
        }
    });
    pool.report_peak(metrics);

    settle(path, sink, errors, metrics)
}

/// Open `path` for appending, creating it and its parent directories if
/// needed.
pub(crate) fn open_append(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).map_err(|e| CsvError::file(parent, e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CsvError::file(path, e))
}

/// Flush the sink and turn the outcome into the operation's result: the
/// first record error if there was one, else a flush error, else success.
pub(crate) fn settle(
    path: &Path,
    sink: OrderedSink<BufWriter<File>>,
    errors: FirstError,
    metrics: Option<&MetricsCollector>,
) -> Result<()> {
    let (totals, flushed) = sink.finish();
    if let Some(m) = metrics {
        m.increment_counter(RECORDS_WRITTEN, totals.written as u64);
        m.increment_counter(RECORDS_FAILED, totals.failed as u64);
    }
    tracing::debug!(written = totals.written, failed = totals.failed, "table written");

    let dropped = errors.dropped();
    if let Some(err) = errors.into_inner() {
        if let Err(flush_err) = flushed {
            tracing::warn!(error = %flush_err, "flush also failed after a record error");
        }
        tracing::warn!(error = %err, more = dropped, "table write failed");
        return Err(err);
    }
    flushed.map_err(|source| CsvError::Flush {
        path: path.to_path_buf(),
        source,
    })
}
