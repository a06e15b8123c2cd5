//! Unbounded append writer.
//!
//! Every record becomes its own task on the global rayon pool with no gate
//! in front of it. Writes still go through the ordered sink, so the file
//! receives records in table order.
//!
//! Failure policy: a record that fails to encode or write is logged at
//! `error` level and its error is returned to the caller once all tasks
//! have finished and the output is flushed. The process is never aborted.
//! This differs from [`write_table`](crate::write_table) only in having no
//! concurrency bound and in the log level used for record failures.

use crate::codec::{CsvEncoder, RecordEncoder};
use crate::error::Result;
use crate::first_error::FirstError;
use crate::io::sink::OrderedSink;
use crate::io::write::{open_append, settle};
use crate::metrics::MetricsCollector;
use crate::record::Record;
use std::io::BufWriter;
use std::path::Path;

/// Append every record of `table` to `path` using unbounded fan-out.
///
/// # Errors
///
/// Returns [`CsvError::File`](crate::CsvError::File) if the file cannot be
/// opened, otherwise the first record or flush error.
pub fn append_all_sequential(table: &[Record], path: impl AsRef<Path>) -> Result<()> {
    append_all_sequential_with(table, path, &CsvEncoder, None)
}

/// [`append_all_sequential`] with a custom encoder and optional metrics.
///
/// # Errors
///
/// See [`append_all_sequential`].
pub fn append_all_sequential_with<E: RecordEncoder>(
    table: &[Record],
    path: impl AsRef<Path>,
    encoder: &E,
    metrics: Option<&MetricsCollector>,
) -> Result<()> {
    let path = path.as_ref();
    let span = tracing::debug_span!("append_all_sequential", path = %path.display(), records = table.len());
    let _enter = span.enter();

    let file = open_append(path)?;
    let sink = OrderedSink::new(BufWriter::new(file));
    let errors = FirstError::new();

    rayon::scope(|s| {
        for (index, record) in table.iter().enumerate() {
            let (sink, errors) = (&sink, &errors);
            s.spawn(move |_| {
                let line = match encoder.encode(index, record) {
                    Ok(line) => Some(line),
                    Err(err) => {
                        tracing::error!(record = index + 1, error = %err, "unbounded append: record failed");
                        errors.report(err);
                        None
                    }
                };
                sink.submit(index, line, errors);
            });
        }
    });

    settle(path, sink, errors, metrics)
}
