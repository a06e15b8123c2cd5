//! Concurrent table reader.
//!
//! Decoding is sequential on the calling thread because the stream cursor
//! cannot be shared. What runs concurrently is the per-record work: the
//! processor call and the store into the table.
//!
//! The table is an arena of slots keyed by source position. The producer
//! reserves slot `i` before dispatching record `i`, and the worker fills
//! exactly that slot under the arena lock, so the returned table is in file
//! order no matter which worker finishes first.

use crate::codec::open_decoder;
use crate::error::{CsvError, Result};
use crate::first_error::FirstError;
use crate::metrics::{MetricsCollector, RECORDS_FAILED, RECORDS_READ};
use crate::pool::BoundedPool;
use crate::record::{ConcurrencyLimit, Record, Table};
use csv::StringRecord;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

type Slots = Mutex<Vec<Option<Record>>>;

pub(crate) fn read_table_in<F>(
    path: &Path,
    limit: ConcurrencyLimit,
    metrics: Option<&MetricsCollector>,
    process: F,
) -> Result<Table>
where
    F: Fn(usize, Record) -> Result<Record> + Sync,
{
    let span = tracing::debug_span!("read_table", path = %path.display(), limit = limit.get());
    let _enter = span.enter();

    // The file must open before any worker exists.
    let mut rdr = open_decoder(path)?;
    let pool = BoundedPool::new(limit)?;

    let slots: Slots = Mutex::new(Vec::new());
    let errors = FirstError::new();
    let process = &process;

    let produced = pool.run(|s| {
        let mut raw = StringRecord::new();
        let mut index = 0usize;
        while !errors.is_set() {
            match rdr.read_record(&mut raw) {
                Ok(true) => {}
                Ok(false) => break,
                Err(source) => {
                    return Err(CsvError::Decode {
                        path: path.to_path_buf(),
                        record: index + 1,
                        source,
                    });
                }
            }
            let record: Record = raw.iter().map(str::to_owned).collect();
            tracing::trace!(record = index + 1, fields = record.len(), "record decoded");
            slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(None);

            let permit = pool.gate().acquire();
            let (slots, errors) = (&slots, &errors);
            s.spawn(move |_| {
                let _permit = permit;
                match process(index, record) {
                    Ok(done) => {
                        slots.lock().unwrap_or_else(PoisonError::into_inner)[index] = Some(done);
                    }
                    Err(err) => {
                        tracing::debug!(record = index + 1, error = %err, "record processor failed");
                        if let Some(m) = metrics {
                            m.increment_counter(RECORDS_FAILED, 1);
                        }
                        errors.report(err);
                    }
                }
            });
            index += 1;
        }
        Ok(index)
    });
    pool.report_peak(metrics);

    // A decode error aborted production; it wins over anything a worker saw.
    let produced = produced.inspect_err(|err| {
        tracing::warn!(error = %err, "aborting table read");
    })?;
    if let Some(err) = errors.into_inner() {
        tracing::warn!(error = %err, "discarding partially read table");
        return Err(err);
    }

    let table: Table = slots
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .flatten()
        .collect();
    debug_assert_eq!(table.len(), produced);

    if let Some(m) = metrics {
        m.increment_counter(RECORDS_READ, table.len() as u64);
    }
    tracing::debug!(records = table.len(), peak = pool.gate().peak(), "table read");
    Ok(table)
}
