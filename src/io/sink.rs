//! Ordered sink: the one critical section through which encoded lines
//! reach the destination.
//!
//! Workers finish encoding in any order. Each hands its line (or a gap
//! marker for a record that failed) to [`OrderedSink::submit`] under its
//! table index; the sink writes every contiguous run starting at the next
//! expected index and parks the rest until their predecessors arrive.

use crate::error::CsvError;
use crate::first_error::FirstError;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub(crate) struct OrderedSink<W: Write> {
    state: Mutex<SinkState<W>>,
}

struct SinkState<W> {
    out: W,
    next: usize,
    parked: BTreeMap<usize, Option<Vec<u8>>>,
    written: usize,
    failed: usize,
}

/// Counts after the sink has been drained and flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SinkTotals {
    pub written: usize,
    pub failed: usize,
}

impl<W: Write> OrderedSink<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            state: Mutex::new(SinkState {
                out,
                next: 0,
                parked: BTreeMap::new(),
                written: 0,
                failed: 0,
            }),
        }
    }

    /// Hand over the outcome for record `index`. `None` marks a record that
    /// produced no line; it is skipped once its turn comes.
    ///
    /// Write failures go to `errors`; later lines are still attempted.
    pub(crate) fn submit(&self, index: usize, line: Option<Vec<u8>>, errors: &FirstError) {
        let mut guard = self.lock();
        let st = &mut *guard;
        st.parked.insert(index, line);
        while let Some(entry) = st.parked.remove(&st.next) {
            let at = st.next;
            st.next += 1;
            match entry {
                Some(bytes) => match st.out.write_all(&bytes) {
                    Ok(()) => {
                        st.written += 1;
                        tracing::trace!(record = at + 1, "record written");
                    }
                    Err(source) => {
                        st.failed += 1;
                        tracing::warn!(record = at + 1, error = %source, "CSV record write failed");
                        errors.report(CsvError::Write {
                            record: at + 1,
                            source,
                        });
                    }
                },
                None => st.failed += 1,
            }
        }
    }

    /// Flush everything written so far. Runs on every exit path of a writer.
    ///
    /// Lines still parked behind a missing index are dropped; that only
    /// happens if a producer stopped before submitting every index.
    pub(crate) fn finish(self) -> (SinkTotals, io::Result<()>) {
        let mut st = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        if !st.parked.is_empty() {
            tracing::warn!(
                parked = st.parked.len(),
                next = st.next,
                "discarding lines parked behind a record that never arrived"
            );
        }
        let flushed = st.out.flush();
        (
            SinkTotals {
                written: st.written,
                failed: st.failed,
            },
            flushed,
        )
    }

    fn lock(&self) -> MutexGuard<'_, SinkState<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
