//! Single-winner error slot shared by concurrent record operations.

use crate::error::CsvError;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps the first error reported and drops the rest.
///
/// Later errors are counted so callers can log how many were discarded.
#[derive(Debug, Default)]
pub struct FirstError {
    slot: OnceLock<CsvError>,
    dropped: AtomicUsize,
}

impl FirstError {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an error. Returns `true` if this one was kept.
    pub fn report(&self, err: CsvError) -> bool {
        match self.slot.set(err) {
            Ok(()) => true,
            Err(late) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(error = %late, "dropping error reported after the first");
                false
            }
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Number of errors discarded because one was already kept.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn into_inner(self) -> Option<CsvError> {
        self.slot.into_inner()
    }
}
