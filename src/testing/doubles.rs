//! Test doubles for the record codec and the per-record processor.

use crate::codec::{CsvEncoder, RecordEncoder};
use crate::error::{CsvError, Result};
use crate::record::Record;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Encoder that fails for chosen record indices (0-based) and otherwise
/// behaves like [`CsvEncoder`].
#[derive(Clone, Debug, Default)]
pub struct FailingEncoder {
    fail_at: BTreeSet<usize>,
}

impl FailingEncoder {
    /// Fail the records at these 0-based indices.
    pub fn at(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_at: indices.into_iter().collect(),
        }
    }
}

impl RecordEncoder for FailingEncoder {
    fn encode(&self, index: usize, record: &Record) -> Result<Vec<u8>> {
        if self.fail_at.contains(&index) {
            return Err(CsvError::Encode {
                record: index + 1,
                message: "injected fault".to_string(),
            });
        }
        CsvEncoder.encode(index, record)
    }
}

/// Measures how many operations run at the same time.
///
/// Every probed call holds its slot for `hold` so overlapping calls have a
/// chance to pile up.
#[derive(Debug)]
pub struct ConcurrencyProbe {
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    hold: Duration,
}

impl ConcurrencyProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::with_hold(Duration::from_millis(2))
    }

    #[must_use]
    pub fn with_hold(hold: Duration) -> Self {
        Self {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            hold,
        }
    }

    /// Mark the start of an operation; it ends when the guard drops.
    pub fn enter(&self) -> ProbeGuard<'_> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        ProbeGuard { probe: self }
    }

    /// Highest number of operations seen running at once.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// A [`CsvEncoder`] whose every call is probed.
    #[must_use]
    pub fn encoder(&self) -> ProbedEncoder<'_, CsvEncoder> {
        self.wrap(CsvEncoder)
    }

    /// Probe every call to `inner`.
    pub fn wrap<E: RecordEncoder>(&self, inner: E) -> ProbedEncoder<'_, E> {
        ProbedEncoder { probe: self, inner }
    }

    /// An identity record processor whose every call is probed.
    pub fn processor(&self) -> impl Fn(usize, Record) -> Result<Record> + Sync + '_ {
        move |_, record| {
            let _guard = self.enter();
            thread::sleep(self.hold);
            Ok(record)
        }
    }
}

impl Default for ConcurrencyProbe {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ProbeGuard<'a> {
    probe: &'a ConcurrencyProbe,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.probe.active.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ProbedEncoder<'a, E> {
    probe: &'a ConcurrencyProbe,
    inner: E,
}

impl<E: RecordEncoder> RecordEncoder for ProbedEncoder<'_, E> {
    fn encode(&self, index: usize, record: &Record) -> Result<Vec<u8>> {
        let _guard = self.probe.enter();
        thread::sleep(self.probe.hold);
        self.inner.encode(index, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_encoder_only_fails_chosen_indices() {
        let enc = FailingEncoder::at([1]);
        let rec = vec!["x".to_string()];
        assert!(enc.encode(0, &rec).is_ok());
        assert!(matches!(
            enc.encode(1, &rec),
            Err(CsvError::Encode { record: 2, .. })
        ));
    }

    #[test]
    fn probe_tracks_overlap() {
        let probe = ConcurrencyProbe::new();
        let a = probe.enter();
        let b = probe.enter();
        assert_eq!(probe.active(), 2);
        drop(a);
        drop(b);
        let _c = probe.enter();
        assert_eq!(probe.peak(), 2);
        assert_eq!(probe.calls(), 3);
    }
}
