//! Bounded worker gate: a counting semaphore that admits at most `limit`
//! record operations at a time.
//!
//! The gate only bounds concurrency. It gives no mutual exclusion; shared
//! state touched by admitted operations still needs its own lock.
//!
//! ```
//! use csvgate::gate::Gate;
//! use csvgate::ConcurrencyLimit;
//!
//! let gate = Gate::new(ConcurrencyLimit::new(2).unwrap());
//! let a = gate.acquire();
//! let _b = gate.acquire();
//! assert!(gate.try_acquire().is_none());
//! drop(a);
//! assert!(gate.try_acquire().is_some());
//! ```

use crate::record::ConcurrencyLimit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

pub struct Gate {
    limit: usize,
    in_flight: Mutex<usize>,
    freed: Condvar,
    peak: AtomicUsize,
}

impl Gate {
    /// A gate admitting at most `limit` holders at once.
    #[must_use]
    pub fn new(limit: ConcurrencyLimit) -> Self {
        Self {
            limit: limit.get(),
            in_flight: Mutex::new(0),
            freed: Condvar::new(),
            peak: AtomicUsize::new(0),
        }
    }

    /// Block until a slot is free, then take it.
    ///
    /// The slot is returned when the permit is dropped.
    pub fn acquire(&self) -> GatePermit<'_> {
        let mut held = self.lock();
        while *held >= self.limit {
            held = self
                .freed
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.admit(&mut held)
    }

    /// Take a slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<GatePermit<'_>> {
        let mut held = self.lock();
        (*held < self.limit).then(|| self.admit(&mut held))
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of permits currently outstanding.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        *self.lock()
    }

    /// Highest number of permits ever outstanding at once.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    fn admit(&self, held: &mut MutexGuard<'_, usize>) -> GatePermit<'_> {
        **held += 1;
        self.peak.fetch_max(**held, Ordering::Relaxed);
        GatePermit { gate: self }
    }

    fn release(&self) {
        let mut held = self.lock();
        *held -= 1;
        drop(held);
        self.freed.notify_one();
    }

    // Counter updates cannot leave the count inconsistent, so a poisoned
    // lock is still usable.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A slot in a [`Gate`]. Dropping it frees the slot and wakes one waiter,
/// including when the holder unwinds from a panic.
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct GatePermit<'a> {
    gate: &'a Gate,
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
