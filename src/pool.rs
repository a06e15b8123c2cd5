//! Worker pool that runs gated record operations.
//!
//! Each operation builds a private rayon pool and drives it with
//! `in_place_scope`: the producer loop stays on the calling thread, where it
//! may block on the [`Gate`], while admitted record operations run on the
//! pool's threads. The scope returns only after every spawned operation has
//! finished.

use crate::error::Result;
use crate::gate::Gate;
use crate::metrics::{MetricsCollector, PEAK_IN_FLIGHT};
use crate::record::ConcurrencyLimit;
use rayon::{Scope, ThreadPool, ThreadPoolBuilder};

/// Upper bound on worker threads regardless of the limit.
fn max_threads() -> usize {
    2 * num_cpus::get().max(1)
}

/// Gate plus thread pool sized for one bounded operation.
pub(crate) struct BoundedPool {
    gate: Gate,
    pool: ThreadPool,
}

impl BoundedPool {
    pub(crate) fn new(limit: ConcurrencyLimit) -> Result<Self> {
        let threads = limit.get().min(max_threads());
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("csvgate-worker-{i}"))
            .build()?;
        Ok(Self {
            gate: Gate::new(limit),
            pool,
        })
    }

    pub(crate) fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Run `producer` on the calling thread with a scope bound to this
    /// pool's workers. Returns once all spawned work has completed.
    pub(crate) fn run<'scope, R>(&'scope self, producer: impl FnOnce(&Scope<'scope>) -> R) -> R {
        self.pool.in_place_scope(producer)
    }

    pub(crate) fn report_peak(&self, metrics: Option<&MetricsCollector>) {
        if let Some(m) = metrics {
            m.gauge_max(PEAK_IN_FLIGHT, self.gate.peak() as f64);
        }
    }
}
