//! # csvgate
//!
//! Bounded-concurrency CSV table I/O. A whole file is read into an in-memory
//! [`Table`], or a table is appended to a file, with the per-record work
//! spread over a pool of worker threads. A counting [`Gate`](gate::Gate)
//! caps how many record operations are in flight at once.
//!
//! ## Guarantees
//!
//! - **Order**: a table read back is in file order, and a written file is in
//!   table order, whatever order the workers finish in.
//! - **Backpressure**: the producer blocks once `limit` operations are in
//!   flight.
//! - **Exclusion**: the table under construction and the destination file
//!   each sit behind their own lock. The gate bounds concurrency; it does
//!   not provide exclusion.
//! - **First error wins**: record failures are collected in a
//!   [`FirstError`](first_error::FirstError); the first becomes the result.
//!   Nothing is retried.
//!
//! ## Quick start
//!
//! ```no_run
//! use csvgate::{read_table, write_table};
//!
//! # fn main() -> csvgate::Result<()> {
//! let table = vec![
//!     vec!["Name".to_string(), "Age".to_string()],
//!     vec!["Alice".to_string(), "30".to_string()],
//!     vec!["Bob".to_string(), "25".to_string()],
//! ];
//! write_table(&table, "people.csv", 2)?;
//! assert_eq!(read_table("people.csv", 5)?, table);
//! # Ok(())
//! # }
//! ```
//!
//! ## Entry points
//!
//! | Operation | Concurrency | On a record failure |
//! |-----------|-------------|---------------------|
//! | [`read_table`] | gated by `limit` | whole read fails, table discarded |
//! | [`write_table`] | gated by `limit` | other records still written, first error returned |
//! | [`append_all_sequential`] | unbounded | other records still written, first error returned and logged at `error` |
//!
//! Writers open files in append mode: writing twice to one path yields both
//! tables, in call order.
//!
//! ## Module overview
//!
//! - [`io`]: the read and write operations and [`TableIo`]
//! - [`gate`]: the bounded worker gate
//! - [`codec`]: record encoding and decoding
//! - [`error_log`]: CSV error log built on [`write_table`]
//! - [`config`]: process-wide settings
//! - [`metrics`]: counters and gauges for table operations
//! - [`logging`]: `tracing` subscriber setup
//! - [`testing`]: temp files, fault-injecting and probing doubles, fixtures

pub mod codec;
pub mod config;
pub mod error;
pub mod error_log;
pub mod first_error;
pub mod gate;
pub mod io;
pub mod logging;
pub mod metrics;
mod pool;
pub mod record;
pub mod testing;

pub use codec::{CsvEncoder, RecordEncoder};
pub use error::{CsvError, Result};
pub use error_log::ErrorLog;
pub use io::{TableIo, append_all_sequential, append_all_sequential_with, read_table, write_table};
pub use record::{ConcurrencyLimit, Record, Table};
