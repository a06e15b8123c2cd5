//! Testing utilities for code built on csvgate.
//!
//! - **Mock I/O**: temporary directories and files, raw CSV fixtures on disk
//! - **Doubles**: encoders and processors that fail on demand or measure
//!   how many record operations overlap
//! - **Fixtures**: small ready-made tables
//!
//! # Example
//!
//! ```
//! use csvgate::testing::*;
//! use csvgate::TableIo;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = TempDirPath::new()?;
//! let path = dir.file_path("people.csv");
//! let probe = ConcurrencyProbe::new();
//!
//! let io = TableIo::new(2)?;
//! io.write_with(&people_table(), &path, &probe.encoder())?;
//! assert!(probe.peak() <= 2);
//! assert_eq!(io.read(&path)?, people_table());
//! # Ok(())
//! # }
//! ```

pub mod doubles;
pub mod fixtures;
pub mod mock_io;

pub use doubles::*;
pub use fixtures::*;
pub use mock_io::*;
