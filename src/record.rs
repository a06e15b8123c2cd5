//! Records, tables and the concurrency limit.

use crate::error::{CsvError, Result};
use std::fmt;
use std::num::NonZeroUsize;

/// One decoded row: an ordered sequence of field strings.
pub type Record = Vec<String>;

/// An ordered sequence of records, usually a whole file.
pub type Table = Vec<Record>;

/// Maximum number of record operations allowed in flight at once.
///
/// Always at least 1. Build one with [`ConcurrencyLimit::new`] or `TryFrom`
/// for `usize` and `i64`; zero and negative values are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConcurrencyLimit(NonZeroUsize);

impl ConcurrencyLimit {
    /// A limit of one: strictly sequential record processing.
    pub const SEQUENTIAL: Self = Self(NonZeroUsize::MIN);

    /// Validate a limit of at least one.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidLimit`] when `value` is zero.
    pub fn new(value: usize) -> Result<Self> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(CsvError::InvalidLimit { value: 0 })
    }

    /// The limit as a plain count.
    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for ConcurrencyLimit {
    type Error = CsvError;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<i64> for ConcurrencyLimit {
    type Error = CsvError;

    fn try_from(value: i64) -> Result<Self> {
        let as_usize = usize::try_from(value).map_err(|_| CsvError::InvalidLimit { value })?;
        NonZeroUsize::new(as_usize)
            .map(Self)
            .ok_or(CsvError::InvalidLimit { value })
    }
}

impl fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
