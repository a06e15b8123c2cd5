//! Ready-made tables.

use crate::record::{Record, Table};

fn record(fields: &[&str]) -> Record {
    fields.iter().map(|f| (*f).to_string()).collect()
}

/// `[["Name","Age"],["Alice","30"],["Bob","25"]]`: a header row and two rows.
///
/// ```
/// use csvgate::testing::people_table;
///
/// assert_eq!(people_table().len(), 3);
/// ```
#[must_use]
pub fn people_table() -> Table {
    vec![
        record(&["Name", "Age"]),
        record(&["Alice", "30"]),
        record(&["Bob", "25"]),
    ]
}

/// Fields that need quoting: separators, quotes, line breaks, padding,
/// empty values and non-ASCII text.
#[must_use]
pub fn tricky_table() -> Table {
    vec![
        record(&["id", "note", "extra"]),
        record(&["1", "hello, world", ""]),
        record(&["2", "she said \"hi\"", "  padded  "]),
        record(&["3", "two\nlines", "crlf\r\nend"]),
        record(&["4", "Zoë ✓ 東京", "\"\""]),
    ]
}

/// `rows` records of `cols` fields each, every field unique: `r{row}c{col}`.
#[must_use]
pub fn numbered_table(rows: usize, cols: usize) -> Table {
    (0..rows)
        .map(|r| (0..cols).map(|c| format!("r{r}c{c}")).collect())
        .collect()
}
