//! Record codec: the boundary between raw CSV text and [`Record`]s.
//!
//! Decoding is a `csv::Reader` with header handling turned off, so a header
//! line is returned as an ordinary record. Encoding goes through
//! [`RecordEncoder`], which the writers call once per record from worker
//! threads. Encoders must be pure: they only produce bytes and never touch
//! the destination file.

use crate::error::{CsvError, Result};
use crate::record::Record;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Turns one record into one complete, newline-terminated line of output.
pub trait RecordEncoder: Sync {
    /// `index` is the 0-based position of the record in its table.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Encode`] when the record cannot be represented.
    fn encode(&self, index: usize, record: &Record) -> Result<Vec<u8>>;
}

impl<E: RecordEncoder + ?Sized> RecordEncoder for &E {
    fn encode(&self, index: usize, record: &Record) -> Result<Vec<u8>> {
        (**self).encode(index, record)
    }
}

/// RFC 4180 encoder backed by `csv::Writer`: comma separated, quoting only
/// where needed, `\n` line endings.
///
/// A record with no fields is rejected: `csv` would write it as `""`, which
/// reads back as one empty field.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvEncoder;

impl RecordEncoder for CsvEncoder {
    fn encode(&self, index: usize, record: &Record) -> Result<Vec<u8>> {
        let encode_err = |message: String| CsvError::Encode {
            record: index + 1,
            message,
        };
        if record.is_empty() {
            return Err(encode_err("record has no fields".to_string()));
        }
        // Heuristic: field bytes plus a separator/quote allowance per field.
        let hint = record.iter().map(|f| f.len() + 3).sum::<usize>() + 1;
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(Vec::with_capacity(hint));
        wtr.write_record(record)
            .map_err(|e| encode_err(e.to_string()))?;
        wtr.into_inner()
            .map_err(|e| encode_err(e.error().to_string()))
    }
}

/// Open `path` for record-by-record decoding.
///
/// # Errors
///
/// Returns [`CsvError::File`] if the file cannot be opened.
pub fn open_decoder(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let f = File::open(path).map_err(|e| CsvError::file(path, e))?;
    Ok(ReaderBuilder::new()
        .has_headers(false)
        .from_reader(BufReader::new(f)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(fields: &[&str]) -> Record {
        fields.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn encodes_plain_fields_as_one_line() {
        let line = CsvEncoder.encode(0, &rec(&["Alice", "30"])).unwrap();
        assert_eq!(line, b"Alice,30\n");
    }

    #[test]
    fn quotes_only_when_needed() {
        let line = CsvEncoder
            .encode(0, &rec(&["a,b", "say \"hi\"", "plain"]))
            .unwrap();
        assert_eq!(
            String::from_utf8(line).unwrap(),
            "\"a,b\",\"say \"\"hi\"\"\",plain\n"
        );
    }

    #[test]
    fn zero_field_record_is_an_encode_error() {
        let err = CsvEncoder.encode(4, &Vec::new()).unwrap_err();
        assert!(matches!(err, CsvError::Encode { record: 5, .. }));
    }

    #[test]
    fn single_empty_field_is_quoted() {
        let line = CsvEncoder.encode(0, &rec(&[""])).unwrap();
        assert_eq!(line, b"\"\"\n");
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = open_decoder(&tmp.path().join("nope.csv")).unwrap_err();
        assert!(err.is_file_error());
    }
}
