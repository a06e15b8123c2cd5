use csvgate::testing::*;
use csvgate::{CsvError, TableIo, read_table, write_table};
use std::fs;

#[test]
fn people_scenario_write_two_read_five() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("people.csv");

    write_table(&people_table(), &path, 2)?;
    assert_eq!(fs::read_to_string(&path)?, "Name,Age\nAlice,30\nBob,25\n");

    let back = read_table(&path, 5)?;
    assert_eq!(back.len(), 3);
    assert_eq!(back, people_table());
    Ok(())
}

#[test]
fn round_trip_for_every_limit_and_size() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    for limit in [1, 2, 5, 10] {
        for rows in [0, 1, 250] {
            let path = dir.file_path(&format!("t_{limit}_{rows}.csv"));
            let table = numbered_table(rows, 4);
            write_table(&table, &path, limit)?;
            assert_eq!(read_table(&path, limit)?, table, "limit {limit}, rows {rows}");
        }
    }
    Ok(())
}

#[test]
fn quoting_survives_round_trip() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("tricky.csv");
    write_table(&tricky_table(), &path, 3)?;
    assert_eq!(read_table(&path, 3)?, tricky_table());
    Ok(())
}

#[test]
fn second_write_appends_in_call_order() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("twice.csv");
    let first = numbered_table(20, 2);
    let second = vec![vec!["x".to_string(), "y".to_string()]];

    write_table(&first, &path, 4)?;
    write_table(&second, &path, 4)?;

    let mut expected = first.clone();
    expected.extend(second);
    assert_eq!(read_table(&path, 4)?, expected);
    Ok(())
}

#[test]
fn empty_table_creates_empty_file() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("nested").join("empty.csv");
    write_table(&[], &path, 2)?;
    assert!(path.exists());
    assert_eq!(fs::read_to_string(&path)?, "");
    Ok(())
}

#[test]
fn failed_record_is_reported_not_silently_skipped() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("partial.csv");
    let table = numbered_table(10, 2);

    let io = TableIo::new(3)?;
    let res = io.write_with(&table, &path, &FailingEncoder::at([4]));
    assert!(matches!(res, Err(CsvError::Encode { record: 5, .. })), "{res:?}");

    // Every other record is still written, in order.
    let mut expected = table;
    expected.remove(4);
    assert_eq!(read_table(&path, 3)?, expected);
    Ok(())
}

#[test]
fn first_of_several_failures_is_returned_once() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("many.csv");
    let table = numbered_table(6, 1);

    let res = TableIo::new(1)?.write_with(&table, &path, &FailingEncoder::at([1, 3, 5]));
    // A limit of 1 runs records strictly one after another.
    assert!(matches!(res, Err(CsvError::Encode { record: 2, .. })));
    assert_eq!(read_lines(&path), vec!["r0c0", "r2c0", "r4c0"]);
    Ok(())
}

#[test]
fn single_empty_field_survives_round_trip() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("blank.csv");
    let table = vec![vec!["a".to_string()], vec![String::new()], vec!["b".to_string()]];

    write_table(&table, &path, 3)?;
    assert_eq!(fs::read_to_string(&path)?, "a\n\"\"\nb\n");
    assert_eq!(read_table(&path, 3)?, table);
    Ok(())
}

#[test]
fn zero_field_record_is_rejected_not_rewritten() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("empty_row.csv");

    let empty: Vec<Vec<String>> = vec![vec![]];
    let res = write_table(&empty, &path, 2);
    assert!(matches!(res, Err(CsvError::Encode { record: 1, .. })), "{res:?}");
    assert_eq!(fs::read_to_string(&path)?, "");

    let table = vec![vec!["a".to_string()], vec![], vec!["b".to_string()]];
    let res = write_table(&table, &path, 2);
    assert!(matches!(res, Err(CsvError::Encode { record: 2, .. })), "{res:?}");
    assert_eq!(read_lines(&path), vec!["a", "b"]);
    Ok(())
}

#[test]
fn unopenable_destination_is_a_file_error() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    // A directory cannot be opened for appending.
    let res = write_table(&people_table(), dir.path(), 2);
    assert!(matches!(res, Err(CsvError::File { .. })), "{res:?}");
    Ok(())
}

#[test]
fn zero_limit_is_rejected() {
    let dir = TempDirPath::new().unwrap();
    let path = dir.file_path("never.csv");
    assert!(matches!(
        write_table(&people_table(), &path, 0),
        Err(CsvError::InvalidLimit { .. })
    ));
    assert!(!path.exists());
}
