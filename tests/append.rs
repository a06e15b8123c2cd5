use csvgate::testing::*;
use csvgate::{CsvError, append_all_sequential, append_all_sequential_with, read_table, write_table};

#[test]
fn appends_in_table_order_without_a_limit() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("append.csv");
    let table = numbered_table(500, 3);

    append_all_sequential(&table, &path)?;
    assert_eq!(read_table(&path, 8)?, table);
    Ok(())
}

#[test]
fn mixes_with_bounded_writes_on_the_same_path() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("mixed.csv");

    write_table(&people_table(), &path, 2)?;
    append_all_sequential(&people_table()[1..], &path)?;

    let lines = read_lines(&path);
    assert_eq!(lines, ["Name,Age", "Alice,30", "Bob,25", "Alice,30", "Bob,25"]);
    Ok(())
}

#[test]
fn record_failure_is_returned_not_fatal() -> anyhow::Result<()> {
    csvgate::logging::init_for_tests();
    let dir = TempDirPath::new()?;
    let path = dir.file_path("fail.csv");
    let table = numbered_table(8, 1);

    let res = append_all_sequential_with(&table, &path, &FailingEncoder::at([0]), None);
    assert!(matches!(res, Err(CsvError::Encode { record: 1, .. })), "{res:?}");
    assert_eq!(read_lines(&path).len(), 7);
    Ok(())
}
