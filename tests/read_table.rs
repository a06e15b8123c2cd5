use csvgate::testing::*;
use csvgate::{CsvError, TableIo, read_table};
use std::fs;

#[test]
fn missing_file_is_a_file_error_and_no_table() {
    let dir = TempDirPath::new().unwrap();
    let res = read_table(dir.file_path("missing.csv"), 2);
    match res {
        Err(CsvError::File { path, .. }) => assert!(path.ends_with("missing.csv")),
        other => panic!("expected a file error, got {other:?}"),
    }
}

#[test]
fn header_line_is_an_ordinary_record() -> anyhow::Result<()> {
    let file = mock_csv_file("Name,Age\nAlice,30\nBob,25\n")?;
    let table = read_table(file.path(), 3)?;
    assert_eq!(table, people_table());
    Ok(())
}

#[test]
fn empty_file_gives_empty_table() -> anyhow::Result<()> {
    let file = mock_csv_file("")?;
    assert!(read_table(file.path(), 4)?.is_empty());
    Ok(())
}

#[test]
fn ragged_row_is_a_decode_error_with_record_number() -> anyhow::Result<()> {
    let file = mock_csv_file("a,b\nc,d\ne\nf,g\n")?;
    let err = read_table(file.path(), 2).unwrap_err();
    assert!(matches!(err, CsvError::Decode { record: 3, .. }), "{err:?}");
    assert!(err.to_string().contains("parse CSV record #3"));
    Ok(())
}

#[test]
fn zero_limit_is_rejected_before_touching_the_file() {
    let dir = TempDirPath::new().unwrap();
    let res = read_table(dir.file_path("missing.csv"), 0);
    assert!(matches!(res, Err(CsvError::InvalidLimit { value: 0 })));
}

#[test]
fn large_file_keeps_source_order() -> anyhow::Result<()> {
    let expected = numbered_table(2_000, 3);
    let text: String = expected.iter().map(|r| r.join(",") + "\n").collect();
    let file = mock_csv_file(&text)?;

    for limit in [1, 2, 5, 10] {
        assert_eq!(read_table(file.path(), limit)?, expected, "limit {limit}");
    }
    Ok(())
}

#[test]
fn processor_output_lands_in_source_slot() -> anyhow::Result<()> {
    let file = mock_csv_file("a\nb\nc\nd\ne\nf\n")?;
    let io = TableIo::new(3)?;
    let table = io.read_with(file.path(), |i, mut rec| {
        // Later records finish first.
        std::thread::sleep(std::time::Duration::from_millis((6 - i as u64) * 3));
        rec.push(i.to_string());
        Ok(rec)
    })?;
    let tagged: Vec<_> = table.iter().map(|r| r.join(":")).collect();
    assert_eq!(tagged, ["a:0", "b:1", "c:2", "d:3", "e:4", "f:5"]);
    Ok(())
}

#[test]
fn processor_failure_discards_the_table() -> anyhow::Result<()> {
    let file = mock_csv_file("1\n2\n3\n4\n")?;
    let io = TableIo::new(2)?;
    let res = io.read_with(file.path(), |i, rec| {
        if i == 2 {
            Err(CsvError::Process {
                record: i + 1,
                message: "rejected".into(),
            })
        } else {
            Ok(rec)
        }
    });
    assert!(matches!(res, Err(CsvError::Process { record: 3, .. })));
    Ok(())
}

#[test]
fn directory_path_is_not_a_table() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    fs::create_dir(dir.file_path("sub"))?;
    assert!(read_table(dir.file_path("sub"), 1).is_err());
    Ok(())
}
