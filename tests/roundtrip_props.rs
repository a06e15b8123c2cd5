use csvgate::testing::TempDirPath;
use csvgate::{read_table, write_table};
use proptest::prelude::*;

fn table_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    (1usize..5).prop_flat_map(|cols| {
        let field = "[a-zA-Z0-9 ,\"\n\r'é]{0,12}";
        prop::collection::vec(prop::collection::vec(field, cols), 0..30)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn write_then_read_is_identity(table in table_strategy(), limit in 1usize..8) {
        let dir = TempDirPath::new().unwrap();
        let path = dir.file_path("prop.csv");
        write_table(&table, &path, limit).unwrap();
        prop_assert_eq!(read_table(&path, limit).unwrap(), table);
    }
}
