use csvgate::metrics::{
    CounterMetric, GaugeMetric, MetricsCollector, RECORDS_FAILED, RECORDS_READ, RECORDS_WRITTEN,
};
use csvgate::testing::*;
use csvgate::{TableIo, append_all_sequential_with};
use serde_json::json;

#[test]
fn counters_follow_table_operations() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let path = dir.file_path("m.csv");
    let metrics = MetricsCollector::new();
    let io = TableIo::new(2)?.with_metrics(metrics.clone());

    let table = numbered_table(12, 2);
    assert!(io.write_with(&table, &path, &FailingEncoder::at([0, 7])).is_err());
    assert_eq!(metrics.counter(RECORDS_WRITTEN), 10);
    assert_eq!(metrics.counter(RECORDS_FAILED), 2);

    let back = io.read(&path)?;
    assert_eq!(back.len(), 10);
    assert_eq!(metrics.counter(RECORDS_READ), 10);
    assert!(metrics.elapsed().is_some());
    Ok(())
}

#[test]
fn append_reports_into_the_same_collector() -> anyhow::Result<()> {
    let dir = TempDirPath::new()?;
    let metrics = MetricsCollector::new();
    append_all_sequential_with(&people_table(), dir.file_path("a.csv"), &csvgate::CsvEncoder, Some(&metrics))?;
    assert_eq!(metrics.counter(RECORDS_WRITTEN), 3);
    Ok(())
}

#[test]
fn custom_metrics_and_json_export() -> anyhow::Result<()> {
    let metrics = MetricsCollector::new();
    metrics.register(Box::new(CounterMetric::with_value("jobs", 2)));
    metrics.register(Box::new(GaugeMetric::new("ratio", 0.5).with_description("hit ratio")));
    metrics.increment_counter("jobs", 3);
    metrics.gauge_max("ratio", 0.25);

    let snap = metrics.snapshot();
    assert_eq!(snap["jobs"], json!(5));
    assert_eq!(snap["ratio"], json!(0.5));

    let dir = TempDirPath::new()?;
    let out = dir.file_path("metrics.json");
    metrics.save_to_file(&out)?;
    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    assert_eq!(saved["ratio"]["description"], json!("hit ratio"));
    assert_eq!(saved["jobs"]["value"], json!(5));
    Ok(())
}
