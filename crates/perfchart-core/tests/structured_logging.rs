use perfchart_core::config::ReportConfig;
use perfchart_core::model::{SummaryRecord, SummaryTable};
use perfchart_core::report::generate_from_tables;
use perfchart_core::timestamp::parse_timestamp;
use std::sync::{Arc, Mutex};

#[test]
fn skipped_chart_emits_structured_log() {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let buffer_clone = buffer.clone();

    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(move || MockWriter(buffer_clone.clone()))
        .finish();

    let dir = tempfile::tempdir().unwrap();
    let cfg = ReportConfig {
        metrics_dir: dir.path().to_path_buf(),
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let summary = SummaryTable {
        records: vec![SummaryRecord {
            timestamp: parse_timestamp("2024-05-01T09:00:00Z").unwrap(),
            total_duration_ms: 1200.0,
            memory_used_mb: 80.0,
            file_count: None,
            cached_files: None,
        }],
        has_file_count: false,
        has_cached_files: false,
    };

    tracing::subscriber::with_default(subscriber, || {
        generate_from_tables(&cfg, &summary, &[]);
    });

    let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();

    assert!(output.contains("\"event\":\"chart_skipped\""));
    assert!(output.contains("\"chart\":\"cache_effectiveness\""));
    assert!(output.contains("FileCount, CachedFiles"));
    assert!(output.contains("\"event\":\"chart_written\""));
    assert!(output.contains("\"timestamp\""));
}

struct MockWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
