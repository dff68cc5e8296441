use crate::errors::LoadError;
use crate::model::{
    DetailRecord, SummaryRecord, SummaryTable, ThroughputSample, COL_CACHED_FILES, COL_FILE_COUNT,
};
use crate::timestamp::{parse_timestamp, Timestamp};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawSummaryRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "TotalDuration(ms)")]
    total_duration_ms: f64,
    #[serde(rename = "MemoryUsed(MB)")]
    memory_used_mb: f64,
    #[serde(rename = "FileCount", default)]
    file_count: Option<u64>,
    #[serde(rename = "CachedFiles", default)]
    cached_files: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawDetailRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Stage")]
    stage: String,
    #[serde(rename = "Duration(ms)")]
    duration_ms: f64,
}

#[derive(Debug, Deserialize)]
struct RawThroughputEntry {
    timestamp: String,
    files_per_second_wall_time: f64,
}

/// Loads the summary and detail tables together.
///
/// Both paths are checked before either file is parsed, so a missing detail
/// file is reported even when the summary file is malformed.
pub fn load_inputs(
    summary_path: &Path,
    detail_path: &Path,
) -> Result<(SummaryTable, Vec<DetailRecord>), LoadError> {
    ensure_exists(summary_path)?;
    ensure_exists(detail_path)?;

    let summary = load_summary(summary_path)?;
    let details = load_details(detail_path)?;
    tracing::debug!(
        event = "inputs_loaded",
        summary_rows = summary.len(),
        detail_rows = details.len()
    );
    Ok((summary, details))
}

pub fn load_summary(path: &Path) -> Result<SummaryTable, LoadError> {
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    let has_column = |name: &str| headers.iter().any(|h| h == name);

    let mut table = SummaryTable {
        records: Vec::new(),
        has_file_count: has_column(COL_FILE_COUNT),
        has_cached_files: has_column(COL_CACHED_FILES),
    };

    for row in reader.deserialize::<RawSummaryRow>() {
        let raw = row.map_err(|source| csv_error(path, source))?;
        let timestamp = timestamp_at(path, &raw.timestamp)?;

        if let (Some(total), Some(cached)) = (raw.file_count, raw.cached_files) {
            if cached > total {
                tracing::warn!(
                    event = "cached_exceeds_total",
                    path = %path.display(),
                    timestamp = %raw.timestamp,
                    cached,
                    total
                );
            }
        }

        table.records.push(SummaryRecord {
            timestamp,
            total_duration_ms: raw.total_duration_ms,
            memory_used_mb: raw.memory_used_mb,
            file_count: raw.file_count,
            cached_files: raw.cached_files,
        });
    }

    Ok(table)
}

pub fn load_details(path: &Path) -> Result<Vec<DetailRecord>, LoadError> {
    let mut reader = open_csv(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<RawDetailRow>() {
        let raw = row.map_err(|source| csv_error(path, source))?;
        records.push(DetailRecord {
            timestamp: timestamp_at(path, &raw.timestamp)?,
            stage: raw.stage,
            duration_ms: raw.duration_ms,
        });
    }
    Ok(records)
}

/// Reads the throughput log written by the analyzer (`metrics.json`).
pub fn load_throughput(path: &Path) -> Result<Vec<ThroughputSample>, LoadError> {
    ensure_exists(path)?;
    let bytes = std::fs::read(path).map_err(|source| io_error(path, source))?;
    let entries: Vec<RawThroughputEntry> =
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    entries
        .into_iter()
        .map(|e| {
            Ok(ThroughputSample {
                timestamp: timestamp_at(path, &e.timestamp)?,
                files_per_second: e.files_per_second_wall_time,
            })
        })
        .collect()
}

fn ensure_exists(path: &Path) -> Result<(), LoadError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(LoadError::MissingInput {
            path: path.to_path_buf(),
        })
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>, LoadError> {
    ensure_exists(path)?;
    let file = File::open(path).map_err(|source| io_error(path, source))?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn timestamp_at(path: &Path, raw: &str) -> Result<Timestamp, LoadError> {
    parse_timestamp(raw).map_err(|reason| LoadError::Timestamp {
        path: path.to_path_buf(),
        value: raw.to_string(),
        reason,
    })
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    if source.kind() == std::io::ErrorKind::NotFound {
        LoadError::MissingInput {
            path: path.to_path_buf(),
        }
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn csv_error(path: &Path, source: csv::Error) -> LoadError {
    LoadError::Csv {
        path: path.to_path_buf(),
        source,
    }
}
