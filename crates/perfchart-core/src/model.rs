use crate::timestamp::Timestamp;

pub const COL_TIMESTAMP: &str = "Timestamp";
pub const COL_TOTAL_DURATION: &str = "TotalDuration(ms)";
pub const COL_MEMORY_USED: &str = "MemoryUsed(MB)";
pub const COL_FILE_COUNT: &str = "FileCount";
pub const COL_CACHED_FILES: &str = "CachedFiles";
pub const COL_STAGE: &str = "Stage";
pub const COL_DURATION: &str = "Duration(ms)";

/// One analysis run from `performance_summary.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub timestamp: Timestamp,
    pub total_duration_ms: f64,
    pub memory_used_mb: f64,
    pub file_count: Option<u64>,
    pub cached_files: Option<u64>,
}

/// Summary rows plus which optional columns the file header declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    pub records: Vec<SummaryRecord>,
    pub has_file_count: bool,
    pub has_cached_files: bool,
}

impl SummaryTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_cache_columns(&self) -> bool {
        self.has_file_count && self.has_cached_files
    }
}

/// Duration of one named stage within one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub timestamp: Timestamp,
    pub stage: String,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputSample {
    pub timestamp: Timestamp,
    pub files_per_second: f64,
}
