//! Derived chart views.
//!
//! Each function turns loaded records into exactly the data one chart plots.
//! Nothing here touches a drawing surface, so the shaping rules are tested
//! without rendering.

use crate::model::{
    DetailRecord, SummaryTable, ThroughputSample, COL_CACHED_FILES, COL_FILE_COUNT,
};
use crate::timestamp::Timestamp;
use std::collections::{BTreeMap, BTreeSet};

pub type TimePoint = (Timestamp, f64);

#[derive(Debug, Clone, PartialEq)]
pub struct OverallTrend {
    pub duration: Vec<TimePoint>,
    pub memory: Vec<TimePoint>,
}

/// Duration and memory per run, in file order (no re-sort).
pub fn overall_trend(summary: &SummaryTable) -> OverallTrend {
    OverallTrend {
        duration: summary
            .records
            .iter()
            .map(|r| (r.timestamp, r.total_duration_ms))
            .collect(),
        memory: summary
            .records
            .iter()
            .map(|r| (r.timestamp, r.memory_used_mb))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageBar {
    pub stage: String,
    pub duration_ms: f64,
}

impl StageBar {
    /// Bar annotation; the plotted height keeps full precision.
    pub fn label(&self) -> String {
        format!("{}", self.duration_ms.round() as i64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageBreakdown {
    pub timestamp: Timestamp,
    pub bars: Vec<StageBar>,
}

/// Stages of the latest run, longest first.
///
/// Returns `None` when there are no detail rows at all.
pub fn stage_breakdown(details: &[DetailRecord]) -> Option<StageBreakdown> {
    let latest = details.iter().map(|d| d.timestamp).max()?;
    let mut bars: Vec<StageBar> = details
        .iter()
        .filter(|d| d.timestamp == latest)
        .map(|d| StageBar {
            stage: d.stage.clone(),
            duration_ms: d.duration_ms,
        })
        .collect();
    // stable: equal durations keep file order
    bars.sort_by(|a, b| b.duration_ms.total_cmp(&a.duration_ms));

    Some(StageBreakdown {
        timestamp: latest,
        bars,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageSeries {
    pub stage: String,
    /// Unbroken stretches of consecutive runs. A run that has no row for the
    /// stage ends the current segment.
    pub segments: Vec<Vec<TimePoint>>,
}

impl StageSeries {
    pub fn points(&self) -> impl Iterator<Item = &TimePoint> {
        self.segments.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageTrends {
    pub series: Vec<StageSeries>,
}

impl StageTrends {
    pub fn points(&self) -> impl Iterator<Item = &TimePoint> {
        self.series.iter().flat_map(|s| s.points())
    }
}

/// One line per stage across runs.
///
/// When a (timestamp, stage) pair repeats, the first row in file order is
/// kept and later ones are dropped. A stage missing from a run leaves a gap
/// in its line instead of bridging the neighbouring runs.
pub fn stage_trends(details: &[DetailRecord]) -> StageTrends {
    let runs: BTreeSet<Timestamp> = details.iter().map(|d| d.timestamp).collect();
    let mut by_stage: BTreeMap<&str, BTreeMap<Timestamp, f64>> = BTreeMap::new();
    for d in details {
        by_stage
            .entry(d.stage.as_str())
            .or_default()
            .entry(d.timestamp)
            .or_insert(d.duration_ms);
    }

    let series = by_stage
        .into_iter()
        .map(|(stage, values)| {
            let mut segments = Vec::new();
            let mut current = Vec::new();
            for run in &runs {
                match values.get(run) {
                    Some(v) => current.push((*run, *v)),
                    None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                    None => {}
                }
            }
            if !current.is_empty() {
                segments.push(current);
            }
            StageSeries {
                stage: stage.to_string(),
                segments,
            }
        })
        .collect();

    StageTrends { series }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheBar {
    pub run_index: usize,
    pub label: String,
    pub cached: u64,
    pub non_cached: u64,
    pub total: u64,
    pub annotation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CacheEffectiveness {
    /// One slot per summary row; `None` where a cell was empty.
    pub runs: Vec<Option<CacheBar>>,
}

impl CacheEffectiveness {
    pub fn max_total(&self) -> u64 {
        self.runs
            .iter()
            .flatten()
            .map(|b| b.total.max(b.cached))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSkip {
    MissingColumns(Vec<&'static str>),
}

impl std::fmt::Display for CacheSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheSkip::MissingColumns(cols) => write!(
                f,
                "cache data not available in summary file (missing column(s): {})",
                cols.join(", ")
            ),
        }
    }
}

/// Cache hits per run, positioned by run index rather than elapsed time.
pub fn cache_effectiveness(summary: &SummaryTable) -> Result<CacheEffectiveness, CacheSkip> {
    let mut missing = Vec::new();
    if !summary.has_file_count {
        missing.push(COL_FILE_COUNT);
    }
    if !summary.has_cached_files {
        missing.push(COL_CACHED_FILES);
    }
    if !missing.is_empty() {
        return Err(CacheSkip::MissingColumns(missing));
    }

    let runs = summary
        .records
        .iter()
        .enumerate()
        .map(|(run_index, r)| {
            let (total, cached) = (r.file_count?, r.cached_files?);
            Some(CacheBar {
                run_index,
                label: r.timestamp.format("%m/%d %H:%M").to_string(),
                cached,
                non_cached: total.saturating_sub(cached),
                total,
                annotation: hit_rate_label(cached, total),
            })
        })
        .collect();

    Ok(CacheEffectiveness { runs })
}

/// `cached / total` as a one-decimal percentage; `None` for an empty run.
pub fn hit_rate_label(cached: u64, total: u64) -> Option<String> {
    if total == 0 {
        return None;
    }
    let pct = cached as f64 / total as f64 * 100.0;
    Some(format!("{:.1}%", pct))
}

/// Throughput samples in file order.
pub fn throughput_series(samples: &[ThroughputSample]) -> Vec<TimePoint> {
    samples
        .iter()
        .map(|s| (s.timestamp, s.files_per_second))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SummaryRecord;
    use crate::timestamp::parse_timestamp;

    fn ts(raw: &str) -> Timestamp {
        parse_timestamp(raw).unwrap()
    }

    fn detail(t: &str, stage: &str, ms: f64) -> DetailRecord {
        DetailRecord {
            timestamp: ts(t),
            stage: stage.to_string(),
            duration_ms: ms,
        }
    }

    fn summary_row(t: &str, files: Option<u64>, cached: Option<u64>) -> SummaryRecord {
        SummaryRecord {
            timestamp: ts(t),
            total_duration_ms: 1000.0,
            memory_used_mb: 64.0,
            file_count: files,
            cached_files: cached,
        }
    }

    fn cache_table(records: Vec<SummaryRecord>) -> SummaryTable {
        SummaryTable {
            records,
            has_file_count: true,
            has_cached_files: true,
        }
    }

    #[test]
    fn overall_trend_keeps_file_order_and_row_count() {
        let table = SummaryTable {
            records: vec![
                summary_row("2024-01-03 00:00:00", None, None),
                summary_row("2024-01-01 00:00:00", None, None),
                summary_row("2024-01-02 00:00:00", None, None),
            ],
            ..Default::default()
        };
        let trend = overall_trend(&table);
        assert_eq!(trend.duration.len(), 3);
        assert_eq!(trend.memory.len(), 3);
        assert_eq!(trend.duration[0].0, ts("2024-01-03 00:00:00"));
        assert_eq!(trend.memory[1].0, ts("2024-01-01 00:00:00"));
    }

    #[test]
    fn breakdown_selects_latest_run_sorted_descending() {
        let details = vec![
            detail("2024-01-01 00:00:00", "parse", 900.0),
            detail("2024-01-02 00:00:00", "parse", 100.0),
            detail("2024-01-02 00:00:00", "index", 300.4),
            detail("2024-01-01 00:00:00", "index", 50.0),
            detail("2024-01-02 00:00:00", "report", 200.6),
        ];
        let b = stage_breakdown(&details).unwrap();
        assert_eq!(b.timestamp, ts("2024-01-02 00:00:00"));
        let names: Vec<_> = b.bars.iter().map(|x| x.stage.as_str()).collect();
        assert_eq!(names, ["index", "report", "parse"]);
        assert_eq!(b.bars[0].label(), "300");
        assert_eq!(b.bars[1].label(), "201");
        assert_eq!(b.bars[1].duration_ms, 200.6);
    }

    #[test]
    fn breakdown_of_nothing_is_none() {
        assert!(stage_breakdown(&[]).is_none());
    }

    #[test]
    fn trends_keep_first_duplicate() {
        let details = vec![
            detail("2024-01-01 00:00:00", "parse", 10.0),
            detail("2024-01-01 00:00:00", "parse", 99.0),
            detail("2024-01-02 00:00:00", "parse", 20.0),
            detail("2024-01-01 00:00:00", "index", 5.0),
        ];
        let trends = stage_trends(&details);
        assert_eq!(trends.series.len(), 2);
        assert_eq!(trends.series[0].stage, "index");
        let parse = &trends.series[1];
        assert_eq!(parse.stage, "parse");
        assert_eq!(
            parse.segments,
            vec![vec![
                (ts("2024-01-01 00:00:00"), 10.0),
                (ts("2024-01-02 00:00:00"), 20.0)
            ]]
        );
        assert_eq!(trends.points().count(), 3);
    }

    #[test]
    fn trends_break_where_stage_is_absent() {
        let details = vec![
            detail("2024-01-01 00:00:00", "parse", 10.0),
            detail("2024-01-01 00:00:00", "lint", 3.0),
            detail("2024-01-02 00:00:00", "parse", 12.0),
            detail("2024-01-03 00:00:00", "parse", 11.0),
            detail("2024-01-03 00:00:00", "lint", 4.0),
            detail("2024-01-04 00:00:00", "parse", 9.0),
        ];
        let trends = stage_trends(&details);
        let lint = &trends.series[0];
        assert_eq!(lint.stage, "lint");
        assert_eq!(
            lint.segments,
            vec![
                vec![(ts("2024-01-01 00:00:00"), 3.0)],
                vec![(ts("2024-01-03 00:00:00"), 4.0)],
            ]
        );

        let parse = &trends.series[1];
        assert_eq!(parse.segments.len(), 1);
        assert_eq!(parse.points().count(), 4);
    }

    #[test]
    fn cache_hit_rate_annotation() {
        let table = cache_table(vec![
            summary_row("2024-01-01 09:30:00", Some(10), Some(4)),
            summary_row("2024-01-02 09:30:00", Some(0), Some(0)),
        ]);
        let cache = cache_effectiveness(&table).unwrap();
        let first = cache.runs[0].as_ref().unwrap();
        assert_eq!(first.annotation.as_deref(), Some("40.0%"));
        assert_eq!(first.non_cached, 6);
        assert_eq!(first.label, "01/01 09:30");

        let empty = cache.runs[1].as_ref().unwrap();
        assert_eq!(empty.annotation, None);
        assert_eq!(empty.run_index, 1);
        assert_eq!(cache.max_total(), 10);
    }

    #[test]
    fn cache_skipped_without_columns() {
        let table = SummaryTable {
            records: vec![summary_row("2024-01-01 00:00:00", Some(3), None)],
            has_file_count: true,
            has_cached_files: false,
        };
        let skip = cache_effectiveness(&table).unwrap_err();
        assert_eq!(skip, CacheSkip::MissingColumns(vec!["CachedFiles"]));
        assert!(skip.to_string().contains("CachedFiles"));
    }

    #[test]
    fn cache_row_with_empty_cell_has_no_bar() {
        let table = cache_table(vec![
            summary_row("2024-01-01 00:00:00", Some(3), None),
            summary_row("2024-01-02 00:00:00", Some(3), Some(1)),
        ]);
        let cache = cache_effectiveness(&table).unwrap();
        assert!(cache.runs[0].is_none());
        assert_eq!(
            cache.runs[1].as_ref().unwrap().annotation.as_deref(),
            Some("33.3%")
        );
    }

    #[test]
    fn cached_above_total_saturates() {
        let table = cache_table(vec![summary_row("2024-01-01 00:00:00", Some(2), Some(5))]);
        let bar = cache_effectiveness(&table).unwrap().runs[0].clone().unwrap();
        assert_eq!(bar.non_cached, 0);
        assert_eq!(bar.annotation.as_deref(), Some("250.0%"));
    }
}
