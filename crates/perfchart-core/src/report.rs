//! Batch report: load both tables once, then attempt every chart.

use crate::config::ReportConfig;
use crate::errors::LoadError;
use crate::load::load_inputs;
use crate::model::{DetailRecord, SummaryTable};
use crate::render::{self, Canvas};
use crate::views;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    OverallTrend,
    StageBreakdown,
    StageTrends,
    CacheEffectiveness,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::OverallTrend,
        ChartKind::StageBreakdown,
        ChartKind::StageTrends,
        ChartKind::CacheEffectiveness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::OverallTrend => "overall_trend",
            ChartKind::StageBreakdown => "stage_breakdown",
            ChartKind::StageTrends => "stage_trends",
            ChartKind::CacheEffectiveness => "cache_effectiveness",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.png", self.as_str())
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartStatus {
    Written { path: PathBuf },
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOutcome {
    pub chart: ChartKind,
    #[serde(flatten)]
    pub status: ChartStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOutcome {
    pub summary_rows: usize,
    pub detail_rows: usize,
    pub charts: Vec<ChartOutcome>,
}

impl ReportOutcome {
    pub fn has_failures(&self) -> bool {
        self.charts
            .iter()
            .any(|c| matches!(c.status, ChartStatus::Failed { .. }))
    }

    pub fn status_of(&self, chart: ChartKind) -> Option<&ChartStatus> {
        self.charts
            .iter()
            .find(|c| c.chart == chart)
            .map(|c| &c.status)
    }
}

/// Loads the recorded tables and writes every chart it can.
///
/// A load failure returns before the output directory is touched.
pub fn generate_report(cfg: &ReportConfig) -> Result<ReportOutcome, LoadError> {
    let (summary, details) = load_inputs(&cfg.summary_path(), &cfg.details_path())?;
    Ok(generate_from_tables(cfg, &summary, &details))
}

pub fn generate_from_tables(
    cfg: &ReportConfig,
    summary: &SummaryTable,
    details: &[DetailRecord],
) -> ReportOutcome {
    if let Err(e) = std::fs::create_dir_all(&cfg.output_dir) {
        // each chart will report its own write failure
        tracing::error!(
            event = "output_dir_failed",
            path = %cfg.output_dir.display(),
            error = %e
        );
    }

    let mut charts = Vec::with_capacity(ChartKind::ALL.len());

    let trend = views::overall_trend(summary);
    charts.push(write_chart(cfg, ChartKind::OverallTrend, |root| {
        render::draw_overall_trend(root, &trend)
    }));

    charts.push(match views::stage_breakdown(details) {
        Some(breakdown) => write_chart(cfg, ChartKind::StageBreakdown, |root| {
            render::draw_stage_breakdown(root, &breakdown)
        }),
        None => skip(ChartKind::StageBreakdown, "no detail records available"),
    });

    let trends = views::stage_trends(details);
    charts.push(if trends.series.is_empty() {
        skip(ChartKind::StageTrends, "no detail records available")
    } else {
        write_chart(cfg, ChartKind::StageTrends, |root| {
            render::draw_stage_trends(root, &trends)
        })
    });

    charts.push(match views::cache_effectiveness(summary) {
        Ok(cache) => write_chart(cfg, ChartKind::CacheEffectiveness, |root| {
            render::draw_cache_effectiveness(root, &cache)
        }),
        Err(reason) => skip(ChartKind::CacheEffectiveness, reason.to_string()),
    });

    ReportOutcome {
        summary_rows: summary.len(),
        detail_rows: details.len(),
        charts,
    }
}

fn write_chart<F>(cfg: &ReportConfig, chart: ChartKind, draw: F) -> ChartOutcome
where
    F: FnOnce(&Canvas<'_>) -> anyhow::Result<()>,
{
    let path = cfg.output_path(chart);
    let status = match render::render_to_file(&path, cfg.sizes.for_chart(chart), draw) {
        Ok(()) => {
            tracing::info!(event = "chart_written", %chart, path = %path.display());
            ChartStatus::Written { path }
        }
        Err(e) => {
            tracing::error!(event = "chart_failed", %chart, error = %format!("{e:#}"));
            ChartStatus::Failed {
                error: format!("{e:#}"),
            }
        }
    };
    ChartOutcome { chart, status }
}

fn skip(chart: ChartKind, reason: impl Into<String>) -> ChartOutcome {
    let reason = reason.into();
    tracing::warn!(event = "chart_skipped", %chart, reason = %reason);
    ChartOutcome {
        chart,
        status: ChartStatus::Skipped { reason },
    }
}
