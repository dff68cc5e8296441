use crate::errors::ConfigError;
use crate::render::ChartSize;
use crate::report::ChartKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "performance_summary.csv";
pub const DETAILS_FILE: &str = "performance_details.csv";
pub const THROUGHPUT_FILE: &str = "metrics.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory holding the recorded summary and detail tables.
    pub metrics_dir: PathBuf,
    /// Directory the chart images are written to.
    pub output_dir: PathBuf,
    pub sizes: ChartSizes,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            metrics_dir: PathBuf::from("metrics"),
            output_dir: PathBuf::from("metrics"),
            sizes: ChartSizes::default(),
        }
    }
}

impl ReportConfig {
    pub fn summary_path(&self) -> PathBuf {
        self.metrics_dir.join(SUMMARY_FILE)
    }

    pub fn details_path(&self) -> PathBuf {
        self.metrics_dir.join(DETAILS_FILE)
    }

    pub fn output_path(&self, chart: ChartKind) -> PathBuf {
        self.output_dir.join(chart.file_name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartSizes {
    pub overall_trend: ChartSize,
    pub stage_breakdown: ChartSize,
    pub stage_trends: ChartSize,
    pub cache_effectiveness: ChartSize,
}

impl Default for ChartSizes {
    fn default() -> Self {
        Self {
            overall_trend: ChartSize::new(1200, 1000),
            stage_breakdown: ChartSize::new(1200, 800),
            stage_trends: ChartSize::new(1200, 800),
            cache_effectiveness: ChartSize::new(1200, 600),
        }
    }
}

impl ChartSizes {
    pub fn for_chart(&self, chart: ChartKind) -> ChartSize {
        match chart {
            ChartKind::OverallTrend => self.overall_trend,
            ChartKind::StageBreakdown => self.stage_breakdown,
            ChartKind::StageTrends => self.stage_trends,
            ChartKind::CacheEffectiveness => self.cache_effectiveness,
        }
    }
}

/// Reads a YAML report config. Unknown keys are logged and ignored.
pub fn load_report_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;

    if raw.trim().is_empty() {
        return Ok(ReportConfig::default());
    }

    let mut ignored_keys = Vec::new();
    let deserializer = serde_yaml::Deserializer::from_str(&raw);
    let cfg: ReportConfig = serde_ignored::deserialize(deserializer, |p| {
        ignored_keys.push(p.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML {}: {}", path.display(), e)))?;

    if !ignored_keys.is_empty() {
        tracing::warn!(
            event = "config_unknown_fields",
            path = %path.display(),
            fields = ?ignored_keys,
            "ignored unknown config fields"
        );
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("perfchart.yaml");
        std::fs::write(
            &p,
            "output_dir: out\nsizes:\n  stage_trends:\n    width: 640\n    height: 480\nbogus: 1\n",
        )
        .unwrap();

        let cfg = load_report_config(&p).unwrap();
        assert_eq!(cfg.metrics_dir, PathBuf::from("metrics"));
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert_eq!(cfg.sizes.stage_trends, ChartSize::new(640, 480));
        assert_eq!(cfg.sizes.overall_trend, ChartSize::new(1200, 1000));
        assert_eq!(
            cfg.output_path(ChartKind::CacheEffectiveness),
            PathBuf::from("out/cache_effectiveness.png")
        );
    }

    #[test]
    fn empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("perfchart.yaml");
        std::fs::write(&p, "").unwrap();
        assert_eq!(load_report_config(&p).unwrap(), ReportConfig::default());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_report_config(Path::new("/nonexistent/perfchart.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn default_paths_match_recorded_layout() {
        let cfg = ReportConfig::default();
        assert_eq!(
            cfg.summary_path(),
            PathBuf::from("metrics/performance_summary.csv")
        );
        assert_eq!(
            cfg.details_path(),
            PathBuf::from("metrics/performance_details.csv")
        );
    }
}
