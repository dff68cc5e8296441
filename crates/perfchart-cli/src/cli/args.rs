use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "perfchart",
    version,
    about = "Render charts from recorded analysis performance metrics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write the overall, stage and cache charts as PNG files
    Report(ReportArgs),
    /// Summarise the recorded tables without rendering anything
    Inspect(InspectArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReportArgs {
    /// Optional YAML report config (paths and chart sizes)
    #[arg(long, env = "PERFCHART_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory containing performance_summary.csv and performance_details.csv
    #[arg(long)]
    pub metrics_dir: Option<PathBuf>,

    /// Directory for the chart images (defaults to the metrics directory)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    #[arg(long, default_value = "text")]
    pub format: String, // text|json
}

#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(long, default_value = "metrics")]
    pub metrics_dir: PathBuf,

    #[arg(long, default_value = "text")]
    pub format: String, // text|json
}
