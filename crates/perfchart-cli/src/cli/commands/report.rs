use super::exit_codes;
use crate::cli::args::ReportArgs;
use anyhow::Context;
use perfchart_core::config::{load_report_config, ReportConfig};
use perfchart_core::report::{generate_report, ChartStatus, ReportOutcome};

pub async fn run(args: ReportArgs) -> anyhow::Result<i32> {
    let cfg = match resolve_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config error: {e}");
            return Ok(exit_codes::INPUT_ERROR);
        }
    };

    let worker_cfg = cfg.clone();
    let result = tokio::task::spawn_blocking(move || generate_report(&worker_cfg))
        .await
        .context("report worker panicked")?;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            // nothing was written; the message names the expected path
            eprintln!("Error: {e}");
            return Ok(exit_codes::INPUT_ERROR);
        }
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => print_text_report(&outcome, &cfg),
    }

    if outcome.has_failures() {
        Ok(exit_codes::RENDER_FAILED)
    } else {
        Ok(exit_codes::OK)
    }
}

fn resolve_config(args: &ReportArgs) -> anyhow::Result<ReportConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_report_config(path)?,
        None => ReportConfig::default(),
    };

    if let Some(dir) = &args.metrics_dir {
        cfg.metrics_dir = dir.clone();
        if args.config.is_none() {
            cfg.output_dir = dir.clone();
        }
    }
    if let Some(dir) = &args.out_dir {
        cfg.output_dir = dir.clone();
    }
    Ok(cfg)
}

fn print_text_report(outcome: &ReportOutcome, cfg: &ReportConfig) {
    println!(
        "Loaded {} summary records and {} detail records",
        outcome.summary_rows, outcome.detail_rows
    );

    for c in &outcome.charts {
        match &c.status {
            ChartStatus::Skipped { reason } => eprintln!("note: {} skipped: {}", c.chart, reason),
            ChartStatus::Failed { error } => eprintln!("error: {} failed: {}", c.chart, error),
            ChartStatus::Written { .. } => {}
        }
    }

    let written: Vec<_> = outcome
        .charts
        .iter()
        .filter(|c| matches!(c.status, ChartStatus::Written { .. }))
        .collect();
    if written.is_empty() {
        println!("No charts written.");
        return;
    }

    println!("Charts written to {}:", cfg.output_dir.display());
    for c in written {
        println!("  - {}", c.chart.file_name());
    }
}
