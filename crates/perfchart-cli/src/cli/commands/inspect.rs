use super::exit_codes;
use crate::cli::args::InspectArgs;
use perfchart_core::config::{DETAILS_FILE, SUMMARY_FILE};
use perfchart_core::load::load_inputs;
use perfchart_core::views;
use std::collections::BTreeSet;

pub async fn run(args: InspectArgs) -> anyhow::Result<i32> {
    let summary_path = args.metrics_dir.join(SUMMARY_FILE);
    let details_path = args.metrics_dir.join(DETAILS_FILE);

    let (summary, details) = match load_inputs(&summary_path, &details_path) {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(exit_codes::INPUT_ERROR);
        }
    };

    let runs: BTreeSet<_> = details.iter().map(|d| d.timestamp).collect();
    let stages: Vec<String> = views::stage_trends(&details)
        .series
        .into_iter()
        .map(|s| s.stage)
        .collect();
    let latest = views::stage_breakdown(&details).map(|b| b.timestamp.to_rfc3339());

    if args.format == "json" {
        let report = serde_json::json!({
            "summary_rows": summary.len(),
            "detail_rows": details.len(),
            "runs": runs.len(),
            "stages": stages,
            "latest_run": latest,
            "cache_columns": summary.has_cache_columns(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(exit_codes::OK);
    }

    println!("Summary records: {}", summary.len());
    println!(
        "Cache columns:   {}",
        if summary.has_cache_columns() { "yes" } else { "no" }
    );
    println!("Detail records:  {}", details.len());
    println!("Runs:            {}", runs.len());
    println!("Stages:          {}", stages.join(", "));
    println!(
        "Latest run:      {}",
        latest.as_deref().unwrap_or("<none>")
    );

    Ok(exit_codes::OK)
}
