use anyhow::Result;
use clap::Parser;
use perfchart_server::config;
use perfchart_server::Server;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve a live throughput plot", long_about = None)]
struct Args {
    /// Address to listen on (overrides PERFCHART_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Throughput log to plot (overrides PERFCHART_METRICS_FILE)
    #[arg(long)]
    metrics_file: Option<PathBuf>,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = config::ServerConfig::from_env();
    if let Some(bind) = args.bind {
        cfg.bind = bind;
    }
    if let Some(path) = args.metrics_file {
        cfg.metrics_file = path;
    }

    init_logging(&cfg.log_level);

    tracing::info!(event = "server_start", config = ?cfg);

    Server::run(cfg).await
}
