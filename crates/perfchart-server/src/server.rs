use crate::config::ServerConfig;
use crate::page;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use perfchart_core::load::load_throughput;
use perfchart_core::render::{draw_throughput, render_to_png_bytes, THROUGHPUT_SIZE};
use perfchart_core::views::throughput_series;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

static RID: AtomicU64 = AtomicU64::new(1);

fn next_rid() -> String {
    let n = RID.fetch_add(1, Ordering::Relaxed);
    format!("r-{n:06}")
}

/// Per-process handler state. Holds only the source path; every request
/// re-reads the file.
#[derive(Clone, Debug)]
pub struct AppState {
    metrics_file: Arc<PathBuf>,
}

impl AppState {
    pub fn new(metrics_file: impl Into<PathBuf>) -> Self {
        Self {
            metrics_file: Arc::new(metrics_file.into()),
        }
    }

    pub fn metrics_file(&self) -> &Path {
        &self.metrics_file
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/plot", get(plot_handler))
        .with_state(state)
}

async fn index_handler() -> Html<String> {
    Html(page::index_html())
}

async fn plot_handler(State(state): State<AppState>) -> Response {
    let rid = next_rid();
    let started = Instant::now();
    let path = state.metrics_file.clone();

    let rendered = tokio::task::spawn_blocking(move || render_throughput_png(&path)).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match rendered {
        Ok(Ok(png)) => {
            tracing::info!(
                event = "plot_rendered",
                rid = %rid,
                bytes_out = png.len(),
                elapsed_ms
            );
            (
                [
                    (header::CONTENT_TYPE, "image/png"),
                    (header::CACHE_CONTROL, "no-store"),
                ],
                png,
            )
                .into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(
                event = "plot_failed",
                rid = %rid,
                metrics_file = %state.metrics_file().display(),
                error = %format!("{e:#}"),
                elapsed_ms
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to render plot: {e:#}"),
            )
                .into_response()
        }
        Err(join) => {
            tracing::error!(event = "plot_worker_panicked", rid = %rid, error = %join);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "plot renderer crashed".to_string(),
            )
                .into_response()
        }
    }
}

/// Reads the throughput log and renders it to a fresh PNG.
pub fn render_throughput_png(path: &Path) -> Result<Vec<u8>> {
    let samples = load_throughput(path)?;
    let points = throughput_series(&samples);
    render_to_png_bytes(THROUGHPUT_SIZE, |root| draw_throughput(root, &points))
}

pub struct Server;

impl Server {
    pub async fn run(cfg: ServerConfig) -> Result<()> {
        let listener = TcpListener::bind(&cfg.bind)
            .await
            .with_context(|| format!("failed to bind {}", cfg.bind))?;
        let addr = listener.local_addr()?;

        if !cfg.metrics_file.is_file() {
            // not fatal: the file is read per request and may appear later
            tracing::warn!(
                event = "metrics_file_missing",
                metrics_file = %cfg.metrics_file.display()
            );
        }
        tracing::info!(event = "server_listening", addr = %addr);

        let app = build_router(AppState::new(cfg.metrics_file.clone()));
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server failed")?;

        tracing::info!(event = "server_stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(event = "signal_handler_failed", error = %e);
        std::future::pending::<()>().await;
    }
}
