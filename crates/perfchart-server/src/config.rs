use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: String,
    pub metrics_file: PathBuf,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            metrics_file: PathBuf::from("metrics").join(perfchart_core::config::THROUGHPUT_FILE),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("PERFCHART_BIND") {
            if !v.trim().is_empty() {
                cfg.bind = v;
            }
        }
        if let Ok(v) = env::var("PERFCHART_METRICS_FILE") {
            if !v.trim().is_empty() {
                cfg.metrics_file = PathBuf::from(v);
            }
        }
        if let Ok(v) = env::var("PERFCHART_LOG") {
            cfg.log_level = v;
        }
        cfg
    }
}
