use std::path::PathBuf;

/// Failure while reading one of the recorded metrics files.
///
/// Loading is all-or-nothing: any of these aborts the invocation before a
/// single chart is written.
#[derive(Debug)]
pub enum LoadError {
    MissingInput {
        path: PathBuf,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Timestamp {
        path: PathBuf,
        value: String,
        reason: String,
    },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::MissingInput { path }
            | LoadError::Io { path, .. }
            | LoadError::Csv { path, .. }
            | LoadError::Json { path, .. }
            | LoadError::Timestamp { path, .. } => path,
        }
    }

    pub fn is_missing_input(&self) -> bool {
        matches!(self, LoadError::MissingInput { .. })
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::MissingInput { path } => {
                write!(f, "input file not found at {}", path.display())
            }
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            LoadError::Csv { path, source } => {
                write!(f, "failed to parse CSV {}: {}", path.display(), source)
            }
            LoadError::Json { path, source } => {
                write!(f, "failed to parse JSON {}: {}", path.display(), source)
            }
            LoadError::Timestamp {
                path,
                value,
                reason,
            } => write!(
                f,
                "invalid timestamp '{}' in {}: {}",
                value,
                path.display(),
                reason
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Csv { source, .. } => Some(source),
            LoadError::Json { source, .. } => Some(source),
            LoadError::MissingInput { .. } | LoadError::Timestamp { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}
