use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Log file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to render report: {0}")]
    Render(#[from] std::fmt::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Report path {} would overwrite the log file", .0.display())]
    OutputCollision(PathBuf),
}

impl AnalyzerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyzerError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
