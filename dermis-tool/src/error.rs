use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DermError {
    #[error("API key not found. Set OPENROUTER_API_KEY or configure ~/.config/dermis/config.toml")]
    ApiKeyNotFound,

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timeline error: {0}")]
    Timeline(#[from] dermis_timeline::TimelineError),

    #[error("Unsupported image file: {}", .0.display())]
    UnsupportedImage(PathBuf),

    #[error(transparent)]
    Analysis(#[from] dermis_oracle::AnalysisError),

    #[error(transparent)]
    Comparison(#[from] dermis_oracle::ComparisonError),

    #[error("{operation} failed: no response within {secs}s")]
    TimedOut { operation: &'static str, secs: u64 },

    #[error("No timeline entry {index} (history has {len})")]
    EntryNotFound { index: usize, len: usize },

    #[error("Select two different entries to compare (both are {0})")]
    SameEntry(usize),
}

impl From<std::convert::Infallible> for DermError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
