use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt timeline: {0}")]
    Corrupt(String),
}
