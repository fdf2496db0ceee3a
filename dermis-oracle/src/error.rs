use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image payload has no data section")]
    MissingData,

    #[error("image payload is empty")]
    Empty,

    #[error("image payload is not base64-encoded")]
    NotBase64,

    #[error("invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

/// A classification request that did not produce a result.
///
/// Malformed oracle output is not an error: it decodes to an empty result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis failed: {0}")]
    Image(#[from] ImageError),

    #[error("analysis failed: {0}")]
    Oracle(#[from] OracleError),
}

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("comparison failed: {0}")]
    Image(#[from] ImageError),

    #[error("comparison failed: {0}")]
    Oracle(#[from] OracleError),
}
