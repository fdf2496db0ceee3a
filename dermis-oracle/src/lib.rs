//! Skin-photo analysis against a remote vision model.
//!
//! This crate turns an image into a structured [`AnalysisResult`] and
//! compares two photos of the same skin area over time. The model is reached
//! through the [`Oracle`] trait; [`OpenRouterClient`] implements it over the
//! OpenRouter API.
//!
//! # Example
//!
//! ```ignore
//! use dermis_oracle::{OpenRouterClient, SkinAnalyst, Verdict};
//!
//! #[tokio::main]
//! async fn main() {
//!     let analyst = SkinAnalyst::new(OpenRouterClient::new("your-api-key"));
//!
//!     let result = analyst.analyze("data:image/jpeg;base64,/9j/4AAQ...").await.unwrap();
//!     match result.verdict() {
//!         Verdict::NotSkin => println!("No skin found"),
//!         Verdict::Healthy => println!("Healthy skin"),
//!         Verdict::Condition(report) => println!("{}", report.title()),
//!     }
//! }
//! ```

mod analyze;
mod client;
mod compare;
mod convert;
mod decode;
mod error;
mod image;
mod oracle;
mod schema;
mod types;

pub use analyze::{ANALYSIS_PROMPT, DEFAULT_MODEL, SkinAnalyst};
pub use client::{DEFAULT_BASE_URL, OpenRouterClient};
pub use compare::{COMPARISON_PROMPT, EMPTY_REPORT};
pub use convert::{build_request_body, extract_text};
pub use decode::{Decoded, decode_analysis, strip_fences, try_decode};
pub use error::{AnalysisError, ComparisonError, ImageError, OracleError};
pub use image::{DEFAULT_MIME_TYPE, ImagePayload, mime_type_for_extension};
pub use oracle::{Oracle, OracleRequest, ResponseSchema, ScriptedOracle};
pub use schema::{
    ANALYSIS_FIELDS, FieldKind, SCHEMA_NAME, SchemaField, analysis_response_schema,
    analysis_schema,
};
pub use types::{AnalysisResult, ConditionReport, NO_DESCRIPTION, UNKNOWN_CONDITION, Verdict};
