use tracing::{debug, instrument};

use crate::decode::decode_analysis;
use crate::error::AnalysisError;
use crate::image::ImagePayload;
use crate::oracle::{Oracle, OracleRequest};
use crate::schema::analysis_response_schema;
use crate::types::AnalysisResult;

pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

pub const ANALYSIS_PROMPT: &str = "\
You are assisting with dermatological pattern recognition. Examine this skin \
image using the visual features benchmarked in the HAM10000 dataset (pigment \
networks, streaks, dots and globules).
1. Decide whether the image clearly shows human skin. If it does not, set isSkin to false.
2. If it is skin, look for abnormalities. If the skin looks healthy, set isHealthy to true.
3. Otherwise fill in every field: diseaseName, description, symptoms, reasons, \
treatments, medicines, healingPeriod, precautions and prevention.
4. Always frame the answer as educational guidance and state that it is not a clinical diagnosis.";

/// Runs skin analyses and progress comparisons against an oracle.
///
/// Holds no state besides the oracle and the model name; it never touches
/// the timeline.
pub struct SkinAnalyst<O> {
    oracle: O,
    model: String,
}

impl<O: Oracle> SkinAnalyst<O> {
    /// Creates an analyst using [`DEFAULT_MODEL`].
    pub fn new(oracle: O) -> Self {
        Self::with_model(oracle, DEFAULT_MODEL)
    }

    pub fn with_model(oracle: O, model: impl Into<String>) -> Self {
        Self {
            oracle,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Builds the classification request for one image.
    pub fn analysis_request(&self, image: ImagePayload) -> OracleRequest {
        OracleRequest {
            model: self.model.clone(),
            instructions: ANALYSIS_PROMPT.to_string(),
            images: vec![image],
            response_schema: Some(analysis_response_schema()),
        }
    }

    /// Classifies a self-describing image payload such as a data URI.
    ///
    /// A payload that is not a decodable image fails before any network
    /// call. Oracle failures are returned as [`AnalysisError::Oracle`] and
    /// are not retried. A reply that does not match the schema is not an
    /// error and yields the empty result.
    pub async fn analyze(&self, image: &str) -> Result<AnalysisResult, AnalysisError> {
        let image = ImagePayload::parse(image)?;
        self.analyze_payload(image).await
    }

    #[instrument(skip_all, fields(model = %self.model, mime = %image.mime_type()))]
    pub async fn analyze_payload(&self, image: ImagePayload) -> Result<AnalysisResult, AnalysisError> {
        let request = self.analysis_request(image);
        let text = self.oracle.generate(&request).await?;

        debug!(chars = text.len(), "Decoding analysis reply");

        Ok(decode_analysis(&text))
    }
}
