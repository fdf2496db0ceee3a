use tracing::{debug, instrument};

use crate::analyze::SkinAnalyst;
use crate::error::ComparisonError;
use crate::image::ImagePayload;
use crate::oracle::{Oracle, OracleRequest};

pub const COMPARISON_PROMPT: &str = "\
These two photos show the same skin condition at different times: the first \
is the baseline, the second is the current state. Assess healing progress \
from the visible resolution of rashes or lesions and from changes in pigment \
and texture. Write a concise progress report.";

/// Returned when the oracle answers with an empty narrative.
pub const EMPTY_REPORT: &str = "Unable to generate comparison report.";

impl<O: Oracle> SkinAnalyst<O> {
    /// Builds the progress request; images are sent in the order given.
    pub fn comparison_request(&self, earlier: ImagePayload, later: ImagePayload) -> OracleRequest {
        OracleRequest {
            model: self.model().to_string(),
            instructions: COMPARISON_PROMPT.to_string(),
            images: vec![earlier, later],
            response_schema: None,
        }
    }

    /// Asks the oracle how the condition changed between two photos.
    ///
    /// Returns the narrative verbatim. The images are not reordered and the
    /// two payloads are not checked for being the same photo.
    pub async fn compare(&self, earlier: &str, later: &str) -> Result<String, ComparisonError> {
        let earlier = ImagePayload::parse(earlier)?;
        let later = ImagePayload::parse(later)?;
        self.compare_payloads(earlier, later).await
    }

    #[instrument(skip_all, fields(model = %self.model()))]
    pub async fn compare_payloads(
        &self,
        earlier: ImagePayload,
        later: ImagePayload,
    ) -> Result<String, ComparisonError> {
        let request = self.comparison_request(earlier, later);
        let text = self.oracle().generate(&request).await?;

        if text.trim().is_empty() {
            debug!("Oracle returned an empty comparison");
            return Ok(EMPTY_REPORT.to_string());
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedOracle;

    const BASELINE: &str = "data:image/jpeg;base64,/9j/4AAQ";
    const CURRENT: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[tokio::test]
    async fn returns_narrative_verbatim() {
        let narrative = "  The rash has faded noticeably.\n\nTexture is smoother.  ";
        let analyst = SkinAnalyst::new(ScriptedOracle::new().reply(narrative));

        let report = analyst.compare(BASELINE, CURRENT).await.unwrap();

        assert_eq!(report, narrative);
    }

    #[tokio::test]
    async fn sends_images_in_given_order() {
        let analyst = SkinAnalyst::new(ScriptedOracle::new().reply("a").reply("b"));

        analyst.compare(BASELINE, CURRENT).await.unwrap();
        let reversed = analyst.compare(CURRENT, BASELINE).await.unwrap();

        assert_eq!(reversed, "b");
        let requests = analyst.oracle().requests();
        assert_eq!(requests[0].images[0].mime_type(), "image/jpeg");
        assert_eq!(requests[0].images[1].mime_type(), "image/png");
        assert_eq!(requests[1].images[0].mime_type(), "image/png");
        assert_eq!(requests[1].images[1].mime_type(), "image/jpeg");
        assert!(requests[0].response_schema.is_none());
        assert_eq!(requests[0].instructions, COMPARISON_PROMPT);
    }

    #[tokio::test]
    async fn empty_narrative_is_replaced() {
        let analyst = SkinAnalyst::new(ScriptedOracle::new().reply("   "));

        let report = analyst.compare(BASELINE, CURRENT).await.unwrap();

        assert_eq!(report, EMPTY_REPORT);
    }

    #[tokio::test]
    async fn oracle_failure_is_comparison_failure() {
        let analyst = SkinAnalyst::new(ScriptedOracle::new().fail("timeout"));

        let err = analyst.compare(BASELINE, CURRENT).await.unwrap_err();

        assert!(matches!(err, ComparisonError::Oracle(_)));
        assert!(err.to_string().starts_with("comparison failed"));
    }

    #[tokio::test]
    async fn bad_second_image_never_reaches_oracle() {
        let analyst = SkinAnalyst::new(ScriptedOracle::new().reply("unused"));

        let err = analyst.compare(BASELINE, "not an image!").await.unwrap_err();

        assert!(matches!(err, ComparisonError::Image(_)));
        assert_eq!(analyst.oracle().call_count(), 0);
    }
}
