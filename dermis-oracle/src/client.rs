use std::future::Future;

use tracing::{debug, instrument};

use crate::convert::{build_request_body, extract_text};
use crate::error::OracleError;
use crate::oracle::{Oracle, OracleRequest};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Client for the OpenRouter API.
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterClient {
    /// Creates a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Creates a new client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Executes a completion request and returns the reply text.
    #[instrument(skip(self, request), fields(model = %request.model, images = request.images.len()))]
    pub async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = build_request_body(request);

        debug!("Sending request to OpenRouter");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_body: serde_json::Value = response.json().await?;

        if !status.is_success() {
            let message = response_body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = extract_text(&response_body)?;
        debug!(chars = text.len(), "Received successful response");

        Ok(text)
    }
}

impl Oracle for OpenRouterClient {
    fn generate(
        &self,
        request: &OracleRequest,
    ) -> impl Future<Output = Result<String, OracleError>> + Send {
        self.complete(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImagePayload, SkinAnalyst};

    #[test]
    fn test_client_creation() {
        let client = OpenRouterClient::new("test-key");
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_custom_base_url() {
        let client = OpenRouterClient::with_base_url("test-key", "https://custom.api.com");
        assert_eq!(client.base_url, "https://custom.api.com");
    }

    #[tokio::test]
    #[ignore = "requires OPENROUTER_API_KEY env var"]
    async fn test_live_api() {
        let api_key = std::env::var("OPENROUTER_API_KEY").expect("OPENROUTER_API_KEY not set");
        let analyst = SkinAnalyst::new(OpenRouterClient::new(api_key));

        // 1x1 white PNG.
        let image = ImagePayload::parse(
            "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==",
        )
        .unwrap();

        let result = analyst.analyze_payload(image).await;
        assert!(result.is_ok());
        assert!(!result.unwrap().is_skin);
    }
}
