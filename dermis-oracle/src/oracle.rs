use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::error::OracleError;
use crate::image::ImagePayload;

/// A named JSON Schema the reply must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
}

/// A single oracle call: instructions followed by images, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub model: String,
    pub instructions: String,
    pub images: Vec<ImagePayload>,
    /// Shape constraint for the reply; `None` asks for free text.
    pub response_schema: Option<ResponseSchema>,
}

/// A remote vision model.
///
/// A call resolves exactly once, with the reply text or a failure. Replies
/// are not streamed and calls are never retried here.
pub trait Oracle: Send + Sync {
    fn generate(
        &self,
        request: &OracleRequest,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;
}

/// An oracle that replays queued replies and records every request.
///
/// Useful for testing and as a reference implementation.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push_reply(text);
        self
    }

    /// Queues a failed call.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push_failure(message);
        self
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(text.into()));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(message.into()));
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Oracle for ScriptedOracle {
    async fn generate(&self, request: &OracleRequest) -> Result<String, OracleError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(OracleError::Api {
                status: 503,
                message,
            }),
            None => Err(OracleError::MalformedResponse(
                "no scripted reply left".to_string(),
            )),
        }
    }
}
