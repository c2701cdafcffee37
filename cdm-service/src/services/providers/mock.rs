//! Mock model client for testing.

use super::{
    Candidate, GenerateRequest, GroundingChunk, GroundingMetadata, ModelClient, ModelResponse,
    ProviderError, WebSource,
};
use async_trait::async_trait;
use std::sync::Mutex;

enum Behavior {
    Reply(ModelResponse),
    Fail(String),
}

/// Mock model client that returns a scripted response and records every
/// request it receives.
pub struct MockModelClient {
    behavior: Behavior,
    healthy: bool,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockModelClient {
    /// Always answer with `response`.
    pub fn replying(response: ModelResponse) -> Self {
        Self {
            behavior: Behavior::Reply(response),
            healthy: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer with plain text and no grounding metadata.
    pub fn replying_text(text: impl Into<String>) -> Self {
        Self::replying(ModelResponse {
            text: Some(text.into()),
            candidates: vec![Candidate::default()],
        })
    }

    /// Fail every call with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Fail(message.into()),
            healthy: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

/// Build a response whose first candidate cites the given `(uri, title)` pairs.
pub fn grounded_response(text: &str, sources: &[(&str, Option<&str>)]) -> ModelResponse {
    let grounding_chunks = sources
        .iter()
        .map(|(uri, title)| GroundingChunk {
            web: Some(WebSource {
                uri: Some(uri.to_string()),
                title: title.map(str::to_string),
            }),
        })
        .collect();

    ModelResponse {
        text: Some(text.to_string()),
        candidates: vec![Candidate {
            grounding_metadata: Some(GroundingMetadata { grounding_chunks }),
        }],
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelResponse, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.behavior {
            Behavior::Reply(response) => Ok(response.clone()),
            Behavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.healthy {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock model client not healthy".to_string(),
            ))
        }
    }
}
