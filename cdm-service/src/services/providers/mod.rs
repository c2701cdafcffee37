//! Remote model abstraction.
//!
//! Handlers talk to the generative model only through [`ModelClient`], so the
//! Gemini REST binding can be swapped for the scripted mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Tool declarations the model may use while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Web search grounding; populates grounding metadata on the response.
    GoogleSearch,
}

/// One call to the remote model.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub model: String,
    pub contents: String,
    pub system_instruction: Option<String>,
    pub tools: Vec<Tool>,
    pub response_mime_type: Option<String>,
    pub response_schema: Option<serde_json::Value>,
}

/// Decoded model response.
///
/// Every level below the response is optional; see
/// [`crate::services::citations`] for how absence is interpreted.
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    /// Concatenated text parts of the first candidate.
    pub text: Option<String>,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Decode an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Trait for the generative-language backend (e.g., Gemini).
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one generation and return the decoded response.
    async fn generate(&self, request: &GenerateRequest) -> Result<ModelResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
