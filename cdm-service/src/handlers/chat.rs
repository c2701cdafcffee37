use axum::{extract::rejection::JsonRejection, extract::State, Json};
use service_core::error::AppError;
use std::time::Instant;

use super::json_body;
use crate::dtos::{ChatRequest, ChatResponse};
use crate::services::citations;
use crate::services::instructions::CDM_SYSTEM_INSTRUCTION;
use crate::services::metrics::{record_model_call, record_verified_sources};
use crate::services::providers::{GenerateRequest, Tool};
use crate::startup::AppState;

/// `POST /api/chat`: grounded answer with a verified-sources appendix.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let payload = json_body(payload)?;

    tracing::info!(
        prompt_len = payload.prompt.len(),
        history_len = payload.history.len(),
        "Chat request"
    );

    let request = GenerateRequest {
        model: state.config.gemini.model.clone(),
        contents: payload.prompt,
        system_instruction: Some(CDM_SYSTEM_INSTRUCTION.to_string()),
        tools: vec![Tool::GoogleSearch],
        ..Default::default()
    };

    let started = Instant::now();
    let result = state.model_client.generate(&request).await;
    record_model_call("chat", result.is_ok(), started.elapsed());

    let response = result.map_err(|e| {
        tracing::error!(error = %e, "Error in chat endpoint");
        AppError::InternalError(e.into())
    })?;

    let (text, source_count) = citations::annotate(&response);
    record_verified_sources(source_count);

    tracing::debug!(source_count, text_len = text.len(), "Chat response ready");

    Ok(Json(ChatResponse { text }))
}
