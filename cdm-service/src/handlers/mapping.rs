use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use service_core::error::AppError;
use std::time::Instant;

use super::json_body;
use crate::dtos::MappingRequest;
use crate::services::instructions::CDM_SYSTEM_INSTRUCTION;
use crate::services::mapping::{mapping_prompt, mapping_schema, MappingOutcome, JSON_MIME_TYPE};
use crate::services::metrics::{record_mapping_fallback, record_model_call};
use crate::services::providers::GenerateRequest;
use crate::startup::AppState;

/// `POST /api/map`: suggested source-to-CDM field mappings.
///
/// Model output that is not JSON yields `[]` rather than an error.
pub async fn map_fields(
    State(state): State<AppState>,
    payload: Result<Json<MappingRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let payload = json_body(payload)?;

    tracing::info!(source_len = payload.source_data.len(), "Mapping request");

    let request = GenerateRequest {
        model: state.config.gemini.model.clone(),
        contents: mapping_prompt(&payload.source_data),
        system_instruction: Some(CDM_SYSTEM_INSTRUCTION.to_string()),
        tools: Vec::new(),
        response_mime_type: Some(JSON_MIME_TYPE.to_string()),
        response_schema: Some(mapping_schema()),
    };

    let started = Instant::now();
    let result = state.model_client.generate(&request).await;
    record_model_call("map", result.is_ok(), started.elapsed());

    let response = result.map_err(|e| {
        tracing::error!(error = %e, "Error in map endpoint");
        AppError::InternalError(e.into())
    })?;

    let outcome = MappingOutcome::parse(response.text.as_deref());
    if outcome == MappingOutcome::Unparseable {
        record_mapping_fallback();
    }

    Ok(Json(outcome.into_value()))
}
