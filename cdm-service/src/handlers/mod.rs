//! HTTP handlers for cdm-service.

pub mod chat;
pub mod health;
pub mod mapping;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use service_core::error::AppError;

/// Unwrap a JSON body, turning extractor rejections into `{"detail": ...}` errors.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidRequest(rejection.status(), rejection.body_text()))
}
