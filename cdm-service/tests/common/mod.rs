#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request};
use cdm_service::config::{CdmConfig, GeminiSettings};
use cdm_service::services::providers::ModelClient;
use cdm_service::{build_router, AppState};
use secrecy::Secret;
use service_core::config::Config;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_API_KEY: &str = "test-api-key";

/// Config listening on a random local port, pointing Gemini at `api_base`.
pub fn test_config(api_base: &str, api_key: &str) -> CdmConfig {
    CdmConfig {
        common: Config {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
        },
        gemini: GeminiSettings {
            api_key: Secret::new(api_key.to_string()),
            model: TEST_MODEL.to_string(),
            api_base: api_base.to_string(),
        },
    }
}

/// Router wired to the given model client.
pub fn test_router(model_client: Arc<dyn ModelClient>) -> axum::Router {
    build_router(AppState {
        config: test_config("http://unused.invalid", TEST_API_KEY),
        model_client,
    })
}

pub fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
