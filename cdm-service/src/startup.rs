//! Application startup and lifecycle management.
//!
//! Builds the axum router for the chat and mapping endpoints plus the
//! health/metrics probes, and owns the HTTP listener.

use crate::config::CdmConfig;
use crate::handlers;
use crate::services::metrics::init_metrics;
use crate::services::providers::gemini::{GeminiClient, GeminiConfig};
use crate::services::providers::ModelClient;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state, built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: CdmConfig,
    pub model_client: Arc<dyn ModelClient>,
}

/// Build the HTTP router for the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics_endpoint))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/map", post(handlers::mapping::map_fields))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        // Any origin, method and header, with credentials; origins are mirrored.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    http_listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Gemini client described by `config`.
    pub async fn build(config: CdmConfig) -> Result<Self, AppError> {
        let client = GeminiClient::new(GeminiConfig::from(&config.gemini)).map_err(|e| {
            tracing::error!("Failed to initialize Gemini client: {}", e);
            AppError::ConfigError(e.into())
        })?;

        tracing::info!(
            model = %config.gemini.model,
            api_key_configured = config.gemini.has_api_key(),
            "Initialized Gemini client"
        );

        Self::build_with_client(config, Arc::new(client)).await
    }

    /// Build the application around an existing model client.
    pub async fn build_with_client(
        config: CdmConfig,
        model_client: Arc<dyn ModelClient>,
    ) -> Result<Self, AppError> {
        init_metrics();

        // Port 0 binds a random port for testing.
        let http_addr = config.common.listen_addr();
        let http_listener = TcpListener::bind(http_addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", http_addr, e);
            AppError::from(e)
        })?;
        let http_port = http_listener.local_addr()?.port();

        tracing::info!("CDM service: HTTP on port {}", http_port);

        let router = build_router(AppState {
            config,
            model_client,
        });

        Ok(Self {
            http_port,
            http_listener,
            router,
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Serve requests until SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.http_listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
