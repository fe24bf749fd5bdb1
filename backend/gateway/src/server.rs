//! Main HTTP Gateway Server.
//!
//! Owns the injected recognizer and wires the routes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument, warn};

use textcam_core::{ConfigError, TextRecognizer};

use crate::analyze;
use crate::control_ui;
use crate::health_api;

/// Camera stills encoded as PNG data URIs routinely exceed axum's 2 MiB default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// The recognizer as constructed at start-up: usable, or refused with the reason.
#[derive(Clone)]
pub enum RecognizerSlot {
    Ready(Arc<dyn TextRecognizer>),
    Unavailable(ConfigError),
}

impl RecognizerSlot {
    pub fn from_result(result: Result<Arc<dyn TextRecognizer>, ConfigError>) -> Self {
        match result {
            Ok(recognizer) => Self::Ready(recognizer),
            Err(e) => {
                warn!(error = %e, "Recognizer unavailable; /analyze-image will refuse requests");
                Self::Unavailable(e)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub recognizer: RecognizerSlot,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(recognizer: RecognizerSlot) -> Self {
        Self {
            recognizer,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    pub max_body_bytes: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Build the gateway router.
pub fn build_router(state: GatewayState, options: ServerOptions) -> Router {
    Router::new()
        .route("/analyze-image", post(analyze::analyze_image))
        // Alias under the API prefix.
        .route("/api/analyze-image", post(analyze::analyze_image))
        .route("/api/health", get(health_api::get_health))
        .merge(control_ui::ui_router())
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the gateway and serves until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState, options: ServerOptions) -> Result<()> {
    let app = build_router(state, options);

    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
