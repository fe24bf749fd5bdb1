//! Gateway Health API
//!
//! Reports process liveness and whether the recognizer was configured.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// `ready` or `unavailable`.
    pub recognizer: &'static str,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "textcam",
        version: env!("CARGO_PKG_VERSION"),
        recognizer: if state.recognizer.is_ready() { "ready" } else { "unavailable" },
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{build_router, RecognizerSlot, ServerOptions};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use textcam_core::ConfigError;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_unavailable_recognizer() {
        let app = build_router(
            GatewayState::new(RecognizerSlot::Unavailable(ConfigError::MissingCredentials)),
            ServerOptions::default(),
        );
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["recognizer"], "unavailable");
    }
}
