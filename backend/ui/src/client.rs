//! Gateway client used by the presentation layer.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use textcam_core::{AnalyzeResponse, CapturedImage, RecognitionRequest, RecognitionResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The gateway answered with `success: false`.
    #[error("{}", .0.as_deref().unwrap_or("Image analysis failed"))]
    Rejected(Option<String>),

    /// No usable answer came back.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Submits stills for recognition.
#[async_trait]
pub trait RecognitionClient: Send + Sync {
    async fn analyze(&self, image: &CapturedImage) -> Result<RecognitionResult, ClientError>;
}

/// Talks to `POST /analyze-image` over HTTP.
pub struct HttpRecognitionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecognitionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RecognitionClient for HttpRecognitionClient {
    async fn analyze(&self, image: &CapturedImage) -> Result<RecognitionResult, ClientError> {
        let url = format!("{}/analyze-image", self.base_url);
        debug!(url = %url, bytes = image.len(), "Sending image for analysis");

        let body = RecognitionRequest {
            image: image.to_data_uri(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        // Failures carry the same JSON shape with a 4xx/5xx status.
        let status = response.status();
        let parsed: AnalyzeResponse = response.json().await.map_err(|e| {
            warn!(status = %status, error = %e, "Unreadable gateway response");
            ClientError::Transport(e.to_string())
        })?;

        parsed.into_result().map_err(ClientError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    async fn spawn(status: StatusCode, reply: Value) -> HttpRecognitionClient {
        let app = Router::new().route(
            "/analyze-image",
            post(move |Json(body): Json<Value>| async move {
                assert!(body["image"].as_str().unwrap().starts_with("data:image/png;base64,"));
                (status, Json(reply))
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        HttpRecognitionClient::new(format!("http://{addr}/"))
    }

    #[tokio::test]
    async fn test_success_response() {
        let client = spawn(
            StatusCode::OK,
            json!({ "success": true, "fullText": "hello world",
                    "detectedTexts": [{ "text": "hello", "confidence": 0, "boundingBox": [] }] }),
        )
        .await;
        let result = client.analyze(&CapturedImage::png(vec![1, 2, 3])).await.unwrap();
        assert_eq!(result.full_text, "hello world");
        assert_eq!(result.fragments[0].text, "hello");
    }

    #[tokio::test]
    async fn test_error_response_is_rejected_verbatim() {
        let client = spawn(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "success": false, "error": "API quota exceeded. Please try again later." }),
        )
        .await;
        let err = client.analyze(&CapturedImage::png(vec![1])).await.unwrap_err();
        assert_eq!(err.to_string(), "API quota exceeded. Please try again later.");
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpRecognitionClient::new(format!("http://{addr}"));
        let err = client.analyze(&CapturedImage::png(vec![1])).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[test]
    fn test_rejected_without_message_uses_fallback() {
        assert_eq!(ClientError::Rejected(None).to_string(), "Image analysis failed");
    }
}
