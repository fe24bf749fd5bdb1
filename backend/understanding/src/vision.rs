//! Text detection through the Google Cloud Vision REST API.
//!
//! One `images:annotate` call per image with the `TEXT_DETECTION` feature. The provider's
//! ordered annotation list is returned untouched; mapping into a result happens upstream.

use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use textcam_core::{TextAnnotation, TextRecognizer, UpstreamError, UpstreamErrorKind, Vertex};

use crate::credentials::{DEFAULT_VISION_ENDPOINT, VisionConfig};
use crate::token::{AccessTokenSource, ServiceAccountTokenSource};

const TEXT_DETECTION: &str = "TEXT_DETECTION";

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct BatchAnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<RpcStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: RpcStatus,
}

#[derive(Debug, Deserialize)]
struct RpcStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
    status: Option<String>,
}

impl RpcStatus {
    /// Per-image errors carry only the numeric gRPC code.
    fn status_name(&self) -> Option<&str> {
        if let Some(status) = self.status.as_deref() {
            return Some(status);
        }
        match self.code {
            3 => Some("INVALID_ARGUMENT"),
            7 => Some("PERMISSION_DENIED"),
            8 => Some("RESOURCE_EXHAUSTED"),
            16 => Some("UNAUTHENTICATED"),
            _ => None,
        }
    }

    fn into_upstream(self, http_status: Option<u16>) -> UpstreamError {
        let status = self.status_name().map(str::to_owned);
        UpstreamError::classify(http_status, status.as_deref(), self.message)
    }
}

impl From<EntityAnnotation> for TextAnnotation {
    fn from(entity: EntityAnnotation) -> Self {
        TextAnnotation {
            description: entity.description,
            bounding_box: entity.bounding_poly.map(|p| p.vertices).unwrap_or_default(),
        }
    }
}

/// Vision API client.
pub struct GoogleVisionClient {
    client: reqwest::Client,
    base_url: String,
    project_id: Option<String>,
    tokens: Arc<dyn AccessTokenSource>,
}

impl GoogleVisionClient {
    pub fn new(client: reqwest::Client, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            client,
            base_url: DEFAULT_VISION_ENDPOINT.to_string(),
            project_id: None,
            tokens,
        }
    }

    /// Build a client from loaded configuration, minting tokens from the service account.
    pub fn from_config(config: &VisionConfig) -> Result<Self, textcam_core::ConfigError> {
        let client = reqwest::Client::new();
        let tokens = ServiceAccountTokenSource::new(client.clone(), config.key.clone())?;
        Ok(Self::new(client, Arc::new(tokens))
            .with_base_url(config.endpoint.clone())
            .with_project_id(config.project_id.clone()))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }
}

#[async_trait]
impl TextRecognizer for GoogleVisionClient {
    fn name(&self) -> &str {
        "google-vision"
    }

    async fn detect_text(&self, image: &[u8]) -> Result<Vec<TextAnnotation>, UpstreamError> {
        let token = self.tokens.access_token().await?;

        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: vec![Feature { kind: TEXT_DETECTION }],
            }],
        };

        info!("[Vision] Running text detection on {} bytes", image.len());

        let mut request = self
            .client
            .post(format!("{}/v1/images:annotate", self.base_url))
            .bearer_auth(token)
            .json(&body);
        if let Some(project) = &self.project_id {
            request = request.header("x-goog-user-project", project);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::Unknown, format!("Vision request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::Unknown, format!("Vision response read failed: {e}")))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => envelope.error.into_upstream(Some(status.as_u16())),
                Err(_) => UpstreamError::classify(Some(status.as_u16()), None, text),
            });
        }

        parse_annotations(&text)
    }
}

fn parse_annotations(body: &str) -> Result<Vec<TextAnnotation>, UpstreamError> {
    let batch: BatchAnnotateResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::new(UpstreamErrorKind::Unknown, format!("unexpected Vision response: {e}")))?;

    let Some(first) = batch.responses.into_iter().next() else {
        debug!("[Vision] Empty batch response");
        return Ok(Vec::new());
    };

    if let Some(error) = first.error {
        return Err(error.into_upstream(None));
    }

    Ok(first.text_annotations.into_iter().map(TextAnnotation::from).collect())
}
