use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::recognition::TextAnnotation;

/// An OCR provider. Constructed once at start-up and injected into the gateway.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Provider name (e.g., "google-vision").
    fn name(&self) -> &str;

    /// Run text detection over raw encoded image bytes, returning the ordered annotation list.
    async fn detect_text(&self, image: &[u8]) -> Result<Vec<TextAnnotation>, UpstreamError>;
}
