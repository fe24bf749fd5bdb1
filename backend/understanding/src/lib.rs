//! OCR provider integration for textcam.
//!
//! Loads service-account credentials, mints access tokens and calls the Vision API.

pub mod credentials;
pub mod token;
pub mod vision;

use std::sync::Arc;

use textcam_core::{ConfigError, TextRecognizer};

pub use credentials::{ServiceAccountKey, VisionConfig, CREDENTIALS_ENV, PROJECT_ID_ENV};
pub use token::{AccessTokenSource, ServiceAccountTokenSource, StaticToken};
pub use vision::GoogleVisionClient;

/// Construct the process-wide recognizer from loaded configuration.
pub fn build_recognizer(config: &VisionConfig) -> Result<Arc<dyn TextRecognizer>, ConfigError> {
    Ok(Arc::new(GoogleVisionClient::from_config(config)?))
}

/// Load configuration from the environment and construct the recognizer.
pub fn recognizer_from_env() -> Result<Arc<dyn TextRecognizer>, ConfigError> {
    build_recognizer(&VisionConfig::from_env()?)
}
