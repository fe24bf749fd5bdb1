use thiserror::Error;

/// Message returned for every request while the recognizer is not configured.
pub const NOT_INITIALIZED_MESSAGE: &str =
    "Google Cloud Vision API client is not initialized. Please check your credentials.";

/// Camera or platform capability failures. Recovered locally and shown as inline guidance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Camera access was denied. Allow camera permission and try again.")]
    PermissionDenied,

    #[error("No camera is available on this device.")]
    NoCamera,

    #[error("Camera access requires a secure context (HTTPS or localhost).")]
    InsecureContext,

    #[error("The camera is not ready yet.")]
    NotReady,

    #[error("Camera error: {0}")]
    Device(String),
}

/// Client input errors, answered with HTTP 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImageInputError {
    #[error("No image provided")]
    Missing,

    #[error("Invalid image format")]
    InvalidFormat,

    #[error("Invalid request body")]
    InvalidBody,

    /// Body exceeded the gateway's configured limit.
    #[error("Image too large")]
    TooLarge,
}

/// Recognizer configuration failures detected at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("GOOGLE_APPLICATION_CREDENTIALS_JSON is not set")]
    MissingCredentials,

    #[error("malformed service account credentials: {0}")]
    MalformedCredentials(String),
}

impl ConfigError {
    /// Fixed user-facing message; configuration details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        NOT_INITIALIZED_MESSAGE
    }
}

/// Categories an upstream OCR failure is reduced to before reaching the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    QuotaExceeded,
    PermissionDenied,
    InvalidInput,
    Unknown,
}

impl UpstreamErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::QuotaExceeded => "API quota exceeded. Please try again later.",
            Self::PermissionDenied => "Permission denied. Please check your API credentials.",
            Self::InvalidInput => "Invalid image format.",
            Self::Unknown => "Image analysis failed",
        }
    }
}

/// A failed call to the OCR provider. `detail` is the raw provider text and is only ever logged.
#[derive(Debug, Clone, Error)]
#[error("upstream OCR error ({kind:?}): {detail}")]
pub struct UpstreamError {
    pub kind: UpstreamErrorKind,
    pub detail: String,
}

impl UpstreamError {
    pub fn new(kind: UpstreamErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Classifies a provider failure from its HTTP status, RPC status name and message.
    ///
    /// Structured signals win; the message keywords are the fallback.
    pub fn classify(http_status: Option<u16>, rpc_status: Option<&str>, detail: impl Into<String>) -> Self {
        let detail = detail.into();

        let kind = match (http_status, rpc_status) {
            (_, Some("RESOURCE_EXHAUSTED")) | (Some(429), _) => UpstreamErrorKind::QuotaExceeded,
            (_, Some("PERMISSION_DENIED" | "UNAUTHENTICATED")) | (Some(401 | 403), _) => {
                UpstreamErrorKind::PermissionDenied
            }
            (_, Some("INVALID_ARGUMENT")) | (Some(400), _) => UpstreamErrorKind::InvalidInput,
            _ => classify_message(&detail),
        };

        Self { kind, detail }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

fn classify_message(detail: &str) -> UpstreamErrorKind {
    let lower = detail.to_lowercase();
    if lower.contains("quota") {
        UpstreamErrorKind::QuotaExceeded
    } else if lower.contains("permission") {
        UpstreamErrorKind::PermissionDenied
    } else if lower.contains("invalid") {
        UpstreamErrorKind::InvalidInput
    } else {
        UpstreamErrorKind::Unknown
    }
}
