pub mod error;
pub mod image;
pub mod recognition;
pub mod traits;

pub use error::{CaptureError, ConfigError, ImageInputError, UpstreamError, UpstreamErrorKind};
pub use image::CapturedImage;
pub use recognition::{
    AnalyzeResponse, DetectedText, RecognitionRequest, RecognitionResult, TextAnnotation,
    TextFragment, Vertex, CONFIDENCE_PLACEHOLDER, MAX_FRAGMENTS,
};
pub use traits::TextRecognizer;
