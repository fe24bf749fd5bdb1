//! Captured still images and their `data:` URI encoding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::error::ImageInputError;

/// Accepts payloads with or without `=` padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// An encoded raster image frozen from the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new("image/png", bytes)
    }

    /// Self-contained `data:<mime>;base64,<payload>` form.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Parses a base64 image data URI. The payload is everything after the first comma.
    pub fn from_data_uri(input: &str) -> Result<Self, ImageInputError> {
        if input.is_empty() {
            return Err(ImageInputError::Missing);
        }

        let (header, payload) = input.split_once(',').ok_or(ImageInputError::InvalidFormat)?;
        let meta = header
            .strip_prefix("data:")
            .ok_or(ImageInputError::InvalidFormat)?;

        let mut params = meta.split(';');
        let mime = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        let subtype = mime.strip_prefix("image/").unwrap_or_default();
        if subtype.is_empty() {
            return Err(ImageInputError::InvalidFormat);
        }
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(ImageInputError::InvalidFormat);
        }

        let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if cleaned.is_empty() {
            return Err(ImageInputError::InvalidFormat);
        }

        let bytes = LENIENT_BASE64
            .decode(cleaned.as_bytes())
            .map_err(|_| ImageInputError::InvalidFormat)?;

        Ok(Self { mime, bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
