//! Recognition records: provider annotations, the simplified result, and the gateway wire format.

use serde::{Deserialize, Serialize};

/// Upper bound on the fragments returned for one image.
pub const MAX_FRAGMENTS: usize = 20;

/// TEXT_DETECTION does not score individual annotations.
pub const CONFIDENCE_PLACEHOLDER: u32 = 0;

/// A polygon corner. The provider omits zero coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

/// One entry of the provider's ordered annotation list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAnnotation {
    pub description: String,
    pub bounding_box: Vec<Vertex>,
}

impl TextAnnotation {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            bounding_box: Vec::new(),
        }
    }

    pub fn with_box(mut self, vertices: Vec<Vertex>) -> Self {
        self.bounding_box = vertices;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub text: String,
    pub bounding_box: Vec<Vertex>,
}

/// Overall text plus the individual fragments, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionResult {
    pub full_text: String,
    pub fragments: Vec<TextFragment>,
}

impl RecognitionResult {
    /// The first annotation is the full-text summary; the rest become fragments, capped at
    /// [`MAX_FRAGMENTS`].
    pub fn from_annotations(annotations: Vec<TextAnnotation>) -> Self {
        let mut iter = annotations.into_iter();
        let full_text = iter.next().map(|a| a.description).unwrap_or_default();
        let fragments = iter
            .take(MAX_FRAGMENTS)
            .map(|a| TextFragment {
                text: a.description,
                bounding_box: a.bounding_box,
            })
            .collect();

        Self {
            full_text,
            fragments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_text.is_empty() && self.fragments.is_empty()
    }
}

/// Body of `POST /analyze-image`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionRequest {
    /// `data:<mime>;base64,<payload>`
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedText {
    pub text: String,
    #[serde(default)]
    pub confidence: u32,
    #[serde(default)]
    pub bounding_box: Vec<Vertex>,
}

/// Response of `POST /analyze-image`, for both outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_texts: Option<Vec<DetectedText>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    pub fn success(result: &RecognitionResult) -> Self {
        let detected = result
            .fragments
            .iter()
            .map(|f| DetectedText {
                text: f.text.clone(),
                confidence: CONFIDENCE_PLACEHOLDER,
                bounding_box: f.bounding_box.clone(),
            })
            .collect();

        Self {
            success: true,
            full_text: Some(result.full_text.clone()),
            detected_texts: Some(detected),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            full_text: None,
            detected_texts: None,
            error: Some(message.into()),
        }
    }

    /// Splits into the recognition result or the reported error message, if any.
    pub fn into_result(self) -> Result<RecognitionResult, Option<String>> {
        if !self.success {
            return Err(self.error);
        }
        let fragments = self
            .detected_texts
            .unwrap_or_default()
            .into_iter()
            .map(|d| TextFragment {
                text: d.text,
                bounding_box: d.bounding_box,
            })
            .collect();
        Ok(RecognitionResult {
            full_text: self.full_text.unwrap_or_default(),
            fragments,
        })
    }
}
