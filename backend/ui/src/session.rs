//! Session view state.
//!
//! One session per tab. Mutations happen through discrete user actions; the only
//! asynchronous one, recognition, is gated so at most one request is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use textcam_core::{CaptureError, CapturedImage, RecognitionResult};

use crate::client::{ClientError, RecognitionClient};
use crate::clipboard::{Clipboard, ClipboardError};

/// How long the copy button shows its acknowledgment.
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// What turning the camera off does to the last still.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraOffPolicy {
    #[default]
    KeepStill,
    ClearStill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed,
    Failed,
    /// A request is already in flight; nothing was sent.
    Busy,
    /// There is no still to send.
    NoImage,
}

#[derive(Debug, Default)]
struct ViewState {
    camera_enabled: bool,
    still: Option<CapturedImage>,
    result: Option<RecognitionResult>,
    error: Option<String>,
    capture_error: Option<String>,
    copied_until: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub full_text: String,
    pub fragments: Vec<String>,
}

/// Snapshot of everything the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub live_preview: bool,
    /// Data URI of the captured still.
    pub still: Option<String>,
    pub loading: bool,
    pub submit_enabled: bool,
    pub error: Option<String>,
    pub capture_error: Option<String>,
    pub result: Option<ResultView>,
    pub copied: bool,
}

impl ViewModel {
    pub fn copy_label(&self) -> &'static str {
        if self.copied { "Copied" } else { "Copy" }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading { "Analyzing..." } else { "Detect text" }
    }
}

/// Resets the in-flight flag even if the request future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Session {
    state: Mutex<ViewState>,
    in_flight: AtomicBool,
    policy: CameraOffPolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CameraOffPolicy::default())
    }
}

impl Session {
    pub fn new(policy: CameraOffPolicy) -> Self {
        Self {
            state: Mutex::new(ViewState::default()),
            in_flight: AtomicBool::new(false),
            policy,
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn policy(&self) -> CameraOffPolicy {
        self.policy
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn set_camera_enabled(&self, enabled: bool) {
        let mut state = self.state();
        state.camera_enabled = enabled;
        if !enabled && self.policy == CameraOffPolicy::ClearStill {
            state.still = None;
            state.result = None;
            state.copied_until = None;
        }
    }

    /// A new still replaces the previous one and its result.
    pub fn set_captured(&self, image: CapturedImage) {
        let mut state = self.state();
        state.still = Some(image);
        state.result = None;
        state.error = None;
        state.capture_error = None;
        state.copied_until = None;
    }

    /// Persistent inline guidance; the last still stays as it is.
    pub fn set_capture_error(&self, error: &CaptureError) {
        self.state().capture_error = Some(error.to_string());
    }

    pub fn clear_capture_error(&self) {
        self.state().capture_error = None;
    }

    pub fn still(&self) -> Option<CapturedImage> {
        self.state().still.clone()
    }

    pub fn result(&self) -> Option<RecognitionResult> {
        self.state().result.clone()
    }

    /// Send the current still for recognition unless a request is already pending.
    pub async fn submit(&self, client: &dyn RecognitionClient) -> SubmitOutcome {
        let image = match self.state().still.clone() {
            Some(image) => image,
            None => return SubmitOutcome::NoImage,
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submission ignored: recognition already in flight");
            return SubmitOutcome::Busy;
        }
        let _in_flight = InFlight(&self.in_flight);

        info!(bytes = image.len(), "Submitting still for recognition");
        let outcome = client.analyze(&image).await;

        let mut state = self.state();
        match outcome {
            Ok(result) => {
                info!(fragments = result.fragments.len(), "Recognition complete");
                state.result = Some(result);
                state.error = None;
                SubmitOutcome::Completed
            }
            Err(ClientError::Transport(detail)) => {
                warn!(error = %detail, "Recognition request failed");
                state.error = Some(NETWORK_ERROR_MESSAGE.to_string());
                SubmitOutcome::Failed
            }
            Err(rejected) => {
                state.error = Some(rejected.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Copy the full text. Returns `Ok(false)` when there is nothing to copy.
    pub fn copy_full_text(&self, clipboard: &dyn Clipboard) -> Result<bool, ClipboardError> {
        let mut state = self.state();
        let Some(text) = state
            .result
            .as_ref()
            .map(|r| r.full_text.clone())
            .filter(|t| !t.is_empty())
        else {
            return Ok(false);
        };

        match clipboard.write_text(&text) {
            Ok(()) => {
                state.copied_until = Some(Instant::now() + COPY_ACK_DURATION);
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to copy text");
                state.capture_error = Some(ClipboardError::Unavailable.to_string());
                Err(e)
            }
        }
    }

    pub fn view(&self) -> ViewModel {
        let state = self.state();
        let loading = self.is_loading();

        let result = state
            .result
            .as_ref()
            .filter(|r| !r.is_empty())
            .map(|r| ResultView {
                full_text: r.full_text.clone(),
                fragments: r.fragments.iter().map(|f| f.text.clone()).collect(),
            });

        ViewModel {
            live_preview: state.camera_enabled,
            still: state.still.as_ref().map(CapturedImage::to_data_uri),
            loading,
            submit_enabled: state.still.is_some() && !loading,
            error: state.error.clone(),
            capture_error: state.capture_error.clone(),
            result,
            copied: state.copied_until.is_some_and(|until| Instant::now() < until),
        }
    }
}
