//! CLI Analyze Command
//!
//! Drives the capture path with an image file as the camera, submits the still to a
//! running gateway and prints the result panel.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use textcam_capture::{CameraController, StillImageDevice};
use textcam_ui::{
    render_text, CameraOffPolicy, CaptureApp, HttpRecognitionClient, Osc52Clipboard, Session, SubmitOutcome,
};

use crate::terminal_output::{note_error, note_success};

/// Returns whether recognition succeeded.
pub async fn run(image: &Path, gateway_url: &str, copy: bool, policy: CameraOffPolicy) -> Result<bool> {
    let device = StillImageDevice::open(image).with_context(|| format!("cannot open {}", image.display()))?;
    let mut app = CaptureApp::new(CameraController::new(device), Arc::new(Session::new(policy)));

    app.set_camera(true).await?;
    app.capture()?;

    let client = HttpRecognitionClient::new(gateway_url);
    let outcome = app.submit(&client).await;
    info!(outcome = ?outcome, "Analysis finished");
    print!("{}", render_text(&app.view()));

    let completed = outcome == SubmitOutcome::Completed;
    if completed && copy {
        match app.copy(&Osc52Clipboard::stdout()) {
            Ok(true) => note_success("Full text copied to the clipboard"),
            Ok(false) => {}
            Err(e) => note_error(&e.to_string()),
        }
    }

    app.set_camera(false).await?;
    Ok(completed)
}
