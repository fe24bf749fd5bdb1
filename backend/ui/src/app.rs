//! Capture app
//!
//! Ties a camera to a session: camera errors become inline guidance, captured stills
//! replace the session's still.

use std::sync::Arc;

use tracing::info;

use textcam_capture::{CameraController, FacingMode, MediaDevices, StreamState};
use textcam_core::CaptureError;

use crate::client::RecognitionClient;
use crate::clipboard::{Clipboard, ClipboardError};
use crate::session::{Session, SubmitOutcome, ViewModel};

pub struct CaptureApp<D> {
    camera: CameraController<D>,
    session: Arc<Session>,
}

impl<D: MediaDevices> CaptureApp<D> {
    pub fn new(camera: CameraController<D>, session: Arc<Session>) -> Self {
        Self { camera, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn camera_state(&self) -> &StreamState {
        self.camera.state()
    }

    pub fn facing(&self) -> FacingMode {
        self.camera.facing()
    }

    /// Flip the camera on or off. Returns whether it is now on.
    pub async fn toggle_camera(&mut self) -> Result<bool, CaptureError> {
        let result = self.camera.toggle().await;
        self.session.set_camera_enabled(self.camera.is_enabled());
        self.record(result)
    }

    pub async fn set_camera(&mut self, on: bool) -> Result<(), CaptureError> {
        if on == self.camera.is_enabled() {
            return Ok(());
        }
        self.toggle_camera().await.map(|_| ())
    }

    pub async fn switch_facing(&mut self) -> Result<(), CaptureError> {
        let facing = self.camera.facing().toggled();
        info!(facing = facing.as_constraint(), "Switching camera");
        let result = self.camera.switch_facing(facing).await;
        self.record(result)
    }

    /// Freeze the current frame into the session.
    pub fn capture(&mut self) -> Result<(), CaptureError> {
        let still = self.camera.capture();
        let still = self.record(still)?;
        self.session.set_captured(still);
        Ok(())
    }

    pub async fn submit(&self, client: &dyn RecognitionClient) -> SubmitOutcome {
        self.session.submit(client).await
    }

    pub fn copy(&self, clipboard: &dyn Clipboard) -> Result<bool, ClipboardError> {
        self.session.copy_full_text(clipboard)
    }

    pub fn view(&self) -> ViewModel {
        self.session.view()
    }

    fn record<T>(&self, result: Result<T, CaptureError>) -> Result<T, CaptureError> {
        match &result {
            Ok(_) => self.session.clear_capture_error(),
            Err(e) => self.session.set_capture_error(e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use async_trait::async_trait;
    use image::{Rgba, RgbaImage};
    use textcam_capture::StillImageDevice;
    use textcam_core::{CapturedImage, RecognitionResult, TextAnnotation};

    struct EchoClient;

    #[async_trait]
    impl RecognitionClient for EchoClient {
        async fn analyze(&self, image: &CapturedImage) -> Result<RecognitionResult, ClientError> {
            Ok(RecognitionResult::from_annotations(vec![TextAnnotation::new(image.mime.clone())]))
        }
    }

    struct NoCamera;

    #[async_trait]
    impl MediaDevices for NoCamera {
        async fn acquire(
            &self,
            _facing: FacingMode,
        ) -> Result<Box<dyn textcam_capture::MediaStream>, CaptureError> {
            Err(CaptureError::PermissionDenied)
        }
    }

    fn app() -> CaptureApp<StillImageDevice> {
        let device = StillImageDevice::new(RgbaImage::from_pixel(4, 3, Rgba([255, 255, 255, 255])));
        CaptureApp::new(CameraController::new(device), Arc::new(Session::default()))
    }

    #[tokio::test]
    async fn test_capture_then_submit() {
        let mut app = app();
        assert!(app.toggle_camera().await.unwrap());
        assert!(app.view().live_preview);

        app.capture().unwrap();
        let view = app.view();
        assert!(view.still.unwrap().starts_with("data:image/png;base64,"));
        assert!(view.submit_enabled);

        assert_eq!(app.submit(&EchoClient).await, SubmitOutcome::Completed);
        assert_eq!(app.view().result.unwrap().full_text, "image/png");
    }

    #[tokio::test]
    async fn test_capture_without_camera_sets_guidance() {
        let mut app = app();
        assert_eq!(app.capture().unwrap_err(), CaptureError::NotReady);
        assert!(app.view().capture_error.is_some());
        assert!(app.view().still.is_none());
    }

    #[tokio::test]
    async fn test_permission_denied_is_shown_inline() {
        let mut app = CaptureApp::new(CameraController::new(NoCamera), Arc::new(Session::default()));
        assert_eq!(app.toggle_camera().await.unwrap_err(), CaptureError::PermissionDenied);

        let view = app.view();
        assert_eq!(view.capture_error, Some(CaptureError::PermissionDenied.to_string()));
        assert!(view.live_preview);
        assert!(matches!(app.camera_state(), StreamState::Error(_)));

        // switching off clears the guidance
        assert!(!app.toggle_camera().await.unwrap());
        assert!(app.view().capture_error.is_none());
    }

    #[tokio::test]
    async fn test_switch_facing_keeps_camera_on() {
        let mut app = app();
        app.set_camera(true).await.unwrap();
        let before = app.facing();
        app.switch_facing().await.unwrap();
        assert_eq!(app.facing(), before.toggled());
        assert!(matches!(app.camera_state(), StreamState::Ready { .. }));
    }
}
