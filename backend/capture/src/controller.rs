//! Camera stream lifecycle.
//!
//! The stream moves through `Idle → Acquiring → Ready → Released`, or into `Error` when
//! acquisition fails. At most one stream is held at a time: every re-acquisition and every
//! switch-off stops the held stream first.

use tracing::{debug, info, warn};

use textcam_core::{CaptureError, CapturedImage};

use crate::device::{FacingMode, MediaDevices, MediaStream};
use crate::encoder::StillEncoder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Acquiring,
    Ready { width: u32, height: u32 },
    Released,
    Error(CaptureError),
}

type TransitionHook = Box<dyn Fn(&StreamState, &StreamState) + Send + Sync>;

pub struct CameraController<D> {
    devices: D,
    facing: FacingMode,
    enabled: bool,
    state: StreamState,
    stream: Option<Box<dyn MediaStream>>,
    encoder: StillEncoder,
    hooks: Vec<TransitionHook>,
}

impl<D: MediaDevices> CameraController<D> {
    pub fn new(devices: D) -> Self {
        Self {
            devices,
            facing: FacingMode::default(),
            enabled: false,
            state: StreamState::Idle,
            stream: None,
            encoder: StillEncoder::default(),
            hooks: Vec::new(),
        }
    }

    pub fn with_facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_encoder(mut self, encoder: StillEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Register a hook run on every state change with `(from, to)`.
    pub fn on_transition<F>(&mut self, hook: F)
    where
        F: Fn(&StreamState, &StreamState) + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    /// Whether the user wants the camera on (regardless of acquisition outcome).
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a stream is currently held.
    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    fn transition(&mut self, to: StreamState) {
        if self.state == to {
            return;
        }
        let from = std::mem::replace(&mut self.state, to);
        debug!(from = ?from, to = ?self.state, "Camera stream transition");
        for hook in &self.hooks {
            hook(&from, &self.state);
        }
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            self.transition(StreamState::Released);
        }
    }

    /// Turn the camera on, replacing any held stream.
    pub async fn enable(&mut self) -> Result<(), CaptureError> {
        self.enabled = true;
        self.release();
        self.transition(StreamState::Acquiring);

        match self.devices.acquire(self.facing).await {
            Ok(stream) => {
                info!(facing = self.facing.as_constraint(), "Camera stream acquired");
                self.stream = Some(stream);
                self.poll_metadata();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Camera stream acquisition failed");
                self.transition(StreamState::Error(e.clone()));
                Err(e)
            }
        }
    }

    /// Turn the camera off and release the stream.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.release();
        if matches!(self.state, StreamState::Acquiring | StreamState::Error(_)) {
            self.transition(StreamState::Released);
        }
    }

    /// Flip the on/off state. Returns whether the camera is now enabled.
    pub async fn toggle(&mut self) -> Result<bool, CaptureError> {
        if self.enabled {
            self.disable();
            Ok(false)
        } else {
            self.enable().await.map(|_| true)
        }
    }

    /// Change facing mode; re-acquires when the camera is on.
    pub async fn switch_facing(&mut self, facing: FacingMode) -> Result<(), CaptureError> {
        if facing == self.facing && self.stream.is_some() {
            return Ok(());
        }
        self.facing = facing;
        if self.enabled {
            self.enable().await
        } else {
            Ok(())
        }
    }

    /// Move `Acquiring → Ready` once the held stream reports its frame size.
    pub fn poll_metadata(&mut self) -> &StreamState {
        if let (StreamState::Acquiring, Some(stream)) = (&self.state, &self.stream) {
            let (width, height) = stream.dimensions();
            if width > 0 && height > 0 {
                self.transition(StreamState::Ready { width, height });
            }
        }
        &self.state
    }

    /// Freeze the current frame into an encoded still.
    pub fn capture(&mut self) -> Result<CapturedImage, CaptureError> {
        self.poll_metadata();
        if !matches!(self.state, StreamState::Ready { .. }) {
            return Err(CaptureError::NotReady);
        }
        let stream = self.stream.as_mut().ok_or(CaptureError::NotReady)?;

        let frame = stream.read_frame()?;
        if frame.width() == 0 || frame.height() == 0 {
            return Err(CaptureError::NotReady);
        }

        let still = self.encoder.encode(&frame)?;
        info!(
            width = frame.width(),
            height = frame.height(),
            bytes = still.len(),
            "Captured still"
        );
        Ok(still)
    }
}

impl<D> Drop for CameraController<D> {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}
