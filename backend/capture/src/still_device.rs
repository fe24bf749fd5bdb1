//! A virtual camera that streams a single image file.
//!
//! Lets the command line drive the same capture path as a real camera.

use std::path::Path;

use async_trait::async_trait;
use image::RgbaImage;
use tracing::debug;

use textcam_core::CaptureError;

use crate::device::{FacingMode, MediaDevices, MediaStream};

pub struct StillImageDevice {
    frame: RgbaImage,
}

impl StillImageDevice {
    pub fn new(frame: RgbaImage) -> Self {
        Self { frame }
    }

    /// Decode an image file to use as the camera feed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => CaptureError::NoCamera,
            other => CaptureError::Device(format!("{}: {other}", path.display())),
        })?;
        Ok(Self::new(image.to_rgba8()))
    }
}

#[async_trait]
impl MediaDevices for StillImageDevice {
    async fn acquire(&self, facing: FacingMode) -> Result<Box<dyn MediaStream>, CaptureError> {
        debug!(facing = facing.as_constraint(), "Virtual camera ignores facing mode");
        Ok(Box::new(StillStream {
            frame: Some(self.frame.clone()),
        }))
    }
}

struct StillStream {
    frame: Option<RgbaImage>,
}

impl MediaStream for StillStream {
    fn dimensions(&self) -> (u32, u32) {
        self.frame.as_ref().map(|f| f.dimensions()).unwrap_or((0, 0))
    }

    fn read_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        self.frame.clone().ok_or(CaptureError::NotReady)
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}
