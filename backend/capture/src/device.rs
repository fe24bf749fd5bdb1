//! Platform camera seam.
//!
//! The browser's `getUserMedia` and a video track are modelled as two small traits so the
//! stream lifecycle can be driven and tested without real hardware.

use async_trait::async_trait;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use textcam_core::CaptureError;

/// Which camera to ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera.
    User,
    /// Back camera.
    #[default]
    Environment,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }

    /// Value of the `facingMode` media constraint.
    pub fn as_constraint(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Environment => "environment",
        }
    }
}

/// Source of camera streams.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn acquire(&self, facing: FacingMode) -> Result<Box<dyn MediaStream>, CaptureError>;
}

/// A held camera stream. Must be stopped to release the hardware.
pub trait MediaStream: Send {
    /// Native frame size; `(0, 0)` until the stream's metadata has loaded.
    fn dimensions(&self) -> (u32, u32);

    /// Sample the current frame at native resolution.
    fn read_frame(&mut self) -> Result<RgbaImage, CaptureError>;

    /// Release the underlying tracks.
    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_toggle() {
        assert_eq!(FacingMode::User.toggled(), FacingMode::Environment);
        assert_eq!(FacingMode::default().toggled(), FacingMode::User);
        assert_eq!(FacingMode::User.as_constraint(), "user");
    }
}
