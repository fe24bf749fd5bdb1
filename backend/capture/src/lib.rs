//! Capture surface: acquires a camera stream, tracks its lifecycle and freezes frames into
//! encoded stills.

pub mod controller;
pub mod device;
pub mod encoder;
pub mod still_device;

pub use controller::{CameraController, StreamState};
pub use device::{FacingMode, MediaDevices, MediaStream};
pub use encoder::{StillEncoder, StillFormat};
pub use still_device::StillImageDevice;
