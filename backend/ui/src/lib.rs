//! Presentation layer for textcam.
//!
//! Exposes the session view state, the capture app that ties it to a camera, and the
//! collaborators it talks to (gateway client, clipboard).

pub mod app;
pub mod client;
pub mod clipboard;
pub mod render;
pub mod session;

pub use app::CaptureApp;
pub use client::{ClientError, HttpRecognitionClient, RecognitionClient};
pub use clipboard::{Clipboard, ClipboardError, Osc52Clipboard};
pub use render::render_text;
pub use session::{CameraOffPolicy, ResultView, Session, SubmitOutcome, ViewModel, COPY_ACK_DURATION};
