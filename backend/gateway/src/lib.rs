//! textcam Gateway HTTP API Server
//!
//! Hosts the recognition endpoint, a health probe and the browser capture page.

pub mod analyze;
pub mod control_ui;
pub mod health_api;
pub mod server;

pub use analyze::AnalyzeError;
pub use server::{build_router, start_server, GatewayState, RecognizerSlot, ServerOptions, DEFAULT_MAX_BODY_BYTES};
