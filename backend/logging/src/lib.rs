//! Structured logging for textcam.
//!
//! Console plus rolling NDJSON file output, and redaction of credentials before they reach
//! either.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
