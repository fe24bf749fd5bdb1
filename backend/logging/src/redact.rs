//! Log Redaction Layer
//!
//! Scrubs OAuth tokens and service-account key material from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static PEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-----BEGIN [A-Z ]*PRIVATE KEY-----[\s\S]*?-----END [A-Z ]*PRIVATE KEY-----").unwrap()
});
static KEY_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""private_key"\s*:\s*"(?:[^"\\]|\\.)*""#).unwrap());
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(ya29\.[a-zA-Z0-9\-_\.]+)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = KEY_FIELD_RE.replace_all(input, r#""private_key":"[REDACTED_KEY]""#);
    let redacted = PEM_RE.replace_all(&redacted, "[REDACTED_KEY]");
    TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]").into_owned()
}
