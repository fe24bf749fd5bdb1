//! Browser capture page.
//!
//! A single self-contained page: live camera preview, capture, analysis and copy. It talks to
//! `POST /analyze-image` on the same origin.

use axum::{response::Html, routing::get, Router};

use crate::server::GatewayState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Returns a router that serves the capture page.
pub fn ui_router() -> Router<GatewayState> {
    Router::new().route("/", get(|| async { Html(INDEX_HTML) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_posts_to_gateway() {
        assert!(INDEX_HTML.contains("/analyze-image"));
        assert!(INDEX_HTML.contains("getUserMedia"));
    }
}
