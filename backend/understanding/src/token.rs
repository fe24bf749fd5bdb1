//! OAuth access tokens for Google APIs.
//!
//! A service account signs a short-lived RS256 assertion and trades it at the key's
//! `token_uri` for a bearer token (the JWT bearer grant). Tokens are reused until shortly
//! before they expire.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use textcam_core::{ConfigError, UpstreamError, UpstreamErrorKind};

use crate::credentials::ServiceAccountKey;

pub const VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Supplies bearer tokens for outbound API calls.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, UpstreamError>;
}

/// A fixed token, e.g. one minted out of band.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, UpstreamError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Mints tokens from a service-account key.
pub struct ServiceAccountTokenSource {
    client: reqwest::Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(client: reqwest::Client, key: ServiceAccountKey) -> Result<Self, ConfigError> {
        let encoding_key = key.encoding_key()?;
        Ok(Self {
            client,
            key,
            encoding_key,
            scope: VISION_SCOPE.to_string(),
            cached: Mutex::new(None),
        })
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    fn signed_assertion(&self) -> Result<String, UpstreamError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::PermissionDenied, format!("signing assertion: {e}")))
    }

    async fn exchange(&self) -> Result<CachedToken, UpstreamError> {
        let assertion = self.signed_assertion()?;

        debug!(token_uri = %self.key.token_uri, "Requesting Google access token");
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::Unknown, format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // invalid_grant and friends mean the credentials themselves are rejected.
            let kind = if status.is_client_error() && status.as_u16() != 429 {
                UpstreamErrorKind::PermissionDenied
            } else {
                UpstreamError::classify(Some(status.as_u16()), None, &body).kind
            };
            return Err(UpstreamError::new(kind, format!("token endpoint returned {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::new(UpstreamErrorKind::Unknown, format!("token response: {e}")))?;

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, UpstreamError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() + REFRESH_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.exchange().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::tests::key_json;
    use axum::{extract::State, routing::post, Form, Json, Router};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    struct TokenServer {
        hits: Arc<AtomicUsize>,
        last_form: Arc<std::sync::Mutex<HashMap<String, String>>>,
    }

    async fn issue_token(
        State(server): State<TokenServer>,
        Form(form): Form<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        let n = server.hits.fetch_add(1, Ordering::SeqCst) + 1;
        *server.last_form.lock().unwrap() = form;
        Json(serde_json::json!({
            "access_token": format!("ya29.token-{n}"),
            "expires_in": 3599,
            "token_type": "Bearer"
        }))
    }

    async fn spawn_token_server(server: TokenServer) -> String {
        let app = Router::new().route("/token", post(issue_token)).with_state(server);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/token")
    }

    #[tokio::test]
    async fn test_static_token() {
        let source = StaticToken::new("abc");
        assert_eq!(source.access_token().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_exchanges_signed_assertion_and_caches() {
        let server = TokenServer::default();
        let token_uri = spawn_token_server(server.clone()).await;

        let mut key = ServiceAccountKey::from_json(&key_json(Some("demo"))).unwrap();
        key.token_uri = token_uri;
        let source = ServiceAccountTokenSource::new(reqwest::Client::new(), key).unwrap();

        assert_eq!(source.access_token().await.unwrap(), "ya29.token-1");
        assert_eq!(source.access_token().await.unwrap(), "ya29.token-1");
        assert_eq!(server.hits.load(Ordering::SeqCst), 1);

        let form = server.last_form.lock().unwrap().clone();
        assert_eq!(form.get("grant_type").map(String::as_str), Some(JWT_BEARER_GRANT));
        let assertion = form.get("assertion").unwrap();
        assert_eq!(assertion.split('.').count(), 3);
    }

    #[tokio::test]
    async fn test_rejected_credentials_map_to_permission_denied() {
        let app = Router::new().route(
            "/token",
            post(|| async {
                (
                    axum::http::StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": "invalid_grant" })),
                )
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut key = ServiceAccountKey::from_json(&key_json(None)).unwrap();
        key.token_uri = format!("http://{addr}/token");
        let source = ServiceAccountTokenSource::new(reqwest::Client::new(), key).unwrap();

        let err = source.access_token().await.unwrap_err();
        assert_eq!(err.kind, UpstreamErrorKind::PermissionDenied);
    }
}
