//! Bearer-token authentication.
//!
//! Token issuance lives elsewhere; this module only asks a [`TokenVerifier`]
//! whether the presented token is acceptable and rejects the request otherwise.

use crate::config::AuthConfig;
use crate::http::{
    AppState,
    envelope::{UNAUTHENTICATED_MESSAGE, failure},
};
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Decides whether a bearer token grants access
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> bool;
}

/// Accepts a fixed set of tokens from configuration
#[derive(Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: HashSet<String>,
}

impl StaticTokenVerifier {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.tokens.iter().cloned())
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware rejecting requests without a valid bearer token with a 401 envelope
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token);

    let authorized = match token {
        Some(token) => state.verifier.verify(token).await,
        None => false,
    };

    if authorized {
        debug!("Bearer token accepted");
        next.run(request).await
    } else {
        warn!(path = %request.uri().path(), "Missing or invalid bearer token");
        failure(StatusCode::UNAUTHORIZED, UNAUTHENTICATED_MESSAGE, None)
    }
}
