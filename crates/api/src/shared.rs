// ABOUTME: Shared application state and the API error type with its HTTP status mapping.
// ABOUTME: AppState carries the key store, rate limiter, and scrape client behind Arcs.

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::keys::{ApiKey, KeyStore};
use crate::ratelimit::RateLimiter;

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<dyn KeyStore + Send + Sync>,
    pub limiter: Arc<RateLimiter>,
    pub scraper: Arc<playerstats_scrape::Client>,
}

impl AppState {
    pub fn new(
        keys: Arc<dyn KeyStore + Send + Sync>,
        limiter: Arc<RateLimiter>,
        scraper: Arc<playerstats_scrape::Client>,
    ) -> Self {
        Self {
            keys,
            limiter,
            scraper,
        }
    }

    /// Validates the request credential and applies the per-route quota.
    ///
    /// The same 403 is returned for a missing and an unknown key so the
    /// response never confirms which keys exist.
    pub async fn authorize(&self, headers: &HeaderMap, route: &str) -> Result<ApiKey, AppError> {
        let presented = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Forbidden("invalid or missing API key".to_string()))?;

        let credential = self
            .keys
            .get(presented)
            .await?
            .ok_or_else(|| AppError::Forbidden("invalid or missing API key".to_string()))?;

        if !self.limiter.check(&credential.key, route) {
            debug!(user = %credential.user, route = %route, "rate limit exceeded");
            return Err(AppError::RateLimited);
        }
        Ok(credential)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate limit exceeded".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Store(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("store error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::keys::InMemoryKeyStore;

    /// Builds an AppState over an in-memory key store, the default quota,
    /// and a scrape client pointed at the given solver URL.
    pub fn state_with(keys: Vec<ApiKey>, solver_url: &str) -> AppState {
        AppState::new(
            Arc::new(InMemoryKeyStore::with_keys(keys)),
            Arc::new(RateLimiter::default_policy()),
            Arc::new(
                playerstats_scrape::Client::builder()
                    .solver_url(solver_url)
                    .build(),
            ),
        )
    }
}
