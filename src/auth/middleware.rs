//! Axum extractors for admin sessions and rate limiting.

use crate::auth::cookie::{cookie_value, SESSION_COOKIE};
use crate::auth::token::{SessionIdentity, SessionKeys};
use crate::config::Config;
use crate::error::AppError;
use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use redis::AsyncCommands;
use std::convert::Infallible;
use std::sync::Arc;

/// Application state shared across handlers.
///
/// Built once in `main` and handed to the router; nothing is looked up
/// globally.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionKeys>,
}

impl AppState {
    pub fn new(redis: redis::Client, config: Config) -> Self {
        let sessions = SessionKeys::new(config.jwt_secret.as_bytes(), config.session_ttl_secs);
        Self {
            redis,
            config: Arc::new(config),
            sessions: Arc::new(sessions),
        }
    }

    /// Open a multiplexed Redis connection for one request.
    pub async fn redis_connection(
        &self,
    ) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))
    }

    /// Resolve the admin identity carried by the request's session cookie.
    pub fn session_from_parts(&self, parts: &Parts) -> Option<SessionIdentity> {
        let token = cookie_value(&parts.headers, SESSION_COOKIE)?;
        self.sessions.verify(token).ok()
    }
}

/// Admin session extractor.
///
/// Reads the `auth-token` cookie and verifies it.
/// Returns 401 Unauthorized if missing, malformed, forged, or expired.
pub struct AdminSession(pub SessionIdentity);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state
            .session_from_parts(parts)
            .map(AdminSession)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))
    }
}

/// Optional admin session extractor.
///
/// Yields `Some(AdminSession)` for a valid cookie, `None` otherwise.
/// Never fails the request.
impl OptionalFromRequestParts<AppState> for AdminSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(state.session_from_parts(parts).map(AdminSession))
    }
}

/// Check rate limit using Redis INCR with TTL.
///
/// # Arguments
/// * `con` - Redis connection
/// * `key` - Rate limit key (e.g., "ratelimit:login:127.0.0.1")
/// * `max` - Maximum requests allowed in window
/// * `window_secs` - Time window in seconds
///
/// # Returns
/// * `Ok(true)` if under limit
/// * `Ok(false)` if limit exceeded
pub async fn check_rate_limit<C>(
    con: &mut C,
    key: &str,
    max: u32,
    window_secs: u64,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let count: u32 = con.incr(key, 1).await?;

    // Set TTL on first request
    if count == 1 {
        con.expire::<_, ()>(key, window_secs as i64).await?;
    }

    Ok(count <= max)
}
