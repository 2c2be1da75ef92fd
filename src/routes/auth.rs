//! Auth API endpoints.

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::middleware::{AdminSession, AppState};
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::error::AppError;
use crate::models::{unix_now, AdminInfo, ChangePasswordRequest, LoginRequest, MessageResponse};
use crate::storage;
use axum::{
    extract::{ConnectInfo, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::net::SocketAddr;

/// Run Argon2 off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Password task failed: {}", e)))?
}

/// POST /api/auth/login: Verify credentials and set the session cookie
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;

    super::enforce_rate_limit(
        &mut con,
        "login",
        addr.ip(),
        state.config.rate_limit_login_per_min,
    )
    .await?;

    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let username = req.username.trim().to_lowercase();
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let Some(mut admin) = storage::admin::get_admin(&mut con, &username).await? else {
        tracing::warn!(action = "login_failed", username = %username, "Unknown admin");
        return Err(invalid());
    };

    let password = req.password;
    let hash = admin.password_hash.clone();
    if !blocking(move || verify_password(&password, &hash)).await? {
        tracing::warn!(action = "login_failed", username = %username, "Invalid password");
        return Err(invalid());
    }

    admin.last_login = Some(unix_now());
    storage::admin::store_admin(&mut con, &admin).await?;

    let token = state
        .sessions
        .issue(&admin.id, &admin.username)
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))?;
    let cookie = session_cookie(&token, state.sessions.ttl_secs(), state.config.cookie_secure);

    tracing::info!(action = "login", user_id = %admin.id, username = %admin.username, "Admin logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "user": AdminInfo {
                id: admin.id,
                username: admin.username,
                email: admin.email,
            }
        })),
    ))
}

/// POST /api/auth/logout: Clear the session cookie
///
/// Tokens are stateless, so logging out only removes the cookie.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            header::SET_COOKIE,
            clear_session_cookie(state.config.cookie_secure),
        )],
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// GET /api/auth/verify: Report the identity behind the session cookie
pub async fn verify(AdminSession(identity): AdminSession) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "user": identity
    }))
}

/// POST /api/auth/password: Change the logged-in admin's password
pub async fn change_password(
    AdminSession(identity): AdminSession,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(AppError::BadRequest(
            "Current and new password are required".to_string(),
        ));
    }
    if req.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "New password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let mut con = state.redis_connection().await?;

    let mut admin = storage::admin::get_admin(&mut con, &identity.username)
        .await?
        .filter(|a| a.id == identity.user_id)
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

    let current = req.current_password;
    let hash = admin.password_hash.clone();
    if !blocking(move || verify_password(&current, &hash)).await? {
        tracing::warn!(action = "password_change_failed", user_id = %admin.id, "Current password mismatch");
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_password = req.new_password;
    admin.password_hash = blocking(move || hash_password(&new_password)).await?;
    storage::admin::store_admin(&mut con, &admin).await?;

    tracing::info!(action = "password_changed", user_id = %admin.id, "Admin password changed");

    Ok(Json(MessageResponse::new("Password updated successfully")))
}
