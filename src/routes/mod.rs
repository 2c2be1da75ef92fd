//! API route handlers and application assembly.

pub mod auth;
pub mod blogs;
pub mod contact;
pub mod doctors;
pub mod hospital;

use crate::auth::middleware::{check_rate_limit, AppState};
use crate::content::MAX_SLUG_LEN;
use crate::error::AppError;
use crate::middleware::{admin_pages, security_headers};
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Longest accepted path identifier. Slugs are the longest ids in use.
const MAX_ID_LEN: usize = MAX_SLUG_LEN;

/// Validate a path identifier (nanoid or slug: alphanumeric, hyphens, underscores).
pub fn validate_id(id: &str, label: &str) -> Result<(), AppError> {
    if id.is_empty()
        || id.len() > MAX_ID_LEN
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(format!("Invalid {} format", label)));
    }
    Ok(())
}

/// Count a request against the per-IP limit for `scope`.
///
/// The IP is only logged as a hash.
pub async fn enforce_rate_limit<C>(
    con: &mut C,
    scope: &str,
    ip: IpAddr,
    max_per_min: u32,
) -> Result<(), AppError>
where
    C: redis::AsyncCommands,
{
    let key = format!("ratelimit:{}:{}", scope, ip);
    let allowed = check_rate_limit(con, &key, max_per_min, 60)
        .await
        .map_err(|e| AppError::Internal(format!("Rate limit check failed: {}", e)))?;

    if !allowed {
        let mut hasher = std::hash::DefaultHasher::new();
        ip.hash(&mut hasher);
        let ip_hash = format!("{:x}", hasher.finish());
        tracing::warn!(action = "rate_limited", endpoint = %scope, ip_hash = %ip_hash, "Rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(())
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth endpoints
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/password", post(auth::change_password))
        // Hospital info
        .route(
            "/api/hospital-info",
            get(hospital::get_info).put(hospital::update_info),
        )
        // Doctors
        .route(
            "/api/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/api/doctors/{id}",
            get(doctors::get_doctor)
                .put(doctors::update_doctor)
                .delete(doctors::delete_doctor),
        )
        // Blogs ({id} also accepts a slug on GET)
        .route("/api/blogs", get(blogs::list_posts).post(blogs::create_post))
        .route(
            "/api/blogs/{id}",
            get(blogs::get_post)
                .put(blogs::update_post)
                .delete(blogs::delete_post),
        )
        // Contact messages
        .route(
            "/api/contact",
            post(contact::submit_message).get(contact::list_messages),
        )
        .route(
            "/api/contact/{id}",
            patch(contact::mark_read).delete(contact::delete_message),
        )
}

/// Assemble the full application: API routes, admin page gate, static
/// files, body limit, CORS, and security headers.
pub fn build_app(state: AppState) -> Router {
    // Explicit CORS: deny all cross-origin requests (single-origin deployment).
    let cors = CorsLayer::new();

    api_router()
        .fallback_service(ServeDir::new("static"))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            admin_pages,
        ))
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_body_bytes,
        ))
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("V1StGXR8_Z5j", "doctor ID").is_ok());
        assert!(validate_id("heart-health-tips", "blog ID").is_ok());

        assert!(validate_id("", "doctor ID").is_err());
        assert!(validate_id("../etc/passwd", "doctor ID").is_err());
        assert!(validate_id("a b", "doctor ID").is_err());
        assert!(validate_id("doctor:*", "doctor ID").is_err());
        assert!(validate_id(&"a".repeat(MAX_ID_LEN + 1), "doctor ID").is_err());

        match validate_id("bad id", "contact ID") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid contact ID format"),
            _ => panic!("Expected BadRequest"),
        }
    }

    #[test]
    fn test_every_valid_slug_is_a_valid_id() {
        let long_title = "Understanding heart health ".repeat(6);
        let slug = crate::content::derive_slug(&long_title);
        assert!(validate_id(&slug, "blog ID").is_ok());

        let widest = "a".repeat(MAX_SLUG_LEN);
        assert!(crate::content::is_slug(&widest));
        assert!(validate_id(&widest, "blog ID").is_ok());
    }
}
