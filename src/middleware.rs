//! HTTP middleware: security headers and the admin page gate.

use crate::auth::middleware::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Path prefix of the back-office pages.
pub const ADMIN_PREFIX: &str = "/admin";

/// Where unauthenticated admin page requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// Middleware that adds security headers to all responses.
///
/// - **X-Content-Type-Options: nosniff** forces browsers to respect the
///   declared Content-Type.
/// - **X-Frame-Options: DENY** and `frame-ancestors 'none'` prevent
///   clickjacking.
/// - **Referrer-Policy: strict-origin-when-cross-origin** keeps paths and
///   query strings on-site.
/// - **Strict-Transport-Security** pins HTTPS for 2 years.
/// - **Permissions-Policy** disables camera, microphone, and payment APIs.
///
/// The CSP allows same-origin scripts, Google Fonts, and images from any
/// HTTPS host (doctor photos and blog images are hosted externally).
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains"),
    );
    headers.insert(
        "permissions-policy",
        HeaderValue::from_static("camera=(), microphone=(), payment=()"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self' fonts.googleapis.com; \
             font-src fonts.gstatic.com; \
             img-src 'self' data: https:; \
             object-src 'none'; \
             frame-ancestors 'none'; \
             base-uri 'self'; \
             form-action 'self'",
        ),
    );

    response
}

fn is_admin_page(path: &str) -> bool {
    path.strip_prefix(ADMIN_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Redirect `/admin` page requests without a valid session cookie to the
/// login page (303 See Other). All other requests pass through untouched.
pub async fn admin_pages(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if is_admin_page(request.uri().path()) {
        let (parts, body) = request.into_parts();
        if state.session_from_parts(&parts).is_none() {
            tracing::debug!(path = %parts.uri.path(), "Redirecting unauthenticated admin page request");
            return Redirect::to(LOGIN_PATH).into_response();
        }
        return next.run(Request::from_parts(parts, body)).await;
    }

    next.run(request).await
}
