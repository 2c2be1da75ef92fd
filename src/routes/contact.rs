//! Contact form endpoints.
//!
//! Submitting is public and rate-limited; reading and managing messages
//! requires AdminSession.

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::filter::sort_messages;
use crate::models::{unix_now, ContactInput, ContactReadUpdate, DataResponse, MessageResponse};
use crate::storage;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::net::SocketAddr;

fn not_found() -> AppError {
    AppError::NotFound("Message not found".to_string())
}

/// POST /api/contact: Submit a contact message
pub async fn submit_message(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(input): Json<ContactInput>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;

    super::enforce_rate_limit(
        &mut con,
        "contact",
        addr.ip(),
        state.config.rate_limit_contact_per_min,
    )
    .await?;

    let message = input.into_message(nanoid::nanoid!(12), unix_now())?;
    storage::contact::store_message(&mut con, &message).await?;

    tracing::info!(action = "contact_submitted", message_id = %message.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Your message has been sent successfully. We will get back to you soon!",
        )),
    ))
}

/// GET /api/contact: List messages, newest first
pub async fn list_messages(
    AdminSession(_session): AdminSession,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;

    let mut messages = storage::contact::list_messages(&mut con).await?;
    sort_messages(&mut messages);

    Ok(Json(DataResponse::new(messages)))
}

/// PATCH /api/contact/:id: Mark a message read or unread
pub async fn mark_read(
    AdminSession(_session): AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ContactReadUpdate>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "message ID")?;

    let mut con = state.redis_connection().await?;
    let mut message = storage::contact::get_message(&mut con, &id)
        .await?
        .ok_or_else(not_found)?;

    message.read = update.read;
    if !storage::contact::update_message(&mut con, &message).await? {
        return Err(not_found());
    }

    Ok(Json(DataResponse::new(message)))
}

/// DELETE /api/contact/:id: Delete a message
pub async fn delete_message(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "message ID")?;

    let mut con = state.redis_connection().await?;
    if !storage::contact::delete_message(&mut con, &id).await? {
        return Err(not_found());
    }

    tracing::info!(action = "contact_deleted", message_id = %id, admin = %session.username, "Contact message deleted");

    Ok(Json(MessageResponse::new("Message deleted successfully")))
}
