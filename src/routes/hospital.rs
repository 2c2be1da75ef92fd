//! Hospital info endpoints.

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::models::{unix_now, DataResponse, HospitalInfoUpdate};
use crate::storage;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /api/hospital-info: Public hospital info (created with defaults on first read)
pub async fn get_info(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;
    let info = storage::hospital::get_or_create_info(&mut con).await?;
    Ok(Json(DataResponse::new(info)))
}

/// PUT /api/hospital-info: Replace sections of the hospital info
pub async fn update_info(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    Json(update): Json<HospitalInfoUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;

    let mut info = storage::hospital::get_or_create_info(&mut con).await?;
    update.apply(&mut info, unix_now())?;
    storage::hospital::store_info(&mut con, &info).await?;

    tracing::info!(action = "hospital_info_updated", admin = %session.username, "Hospital info updated");

    Ok(Json(DataResponse::new(info)))
}
