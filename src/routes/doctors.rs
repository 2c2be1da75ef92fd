//! Doctor API endpoints (reads are public, writes require AdminSession).

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::filter::filter_doctors;
use crate::models::{unix_now, DataResponse, DoctorInput, DoctorQuery, DoctorUpdate, MessageResponse};
use crate::storage;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

fn not_found() -> AppError {
    AppError::NotFound("Doctor not found".to_string())
}

/// GET /api/doctors: List doctors, optionally filtered by search/specialty
pub async fn list_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state.redis_connection().await?;

    let doctors = storage::doctor::list_doctors(&mut con).await?;
    let doctors = filter_doctors(doctors, &query)
        .map_err(|e| AppError::BadRequest(format!("Invalid search term: {}", e)))?;

    Ok(Json(DataResponse::new(doctors)))
}

/// GET /api/doctors/:id: Get one doctor
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "doctor ID")?;

    let mut con = state.redis_connection().await?;
    let doctor = storage::doctor::get_doctor(&mut con, &id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(DataResponse::new(doctor)))
}

/// POST /api/doctors: Create a doctor
pub async fn create_doctor(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    Json(input): Json<DoctorInput>,
) -> Result<impl IntoResponse, AppError> {
    let doctor = input.into_doctor(nanoid::nanoid!(12), unix_now())?;

    let mut con = state.redis_connection().await?;
    storage::doctor::store_doctor(&mut con, &doctor).await?;

    tracing::info!(action = "doctor_created", doctor_id = %doctor.id, admin = %session.username, "Doctor created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(doctor))))
}

/// PUT /api/doctors/:id: Update fields of a doctor
pub async fn update_doctor(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<DoctorUpdate>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "doctor ID")?;

    let mut con = state.redis_connection().await?;
    let mut doctor = storage::doctor::get_doctor(&mut con, &id)
        .await?
        .ok_or_else(not_found)?;

    update.apply(&mut doctor, unix_now())?;
    if !storage::doctor::update_doctor(&mut con, &doctor).await? {
        return Err(not_found());
    }

    tracing::info!(action = "doctor_updated", doctor_id = %doctor.id, admin = %session.username, "Doctor updated");

    Ok(Json(DataResponse::new(doctor)))
}

/// DELETE /api/doctors/:id: Delete a doctor
pub async fn delete_doctor(
    AdminSession(session): AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "doctor ID")?;

    let mut con = state.redis_connection().await?;
    if !storage::doctor::delete_doctor(&mut con, &id).await? {
        return Err(not_found());
    }

    tracing::info!(action = "doctor_deleted", doctor_id = %id, admin = %session.username, "Doctor deleted");

    Ok(Json(MessageResponse::new("Doctor deleted successfully")))
}
