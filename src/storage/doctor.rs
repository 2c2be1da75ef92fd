//! Doctor storage operations.
//!
//! Redis key patterns:
//! - `doctor:{nanoid}`: doctor profile (JSON)

use crate::models::Doctor;
use crate::storage::{delete_key, get_json, list_json, replace_json, to_json};
use redis::AsyncCommands;

fn doctor_key(id: &str) -> String {
    format!("doctor:{}", id)
}

/// Store a new doctor profile.
pub async fn store_doctor<C>(con: &mut C, doctor: &Doctor) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(doctor)?;
    con.set::<_, _, ()>(doctor_key(&doctor.id), json).await
}

/// Overwrite an existing doctor profile.
///
/// Returns false if the doctor was deleted in the meantime.
pub async fn update_doctor<C>(con: &mut C, doctor: &Doctor) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    replace_json(con, &doctor_key(&doctor.id), doctor).await
}

/// Get a doctor by ID.
pub async fn get_doctor<C>(con: &mut C, id: &str) -> Result<Option<Doctor>, redis::RedisError>
where
    C: AsyncCommands,
{
    get_json(con, &doctor_key(id)).await
}

/// Delete a doctor. Returns false if no such doctor existed.
pub async fn delete_doctor<C>(con: &mut C, id: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    delete_key(con, &doctor_key(id)).await
}

/// List all doctors (unordered).
pub async fn list_doctors<C>(con: &mut C) -> Result<Vec<Doctor>, redis::RedisError>
where
    C: AsyncCommands,
{
    list_json(con, "doctor:*").await
}
