//! Hospital info storage.
//!
//! Redis key patterns:
//! - `hospital_info`: singleton document (JSON)

use crate::models::{unix_now, HospitalInfo};
use crate::storage::{from_json, to_json};
use redis::AsyncCommands;

pub const HOSPITAL_INFO_KEY: &str = "hospital_info";

/// Get the hospital info, creating the default document on first access.
///
/// The default is written with SET NX so concurrent first requests agree on
/// a single document.
pub async fn get_or_create_info<C>(con: &mut C) -> Result<HospitalInfo, redis::RedisError>
where
    C: AsyncCommands,
{
    let json: Option<String> = con.get(HOSPITAL_INFO_KEY).await?;
    if let Some(data) = json {
        return from_json(&data);
    }

    let initial = HospitalInfo::initial(unix_now());
    let created: bool = con.set_nx(HOSPITAL_INFO_KEY, to_json(&initial)?).await?;
    if created {
        tracing::info!(action = "hospital_info_created", "Created default hospital info");
        return Ok(initial);
    }

    // Lost the race; read what the winner stored
    let data: String = con.get(HOSPITAL_INFO_KEY).await?;
    from_json(&data)
}

/// Replace the hospital info document.
pub async fn store_info<C>(con: &mut C, info: &HospitalInfo) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(info)?;
    con.set::<_, _, ()>(HOSPITAL_INFO_KEY, json).await
}
