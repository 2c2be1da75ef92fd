//! Admin account storage.
//!
//! Redis key patterns:
//! - `admin:{username}`: admin account with its Argon2 password hash (JSON)
//!
//! ## Security: Zeroizing Sensitive Data
//!
//! Admin documents carry a password hash, so the raw JSON read from or
//! written to Redis is held in `Zeroizing` buffers and cleared on drop.

use crate::models::StoredAdmin;
use crate::storage::from_json;
use redis::AsyncCommands;
use zeroize::Zeroizing;

fn admin_key(username: &str) -> String {
    format!("admin:{}", username)
}

fn admin_json(admin: &StoredAdmin) -> Result<Zeroizing<String>, redis::RedisError> {
    crate::storage::to_json(admin).map(Zeroizing::new)
}

/// Create the configured admin account if it does not exist yet.
///
/// Uses SET NX so a password changed through the API survives restarts.
/// Returns true if the account was created.
pub async fn seed_admin<C>(
    con: &mut C,
    username: &str,
    password_hash: &str,
    email: Option<&str>,
    now: u64,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let admin = StoredAdmin {
        id: nanoid::nanoid!(12),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        email: email.map(str::to_string),
        created_at: now,
        last_login: None,
    };
    let json = admin_json(&admin)?;
    con.set_nx(admin_key(username), json.as_str()).await
}

/// Get an admin account by username.
pub async fn get_admin<C>(
    con: &mut C,
    username: &str,
) -> Result<Option<StoredAdmin>, redis::RedisError>
where
    C: AsyncCommands,
{
    let json: Option<String> = con.get(admin_key(username)).await?;
    match json {
        Some(data) => {
            let zeroizing_data = Zeroizing::new(data);
            from_json(&zeroizing_data).map(Some)
        }
        None => Ok(None),
    }
}

/// Overwrite an admin account (last login, password changes).
pub async fn store_admin<C>(con: &mut C, admin: &StoredAdmin) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = admin_json(admin)?;
    con.set::<_, _, ()>(admin_key(&admin.username), json.as_str())
        .await
}
