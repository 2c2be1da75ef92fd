//! Redis storage layer for doctors, blog posts, contact messages, hospital
//! info, and the admin account.
//!
//! All functions are async and use redis::AsyncCommands.
//! Data is serialized to JSON for storage in Redis.

pub mod admin;
pub mod blog;
pub mod contact;
pub mod doctor;
pub mod hospital;

use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

/// Maximum number of keys returned by scan_keys to prevent unbounded memory allocation.
const SCAN_MAX_KEYS: usize = 10_000;

/// Scan for Redis keys matching a pattern using SCAN (non-blocking).
///
/// Unlike KEYS, SCAN does not block the Redis server during iteration.
/// Capped at SCAN_MAX_KEYS results to prevent unbounded memory growth.
pub async fn scan_keys<C>(con: &mut C, pattern: &str) -> Result<Vec<String>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut all_keys = Vec::new();
    let mut cursor: u64 = 0;
    loop {
        let (new_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(100)
            .query_async(con)
            .await?;
        all_keys.extend(keys);
        if all_keys.len() >= SCAN_MAX_KEYS {
            all_keys.truncate(SCAN_MAX_KEYS);
            break;
        }
        cursor = new_cursor;
        if cursor == 0 {
            break;
        }
    }
    Ok(all_keys)
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, redis::RedisError> {
    serde_json::to_string(value).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::UnexpectedReturnType,
            "JSON serialize",
            e.to_string(),
        ))
    })
}

pub(crate) fn from_json<T: DeserializeOwned>(data: &str) -> Result<T, redis::RedisError> {
    serde_json::from_str(data).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::UnexpectedReturnType,
            "JSON deserialize",
            e.to_string(),
        ))
    })
}

/// GET a key and decode its JSON document.
pub async fn get_json<C, T>(con: &mut C, key: &str) -> Result<Option<T>, redis::RedisError>
where
    C: AsyncCommands,
    T: DeserializeOwned,
{
    let json: Option<String> = con.get(key).await?;
    json.map(|data| from_json(&data)).transpose()
}

/// Load every JSON document whose key matches `pattern`.
///
/// Documents that fail to decode are skipped with a warning rather than
/// failing the whole listing; keys deleted between SCAN and GET are ignored.
pub async fn list_json<C, T>(con: &mut C, pattern: &str) -> Result<Vec<T>, redis::RedisError>
where
    C: AsyncCommands,
    T: DeserializeOwned,
{
    let keys = scan_keys(con, pattern).await?;
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(con).await?;

    let mut docs = Vec::with_capacity(values.len());
    for (key, value) in keys.iter().zip(values) {
        let Some(data) = value else { continue };
        match from_json(&data) {
            Ok(doc) => docs.push(doc),
            Err(e) => tracing::warn!(key = %key, error = %e, "Skipping undecodable document"),
        }
    }
    Ok(docs)
}

/// Overwrite an existing JSON document with SET XX.
///
/// Returns false (and writes nothing) if the key is gone, so an update
/// racing a delete can never bring the document back.
pub async fn replace_json<C, T>(
    con: &mut C,
    key: &str,
    value: &T,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
    T: Serialize,
{
    let json = to_json(value)?;
    let reply: Option<String> = redis::cmd("SET")
        .arg(key)
        .arg(json)
        .arg("XX")
        .query_async(con)
        .await?;
    Ok(reply.is_some())
}

/// Delete a single key, reporting whether it existed.
pub async fn delete_key<C>(con: &mut C, key: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let removed: u32 = con.del(key).await?;
    Ok(removed > 0)
}

#[cfg(test)]
pub(crate) mod tests {
    /// Connect to the test Redis, or `None` to skip the test.
    pub(crate) async fn test_connection() -> Option<redis::aio::MultiplexedConnection> {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let client = match redis::Client::open(redis_url) {
            Ok(c) => c,
            Err(_) => {
                eprintln!("Skipping test: Redis not available");
                return None;
            }
        };
        match client.get_multiplexed_async_connection().await {
            Ok(c) => Some(c),
            Err(_) => {
                eprintln!("Skipping test: Redis connection failed");
                None
            }
        }
    }

    #[test]
    fn test_json_helpers() {
        let json = super::to_json(&vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = super::from_json(&json).unwrap();
        assert_eq!(back, vec![1, 2, 3]);

        let err = super::from_json::<Vec<i32>>("{not json").unwrap_err();
        assert_eq!(err.kind(), redis::ErrorKind::UnexpectedReturnType);
    }
}
