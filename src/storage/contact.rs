//! Contact message storage operations.
//!
//! Redis key patterns:
//! - `contact:{nanoid}`: message submitted through the public contact form (JSON)

use crate::models::ContactMessage;
use crate::storage::{delete_key, get_json, list_json, replace_json, to_json};
use redis::AsyncCommands;

fn contact_key(id: &str) -> String {
    format!("contact:{}", id)
}

/// Store a newly submitted contact message.
pub async fn store_message<C>(
    con: &mut C,
    message: &ContactMessage,
) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(message)?;
    con.set::<_, _, ()>(contact_key(&message.id), json).await
}

/// Overwrite an existing contact message (read flag changes).
///
/// Returns false if the message was deleted in the meantime.
pub async fn update_message<C>(
    con: &mut C,
    message: &ContactMessage,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    replace_json(con, &contact_key(&message.id), message).await
}

/// Get a contact message by ID.
pub async fn get_message<C>(
    con: &mut C,
    id: &str,
) -> Result<Option<ContactMessage>, redis::RedisError>
where
    C: AsyncCommands,
{
    get_json(con, &contact_key(id)).await
}

/// Delete a contact message. Returns false if it didn't exist.
pub async fn delete_message<C>(con: &mut C, id: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    delete_key(con, &contact_key(id)).await
}

/// List all contact messages (unordered).
pub async fn list_messages<C>(con: &mut C) -> Result<Vec<ContactMessage>, redis::RedisError>
where
    C: AsyncCommands,
{
    list_json(con, "contact:*").await
}
