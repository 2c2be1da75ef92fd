//! Blog post storage operations.
//!
//! Redis key patterns:
//! - `blog:{nanoid}`: blog post (JSON)
//! - `slug:{slug}`: ID of the post that owns the slug (STRING)
//!
//! The slug index is claimed and released inside Lua scripts so two posts
//! can never hold the same slug, even under concurrent writes.

use crate::content::is_slug;
use crate::models::BlogPost;
use crate::storage::{get_json, list_json, to_json};
use redis::AsyncCommands;

fn blog_key(id: &str) -> String {
    format!("blog:{}", id)
}

fn slug_key(slug: &str) -> String {
    format!("slug:{}", slug)
}

/// Create a post, claiming its slug.
///
/// Returns false (and writes nothing) if the slug already belongs to another post.
pub async fn create_post<C>(con: &mut C, post: &BlogPost) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(post)?;

    let script = redis::Script::new(
        r#"
        if redis.call('SET', KEYS[1], ARGV[1], 'NX') then
            redis.call('SET', KEYS[2], ARGV[2])
            return 1
        end
        return 0
        "#,
    );

    let created: i32 = script
        .key(slug_key(&post.slug))
        .key(blog_key(&post.id))
        .arg(&post.id)
        .arg(json)
        .invoke_async(con)
        .await?;

    Ok(created == 1)
}

/// Result of [`update_post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The new slug belongs to another post.
    SlugTaken,
    /// The post was deleted before the write landed.
    Missing,
}

/// Overwrite a post, moving its slug claim from `previous_slug` if it changed.
///
/// Writes nothing unless the outcome is `Updated`.
pub async fn update_post<C>(
    con: &mut C,
    post: &BlogPost,
    previous_slug: &str,
) -> Result<UpdateOutcome, redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(post)?;

    // KEYS: new slug, blog doc, previous slug. ARGV: post id, post json.
    let script = redis::Script::new(
        r#"
        if redis.call('EXISTS', KEYS[2]) == 0 then
            return -1
        end
        local owner = redis.call('GET', KEYS[1])
        if owner and owner ~= ARGV[1] then
            return 0
        end
        redis.call('SET', KEYS[1], ARGV[1])
        if KEYS[3] ~= KEYS[1] and redis.call('GET', KEYS[3]) == ARGV[1] then
            redis.call('DEL', KEYS[3])
        end
        redis.call('SET', KEYS[2], ARGV[2])
        return 1
        "#,
    );

    let result: i32 = script
        .key(slug_key(&post.slug))
        .key(blog_key(&post.id))
        .key(slug_key(previous_slug))
        .arg(&post.id)
        .arg(json)
        .invoke_async(con)
        .await?;

    Ok(match result {
        1 => UpdateOutcome::Updated,
        0 => UpdateOutcome::SlugTaken,
        _ => UpdateOutcome::Missing,
    })
}

/// Generate an ID for a new post.
///
/// IDs always contain a character no slug may hold, so a path segment
/// can never name one post by ID and another by slug.
pub fn new_post_id() -> String {
    loop {
        let id = nanoid::nanoid!(12);
        if !is_slug(&id) {
            return id;
        }
    }
}

/// Get a post by ID.
pub async fn get_post<C>(con: &mut C, id: &str) -> Result<Option<BlogPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    get_json(con, &blog_key(id)).await
}

/// Get a post by slug or ID.
///
/// Slug-shaped input resolves through the slug index first and falls back
/// to an ID lookup; anything else can only be an ID.
pub async fn find_post<C>(
    con: &mut C,
    id_or_slug: &str,
) -> Result<Option<BlogPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    if is_slug(id_or_slug) {
        let owner: Option<String> = con.get(slug_key(id_or_slug)).await?;
        if let Some(id) = owner {
            if let Some(post) = get_post(con, &id).await? {
                return Ok(Some(post));
            }
        }
    }

    get_post(con, id_or_slug).await
}

/// Delete a post and release its slug.
///
/// Returns false if no such post existed.
pub async fn delete_post<C>(con: &mut C, id: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let script = redis::Script::new(
        r#"
        local val = redis.call('GET', KEYS[1])
        if not val then
            return 0
        end
        redis.call('DEL', KEYS[1])
        local obj = cjson.decode(val)
        if type(obj.slug) == 'string' then
            local slug_key = ARGV[2] .. obj.slug
            if redis.call('GET', slug_key) == ARGV[1] then
                redis.call('DEL', slug_key)
            end
        end
        return 1
        "#,
    );

    let deleted: i32 = script
        .key(blog_key(id))
        .arg(id)
        .arg("slug:")
        .invoke_async(con)
        .await?;

    Ok(deleted == 1)
}

/// List all posts (unordered, drafts included).
pub async fn list_posts<C>(con: &mut C) -> Result<Vec<BlogPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    list_json(con, "blog:*").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::prepare_post;
    use crate::models::BlogInput;
    use crate::storage::tests::test_connection;

    fn post(title: &str) -> BlogPost {
        let mut post = BlogInput {
            title: format!("{} {}", title, nanoid::nanoid!(10)),
            content: "<p>Body</p>".to_string(),
            published: true,
            ..Default::default()
        }
        .into_post(format!("test-{}", nanoid::nanoid!(8)), 1_700_000_000);
        prepare_post(&mut post);
        post
    }

    #[tokio::test]
    async fn test_create_find_delete() {
        let Some(mut con) = test_connection().await else {
            return;
        };

        let post = post("Storage test");
        assert!(create_post(&mut con, &post).await.unwrap());

        let by_id = find_post(&mut con, &post.id).await.unwrap().unwrap();
        assert_eq!(by_id, post);
        let by_slug = find_post(&mut con, &post.slug).await.unwrap().unwrap();
        assert_eq!(by_slug.id, post.id);

        assert!(delete_post(&mut con, &post.id).await.unwrap());
        assert!(!delete_post(&mut con, &post.id).await.unwrap());
        assert!(find_post(&mut con, &post.slug).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let Some(mut con) = test_connection().await else {
            return;
        };

        let first = post("Duplicate");
        let mut second = post("Other");
        second.slug = first.slug.clone();

        assert!(create_post(&mut con, &first).await.unwrap());
        assert!(!create_post(&mut con, &second).await.unwrap());
        assert!(get_post(&mut con, &second.id).await.unwrap().is_none());

        delete_post(&mut con, &first.id).await.unwrap();

        // Slug is free again once its owner is gone
        assert!(create_post(&mut con, &second).await.unwrap());
        delete_post(&mut con, &second.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_moves_slug() {
        let Some(mut con) = test_connection().await else {
            return;
        };

        let original = post("Before");
        let taken = post("Taken");
        assert!(create_post(&mut con, &original).await.unwrap());
        assert!(create_post(&mut con, &taken).await.unwrap());

        // Cannot steal another post's slug
        let mut clash = original.clone();
        clash.slug = taken.slug.clone();
        assert_eq!(
            update_post(&mut con, &clash, &original.slug).await.unwrap(),
            UpdateOutcome::SlugTaken
        );

        let mut renamed = original.clone();
        renamed.slug = format!("{}-renamed", original.slug);
        assert_eq!(
            update_post(&mut con, &renamed, &original.slug).await.unwrap(),
            UpdateOutcome::Updated
        );

        assert!(find_post(&mut con, &original.slug).await.unwrap().is_none());
        let found = find_post(&mut con, &renamed.slug).await.unwrap().unwrap();
        assert_eq!(found.id, original.id);

        // Keeping the same slug is fine
        assert_eq!(
            update_post(&mut con, &renamed, &renamed.slug).await.unwrap(),
            UpdateOutcome::Updated
        );

        delete_post(&mut con, &renamed.id).await.unwrap();
        delete_post(&mut con, &taken.id).await.unwrap();
        assert!(find_post(&mut con, &renamed.slug).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_after_delete_writes_nothing() {
        let Some(mut con) = test_connection().await else {
            return;
        };

        let original = post("Deleted");
        assert!(create_post(&mut con, &original).await.unwrap());
        assert!(delete_post(&mut con, &original.id).await.unwrap());

        let mut late = original.clone();
        late.slug = format!("{}-late", original.slug);
        assert_eq!(
            update_post(&mut con, &late, &original.slug).await.unwrap(),
            UpdateOutcome::Missing
        );
        assert_eq!(
            update_post(&mut con, &original, &original.slug).await.unwrap(),
            UpdateOutcome::Missing
        );

        assert!(get_post(&mut con, &original.id).await.unwrap().is_none());
        let claimed: Option<String> = con.get(slug_key(&late.slug)).await.unwrap();
        assert!(claimed.is_none());
        let claimed: Option<String> = con.get(slug_key(&original.slug)).await.unwrap();
        assert!(claimed.is_none());
    }

    #[test]
    fn test_new_post_id_is_never_slug_shaped() {
        for _ in 0..2000 {
            let id = new_post_id();
            assert_eq!(id.len(), 12);
            assert!(!is_slug(&id));
        }
    }

    #[tokio::test]
    async fn test_slug_wins_over_slug_shaped_id() {
        let Some(mut con) = test_connection().await else {
            return;
        };

        let mut by_id = post("Lookup id");
        by_id.id = format!("lookup-{}", nanoid::nanoid!(8)).to_lowercase().replace('_', "-");
        let mut by_slug = post("Lookup slug");
        by_slug.slug = by_id.id.clone();
        assert!(is_slug(&by_id.id));

        assert!(create_post(&mut con, &by_id).await.unwrap());
        assert!(create_post(&mut con, &by_slug).await.unwrap());

        let found = find_post(&mut con, &by_id.id).await.unwrap().unwrap();
        assert_eq!(found.id, by_slug.id);

        // Its own slug still reaches the other post
        let found = find_post(&mut con, &by_id.slug).await.unwrap().unwrap();
        assert_eq!(found.id, by_id.id);

        delete_post(&mut con, &by_id.id).await.unwrap();
        delete_post(&mut con, &by_slug.id).await.unwrap();
    }
}
