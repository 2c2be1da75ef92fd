//! Slug and excerpt derivation for blog posts.
//!
//! Both derivations are pure and deterministic. They only fill fields the
//! caller left empty; rejecting a post whose derived slug is still empty is
//! the job of [`BlogPost::validate`].

use crate::models::BlogPost;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum number of plain-text characters kept in an excerpt.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Appended to an excerpt that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

/// Longest slug a post may carry. Path identifiers share this limit.
pub const MAX_SLUG_LEN: usize = 128;

static NON_SLUG_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Derive a URL-safe slug from a title.
///
/// Lower-cases the title, collapses every run of characters outside
/// `[a-z0-9]` into a single hyphen, and trims hyphens from both ends.
/// Long titles are cut to [`MAX_SLUG_LEN`] without leaving a trailing hyphen.
pub fn derive_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let collapsed = NON_SLUG_RUN.replace_all(&lowered, "-");
    let slug = collapsed.trim_matches('-');

    // Output is ASCII, so any byte index is a char boundary
    let slug = &slug[..slug.len().min(MAX_SLUG_LEN)];
    slug.trim_end_matches('-').to_string()
}

/// True if `s` could be a stored slug: non-empty, at most [`MAX_SLUG_LEN`]
/// bytes, and only `[a-z0-9-]`.
pub fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_SLUG_LEN
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Derive a plain-text preview from HTML content.
///
/// Strips every `<...>` tag, keeps at most [`EXCERPT_MAX_CHARS`] characters
/// and appends [`TRUNCATION_MARKER`] when anything was cut.
pub fn derive_excerpt(content: &str) -> String {
    let plain = MARKUP_TAG.replace_all(content, "");

    match plain.char_indices().nth(EXCERPT_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &plain[..cut], TRUNCATION_MARKER),
        None => plain.into_owned(),
    }
}

/// Pre-persistence transform for blog writes.
///
/// Normalizes caller-supplied fields, then fills `slug` from the title and
/// `excerpt` from the content when either is empty. An explicit slug or
/// excerpt is never overwritten.
pub fn prepare_post(post: &mut BlogPost) {
    post.normalize();

    if post.slug.is_empty() {
        post.slug = derive_slug(&post.title);
    }
    if post.excerpt.is_empty() {
        post.excerpt = derive_excerpt(&post.content);
    }
}
