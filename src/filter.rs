//! Listing filters: substring search, sorting, and pagination.
//!
//! Search terms are matched literally and case-insensitively; a term is
//! escaped before it becomes a regex, so user input never acts as a pattern.

use crate::models::{BlogPost, BlogQuery, ContactMessage, Doctor, DoctorQuery, Pagination};
use regex::{Regex, RegexBuilder};

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Case-insensitive literal substring matcher.
#[derive(Debug)]
pub struct TextMatcher(Regex);

impl TextMatcher {
    /// Build a matcher for a search term. Blank terms match everything and
    /// yield `None`.
    pub fn new(term: Option<&str>) -> Result<Option<Self>, regex::Error> {
        let term = match term.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(None),
        };
        let regex = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()?;
        Ok(Some(Self(regex)))
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

/// Filter doctors by `search` (name or specialty) and `specialty`, newest first.
pub fn filter_doctors(
    doctors: Vec<Doctor>,
    query: &DoctorQuery,
) -> Result<Vec<Doctor>, regex::Error> {
    let search = TextMatcher::new(query.search.as_deref())?;
    let specialty = TextMatcher::new(query.specialty.as_deref())?;

    let mut doctors: Vec<Doctor> = doctors
        .into_iter()
        .filter(|d| {
            search
                .as_ref()
                .is_none_or(|m| m.is_match(&d.name) || m.is_match(&d.specialty))
        })
        .filter(|d| specialty.as_ref().is_none_or(|m| m.is_match(&d.specialty)))
        .collect();

    doctors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(doctors)
}

/// Filter, sort (newest `publishDate` first), and paginate blog posts.
///
/// Drafts are only included when `include_drafts` is set (admin callers).
pub fn filter_posts(
    posts: Vec<BlogPost>,
    query: &BlogQuery,
    include_drafts: bool,
) -> Result<(Vec<BlogPost>, Pagination), regex::Error> {
    let search = TextMatcher::new(query.search.as_deref())?;
    let tag = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let mut posts: Vec<BlogPost> = posts
        .into_iter()
        .filter(|p| include_drafts || p.published)
        .filter(|p| {
            search
                .as_ref()
                .is_none_or(|m| m.is_match(&p.title) || m.is_match(&p.content))
        })
        .filter(|p| tag.is_none_or(|t| p.tags.iter().any(|pt| pt == t)))
        .collect();

    posts.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));

    let pagination = paginate(posts.len() as u64, query.page, query.limit);
    let skip = (pagination.page - 1).saturating_mul(pagination.limit);
    let page: Vec<BlogPost> = posts
        .into_iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(pagination.limit as usize)
        .collect();

    Ok((page, pagination))
}

/// Compute page metadata; `page` is at least 1 and `limit` is clamped to
/// `1..=MAX_PAGE_LIMIT`.
pub fn paginate(total: u64, page: Option<u64>, limit: Option<u64>) -> Pagination {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);

    Pagination {
        page,
        limit,
        total,
        pages: total.div_ceil(limit),
    }
}

/// Newest messages first.
pub fn sort_messages(messages: &mut [ContactMessage]) {
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlogInput;

    fn doctor(id: &str, name: &str, specialty: &str, created_at: u64) -> Doctor {
        Doctor {
            id: id.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            bio: "bio".to_string(),
            image_url: String::new(),
            qualifications: vec![],
            experience: 1,
            email: None,
            phone: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn post(id: &str, title: &str, published: bool, date: u64, tags: &[&str]) -> BlogPost {
        let mut p = BlogInput {
            title: title.to_string(),
            content: format!("<p>Body of {}</p>", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            published,
            publish_date: Some(date),
            ..Default::default()
        }
        .into_post(id.to_string(), date);
        p.slug = id.to_string();
        p
    }

    fn doctors() -> Vec<Doctor> {
        vec![
            doctor("1", "Dr. Ada Heart", "Cardiology", 10),
            doctor("2", "Dr. Ben Brain", "Neurology", 30),
            doctor("3", "Dr. Cara Kid", "Pediatric Cardiology", 20),
        ]
    }

    #[test]
    fn test_matcher_is_literal() {
        let m = TextMatcher::new(Some("a.c")).unwrap().unwrap();
        assert!(m.is_match("xa.cx"));
        assert!(!m.is_match("abc"));

        // Regex metacharacters are harmless
        assert!(TextMatcher::new(Some("(*[")).unwrap().is_some());
    }

    #[test]
    fn test_matcher_blank_term() {
        assert!(TextMatcher::new(None).unwrap().is_none());
        assert!(TextMatcher::new(Some("   ")).unwrap().is_none());
    }

    #[test]
    fn test_doctors_sorted_newest_first() {
        let result = filter_doctors(doctors(), &DoctorQuery::default()).unwrap();
        let ids: Vec<&str> = result.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_doctors_search_name_or_specialty() {
        let query = DoctorQuery {
            search: Some("CARDIO".to_string()),
            specialty: None,
        };
        let ids: Vec<String> = filter_doctors(doctors(), &query)
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["3", "1"]);

        let query = DoctorQuery {
            search: Some("brain".to_string()),
            specialty: None,
        };
        assert_eq!(filter_doctors(doctors(), &query).unwrap().len(), 1);
    }

    #[test]
    fn test_doctors_specialty_filter() {
        let query = DoctorQuery {
            search: Some("dr.".to_string()),
            specialty: Some("pediatric".to_string()),
        };
        let result = filter_doctors(doctors(), &query).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "3");
    }

    #[test]
    fn test_posts_hide_drafts_for_public() {
        let posts = vec![
            post("a", "Published", true, 1, &[]),
            post("b", "Draft", false, 2, &[]),
        ];
        let (public, pagination) = filter_posts(posts.clone(), &BlogQuery::default(), false).unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, "a");
        assert_eq!(pagination.total, 1);

        let (all, _) = filter_posts(posts, &BlogQuery::default(), true).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "b");
    }

    #[test]
    fn test_posts_search_and_tag() {
        let posts = vec![
            post("a", "Heart health", true, 1, &["cardio"]),
            post("b", "Healthy sleep", true, 2, &["sleep"]),
            post("c", "Flu shots", true, 3, &["cardio", "vaccines"]),
        ];

        let query = BlogQuery {
            search: Some("HEALTH".to_string()),
            ..Default::default()
        };
        let (found, _) = filter_posts(posts.clone(), &query, false).unwrap();
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let query = BlogQuery {
            tag: Some("cardio".to_string()),
            ..Default::default()
        };
        let (found, _) = filter_posts(posts.clone(), &query, false).unwrap();
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);

        // Search also looks inside content
        let query = BlogQuery {
            search: Some("body of flu".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_posts(posts, &query, false).unwrap().0.len(), 1);
    }

    #[test]
    fn test_posts_pagination_window() {
        let posts: Vec<BlogPost> = (0..25)
            .map(|i| post(&format!("p{}", i), "Post", true, i, &[]))
            .collect();

        let query = BlogQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        let (page, pagination) = filter_posts(posts.clone(), &query, false).unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].id, "p4");
        assert_eq!(
            pagination,
            Pagination {
                page: 3,
                limit: 10,
                total: 25,
                pages: 3
            }
        );

        let query = BlogQuery {
            page: Some(9),
            ..Default::default()
        };
        let (page, _) = filter_posts(posts, &query, false).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_paginate_clamps() {
        assert_eq!(paginate(0, None, None).pages, 0);
        assert_eq!(paginate(5, Some(0), Some(0)).page, 1);
        assert_eq!(paginate(5, Some(0), Some(0)).limit, 1);
        assert_eq!(paginate(5, None, Some(10_000)).limit, MAX_PAGE_LIMIT);
        assert_eq!(paginate(21, None, None).pages, 3);
    }

    #[test]
    fn test_sort_messages() {
        let mut messages: Vec<ContactMessage> = [5u64, 9, 1]
            .iter()
            .map(|t| ContactMessage {
                id: t.to_string(),
                name: "n".to_string(),
                email: "e@x.io".to_string(),
                phone: String::new(),
                message: "m".to_string(),
                read: false,
                created_at: *t,
            })
            .collect();
        sort_messages(&mut messages);
        let ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "5", "1"]);
    }
}
