//! Request, response, and document models for the API.
//!
//! All models use serde for serialization/deserialization with camelCase
//! field names. Storage models are the JSON documents kept in Redis.

use crate::content::{is_slug, MAX_SLUG_LEN};
use serde::{Deserialize, Serialize};

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// A document failed schema-level validation before being persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

fn required(value: &str, message: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(message.to_string()));
    }
    Ok(())
}

// ============================================================================
// Response envelopes
// ============================================================================

/// `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ "success": true, "message": ... }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Page metadata returned alongside paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

// ============================================================================
// Auth Models
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public view of the logged-in admin.
#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
}

/// Admin account as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAdmin {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: u64,
    pub last_login: Option<u64>,
}

// ============================================================================
// Doctor Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub bio: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub qualifications: Vec<String>,
    /// Years of practice.
    pub experience: i64,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Doctor {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(&self.name, "Doctor name is required")?;
        required(&self.specialty, "Specialty is required")?;
        required(&self.bio, "Bio is required")?;
        if self.experience < 0 {
            return Err(ValidationError(
                "Experience cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.specialty = self.specialty.trim().to_string();
        self.email = self.email.take().map(|e| e.trim().to_lowercase());
        self.phone = self.phone.take().map(|p| p.trim().to_string());
    }
}

/// Body of `POST /api/doctors`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorInput {
    pub name: String,
    pub specialty: String,
    pub bio: String,
    pub image_url: String,
    pub qualifications: Vec<String>,
    pub experience: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl DoctorInput {
    pub fn into_doctor(self, id: String, now: u64) -> Result<Doctor, ValidationError> {
        let experience = self
            .experience
            .ok_or_else(|| ValidationError("Experience is required".to_string()))?;

        let mut doctor = Doctor {
            id,
            name: self.name,
            specialty: self.specialty,
            bio: self.bio,
            image_url: self.image_url,
            qualifications: self.qualifications,
            experience,
            email: self.email,
            phone: self.phone,
            created_at: now,
            updated_at: now,
        };
        doctor.normalize();
        doctor.validate()?;
        Ok(doctor)
    }
}

/// Body of `PUT /api/doctors/{id}`; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorUpdate {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub qualifications: Option<Vec<String>>,
    pub experience: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl DoctorUpdate {
    pub fn apply(self, doctor: &mut Doctor, now: u64) -> Result<(), ValidationError> {
        if let Some(name) = self.name {
            doctor.name = name;
        }
        if let Some(specialty) = self.specialty {
            doctor.specialty = specialty;
        }
        if let Some(bio) = self.bio {
            doctor.bio = bio;
        }
        if let Some(image_url) = self.image_url {
            doctor.image_url = image_url;
        }
        if let Some(qualifications) = self.qualifications {
            doctor.qualifications = qualifications;
        }
        if let Some(experience) = self.experience {
            doctor.experience = experience;
        }
        if self.email.is_some() {
            doctor.email = self.email;
        }
        if self.phone.is_some() {
            doctor.phone = self.phone;
        }
        doctor.updated_at = now;
        doctor.normalize();
        doctor.validate()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DoctorQuery {
    pub search: Option<String>,
    pub specialty: Option<String>,
}

// ============================================================================
// Blog Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Rich text HTML.
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub image_url: String,
    pub author: String,
    pub publish_date: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

impl BlogPost {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(&self.title, "Blog title is required")?;
        required(&self.content, "Blog content is required")?;
        required(&self.author, "Author is required")?;
        required(&self.slug, "Blog slug is required")?;
        if self.slug.len() > MAX_SLUG_LEN {
            return Err(ValidationError(format!(
                "Slug must be at most {} characters",
                MAX_SLUG_LEN
            )));
        }
        if !is_slug(&self.slug) {
            return Err(ValidationError(
                "Slug may only contain lowercase letters, digits, and hyphens".to_string(),
            ));
        }
        Ok(())
    }

    /// Trim and lower-case caller-supplied fields the way the schema stores them.
    pub(crate) fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        self.slug = self.slug.trim().to_lowercase();
        self.author = self.author.trim().to_string();
    }
}

/// Body of `POST /api/blogs`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogInput {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: String,
    pub author: Option<String>,
    pub publish_date: Option<u64>,
    pub tags: Vec<String>,
    pub published: bool,
}

impl BlogInput {
    /// Build an unvalidated post; derivation and validation happen on the write path.
    pub fn into_post(self, id: String, now: u64) -> BlogPost {
        BlogPost {
            id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            image_url: self.image_url,
            author: self.author.unwrap_or_else(|| "Admin".to_string()),
            publish_date: self.publish_date.unwrap_or(now),
            tags: self.tags,
            published: self.published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `PUT /api/blogs/{id}`; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub author: Option<String>,
    pub publish_date: Option<u64>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl BlogUpdate {
    pub fn apply(self, post: &mut BlogPost, now: u64) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(publish_date) = self.publish_date {
            post.publish_date = publish_date;
        }
        if let Some(tags) = self.tags {
            post.tags = tags;
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        post.updated_at = now;
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

// ============================================================================
// Contact Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: u64,
}

/// Body of `POST /api/contact`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactInput {
    pub fn into_message(self, id: String, now: u64) -> Result<ContactMessage, ValidationError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(ValidationError(
                "Name, email, and message are required".to_string(),
            ));
        }

        let email = self.email.trim().to_lowercase();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
            });
        if !valid_email {
            return Err(ValidationError("Invalid email address".to_string()));
        }

        Ok(ContactMessage {
            id,
            name: self.name.trim().to_string(),
            email,
            phone: self.phone.unwrap_or_default().trim().to_string(),
            message: self.message,
            read: false,
            created_at: now,
        })
    }
}

/// Body of `PATCH /api/contact/{id}`.
#[derive(Debug, Deserialize)]
pub struct ContactReadUpdate {
    pub read: bool,
}

// ============================================================================
// Hospital Info Models
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub mission: String,
    pub vision: String,
    pub history: String,
    pub facilities: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    pub name: String,
    pub text: String,
    pub rating: u8,
    pub image_url: String,
}

impl Default for Testimonial {
    fn default() -> Self {
        Self {
            name: String::new(),
            text: String::new(),
            rating: 5,
            image_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactDetails {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub map_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialMedia {
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub linkedin: String,
    pub youtube: String,
}

/// Singleton document describing the hospital.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HospitalInfo {
    pub about: About,
    pub services: Vec<Service>,
    pub testimonials: Vec<Testimonial>,
    pub contact: ContactDetails,
    pub social_media: SocialMedia,
    pub updated_at: u64,
}

impl HospitalInfo {
    /// Document created the first time the hospital info is requested.
    pub fn initial(now: u64) -> Self {
        Self {
            about: About {
                mission: "To provide exceptional healthcare services with compassion and excellence."
                    .to_string(),
                vision: "To be the leading healthcare provider in the region.".to_string(),
                history: "Established with a commitment to serve our community.".to_string(),
                facilities: "State-of-the-art medical facilities and equipment.".to_string(),
            },
            updated_at: now,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for service in &self.services {
            required(&service.name, "Service name is required")?;
            required(&service.description, "Service description is required")?;
        }
        for testimonial in &self.testimonials {
            required(&testimonial.name, "Testimonial name is required")?;
            required(&testimonial.text, "Testimonial text is required")?;
            if !(1..=5).contains(&testimonial.rating) {
                return Err(ValidationError(
                    "Testimonial rating must be between 1 and 5".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Body of `PUT /api/hospital-info`; each present section replaces the stored one.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HospitalInfoUpdate {
    pub about: Option<About>,
    pub services: Option<Vec<Service>>,
    pub testimonials: Option<Vec<Testimonial>>,
    pub contact: Option<ContactDetails>,
    pub social_media: Option<SocialMedia>,
}

impl HospitalInfoUpdate {
    pub fn apply(self, info: &mut HospitalInfo, now: u64) -> Result<(), ValidationError> {
        if let Some(about) = self.about {
            info.about = about;
        }
        if let Some(services) = self.services {
            info.services = services;
        }
        if let Some(testimonials) = self.testimonials {
            info.testimonials = testimonials;
        }
        if let Some(contact) = self.contact {
            info.contact = contact;
        }
        if let Some(social_media) = self.social_media {
            info.social_media = social_media;
        }
        info.updated_at = now;
        info.validate()
    }
}
