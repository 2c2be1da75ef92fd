//! Admin authentication: password hashing, signed session tokens, and the
//! cookie-backed session extractor.

pub mod cookie;
pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{check_rate_limit, AdminSession, AppState};
pub use password::{hash_password, verify_password};
pub use token::{InvalidToken, SessionIdentity, SessionKeys};
