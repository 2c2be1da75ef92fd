use crate::auth::password::is_valid_hash;
use crate::auth::token::DEFAULT_SESSION_TTL_SECS;
use std::env;
use std::net::SocketAddr;

/// Minimum length of the token signing secret, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct Config {
    // Session signing
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
    pub cookie_secure: bool,

    // Seeded admin account
    pub admin_username: String,
    pub admin_password_hash: String,
    pub admin_email: Option<String>,

    // Redis
    pub redis_url: String,

    // Server
    pub bind_addr: SocketAddr,

    // Limits
    pub max_body_bytes: usize,

    // Rate limiting
    pub rate_limit_login_per_min: u32,
    pub rate_limit_contact_per_min: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .field("admin_username", &self.admin_username)
            .field("admin_password_hash", &"[REDACTED]")
            .field("admin_email", &self.admin_email)
            .field("redis_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("rate_limit_login_per_min", &self.rate_limit_login_per_min)
            .field("rate_limit_contact_per_min", &self.rate_limit_contact_per_min)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                format!("must be at least {} bytes", MIN_JWT_SECRET_LEN),
            ));
        }

        let session_ttl_secs = parse_env_or_default("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let cookie_secure = parse_env_or_default("COOKIE_SECURE", true)?;

        // Admin identity: usernames are stored lower-case
        let admin_username = env::var("ADMIN_USERNAME")
            .unwrap_or_else(|_| "admin".to_string())
            .to_lowercase();

        if admin_username.len() < 2 || admin_username.len() > 64 {
            return Err(ConfigError::InvalidValue(
                "ADMIN_USERNAME".to_string(),
                "must be 2-64 characters".to_string(),
            ));
        }
        if !admin_username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidValue(
                "ADMIN_USERNAME".to_string(),
                "may only contain alphanumeric characters, hyphens, and underscores".to_string(),
            ));
        }

        let admin_password_hash = env::var("ADMIN_PASSWORD_HASH")
            .map_err(|_| ConfigError::MissingVar("ADMIN_PASSWORD_HASH".to_string()))?;
        if !is_valid_hash(&admin_password_hash) {
            return Err(ConfigError::InvalidValue(
                "ADMIN_PASSWORD_HASH".to_string(),
                "expected an Argon2 PHC string (run `hospital-site hash-password`)".to_string(),
            ));
        }

        // Optional contact address stored on the seeded account
        let admin_email = match env::var("ADMIN_EMAIL") {
            Ok(raw) if !raw.trim().is_empty() => {
                let email = raw.trim().to_lowercase();
                if !email.contains('@') || email.chars().any(char::is_whitespace) {
                    return Err(ConfigError::InvalidValue(
                        "ADMIN_EMAIL".to_string(),
                        "must be an email address".to_string(),
                    ));
                }
                Some(email)
            }
            _ => None,
        };

        // Redis: required to prevent silent unauthenticated connections
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // Limits
        let max_body_bytes = parse_env_or_default("MAX_BODY_BYTES", 1_048_576)?;

        // Rate limiting
        let rate_limit_login_per_min = parse_env_or_default("RATE_LIMIT_LOGIN_PER_MIN", 5)?;
        let rate_limit_contact_per_min = parse_env_or_default("RATE_LIMIT_CONTACT_PER_MIN", 3)?;

        Ok(Config {
            jwt_secret,
            session_ttl_secs,
            cookie_secure,
            admin_username,
            admin_password_hash,
            admin_email,
            redis_url,
            bind_addr,
            max_body_bytes,
            rate_limit_login_per_min,
            rate_limit_contact_per_min,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
