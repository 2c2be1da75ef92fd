//! Signed session tokens (HS256 JWT).
//!
//! A token carries `{ userId, username, iat, exp }` and is valid only while
//! the signature verifies and `now < exp`. Every decode failure collapses
//! into [`InvalidToken`] so callers can uniformly reject the request.

use crate::models::unix_now;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default validity window: 7 days.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Claims encoded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionClaims {
    user_id: String,
    username: String,
    iat: u64,
    exp: u64,
}

/// Identity recovered from a valid session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub user_id: String,
    pub username: String,
}

/// The token is malformed, forged, or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid or expired session token")]
pub struct InvalidToken;

/// Issues and verifies session tokens with a symmetric secret.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// Validity window of issued tokens, in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Sign a new token for the given identity.
    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = unix_now();
        self.encode(&SessionClaims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        })
    }

    /// Verify a token against the current wall-clock time.
    pub fn verify(&self, token: &str) -> Result<SessionIdentity, InvalidToken> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                InvalidToken
            })?;

        if unix_now() >= claims.exp {
            tracing::debug!("Session token rejected: expired");
            return Err(InvalidToken);
        }

        Ok(SessionIdentity {
            user_id: claims.user_id,
            username: claims.username,
        })
    }

    fn encode(&self, claims: &SessionClaims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    const SECRET: &[u8] = b"test-secret-that-is-long-enough-32b";

    fn keys() -> SessionKeys {
        SessionKeys::new(SECRET, DEFAULT_SESSION_TTL_SECS)
    }

    #[test]
    fn test_issue_then_verify() {
        let keys = keys();
        let token = keys.issue("u-123", "admin").unwrap();

        let identity = keys.verify(&token).unwrap();
        assert_eq!(identity.user_id, "u-123");
        assert_eq!(identity.username, "admin");
    }

    #[test]
    fn test_token_is_three_segments() {
        let token = keys().issue("u-123", "admin").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_payload_field_names() {
        let token = keys().issue("u-123", "admin").unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

        assert_eq!(json["userId"], "u-123");
        assert_eq!(json["username"], "admin");
        let iat = json["iat"].as_u64().unwrap();
        let exp = json["exp"].as_u64().unwrap();
        assert_eq!(exp - iat, DEFAULT_SESSION_TTL_SECS);
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = keys();
        let now = unix_now();
        let token = keys
            .encode(&SessionClaims {
                user_id: "u-123".to_string(),
                username: "admin".to_string(),
                iat: now - 1000,
                exp: now - 10,
            })
            .unwrap();

        assert_eq!(keys.verify(&token), Err(InvalidToken));
    }

    #[test]
    fn test_flipped_signature_byte_rejected() {
        let keys = keys();
        let token = keys.issue("u-123", "admin").unwrap();

        let (signed, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
        bytes[0] ^= 0x01;
        let tampered = format!("{}.{}", signed, URL_SAFE_NO_PAD.encode(bytes));

        assert_eq!(keys.verify(&tampered), Err(InvalidToken));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let keys = keys();
        let token = keys.issue("u-123", "admin").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({
                "userId": "u-999",
                "username": "mallory",
                "iat": 0,
                "exp": u32::MAX,
            })
            .to_string(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(keys.verify(&forged), Err(InvalidToken));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = keys().issue("u-123", "admin").unwrap();
        let other = SessionKeys::new(b"another-secret-that-is-32-bytes-long", 60);
        assert_eq!(other.verify(&token), Err(InvalidToken));
    }

    #[test]
    fn test_garbage_rejected() {
        let keys = keys();
        for input in ["", "not-a-token", "a.b.c", "....", "\u{0}\u{1}"] {
            assert_eq!(keys.verify(input), Err(InvalidToken));
        }
    }

    #[test]
    fn test_zero_ttl_is_immediately_invalid() {
        let keys = SessionKeys::new(SECRET, 0);
        let token = keys.issue("u-123", "admin").unwrap();
        assert_eq!(keys.verify(&token), Err(InvalidToken));
    }
}
