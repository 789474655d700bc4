use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::TOKEN_ISSUER;

/// The authenticated principal carried inside a session token.
///
/// Built once at login or OIDC callback time and never mutated afterwards.
/// The auth gate inserts a verified copy into the request extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Stable per-user subject identifier.
    pub sub: String,
    pub email: String,
    /// Display name.
    pub name: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
    /// Not-before (seconds since epoch), when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

impl SessionClaims {
    /// Creates claims valid from `now` for `ttl`.
    pub fn new(
        sub: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = now.timestamp();
        Self {
            sub: sub.into(),
            email: email.into(),
            name: name.into(),
            iss: TOKEN_ISSUER.to_string(),
            aud: TOKEN_ISSUER.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
            nbf: None,
        }
    }

    /// Seconds between issue and expiry.
    pub fn lifetime_secs(&self) -> i64 {
        self.exp - self.iat
    }
}
