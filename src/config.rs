use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Default Africa's Talking messaging endpoint (sandbox).
pub const DEFAULT_SMS_BASE_URL: &str = "https://api.sandbox.africastalking.com/version1/messaging";

/// Settings for the delegated (OIDC) login policy.
#[derive(Clone)]
pub struct OidcSettings {
    /// The issuer URL used for discovery.
    pub provider_url: String,
    /// The OAuth2 client ID registered with the provider.
    pub client_id: String,
    /// The OAuth2 client secret.
    pub client_secret: Zeroizing<String>,
    /// Where the provider sends the user back to.
    pub redirect_uri: String,
}

/// Credentials for the Africa's Talking SMS gateway.
#[derive(Clone)]
pub struct SmsSettings {
    pub username: String,
    pub api_key: Zeroizing<String>,
    pub sender_id: Option<String>,
    pub base_url: String,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The address to bind the HTTP listener to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
    /// The HS256 signing secret. `None` when unset: issuing then fails.
    pub jwt_secret: Option<Zeroizing<Vec<u8>>>,
    /// Lifetime of issued session tokens, in hours.
    pub token_ttl_hours: i64,
    /// Present only when every OIDC variable is set.
    pub oidc: Option<OidcSettings>,
    /// Present only when the SMS gateway credentials are set.
    pub sms: Option<SmsSettings>,
}

/// Reads a variable, treating an empty value as unset.
fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = non_empty("JWT_SECRET").map(|s| Zeroizing::new(s.into_bytes()));
        if jwt_secret.is_none() {
            tracing::warn!("⚠️ JWT_SECRET is not set: logins will fail and every token will be rejected");
        }

        let oidc = match (
            non_empty("OIDC_PROVIDER_URL"),
            non_empty("OIDC_CLIENT_ID"),
            non_empty("OIDC_CLIENT_SECRET"),
            non_empty("OIDC_REDIRECT_URI"),
        ) {
            (Some(provider_url), Some(client_id), Some(client_secret), Some(redirect_uri)) => {
                Some(OidcSettings {
                    provider_url,
                    client_id,
                    client_secret: Zeroizing::new(client_secret),
                    redirect_uri,
                })
            }
            _ => None,
        };

        let sms = match (non_empty("AFRICASTALKING_USERNAME"), non_empty("AFRICASTALKING_API_KEY")) {
            (Some(username), Some(api_key)) => Some(SmsSettings {
                username,
                api_key: Zeroizing::new(api_key),
                sender_id: non_empty("AFRICASTALKING_SENDER_ID"),
                base_url: non_empty("AFRICASTALKING_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SMS_BASE_URL.to_string()),
            }),
            _ => None,
        };

        let token_ttl_hours: i64 = env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .context("Invalid TOKEN_TTL_HOURS")?;
        if token_ttl_hours <= 0 {
            anyhow::bail!("TOKEN_TTL_HOURS must be positive");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,
            jwt_secret,
            token_ttl_hours,
            oidc,
            sms,
        })
    }
}
