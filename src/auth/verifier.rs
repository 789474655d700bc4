use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::oidc::{IdentityProvider, OidcError};
use super::state_token::generate_state_token;
use super::{SessionClaims, TokenCodec};
use crate::error::{AppError, Result};

/// How users log in. Chosen once at startup.
#[derive(Clone)]
pub enum LoginPolicy {
    /// Email + password in the request body.
    Direct,
    /// Redirect to an OIDC provider and come back through the callback.
    Delegated(Arc<dyn IdentityProvider>),
}

/// The request payload for direct login.
#[derive(Deserialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// The token envelope returned by every successful login.
#[derive(Serialize, Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    /// Always empty: there is no refresh flow.
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: &'static str,
}

/// What the login endpoint should do.
#[derive(Debug)]
pub enum LoginOutcome {
    Issued(IssuedToken),
    Redirect(String),
}

/// The callback response: the token envelope plus the echoed state.
#[derive(Serialize, Debug)]
pub struct CallbackResponse {
    pub auth: IssuedToken,
    pub state: String,
}

/// Turns login requests and provider callbacks into session tokens.
#[derive(Clone)]
pub struct IdentityVerifier {
    codec: TokenCodec,
    policy: LoginPolicy,
    ttl: Duration,
}

impl IdentityVerifier {
    pub fn new(codec: TokenCodec, policy: LoginPolicy, ttl: Duration) -> Self {
        Self { codec, policy, ttl }
    }

    pub fn is_delegated(&self) -> bool {
        matches!(self.policy, LoginPolicy::Delegated(_))
    }

    /// Starts a login attempt under the configured policy.
    ///
    /// Direct: the credentials must both be non-empty. The password is not
    /// checked against any store. Delegated: credentials are ignored and the
    /// caller gets the provider URL to redirect to.
    pub fn login(&self, credentials: Option<LoginRequest>) -> Result<LoginOutcome> {
        match &self.policy {
            LoginPolicy::Delegated(provider) => {
                let state = generate_state_token();
                tracing::debug!("↪️ Redirecting login to identity provider");
                Ok(LoginOutcome::Redirect(provider.authorization_url(&state)))
            }
            LoginPolicy::Direct => {
                let req = credentials.unwrap_or_default();
                let email = req.email.trim();
                if email.is_empty() || req.password.is_empty() {
                    return Err(AppError::InvalidRequest(
                        "email and password are required".to_string(),
                    ));
                }

                let name = email.split('@').next().unwrap_or(email);
                let claims = SessionClaims::new(email, email, name, Utc::now(), self.ttl);
                let issued = self.issue(&claims)?;

                tracing::info!("✅ Direct login for {}", mask_email(email));
                Ok(LoginOutcome::Issued(issued))
            }
        }
    }

    /// Finishes a delegated login: code exchange, ID token verification,
    /// then a locally signed session token.
    pub async fn complete_login(
        &self,
        code: Option<&str>,
        state: Option<&str>,
    ) -> Result<CallbackResponse> {
        let LoginPolicy::Delegated(provider) = &self.policy else {
            return Err(OidcError::NotConfigured.into());
        };

        let code = code
            .filter(|c| !c.is_empty())
            .ok_or(OidcError::MissingCode)?;

        let identity = provider.exchange_code(code).await?;

        let email = identity.email.unwrap_or_default();
        let name = identity.name.unwrap_or_default();
        let claims = SessionClaims::new(identity.sub, email, name, Utc::now(), self.ttl);
        let auth = self.issue(&claims)?;

        tracing::info!("✅ OIDC login for subject {}", claims.sub);

        Ok(CallbackResponse {
            auth,
            state: state.unwrap_or_default().to_string(),
        })
    }

    fn issue(&self, claims: &SessionClaims) -> Result<IssuedToken> {
        let access_token = self.codec.issue(claims)?;
        Ok(IssuedToken {
            access_token,
            refresh_token: String::new(),
            expires_in: claims.lifetime_secs(),
            token_type: "Bearer",
        })
    }
}

/// Keeps the first character of the local part and the domain.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let mut chars = local.chars();
            match chars.next() {
                Some(first) => format!("{}{}@{}", first, "*".repeat(chars.count()), domain),
                None => format!("@{}", domain),
            }
        }
        None => "*".repeat(email.chars().count()),
    }
}
