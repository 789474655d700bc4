//! Delegated login against an OpenID Connect provider.
//!
//! Discovery happens once at startup. Each callback exchanges the code at the
//! token endpoint and verifies the returned ID token against the provider's
//! JWKS, pinning issuer and audience.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::OidcSettings;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum OidcError {
    #[error("OIDC provider not configured")]
    NotConfigured,

    #[error("authorization code is missing")]
    MissingCode,

    #[error("provider discovery failed: {0}")]
    Discovery(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid id token: {0}")]
    InvalidIdToken(String),
}

/// Identity facts taken from a verified ID token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// The identity-provider collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Builds the URL the end user is redirected to.
    fn authorization_url(&self, state: &str) -> String;

    /// Trades an authorization code for verified identity claims.
    async fn exchange_code(&self, code: &str) -> Result<IdentityClaims, OidcError>;
}

#[derive(Debug, Clone, Deserialize)]
struct ProviderMetadata {
    issuer: String,
    authorization_endpoint: String,
    token_endpoint: String,
    jwks_uri: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    id_token: Option<String>,
}

/// An OIDC provider reached over HTTP.
pub struct OidcProvider {
    http: reqwest::Client,
    metadata: ProviderMetadata,
    authorization_endpoint: Url,
    client_id: String,
    client_secret: Zeroizing<String>,
    redirect_uri: String,
}

impl OidcProvider {
    /// Fetches the provider's discovery document and builds a client.
    pub async fn discover(settings: &OidcSettings) -> Result<Self, OidcError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| OidcError::Discovery(e.to_string()))?;

        let url = format!(
            "{}/.well-known/openid-configuration",
            settings.provider_url.trim_end_matches('/')
        );
        tracing::debug!("🔍 Discovering OIDC provider at {}", url);

        let metadata: ProviderMetadata = http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| OidcError::Discovery(e.to_string()))?
            .json()
            .await
            .map_err(|e| OidcError::Discovery(e.to_string()))?;

        Self::from_metadata(http, metadata, settings)
    }

    fn from_metadata(
        http: reqwest::Client,
        metadata: ProviderMetadata,
        settings: &OidcSettings,
    ) -> Result<Self, OidcError> {
        let authorization_endpoint = Url::parse(&metadata.authorization_endpoint)
            .map_err(|e| OidcError::Discovery(format!("bad authorization_endpoint: {}", e)))?;

        Ok(Self {
            http,
            metadata,
            authorization_endpoint,
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_uri.clone(),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, OidcError> {
        self.http
            .get(&self.metadata.jwks_uri)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| OidcError::Discovery(format!("jwks: {}", e)))?
            .json()
            .await
            .map_err(|e| OidcError::Discovery(format!("jwks: {}", e)))
    }

    async fn verify_id_token(&self, raw: &str) -> Result<IdentityClaims, OidcError> {
        let header = decode_header(raw).map_err(|e| OidcError::InvalidIdToken(e.to_string()))?;

        // ID tokens must be signed with one of the provider's published keys.
        if matches!(header.alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(OidcError::InvalidIdToken(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }

        let jwks = self.fetch_jwks().await?;
        let jwk = match header.kid.as_deref() {
            Some(kid) => jwks.find(kid),
            None => jwks.keys.first(),
        }
        .ok_or_else(|| OidcError::InvalidIdToken("no matching signing key".to_string()))?;

        let key = DecodingKey::from_jwk(jwk).map_err(|e| OidcError::InvalidIdToken(e.to_string()))?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&[&self.metadata.issuer]);

        decode::<IdentityClaims>(raw, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| OidcError::InvalidIdToken(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    fn authorization_url(&self, state: &str) -> String {
        let mut url = self.authorization_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", "openid profile email")
            .append_pair("state", state)
            .append_pair("access_type", "offline");
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<IdentityClaims, OidcError> {
        let response = self
            .http
            .post(&self.metadata.token_endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| OidcError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OidcError::TokenExchange(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| OidcError::TokenExchange(e.to_string()))?;

        let raw = token
            .id_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| OidcError::TokenExchange("no id_token in token response".to_string()))?;

        self.verify_id_token(&raw).await
    }
}
