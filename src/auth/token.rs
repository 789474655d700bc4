use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use zeroize::Zeroizing;

use super::{SessionClaims, TOKEN_ISSUER};

/// Why a token could not be issued or verified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("no signing secret configured")]
    MissingSecret,

    #[error("malformed token")]
    Malformed,

    #[error("signature mismatch")]
    SignatureMismatch,

    #[error("token expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("unexpected issuer, audience or missing claim")]
    InvalidClaims,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Issues and verifies HS256 session tokens.
///
/// The secret is loaded once at startup. There is no fallback
/// secret: without one, `issue` fails and `verify` rejects everything.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Option<Zeroizing<Vec<u8>>>,
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::MissingRequiredClaim(_) => {
            TokenError::InvalidClaims
        }
        _ => TokenError::Malformed,
    }
}

impl TokenCodec {
    pub fn new(secret: Option<Zeroizing<Vec<u8>>>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Encodes and signs `claims`.
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let secret = self.secret.as_ref().ok_or(TokenError::MissingSecret)?;

        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verifies `token` against the configured secret and the current time.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies `token` as of `now`.
    ///
    /// Expiry is judged first, from the unverified payload, so an expired
    /// token is reported as `Expired` whatever its signature. A token is
    /// expired from the exact second of its `exp` onward. Everything else
    /// requires a valid signature.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let secret = self.secret.as_ref().ok_or(TokenError::MissingSecret)?;
        let now = now.timestamp();

        let unverified = peek_claims(token)?;
        if now >= unverified.exp {
            return Err(TokenError::Expired);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Time windows are checked here against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_audience(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let claims = decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation)
            .map_err(classify)?
            .claims;

        if claims.nbf.is_some_and(|nbf| now < nbf) {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }
}

/// Decodes the payload without checking the signature or any claim.
fn peek_claims(token: &str) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| TokenError::Malformed)
}
