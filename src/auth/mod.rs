//! Session tokens, login policies and the identity provider client.

pub mod claims;
pub mod oidc;
pub mod state_token;
pub mod token;
pub mod verifier;

pub use claims::SessionClaims;
pub use token::{TokenCodec, TokenError};
pub use verifier::{IdentityVerifier, IssuedToken, LoginPolicy};

/// `iss` and `aud` of every token this service mints.
pub const TOKEN_ISSUER: &str = "customer-order-api";
