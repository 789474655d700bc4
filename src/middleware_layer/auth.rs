use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, AuthRejection},
    state::AppState,
};

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
///
/// # Arguments
///
/// * `value` - The raw header value.
///
/// # Returns
///
/// The token, or `InvalidFormat` unless the value is exactly two
/// space-separated parts with the first being `Bearer`.
fn extract_bearer_token(value: &str) -> Result<&str, AuthRejection> {
    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(*token),
        _ => Err(AuthRejection::InvalidFormat),
    }
}

/// A middleware that requires a valid bearer token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// The downstream `Response`, or a 401 `AppError`. On success the verified
/// `SessionClaims` are available to handlers as an `Extension`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingToken)?
        .to_str()
        .map_err(|_| AuthRejection::InvalidFormat)?;

    let token = extract_bearer_token(value)?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(AuthRejection::InvalidToken)?;

    tracing::debug!("✅ User authenticated: {}", claims.sub);

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
