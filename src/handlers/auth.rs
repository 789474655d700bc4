use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::{Deserialize, Serialize};

use super::{decode_body, json_response};
use crate::{
    auth::{verifier::LoginOutcome, SessionClaims},
    error::Result,
    state::AppState,
};

/// The query parameters the identity provider sends back.
#[derive(Deserialize, Debug, Default)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// The response payload for `/auth/userinfo`.
#[derive(Serialize)]
pub struct UserInfo<'a> {
    pub sub: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub iss: &'a str,
    pub aud: &'a str,
    pub exp: i64,
    pub iat: i64,
}

/// Handles login under the configured policy.
///
/// Direct: the body must be `{email, password}` and a token envelope is
/// returned. Delegated: any body is ignored and the caller is redirected to
/// the identity provider.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let credentials = if state.verifier.is_delegated() || body.trim_ascii().is_empty() {
        None
    } else {
        Some(decode_body(&body)?)
    };

    match state.verifier.login(credentials)? {
        LoginOutcome::Issued(token) => json_response(StatusCode::OK, &token),
        LoginOutcome::Redirect(url) => {
            Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
        }
    }
}

/// Completes a delegated login.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    let response = state
        .verifier
        .complete_login(query.code.as_deref(), query.state.as_deref())
        .await?;

    json_response(StatusCode::OK, &response)
}

/// Returns the caller's verified claims.
pub async fn userinfo(Extension(claims): Extension<SessionClaims>) -> Result<Response> {
    json_response(
        StatusCode::OK,
        &UserInfo {
            sub: &claims.sub,
            email: &claims.email,
            name: &claims.name,
            iss: &claims.iss,
            aud: &claims.aud,
            exp: claims.exp,
            iat: claims.iat,
        },
    )
}
