use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, Result};

pub mod auth;
pub mod customers;
pub mod health;
pub mod orders;

/// Serializes `body` with sonic-rs into a JSON response.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Result<Response> {
    let body = sonic_rs::to_string(body)
        .map_err(|e| AppError::Internal(format!("Failed to serialize response: {}", e)))?;

    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Decodes a JSON request body. Anything undecodable is an `invalid_request`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    sonic_rs::from_slice(body)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {}", e)))
}

/// Parses a numeric path segment.
pub(crate) fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::InvalidRequest(format!("Invalid id: {}", raw)))
}

/// A plain `{"message": ...}` body.
#[derive(Serialize)]
pub(crate) struct MessageResponse {
    pub message: &'static str,
}
