use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use crate::error::Result;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// Liveness probe.
pub async fn health() -> Result<Response> {
    super::json_response(StatusCode::OK, &Health { status: "ok" })
}
