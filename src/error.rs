use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::oidc::OidcError;
use crate::auth::token::TokenError;

/// Why the auth gate turned a request away.
#[derive(Error, Debug)]
pub enum AuthRejection {
    /// No `Authorization` header at all.
    #[error("missing authorization header")]
    MissingToken,

    /// Header present but not `Bearer <token>`.
    #[error("authorization header is not a bearer credential")]
    InvalidFormat,

    /// The token itself did not verify.
    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A malformed or incomplete request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The referenced customer does not exist.
    #[error("Customer not found")]
    CustomerNotFound,

    /// The referenced order does not exist.
    #[error("Order not found")]
    OrderNotFound,

    /// A customer with the same business code already exists.
    #[error("Customer code already exists")]
    CustomerExists,

    /// Another customer already uses this email.
    #[error("Email already in use")]
    EmailInUse,

    /// The auth gate rejected the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthRejection),

    /// Process configuration makes the operation impossible.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The identity provider failed or was never configured.
    #[error("Identity provider error: {0}")]
    Oidc(#[from] OidcError),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

/// The JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub message: String,
    pub code: u16,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret => AppError::Configuration(err.to_string()),
            TokenError::Encoding(msg) => AppError::Internal(msg),
            other => AppError::Unauthorized(AuthRejection::InvalidToken(other)),
        }
    }
}

impl AppError {
    /// Maps every variant to its status, public code and public message.
    ///
    /// This is the only place internal detail is turned into something a
    /// caller sees, so it is also where that detail gets logged.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", "Database error".to_string())
            }

            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", "Database error".to_string())
            }

            AppError::InvalidRequest(msg) => {
                tracing::debug!("Invalid request: {}", msg);
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }

            AppError::CustomerNotFound => {
                tracing::debug!("Customer not found");
                (StatusCode::NOT_FOUND, "customer_not_found", "Customer not found".to_string())
            }

            AppError::OrderNotFound => {
                tracing::debug!("Order not found");
                (StatusCode::NOT_FOUND, "order_not_found", "Order not found".to_string())
            }

            AppError::CustomerExists => (
                StatusCode::CONFLICT,
                "customer_exists",
                "Customer with this code already exists".to_string(),
            ),

            AppError::EmailInUse => (
                StatusCode::CONFLICT,
                "email_in_use",
                "Email already in use".to_string(),
            ),

            AppError::Unauthorized(rejection) => {
                tracing::warn!("❌ Unauthorized: {}", rejection);
                match rejection {
                    AuthRejection::MissingToken => (
                        StatusCode::UNAUTHORIZED,
                        "missing_token",
                        "Missing token".to_string(),
                    ),
                    AuthRejection::InvalidFormat => (
                        StatusCode::UNAUTHORIZED,
                        "invalid_token_format",
                        "Invalid token format".to_string(),
                    ),
                    AuthRejection::InvalidToken(_) => (
                        StatusCode::UNAUTHORIZED,
                        "invalid_token",
                        "Invalid token".to_string(),
                    ),
                }
            }

            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "token_generation_failed",
                    "Token generation failed".to_string(),
                )
            }

            AppError::Oidc(e) => {
                match e {
                    OidcError::NotConfigured | OidcError::MissingCode => {
                        tracing::debug!("OIDC request error: {}", e)
                    }
                    _ => tracing::error!("OIDC error: {}", e),
                }
                match e {
                    OidcError::NotConfigured => (
                        StatusCode::BAD_REQUEST,
                        "oidc_not_configured",
                        "OIDC provider not configured".to_string(),
                    ),
                    OidcError::MissingCode => (
                        StatusCode::BAD_REQUEST,
                        "missing_code",
                        "Authorization code is required".to_string(),
                    ),
                    OidcError::Discovery(_) | OidcError::TokenExchange(_) => (
                        StatusCode::BAD_GATEWAY,
                        "token_exchange_failed",
                        "Could not exchange authorization code".to_string(),
                    ),
                    OidcError::InvalidIdToken(_) => (
                        StatusCode::UNAUTHORIZED,
                        "invalid_id_token",
                        "Identity token could not be verified".to_string(),
                    ),
                }
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = self.parts();

        let body = sonic_rs::to_string(&ErrorBody {
            error,
            message,
            code: status.as_u16(),
        })
        .unwrap_or_else(|_| {
            r#"{"error":"internal_error","message":"Internal server error","code":500}"#.to_string()
        });

        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}
