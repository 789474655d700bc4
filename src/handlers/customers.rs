use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Serialize;

use super::{decode_body, json_response, parse_id, MessageResponse};
use crate::{
    error::{AppError, Result},
    models::{
        customer::Customer,
        page::{PageQuery, PageRequest},
    },
    services::customers as customer_service,
    state::AppState,
};

/// The response payload for listing customers.
#[derive(Serialize)]
pub struct CustomerList {
    pub customers: Vec<Customer>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Creates a customer.
pub async fn create_customer(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let req = decode_body(&body)?;
    let customer = customer_service::create_customer(&state, req).await?;
    json_response(StatusCode::CREATED, &customer)
}

/// Lists customers, one page at a time.
pub async fn list_customers(
    State(state): State<AppState>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let page = PageRequest::from(query);

    let result = customer_service::list_customers(&state, page).await?;

    json_response(
        StatusCode::OK,
        &CustomerList {
            customers: result.items,
            total: result.total,
            page: page.page,
            limit: page.limit,
        },
    )
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let customer = customer_service::get_customer(&state, parse_id(&id)?).await?;
    json_response(StatusCode::OK, &customer)
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let req = decode_body(&body)?;
    let customer = customer_service::update_customer(&state, id, req).await?;
    json_response(StatusCode::OK, &customer)
}

/// Deletes a customer and, through the foreign key, their orders.
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    customer_service::delete_customer(&state, parse_id(&id)?).await?;
    json_response(
        StatusCode::OK,
        &MessageResponse {
            message: "Customer deleted successfully",
        },
    )
}
