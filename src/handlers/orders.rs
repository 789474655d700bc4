use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};

use super::{decode_body, json_response, parse_id, MessageResponse};
use crate::{
    error::{AppError, Result},
    models::{
        order::Order,
        page::{PageQuery, PageRequest},
    },
    services::orders as order_service,
    state::AppState,
};

/// The query parameters for listing orders.
#[derive(Deserialize, Debug, Default)]
pub struct ListOrdersQuery {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub customer_id: Option<i64>,
}

/// The response payload for listing orders.
#[derive(Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Creates an order and sends the confirmation SMS in the background.
///
/// Responds `201 Created` as soon as the order is stored.
pub async fn create_order(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let req = decode_body(&body)?;
    let order = order_service::create_order(&state, req).await?;
    json_response(StatusCode::CREATED, &order)
}

/// Lists orders, optionally filtered by `customer_id`.
pub async fn list_orders(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListOrdersQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) = query.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let page = PageRequest::from(PageQuery {
        page: query.page,
        limit: query.limit,
    });

    let result = order_service::list_orders(&state, page, query.customer_id).await?;

    json_response(
        StatusCode::OK,
        &OrderList {
            orders: result.items,
            total: result.total,
            page: page.page,
            limit: page.limit,
        },
    )
}

pub async fn get_order(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let order = order_service::get_order(&state, parse_id(&id)?).await?;
    json_response(StatusCode::OK, &order)
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let req = decode_body(&body)?;
    let order = order_service::update_order(&state, id, req).await?;
    json_response(StatusCode::OK, &order)
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    order_service::delete_order(&state, parse_id(&id)?).await?;
    json_response(
        StatusCode::OK,
        &MessageResponse {
            message: "Order deleted successfully",
        },
    )
}
