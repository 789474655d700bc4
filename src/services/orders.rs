use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::notification::Notification;
use crate::models::order::{CreateOrderRequest, Order, UpdateOrderRequest};
use crate::models::page::{Page, PageRequest};
use crate::state::AppState;
use crate::validation::orders::{apply_order_update, validate_new_order};

/// Creates an order and notifies the customer by SMS.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - The decoded request body.
///
/// # Returns
///
/// A `Result` containing the stored `Order` with its customer embedded.
///
/// Nothing is written when the customer does not exist. The SMS goes out on
/// a detached task after the order is stored; its failure never fails the
/// request.
pub async fn create_order(state: &AppState, req: CreateOrderRequest) -> Result<Order> {
    let new_order = validate_new_order(req, Utc::now())?;

    let customer = state
        .customers
        .find_by_id(new_order.customer_id)
        .await?
        .ok_or(AppError::CustomerNotFound)?;

    let mut order = state.orders.create(new_order).await?;
    tracing::info!(
        "🛒 Order {} created for customer {}",
        order.id,
        customer.id
    );

    state
        .notifier
        .dispatch(Notification::order_received(&customer, &order));

    order.customer = Some(customer);
    Ok(order)
}

/// Lists orders, optionally for a single customer.
pub async fn list_orders(
    state: &AppState,
    page: PageRequest,
    customer_id: Option<i64>,
) -> Result<Page<Order>> {
    state.orders.list(page, customer_id).await
}

pub async fn get_order(state: &AppState, id: i64) -> Result<Order> {
    state
        .orders
        .find_by_id(id)
        .await?
        .ok_or(AppError::OrderNotFound)
}

/// Updates item, amount and time. The owning customer never changes.
pub async fn update_order(state: &AppState, id: i64, req: UpdateOrderRequest) -> Result<Order> {
    let mut order = get_order(state, id).await?;
    apply_order_update(&mut order, req)?;

    let order = state.orders.update(&order).await?;
    tracing::info!("✅ Order {} updated", order.id);
    Ok(order)
}

pub async fn delete_order(state: &AppState, id: i64) -> Result<()> {
    if !state.orders.delete(id).await? {
        return Err(AppError::OrderNotFound);
    }
    tracing::info!("🗑️ Order {} deleted", id);
    Ok(())
}
