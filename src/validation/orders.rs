use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::order::{CreateOrderRequest, NewOrder, Order, UpdateOrderRequest};

/// The longest item description accepted.
const MAX_ITEM_LENGTH: usize = 255;

fn validate_item(item: &str) -> Result<String> {
    let item = item.trim();
    if item.is_empty() {
        return Err(AppError::InvalidRequest("item is required".to_string()));
    }
    if item.chars().count() > MAX_ITEM_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "item must be at most {} characters",
            MAX_ITEM_LENGTH
        )));
    }
    Ok(item.to_string())
}

/// Validates an amount.
///
/// # Arguments
///
/// * `amount` - The order amount.
///
/// # Returns
///
/// A `Result<()>` indicating whether the amount is a finite, non-negative number.
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(AppError::InvalidRequest("amount must be a number".to_string()));
    }
    if amount < 0.0 {
        return Err(AppError::InvalidRequest("amount must not be negative".to_string()));
    }
    Ok(())
}

/// Turns a create request into a `NewOrder`.
///
/// # Arguments
///
/// * `req` - The decoded request body.
/// * `now` - The time used when the request carries none.
///
/// # Returns
///
/// A `Result` containing the `NewOrder`, or `InvalidRequest` naming the first bad field.
pub fn validate_new_order(req: CreateOrderRequest, now: DateTime<Utc>) -> Result<NewOrder> {
    let item = validate_item(&req.item)?;

    let amount = req
        .amount
        .ok_or_else(|| AppError::InvalidRequest("amount is required".to_string()))?;
    validate_amount(amount)?;

    let customer_id = match req.customer_id {
        Some(id) if id > 0 => id,
        Some(_) => {
            return Err(AppError::InvalidRequest(
                "customer_id must be a positive integer".to_string(),
            ))
        }
        None => return Err(AppError::InvalidRequest("customer_id is required".to_string())),
    };

    Ok(NewOrder {
        item,
        amount,
        time: req.time.unwrap_or(now),
        customer_id,
    })
}

/// Applies an update request to `order`. Absent and empty fields are left alone.
pub fn apply_order_update(order: &mut Order, req: UpdateOrderRequest) -> Result<()> {
    if let Some(item) = req.item.filter(|i| !i.trim().is_empty()) {
        order.item = validate_item(&item)?;
    }

    if let Some(amount) = req.amount {
        validate_amount(amount)?;
        order.amount = amount;
    }

    if let Some(time) = req.time {
        order.time = time;
    }

    Ok(())
}
