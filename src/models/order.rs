use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

use super::customer::Customer;

/// Represents an order placed by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// The unique identifier for the order.
    pub id: i64,
    /// What was ordered.
    pub item: String,
    /// The order amount, never negative.
    pub amount: f64,
    /// When the order was placed.
    pub time: DateTime<Utc>,
    /// The ID of the customer who placed the order.
    pub customer_id: i64,
    /// The customer, embedded when the order is read back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    /// The timestamp when the order was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Maps a row of `orders` joined with `customers`.
    ///
    /// Customer columns are expected under a `c_` prefix.
    pub fn from_joined_row(row: &Row) -> Self {
        let customer = Customer {
            id: row.get("customer_id"),
            name: row.get("c_name"),
            code: row.get("c_code"),
            phone: row.get("c_phone"),
            email: row.get("c_email"),
            created_at: row.get("c_created_at"),
            updated_at: row.get("c_updated_at"),
        };

        Self {
            customer: Some(customer),
            ..Self::from(row)
        }
    }
}

impl From<&Row> for Order {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            item: row.get("item"),
            amount: row.get("amount"),
            time: row.get("time"),
            customer_id: row.get("customer_id"),
            customer: None,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// A validated order, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub item: String,
    pub amount: f64,
    pub time: DateTime<Utc>,
    pub customer_id: i64,
}

/// The request payload for creating an order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub amount: Option<f64>,
    /// Defaults to the time of the request.
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer_id: Option<i64>,
}

/// The request payload for updating an order. Absent or empty fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}
