use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

/// Represents a customer in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// The unique identifier for the customer.
    pub id: i64,
    /// The customer's display name, used in notifications.
    pub name: String,
    /// The unique business code.
    pub code: String,
    /// The phone number notifications are sent to.
    pub phone: String,
    /// The customer's email address, unique when set.
    pub email: Option<String>,
    /// The timestamp when the customer was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the customer was last updated.
    pub updated_at: DateTime<Utc>,
}

impl From<&Row> for Customer {
    fn from(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            code: row.get("code"),
            phone: row.get("phone"),
            email: row.get("email"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

/// The request payload for creating a customer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(min = 1, max = 64))]
    pub code: String,
    #[garde(length(min = 3, max = 32))]
    pub phone: String,
    #[serde(default)]
    #[garde(email)]
    pub email: Option<String>,
}

/// The request payload for updating a customer. Absent or empty fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
