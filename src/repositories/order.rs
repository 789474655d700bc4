use async_trait::async_trait;
use deadpool_postgres::Pool;

use super::OrderRepository;
use crate::{
    error::{AppError, Result},
    models::{
        order::{NewOrder, Order},
        page::{Page, PageRequest},
    },
};

const ORDER_COLUMNS: &str = "id, item, amount, time, customer_id, created_at, updated_at";

const JOINED_SELECT: &str = r#"
    SELECT o.id, o.item, o.amount, o.time, o.customer_id, o.created_at, o.updated_at,
           c.name AS c_name, c.code AS c_code, c.phone AS c_phone, c.email AS c_email,
           c.created_at AS c_created_at, c.updated_at AS c_updated_at
    FROM orders o
    JOIN customers c ON c.id = o.customer_id
"#;

/// `OrderRepository` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: Pool,
}

impl PgOrderRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, new: NewOrder) -> Result<Order> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO orders (item, amount, time, customer_id) VALUES ($1, $2, $3, $4) RETURNING {}",
                    ORDER_COLUMNS
                ),
                &[&new.item, &new.amount, &new.time, &new.customer_id],
            )
            .await?;

        Ok(Order::from(&row))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(&format!("{} WHERE o.id = $1", JOINED_SELECT), &[&id])
            .await?;
        Ok(row.as_ref().map(Order::from_joined_row))
    }

    async fn list(&self, page: PageRequest, customer_id: Option<i64>) -> Result<Page<Order>> {
        let client = self.pool.get().await?;

        // `$1 IS NULL` lets one statement serve both the filtered and unfiltered listing.
        let total: i64 = client
            .query_one(
                "SELECT COUNT(*) FROM orders WHERE ($1::BIGINT IS NULL OR customer_id = $1)",
                &[&customer_id],
            )
            .await?
            .get(0);

        let rows = client
            .query(
                &format!(
                    "{} WHERE ($1::BIGINT IS NULL OR o.customer_id = $1) ORDER BY o.id ASC LIMIT $2 OFFSET $3",
                    JOINED_SELECT
                ),
                &[&customer_id, &page.limit, &page.offset()],
            )
            .await?;

        Ok(Page {
            items: rows.iter().map(Order::from_joined_row).collect(),
            total,
        })
    }

    async fn update(&self, order: &Order) -> Result<Order> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                r#"
                UPDATE orders
                SET item = $1, amount = $2, time = $3, updated_at = NOW()
                WHERE id = $4
                "#,
                &[&order.item, &order.amount, &order.time, &order.id],
            )
            .await?;

        if updated == 0 {
            return Err(AppError::OrderNotFound);
        }

        drop(client);
        self.find_by_id(order.id).await?.ok_or(AppError::OrderNotFound)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM orders WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }
}
