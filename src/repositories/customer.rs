use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;

use super::CustomerRepository;
use crate::{
    error::{AppError, Result},
    models::{
        customer::{CreateCustomerRequest, Customer},
        page::{Page, PageRequest},
    },
};

const COLUMNS: &str = "id, name, code, phone, email, created_at, updated_at";

/// `CustomerRepository` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: Pool,
}

impl PgCustomerRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &tokio_postgres::Error) -> bool {
    e.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, new: CreateCustomerRequest) -> Result<Customer> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO customers (name, code, phone, email) VALUES ($1, $2, $3, $4) RETURNING {}",
                    COLUMNS
                ),
                &[&new.name, &new.code, &new.phone, &new.email],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::CustomerExists
                } else {
                    AppError::Database(e)
                }
            })?;

        Ok(Customer::from(&row))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {} FROM customers WHERE id = $1", COLUMNS),
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(Customer::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Customer>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!("SELECT {} FROM customers WHERE code = $1", COLUMNS),
                &[&code],
            )
            .await?;
        Ok(row.as_ref().map(Customer::from))
    }

    async fn email_in_use(&self, email: &str, except_id: i64) -> Result<bool> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                "SELECT 1 FROM customers WHERE email = $1 AND id <> $2 LIMIT 1",
                &[&email, &except_id],
            )
            .await?;
        Ok(row.is_some())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Customer>> {
        let client = self.pool.get().await?;

        let total: i64 = client
            .query_one("SELECT COUNT(*) FROM customers", &[])
            .await?
            .get(0);

        let rows = client
            .query(
                &format!(
                    "SELECT {} FROM customers ORDER BY id ASC LIMIT $1 OFFSET $2",
                    COLUMNS
                ),
                &[&page.limit, &page.offset()],
            )
            .await?;

        Ok(Page {
            items: rows.iter().map(Customer::from).collect(),
            total,
        })
    }

    async fn update(&self, customer: &Customer) -> Result<Customer> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                &format!(
                    r#"
                    UPDATE customers
                    SET name = $1, phone = $2, email = $3, updated_at = NOW()
                    WHERE id = $4
                    RETURNING {}
                    "#,
                    COLUMNS
                ),
                &[&customer.name, &customer.phone, &customer.email, &customer.id],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::EmailInUse
                } else {
                    AppError::Database(e)
                }
            })?
            .ok_or(AppError::CustomerNotFound)?;

        Ok(Customer::from(&row))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let client = self.pool.get().await?;
        let deleted = client
            .execute("DELETE FROM customers WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }
}
