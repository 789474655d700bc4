//! The persistence collaborator.
//!
//! Services only see these traits; `PgCustomerRepository` and
//! `PgOrderRepository` are the PostgreSQL implementations.

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{
        customer::{CreateCustomerRequest, Customer},
        order::{NewOrder, Order},
        page::{Page, PageRequest},
    },
};

pub mod customer;
pub mod order;

pub use customer::PgCustomerRepository;
pub use order::PgOrderRepository;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Inserts a customer. Fails with `CustomerExists` on a duplicate code.
    async fn create(&self, new: CreateCustomerRequest) -> Result<Customer>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Customer>>;

    /// Whether a customer other than `except_id` already uses `email`.
    async fn email_in_use(&self, email: &str, except_id: i64) -> Result<bool>;

    async fn list(&self, page: PageRequest) -> Result<Page<Customer>>;

    /// Writes name, phone and email back; returns the stored row.
    async fn update(&self, customer: &Customer) -> Result<Customer>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts an order. The customer must already have been checked.
    async fn create(&self, new: NewOrder) -> Result<Order>;

    /// Finds an order with its customer embedded.
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>>;

    /// Lists orders with customers embedded, optionally for one customer.
    async fn list(&self, page: PageRequest, customer_id: Option<i64>) -> Result<Page<Order>>;

    /// Writes item, amount and time back; returns the stored row.
    async fn update(&self, order: &Order) -> Result<Order>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, id: i64) -> Result<bool>;
}
