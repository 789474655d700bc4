use crate::error::{AppError, Result};
use crate::models::customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest};
use crate::models::page::{Page, PageRequest};
use crate::state::AppState;
use crate::validation::customers::{apply_customer_update, validate_new_customer};

/// Creates a customer.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - The decoded request body.
///
/// # Returns
///
/// A `Result` containing the created `Customer`, or `CustomerExists` when the code is taken.
pub async fn create_customer(state: &AppState, req: CreateCustomerRequest) -> Result<Customer> {
    let req = validate_new_customer(req)?;

    if state.customers.find_by_code(&req.code).await?.is_some() {
        return Err(AppError::CustomerExists);
    }
    if let Some(email) = &req.email {
        if state.customers.email_in_use(email, 0).await? {
            return Err(AppError::EmailInUse);
        }
    }

    let customer = state.customers.create(req).await?;
    tracing::info!("✅ Customer {} created with code {}", customer.id, customer.code);
    Ok(customer)
}

pub async fn list_customers(state: &AppState, page: PageRequest) -> Result<Page<Customer>> {
    state.customers.list(page).await
}

pub async fn get_customer(state: &AppState, id: i64) -> Result<Customer> {
    state
        .customers
        .find_by_id(id)
        .await?
        .ok_or(AppError::CustomerNotFound)
}

/// Updates name, phone and email. The code never changes.
pub async fn update_customer(
    state: &AppState,
    id: i64,
    req: UpdateCustomerRequest,
) -> Result<Customer> {
    let mut customer = get_customer(state, id).await?;

    if let Some(email) = apply_customer_update(&mut customer, req)? {
        if state.customers.email_in_use(&email, id).await? {
            return Err(AppError::EmailInUse);
        }
    }

    let customer = state.customers.update(&customer).await?;
    tracing::info!("✅ Customer {} updated", customer.id);
    Ok(customer)
}

/// Deletes a customer together with their orders.
pub async fn delete_customer(state: &AppState, id: i64) -> Result<()> {
    if !state.customers.delete(id).await? {
        return Err(AppError::CustomerNotFound);
    }
    tracing::info!("🗑️ Customer {} deleted", id);
    Ok(())
}
