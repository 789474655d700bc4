use garde::Validate;

use crate::error::{AppError, Result};
use crate::models::customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest};

fn report_to_error(report: garde::Report) -> AppError {
    AppError::InvalidRequest(report.to_string().trim().to_string())
}

/// Trims and validates a create request.
///
/// An empty email is treated as no email.
pub fn validate_new_customer(mut req: CreateCustomerRequest) -> Result<CreateCustomerRequest> {
    req.name = req.name.trim().to_string();
    req.code = req.code.trim().to_string();
    req.phone = req.phone.trim().to_string();
    req.email = req
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    req.validate().map_err(report_to_error)?;
    Ok(req)
}

/// The fields an update actually changes, held to the same rules as a create.
#[derive(Debug, Validate)]
struct CustomerChanges {
    #[garde(length(min = 1, max = 255))]
    name: Option<String>,
    #[garde(length(min = 3, max = 32))]
    phone: Option<String>,
    #[garde(email)]
    email: Option<String>,
}

/// Trims a field and drops it when nothing is left.
fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Applies an update request to `customer`. Absent and empty fields are left alone.
///
/// # Returns
///
/// `Some(email)` when the request changes the email, so the caller can check uniqueness.
pub fn apply_customer_update(
    customer: &mut Customer,
    req: UpdateCustomerRequest,
) -> Result<Option<String>> {
    let changes = CustomerChanges {
        name: present(req.name),
        phone: present(req.phone),
        email: present(req.email),
    };
    changes.validate().map_err(report_to_error)?;

    if let Some(name) = changes.name {
        customer.name = name;
    }
    if let Some(phone) = changes.phone {
        customer.phone = phone;
    }

    match changes.email {
        Some(email) if customer.email.as_deref() != Some(email.as_str()) => {
            customer.email = Some(email.clone());
            Ok(Some(email))
        }
        _ => Ok(None),
    }
}
