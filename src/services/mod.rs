pub mod customers;
pub mod notifications;
pub mod orders;
