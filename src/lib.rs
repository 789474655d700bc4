//! Customer and order management API with bearer-token auth and SMS
//! confirmations on new orders.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware_layer;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod sms;
pub mod state;
pub mod validation;
