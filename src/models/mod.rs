pub mod customer;
pub mod notification;
pub mod order;
pub mod page;
