//! In-memory stores for customers and service orders

pub mod customers;
pub mod orders;

pub use customers::CustomerStore;
pub use orders::OrderStore;
