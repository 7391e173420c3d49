//! Domain entities: customers and the service orders on their devices

pub mod customer;
pub mod order;

pub use customer::{Customer, CustomerDraft};
pub use order::{OrderDraft, ServiceOrder, StatusChange, WeekBucket};
