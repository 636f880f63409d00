//! Core domain, configuration and error taxonomy for AutoFlow.
//!
//! The `InventoryGateway` trait in [`gateway`] is the seam between the reply
//! engine and whatever tabular source backs the product catalog.

pub mod config;
pub mod domain;
pub mod errors;
pub mod gateway;

pub use domain::inventory::{InventoryItem, ProductLookup};
pub use domain::order::{OrderId, OrderRecord, OrderStatus};
pub use errors::{DomainError, InterfaceError};
pub use gateway::InventoryGateway;
