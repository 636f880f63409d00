pub mod inventory;
pub mod order;
