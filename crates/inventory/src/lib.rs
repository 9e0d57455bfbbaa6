//! Inventory domain module.
//!
//! This crate contains the business rules for stock tracking, implemented purely
//! as deterministic domain logic (no I/O, no logging, no storage format).

pub mod ranking;
pub mod record;
pub mod store;

pub use ranking::{Ranking, expiry_priority, restock_priority};
pub use record::InventoryRecord;
pub use store::InventoryStore;
