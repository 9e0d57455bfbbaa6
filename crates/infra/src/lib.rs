//! `stockroom-infra` — file-backed collaborators of the inventory core.
//!
//! - [`snapshot`]: CSV save/load of the whole inventory.
//! - [`transaction_log`]: append-only CSV log of stock movements.
//! - [`config`]: where those files live.

pub mod config;
pub mod snapshot;
pub mod transaction_log;

pub use config::StorageConfig;
pub use snapshot::{
    LoadedInventory, SnapshotError, ensure_encodable, is_encodable, load_inventory, save_inventory,
};
pub use transaction_log::{Action, TransactionEntry, TransactionLog, TransactionLogError};
