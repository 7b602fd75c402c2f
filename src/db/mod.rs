use std::path::Path;
use std::sync::Arc;

use tracing::warn;

pub mod storage;

pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};

/// Cache key holding the last known ledger transaction count
pub const TRANSACTION_COUNT_KEY: &str = "transactionCount";

/// Open the durable key/value store backing the client cache
pub fn init_storage(path: &Path) -> Result<Arc<dyn LocalStorage>, StorageError> {
    Ok(Arc::new(FileStorage::open(path)?))
}

/// Last cached transaction count; unreadable values count as absent
pub fn get_transaction_count(storage: &dyn LocalStorage) -> Option<u64> {
    let raw = storage.get_item(TRANSACTION_COUNT_KEY)?;
    match raw.trim().parse::<u64>() {
        Ok(count) => Some(count),
        Err(_) => {
            warn!("Ignoring unreadable cached {}: {:?}", TRANSACTION_COUNT_KEY, raw);
            None
        }
    }
}

pub fn set_transaction_count(storage: &dyn LocalStorage, count: u64) -> Result<(), StorageError> {
    storage.set_item(TRANSACTION_COUNT_KEY, &count.to_string())
}
