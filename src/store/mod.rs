pub mod credentials;
pub mod firestore;
pub mod memory;

pub use credentials::StoreCredentials;
pub use firestore::FirestoreCounterStore;
pub use memory::MemoryCounterStore;

use crate::{Category, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Per-category prediction tally, keyed by category name in the backing
/// store. Counts are created on first increment and never deleted.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current count for a category, `None` if no record exists yet.
    async fn get(&self, category: Category) -> Result<Option<u64>>;

    /// Add one to the category's count, creating the record at 1 when
    /// absent. Atomic: concurrent increments do not lose updates.
    async fn increment(&self, category: Category) -> Result<()>;

    /// Every stored record.
    async fn list_all(&self) -> Result<BTreeMap<Category, u64>>;
}
