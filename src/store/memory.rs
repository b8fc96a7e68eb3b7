use crate::store::CounterStore;
use crate::{Category, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// In-process counter store for tests and `--offline` development runs.
/// Same contract as the Firestore store, including atomic increments.
#[derive(Default)]
pub struct MemoryCounterStore {
    counts: Mutex<BTreeMap<Category, u64>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn get(&self, category: Category) -> Result<Option<u64>> {
        Ok(self.counts.lock().get(&category).copied())
    }

    async fn increment(&self, category: Category) -> Result<()> {
        let mut counts = self.counts.lock();
        *counts.entry(category).or_insert(0) += 1;
        Ok(())
    }

    async fn list_all(&self) -> Result<BTreeMap<Category, u64>> {
        Ok(self.counts.lock().clone())
    }
}
