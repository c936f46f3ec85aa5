use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use visitcount_core::counter::{apply_add, new_row, Attributes};
use visitcount_core::error::Result;

use super::CounterStore;

/// In-process table. The update runs under the row's shard write guard.
pub struct MemoryCounterStore {
    table: String,
    rows: DashMap<String, Attributes>,
}

impl MemoryCounterStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            rows: DashMap::new(),
        }
    }

    /// Overwrite a whole row. Seeding only; the handler never calls this.
    pub fn put(&self, key: impl Into<String>, row: Attributes) {
        self.rows.insert(key.into(), row);
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn table(&self) -> &str {
        &self.table
    }

    async fn add(&self, key: &str, attr: &str, delta: u64) -> Result<Attributes> {
        match self.rows.entry(key.to_string()) {
            Entry::Occupied(mut e) => apply_add(e.get_mut(), attr, delta),
            Entry::Vacant(e) => {
                let mut row = new_row(key);
                let updated = apply_add(&mut row, attr, delta)?;
                e.insert(row);
                Ok(updated)
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Attributes>> {
        Ok(self.rows.get(key).map(|r| r.value().clone()))
    }
}
