//! Counter store seam.
//!
//! Any backend works as long as `add` is one indivisible read-modify-write
//! that hands back the post-update value.

pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use visitcount_core::counter::Attributes;
use visitcount_core::error::Result;

use crate::config::{StoreBackend, StoreSection};

pub use file::FileCounterStore;
pub use memory::MemoryCounterStore;

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Backend label for logs and metrics.
    fn backend(&self) -> &'static str;

    fn table(&self) -> &str;

    /// `ADD attr :delta` on row `key`, creating the row if absent.
    /// Returns only the updated attributes (`UPDATED_NEW`).
    async fn add(&self, key: &str, attr: &str, delta: u64) -> Result<Attributes>;

    /// Read a row without modifying it.
    async fn get(&self, key: &str) -> Result<Option<Attributes>>;
}

/// Build the process-wide store client. Called once at startup.
pub async fn connect(cfg: &StoreSection) -> Result<Arc<dyn CounterStore>> {
    let table = cfg.table_name()?;
    let store: Arc<dyn CounterStore> = match cfg.backend {
        StoreBackend::Memory => Arc::new(MemoryCounterStore::new(table)),
        StoreBackend::File => Arc::new(FileCounterStore::open(&cfg.data_dir, table).await?),
    };
    tracing::info!(backend = store.backend(), table = store.table(), "counter store ready");
    Ok(store)
}
