//! Store fixtures shared by the gateway integration tests.

#![allow(dead_code)]

use async_trait::async_trait;

use visitcount_core::counter::Attributes;
use visitcount_core::error::{Result, VisitCountError};
use visitcount_gateway::store::CounterStore;

/// Store whose every call fails, like an unreachable table.
pub struct DownStore;

#[async_trait]
impl CounterStore for DownStore {
    fn backend(&self) -> &'static str {
        "down"
    }
    fn table(&self) -> &str {
        "visitors"
    }
    async fn add(&self, _key: &str, _attr: &str, _delta: u64) -> Result<Attributes> {
        Err(VisitCountError::StoreUnavailable("connection refused".into()))
    }
    async fn get(&self, _key: &str) -> Result<Option<Attributes>> {
        Err(VisitCountError::StoreUnavailable("connection refused".into()))
    }
}
