//! Shared application state.
//!
//! Holds the one store client the process creates, and the handler wired to
//! it. Cloning is cheap; every request sees the same client.

use std::sync::Arc;

use visitcount_core::error::Result;

use crate::config::ServiceConfig;
use crate::handler::CounterHandler;
use crate::obs::ServiceMetrics;
use crate::store::{self, CounterStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    store: Arc<dyn CounterStore>,
    handler: CounterHandler,
    metrics: Arc<ServiceMetrics>,
}

impl AppState {
    /// Connect the configured store and build state.
    /// Returns Result so main can report startup errors without panicking.
    pub async fn new(cfg: ServiceConfig) -> Result<Self> {
        let store = store::connect(&cfg.store).await?;
        Ok(Self::with_store(cfg, store))
    }

    /// Build state around an existing store client.
    pub fn with_store(cfg: ServiceConfig, store: Arc<dyn CounterStore>) -> Self {
        let metrics = Arc::new(ServiceMetrics::default());
        let handler = CounterHandler::new(
            Arc::clone(&store),
            cfg.response.contract(),
            Arc::clone(&metrics),
        );

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                store,
                handler,
                metrics,
            }),
        }
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn handler(&self) -> &CounterHandler {
        &self.inner.handler
    }

    pub fn store(&self) -> Arc<dyn CounterStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn metrics(&self) -> Arc<ServiceMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }
}
