//! The counting endpoint.
//!
//! One invocation is exactly one atomic `ADD cnt 1` on the `global` row;
//! the response reports the value that add produced.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use visitcount_core::counter::{extract_count, COUNT_ATTR, GLOBAL_KEY};
use visitcount_core::error::Result;
use visitcount_core::response::ResponseContract;

use crate::app_state::AppState;
use crate::error::{apply_contract_headers, ApiError};
use crate::obs::ServiceMetrics;
use crate::store::CounterStore;

#[derive(Clone)]
pub struct CounterHandler {
    store: Arc<dyn CounterStore>,
    contract: ResponseContract,
    metrics: Arc<ServiceMetrics>,
}

impl CounterHandler {
    pub fn new(
        store: Arc<dyn CounterStore>,
        contract: ResponseContract,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            store,
            contract,
            metrics,
        }
    }

    pub fn contract(&self) -> ResponseContract {
        self.contract
    }

    /// Count one visit and return the post-increment value.
    pub async fn increment(&self) -> Result<u64> {
        let backend = self.store.backend();

        let call = StoreCall::begin(&self.metrics, backend);
        let stored = self.store.add(GLOBAL_KEY, COUNT_ATTR, 1).await;
        let elapsed = call.elapsed();
        drop(call);

        let res = match stored {
            Ok(updated) => extract_count(&updated, COUNT_ATTR),
            Err(e) => {
                self.metrics
                    .store_errors
                    .inc(&[("code", e.client_code().as_str())]);
                Err(e)
            }
        };

        match &res {
            Ok(count) => {
                self.metrics.increments.inc(&[("outcome", "ok")]);
                tracing::debug!(
                    count,
                    elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
                    "visit counted"
                );
            }
            Err(e) => {
                let code = e.client_code().as_str();
                self.metrics.increments.inc(&[("outcome", code)]);
                tracing::error!(
                    backend,
                    table = self.store.table(),
                    code,
                    error = %e,
                    "visit increment failed"
                );
            }
        }

        res
    }

    pub async fn handle(&self) -> std::result::Result<Response, ApiError> {
        match self.increment().await {
            Ok(count) => Ok(counted_response(&self.contract, count)),
            Err(e) => Err(ApiError::new(e, self.contract)),
        }
    }
}

/// One outstanding store call. Dropping it settles the in-flight gauge and
/// the latency histogram, including when the request future is cancelled.
struct StoreCall<'a> {
    metrics: &'a ServiceMetrics,
    backend: &'static str,
    started: Instant,
}

impl<'a> StoreCall<'a> {
    fn begin(metrics: &'a ServiceMetrics, backend: &'static str) -> Self {
        metrics.in_flight.inc(&[]);
        Self {
            metrics,
            backend,
            started: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for StoreCall<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.dec(&[]);
        self.metrics
            .store_duration
            .observe(&[("backend", self.backend)], self.started.elapsed());
    }
}

/// `200` with the configured single-field JSON body.
pub fn counted_response(contract: &ResponseContract, count: u64) -> Response {
    let mut resp = (StatusCode::OK, contract.body(count).to_string()).into_response();
    apply_contract_headers(resp.headers_mut(), contract);
    resp
}

/// Axum entry. The request itself carries nothing the counter needs.
pub async fn visit(State(state): State<AppState>) -> Response {
    match state.handler().handle().await {
        Ok(resp) => resp,
        Err(e) => e.into_response(),
    }
}
