#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;

use visitcount_core::counter::{
    extract_count, AttrValue, Attributes, COUNT_ATTR, GLOBAL_KEY, KEY_ATTR,
};
use visitcount_core::error::Result;
use visitcount_core::response::ResponseContract;
use visitcount_gateway::handler::CounterHandler;
use visitcount_gateway::obs::ServiceMetrics;
use visitcount_gateway::store::{CounterStore, MemoryCounterStore};

use common::DownStore;

fn handler_over(store: Arc<dyn CounterStore>) -> (CounterHandler, Arc<ServiceMetrics>) {
    let metrics = Arc::new(ServiceMetrics::default());
    let h = CounterHandler::new(store, ResponseContract::default(), Arc::clone(&metrics));
    (h, metrics)
}

async fn stored_count(store: &dyn CounterStore) -> Option<u64> {
    store
        .get(GLOBAL_KEY)
        .await
        .unwrap()
        .map(|row| extract_count(&row, COUNT_ATTR).unwrap())
}

/// Store that applies the add but answers without the attribute.
struct ForgetfulStore(MemoryCounterStore);

#[async_trait]
impl CounterStore for ForgetfulStore {
    fn backend(&self) -> &'static str {
        "forgetful"
    }
    fn table(&self) -> &str {
        self.0.table()
    }
    async fn add(&self, key: &str, attr: &str, delta: u64) -> Result<Attributes> {
        self.0.add(key, attr, delta).await?;
        Ok(Attributes::new())
    }
    async fn get(&self, key: &str) -> Result<Option<Attributes>> {
        self.0.get(key).await
    }
}

/// Store that never answers within a test's patience.
struct StalledStore;

#[async_trait]
impl CounterStore for StalledStore {
    fn backend(&self) -> &'static str {
        "stalled"
    }
    fn table(&self) -> &str {
        "visitors"
    }
    async fn add(&self, _key: &str, _attr: &str, _delta: u64) -> Result<Attributes> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Attributes::new())
    }
    async fn get(&self, _key: &str) -> Result<Option<Attributes>> {
        Ok(None)
    }
}

#[tokio::test]
async fn cold_start_creates_row_with_one() {
    let store = Arc::new(MemoryCounterStore::new("visitors"));
    let (h, _) = handler_over(store.clone());

    assert_eq!(stored_count(store.as_ref()).await, None);
    assert_eq!(h.increment().await.unwrap(), 1);

    let row = store.get(GLOBAL_KEY).await.unwrap().expect("row created");
    assert_eq!(row.get(KEY_ATTR), Some(&AttrValue::S("global".into())));
    assert_eq!(row.get(COUNT_ATTR), Some(&AttrValue::N(1)));
}

#[tokio::test]
async fn sequential_invocations_are_monotonic() {
    let store = Arc::new(MemoryCounterStore::new("visitors"));
    let mut seed = Attributes::new();
    seed.insert(KEY_ATTR.into(), AttrValue::S(GLOBAL_KEY.into()));
    seed.insert(COUNT_ATTR.into(), AttrValue::N(41));
    store.put(GLOBAL_KEY, seed);

    let (h, _) = handler_over(store.clone());
    for expected in 42..=51 {
        assert_eq!(h.increment().await.unwrap(), expected);
    }
    assert_eq!(stored_count(store.as_ref()).await, Some(51));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn hundred_concurrent_invocations() {
    let store = Arc::new(MemoryCounterStore::new("visitors"));
    let (h, metrics) = handler_over(store.clone());

    let tasks = (0..100).map(|_| {
        let h = h.clone();
        tokio::spawn(async move { h.increment().await })
    });
    let counts: Vec<u64> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task").expect("increment"))
        .collect();

    let unique: HashSet<u64> = counts.iter().copied().collect();
    assert_eq!(unique.len(), 100);
    assert!(counts.iter().all(|c| (1..=100).contains(c)));
    assert_eq!(stored_count(store.as_ref()).await, Some(100));
    assert_eq!(metrics.increments.get(&[("outcome", "ok")]), 100);
    assert_eq!(metrics.in_flight.get(&[]), 0);
}

#[tokio::test]
async fn store_failure_is_surfaced() {
    let (h, metrics) = handler_over(Arc::new(DownStore));

    let err = h.increment().await.expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "STORE_UNAVAILABLE");
    assert_eq!(metrics.increments.get(&[("outcome", "STORE_UNAVAILABLE")]), 1);
    assert_eq!(metrics.store_errors.get(&[("code", "STORE_UNAVAILABLE")]), 1);
    assert_eq!(metrics.store_duration.count(&[("backend", "down")]), 1);
}

#[tokio::test]
async fn missing_attribute_in_response_is_not_defaulted() {
    let (h, _) = handler_over(Arc::new(ForgetfulStore(MemoryCounterStore::new("visitors"))));

    let err = h.increment().await.expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "MALFORMED_RECORD");
}

#[tokio::test]
async fn unreadable_answer_is_not_a_store_error() {
    let (h, metrics) =
        handler_over(Arc::new(ForgetfulStore(MemoryCounterStore::new("visitors"))));

    h.increment().await.expect_err("must fail");
    assert_eq!(metrics.increments.get(&[("outcome", "MALFORMED_RECORD")]), 1);
    assert_eq!(metrics.store_errors.get(&[("code", "MALFORMED_RECORD")]), 0);
}

#[tokio::test]
async fn cancelled_request_settles_gauge_and_latency() {
    let (h, metrics) = handler_over(Arc::new(StalledStore));

    let res = tokio::time::timeout(Duration::from_millis(20), h.increment()).await;
    assert!(res.is_err(), "store call must still be pending");

    assert_eq!(metrics.in_flight.get(&[]), 0);
    assert_eq!(metrics.store_duration.count(&[("backend", "stalled")]), 1);
    assert_eq!(metrics.increments.get(&[("outcome", "ok")]), 0);
}

#[tokio::test]
async fn string_count_fails_and_is_left_intact() {
    let store = Arc::new(MemoryCounterStore::new("visitors"));
    let mut seed = Attributes::new();
    seed.insert(KEY_ATTR.into(), AttrValue::S(GLOBAL_KEY.into()));
    seed.insert(COUNT_ATTR.into(), AttrValue::S("many".into()));
    store.put(GLOBAL_KEY, seed);

    let (h, _) = handler_over(store.clone());
    let err = h.increment().await.expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "MALFORMED_RECORD");

    let row = store.get(GLOBAL_KEY).await.unwrap().unwrap();
    assert_eq!(row.get(COUNT_ATTR), Some(&AttrValue::S("many".into())));
}
