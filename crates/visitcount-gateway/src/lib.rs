//! visitcount gateway library entry.
//!
//! Wires config, the counter store client, the counting handler, and the
//! ops endpoints into an axum service. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handler;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
