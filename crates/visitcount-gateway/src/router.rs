//! Axum router wiring.
//!
//! The counter lives on the configured path (GET and POST both count); ops
//! endpoints sit beside it.

use axum::{routing::get, Router};

use crate::{app_state::AppState, handler, ops};

pub fn build_router(state: AppState) -> Router {
    let path = state.cfg().server.path.clone();

    Router::new()
        .route(&path, get(handler::visit).post(handler::visit))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
