//! visitcount core: transport-agnostic counter model, error types, and the
//! response contract.
//!
//! This crate defines the row model shared by every store backend and the
//! JSON shape clients depend on. It carries no transport or runtime
//! dependencies so backends and the gateway can share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A count that cannot be read back surfaces as `VisitCountError`, never as
//! a made-up value.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod counter;
pub mod error;
pub mod response;

/// Shared result type.
pub use error::{Result, VisitCountError};
