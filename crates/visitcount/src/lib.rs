//! Top-level facade crate for visitcount.
//!
//! Re-exports the core model and the gateway library so users can depend on a single crate.

pub mod core {
    pub use visitcount_core::*;
}

pub mod gateway {
    pub use visitcount_gateway::*;
}
