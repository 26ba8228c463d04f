//! Tarifario Store - Persistence collaborator
//!
//! Async storage seam for the pieces of the sales flow that outlive a
//! session: rendered contract documents and the executive roster. The core
//! crates stay synchronous and pure; only this boundary is async.

#![warn(unreachable_pub)]

pub mod error;
pub mod store;

// Re-exports for convenience
pub use error::StoreError;
pub use store::{ContractStore, Executive, FileStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
