//! Tarifario Contract - Derivation engine and document composition
//!
//! Pure functions from the current selection snapshot to everything the
//! contract document needs:
//! - [`derive`]: detail blocks, priced lines, totals, contract paragraphs
//!   and the plan tally for one section
//! - [`compose_fields`]: the flat key → string map feeding the document
//!   template, including the conditional legal/billing/pickup texts
//! - [`render`]: the document-renderer collaborator filling `<<KEY>>`
//!   placeholders
//!
//! Derivation never mutates the tree; it may be re-run after every event.

#![warn(unreachable_pub)]

pub mod contract;
pub mod derivation;
pub mod render;

// Re-exports for convenience
pub use contract::{
    compose_fields, ContractInputs, PickupMode, TemplateId, PORTABILITY_DISCLOSURE,
};
pub use derivation::{derive, DetailBlock, Derivation, PricedLine, Totals};
pub use render::{DocumentExporter, DocumentRenderer, RenderError, TemplateRenderer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
