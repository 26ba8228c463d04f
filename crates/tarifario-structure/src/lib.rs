//! Tarifario Structure - Widget configuration compiler
//!
//! The structure table describes how catalog rows are grouped into the
//! sections, subsections and widgets of the sales form. This crate compiles
//! those declarative rows (or a built-in default when the table is absent)
//! into typed [`WidgetConfig`] records grouped by section:
//! - [`config`]: the closed widget-kind variants and their option groups
//! - [`grammar`]: the `key:prefix|prefix,...` mini-grammars
//! - [`Structure`]: the compiled, ordered section → widgets map

#![warn(unreachable_pub)]

pub mod config;
pub mod grammar;
mod structure;

// Re-exports for convenience
pub use config::{ComponentKind, LineState, ToggleGroup, WidgetConfig};
pub use grammar::{parse_extra_mapping, parse_prefix_list, parse_toggle_options};
pub use structure::Structure;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
