//! Tarifario Catalog - Priced plan records
//!
//! The catalog is the flat table of priced telecom plans that drives the
//! sales form. This crate owns:
//! - [`PlanRecord`] / [`Catalog`]: typed, immutable plan rows
//! - [`normalize`]: alias-tolerant column resolution and numeric coercion
//! - [`matcher`]: the prefix rule deciding which rows belong to a widget
//!
//! # Example
//!
//! ```rust
//! use tarifario_catalog::{Catalog, matches_prefix};
//! use std::collections::HashMap;
//!
//! let mut row = HashMap::new();
//! row.insert("Codigo".to_string(), "NM01".to_string());
//! row.insert("Plan".to_string(), "Multi 30GB".to_string());
//! row.insert("Valor".to_string(), "1.234,56".to_string());
//!
//! let catalog = Catalog::from_rows(&[row]);
//! let plan = catalog.find("NM01").unwrap();
//! assert_eq!(plan.regular_price, Some(1234.56));
//! assert!(matches_prefix(&plan.code, "NM"));
//! ```

#![warn(unreachable_pub)]

pub mod matcher;
pub mod normalize;
pub mod record;

// Re-exports for convenience
pub use matcher::{group_matches, matches_prefix};
pub use normalize::{normalize_duration, normalize_number, resolve_field, RawRow};
pub use record::{Catalog, Duration, PlanRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
