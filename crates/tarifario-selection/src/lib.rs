//! Tarifario Selection - Runtime selection tree
//!
//! The selection tree is the single source of truth for the user's live
//! choices. It mirrors the compiled structure (one node per subsection) and
//! applies the discrete UI events synchronously:
//! select, toggle, set line state, add/remove line, set portability and
//! activate subsection.
//!
//! All mutations are single-writer and never partial: invariant violations
//! (line limits, removing the principal line) are rejected with a
//! [`SelectionError`] and no state change.
//!
//! # Example
//!
//! ```rust
//! use tarifario_selection::SelectionTree;
//! use tarifario_structure::Structure;
//!
//! let structure = Structure::default_structure();
//! let mut tree = SelectionTree::from_structure(&structure);
//!
//! tree.select("Movil", "nuevo", 0, Some("NM02")).unwrap();
//! let added = tree.add_line("Movil", "nuevo").unwrap();
//! assert_eq!(added, 1);
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod line;
pub mod node;
pub mod tree;

// Re-exports for convenience
pub use error::SelectionError;
pub use line::{LineSelection, Portability, PortabilityRetention};
pub use node::{line_options, SelectionNode};
pub use tree::{ActivePath, SectionState, SelectionTree};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
