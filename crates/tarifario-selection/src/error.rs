//! Error types for selection-tree operations
//!
//! Structural violations are rejected synchronously with no partial
//! mutation; the caller surfaces them to the user.

use tarifario_structure::ComponentKind;

/// Selection tree operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Section not present in the structure
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// Subsection not present in the section
    #[error("unknown subsection: {section}/{subsection}")]
    UnknownSubsection {
        /// Section that was addressed
        section: String,
        /// Subsection that was not found
        subsection: String,
    },

    /// Line index out of range for the node
    #[error("unknown line index {line_index}")]
    UnknownLine {
        /// Index that was addressed
        line_index: usize,
    },

    /// Adding a line beyond the configured maximum
    #[error("additional line limit reached (max: {max})")]
    LineLimitReached {
        /// Configured maximum of additional lines
        max: usize,
    },

    /// The principal line (index 0) cannot be removed
    #[error("principal line cannot be removed")]
    PrincipalLineImmutable,

    /// Toggle key not configured on the widget
    #[error("unknown toggle key: {key}")]
    UnknownToggleKey {
        /// Key that was addressed
        key: String,
    },

    /// Operation not supported by the widget kind
    #[error("operation {operation} not supported by {kind:?} widget")]
    UnsupportedOperation {
        /// Operation name
        operation: &'static str,
        /// Widget kind the operation was applied to
        kind: ComponentKind,
    },
}
