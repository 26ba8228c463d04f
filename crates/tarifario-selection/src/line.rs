//! Per-line selection state
//!
//! Every node holds an ordered list of lines. Index 0 is the principal line
//! and always exists; indexes >= 1 are additional lines of a repeatable
//! group, removable and renumbered contiguously on removal.

use serde::{Deserialize, Serialize};
use tarifario_structure::LineState;

/// Number-portability request attached to a line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portability {
    /// Whether the user checked the portability box
    pub requested: bool,
    /// Number to port
    pub number: String,
    /// Donor carrier
    pub donor: String,
}

impl Portability {
    /// True when the request is actionable: checked with both fields filled
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.requested && !self.number.is_empty() && !self.donor.is_empty()
    }
}

/// What happens to stored portability fields when the request is unchecked
///
/// The shipped form keeps the number and donor so re-checking restores them
/// without retyping. That retention is kept as the default but is a policy,
/// not hard-wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortabilityRetention {
    /// Keep number/donor when unchecked (the shipped form's behavior)
    Retain,
    /// Wipe number/donor when unchecked
    ClearOnUncheck,
}

impl Default for PortabilityRetention {
    fn default() -> Self {
        PortabilityRetention::Retain
    }
}

/// One line of a selection node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSelection {
    /// 0 = principal (immutable), >= 1 additional
    pub line_index: usize,
    /// Currently chosen plan code, if any
    pub chosen_code: Option<String>,
    /// Sub-state selecting the option group (repeatable groups)
    pub line_state: LineState,
    /// Portability request
    pub portability: Portability,
}

impl LineSelection {
    /// Fresh line with no selection and default sub-state
    #[must_use]
    pub fn new(line_index: usize) -> Self {
        Self {
            line_index,
            chosen_code: None,
            line_state: LineState::default(),
            portability: Portability::default(),
        }
    }

    /// True for the principal line
    #[inline]
    #[must_use]
    pub fn is_principal(&self) -> bool {
        self.line_index == 0
    }

    /// Reset selection and portability, keeping the sub-state toggle.
    /// Used when the user navigates away: values are cleared, the line
    /// itself survives.
    pub fn clear(&mut self) {
        self.chosen_code = None;
        self.portability = Portability::default();
    }

    /// Display label: "Línea Principal" / "Adicional N"
    #[must_use]
    pub fn label(&self) -> String {
        if self.is_principal() {
            "Línea Principal".to_string()
        } else {
            format!("Adicional {}", self.line_index)
        }
    }
}
