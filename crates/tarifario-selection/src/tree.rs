//! The selection tree
//!
//! Owns one [`SelectionNode`] per subsection of the compiled structure,
//! plus the explicit active path. Navigation clears (never deletes) the
//! state the user walked away from: sibling subsections of the activated
//! one, and every subsection of non-active sections.

use crate::error::SelectionError;
use crate::line::PortabilityRetention;
use crate::node::SelectionNode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tarifario_structure::{LineState, Structure};

/// Explicit active section/subsection, threaded through the API instead of
/// ambient global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePath {
    /// Active section (tab)
    pub section: String,
    /// Active subsection (sub-tab)
    pub subsection: String,
}

impl ActivePath {
    /// Create a path
    #[inline]
    #[must_use]
    pub fn new(section: impl Into<String>, subsection: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            subsection: subsection.into(),
        }
    }
}

/// State of one section: its subsection nodes plus the subsection last
/// activated within it (kept per-section, like the sub-tab highlight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionState {
    nodes: IndexMap<String, SelectionNode>,
    active_sub: Option<String>,
}

impl SectionState {
    /// Subsection node by name
    #[must_use]
    pub fn node(&self, subsection: &str) -> Option<&SelectionNode> {
        self.nodes.get(subsection)
    }

    /// Subsection last activated in this section
    #[must_use]
    pub fn active_subsection(&self) -> Option<&str> {
        self.active_sub.as_deref()
    }

    /// Iterate (subsection, node) pairs in structure order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectionNode)> {
        self.nodes.iter().map(|(name, node)| (name.as_str(), node))
    }
}

/// Runtime selection state for the whole form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionTree {
    sections: IndexMap<String, SectionState>,
    active: Option<ActivePath>,
    retention: PortabilityRetention,
}

impl SelectionTree {
    /// Instantiate nodes for every subsection of the structure. The first
    /// section and its first subsection start active, mirroring the form's
    /// initial render.
    #[must_use]
    pub fn from_structure(structure: &Structure) -> Self {
        let mut sections = IndexMap::new();
        for (section, widgets) in structure.iter() {
            let mut nodes = IndexMap::new();
            for widget in widgets {
                nodes.insert(widget.subsection.clone(), SelectionNode::new(widget.clone()));
            }
            let active_sub = nodes.keys().next().cloned();
            sections.insert(
                section.to_string(),
                SectionState { nodes, active_sub },
            );
        }
        let active = sections.iter().next().and_then(|(name, state)| {
            state
                .active_sub
                .clone()
                .map(|sub| ActivePath::new(name.clone(), sub))
        });
        Self {
            sections,
            active,
            retention: PortabilityRetention::default(),
        }
    }

    /// Override the portability retention policy
    #[inline]
    #[must_use]
    pub fn with_retention(mut self, retention: PortabilityRetention) -> Self {
        self.retention = retention;
        self
    }

    /// The currently active path
    #[must_use]
    pub fn active(&self) -> Option<&ActivePath> {
        self.active.as_ref()
    }

    /// Subsection last activated within a section
    #[must_use]
    pub fn active_subsection(&self, section: &str) -> Option<&str> {
        self.sections.get(section)?.active_subsection()
    }

    /// Section state by name
    #[must_use]
    pub fn section(&self, section: &str) -> Option<&SectionState> {
        self.sections.get(section)
    }

    /// Node at a path
    pub fn node(
        &self,
        section: &str,
        subsection: &str,
    ) -> Result<&SelectionNode, SelectionError> {
        self.sections
            .get(section)
            .ok_or_else(|| SelectionError::UnknownSection(section.to_string()))?
            .nodes
            .get(subsection)
            .ok_or_else(|| SelectionError::UnknownSubsection {
                section: section.to_string(),
                subsection: subsection.to_string(),
            })
    }

    fn node_mut(
        &mut self,
        section: &str,
        subsection: &str,
    ) -> Result<&mut SelectionNode, SelectionError> {
        self.sections
            .get_mut(section)
            .ok_or_else(|| SelectionError::UnknownSection(section.to_string()))?
            .nodes
            .get_mut(subsection)
            .ok_or_else(|| SelectionError::UnknownSubsection {
                section: section.to_string(),
                subsection: subsection.to_string(),
            })
    }

    /// Activate a subsection.
    ///
    /// Clears selections in sibling subsections of the same section and in
    /// every subsection of all other sections; the activated node keeps its
    /// values. Nodes are reset, never deleted.
    pub fn activate(&mut self, section: &str, subsection: &str) -> Result<(), SelectionError> {
        // Validate the path before any mutation
        self.node(section, subsection)?;

        for (name, state) in &mut self.sections {
            if name == section {
                for (sub, node) in &mut state.nodes {
                    if sub != subsection {
                        node.clear();
                    }
                }
                state.active_sub = Some(subsection.to_string());
            } else {
                for node in state.nodes.values_mut() {
                    node.clear();
                }
            }
        }
        tracing::debug!(%section, %subsection, "activated subsection");
        self.active = Some(ActivePath::new(section, subsection));
        Ok(())
    }

    /// Set (or clear) the chosen code of a line
    pub fn select(
        &mut self,
        section: &str,
        subsection: &str,
        line_index: usize,
        code: Option<&str>,
    ) -> Result<(), SelectionError> {
        self.node_mut(section, subsection)?.select(line_index, code)
    }

    /// Switch the active toggle group of a toggle-select widget
    pub fn toggle(
        &mut self,
        section: &str,
        subsection: &str,
        key: &str,
    ) -> Result<(), SelectionError> {
        self.node_mut(section, subsection)?.toggle(key)
    }

    /// Switch a line's sub-state
    pub fn set_line_state(
        &mut self,
        section: &str,
        subsection: &str,
        line_index: usize,
        state: LineState,
    ) -> Result<(), SelectionError> {
        self.node_mut(section, subsection)?
            .set_line_state(line_index, state)
    }

    /// Append an additional line, returning its index
    pub fn add_line(
        &mut self,
        section: &str,
        subsection: &str,
    ) -> Result<usize, SelectionError> {
        self.node_mut(section, subsection)?.add_line()
    }

    /// Remove an additional line
    pub fn remove_line(
        &mut self,
        section: &str,
        subsection: &str,
        line_index: usize,
    ) -> Result<(), SelectionError> {
        self.node_mut(section, subsection)?.remove_line(line_index)
    }

    /// Update a line's portability request
    pub fn set_portability(
        &mut self,
        section: &str,
        subsection: &str,
        line_index: usize,
        requested: bool,
        number: Option<&str>,
        donor: Option<&str>,
    ) -> Result<(), SelectionError> {
        let retention = self.retention;
        self.node_mut(section, subsection)?
            .set_portability(line_index, requested, number, donor, retention)
    }
}
