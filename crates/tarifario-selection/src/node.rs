//! Per-subsection selection node
//!
//! A [`SelectionNode`] holds the runtime state of one subsection widget:
//! the active toggle key, the ordered lines and their selections. Option
//! availability is a pure read over the node, the catalog and - for the
//! extra-option rule - the principal line's current selection, passed
//! explicitly.

use crate::error::SelectionError;
use crate::line::{LineSelection, PortabilityRetention};
use serde::{Deserialize, Serialize};
use tarifario_catalog::{group_matches, Catalog, PlanRecord};
use tarifario_structure::{ComponentKind, LineState, WidgetConfig};

/// Runtime state of one subsection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionNode {
    /// The widget configuration this node mirrors
    pub config: WidgetConfig,
    /// Active toggle key (toggle-select widgets; defaults to the first group)
    pub active_toggle: Option<String>,
    /// Ordered lines; index 0 always exists
    lines: Vec<LineSelection>,
}

impl SelectionNode {
    /// Instantiate a node for a widget: one principal line, default toggle.
    #[must_use]
    pub fn new(config: WidgetConfig) -> Self {
        let active_toggle = config.first_toggle_key().map(str::to_string);
        Self {
            config,
            active_toggle,
            lines: vec![LineSelection::new(0)],
        }
    }

    /// Lines in order; the principal line is always first
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[LineSelection] {
        &self.lines
    }

    /// Line by index
    #[must_use]
    pub fn line(&self, line_index: usize) -> Option<&LineSelection> {
        self.lines.iter().find(|l| l.line_index == line_index)
    }

    fn line_mut(&mut self, line_index: usize) -> Result<&mut LineSelection, SelectionError> {
        self.lines
            .iter_mut()
            .find(|l| l.line_index == line_index)
            .ok_or(SelectionError::UnknownLine { line_index })
    }

    /// Number of additional lines currently present
    #[inline]
    #[must_use]
    pub fn additional_count(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    /// The principal line's current code, if any
    #[must_use]
    pub fn principal_code(&self) -> Option<&str> {
        self.lines
            .first()
            .and_then(|l| l.chosen_code.as_deref())
    }

    /// Set (or clear) the chosen code of a line.
    ///
    /// Membership in the current option group is not re-validated: the
    /// caller offered the option list and is trusted to have filtered it.
    pub fn select(
        &mut self,
        line_index: usize,
        code: Option<&str>,
    ) -> Result<(), SelectionError> {
        let line = self.line_mut(line_index)?;
        line.chosen_code = code.filter(|c| !c.is_empty()).map(str::to_string);
        Ok(())
    }

    /// Switch the active toggle group, invalidating current selections
    /// (the old choice belongs to the previous option set).
    pub fn toggle(&mut self, key: &str) -> Result<(), SelectionError> {
        if self.config.kind != ComponentKind::ToggleSelect {
            return Err(SelectionError::UnsupportedOperation {
                operation: "toggle",
                kind: self.config.kind,
            });
        }
        if self.config.toggle_group(key).is_none() {
            return Err(SelectionError::UnknownToggleKey {
                key: key.to_string(),
            });
        }
        self.active_toggle = Some(key.to_string());
        for line in &mut self.lines {
            line.chosen_code = None;
        }
        Ok(())
    }

    /// Switch a line's sub-state, clearing its now-invalid selection.
    pub fn set_line_state(
        &mut self,
        line_index: usize,
        state: LineState,
    ) -> Result<(), SelectionError> {
        if self.config.kind != ComponentKind::RepeatableGroup {
            return Err(SelectionError::UnsupportedOperation {
                operation: "set_line_state",
                kind: self.config.kind,
            });
        }
        let line = self.line_mut(line_index)?;
        line.line_state = state;
        line.chosen_code = None;
        Ok(())
    }

    /// Append an additional line, returning its index.
    ///
    /// # Errors
    /// `LineLimitReached` once `max_additional_lines` is hit; no state
    /// changes on rejection.
    pub fn add_line(&mut self) -> Result<usize, SelectionError> {
        if self.config.kind != ComponentKind::RepeatableGroup {
            return Err(SelectionError::UnsupportedOperation {
                operation: "add_line",
                kind: self.config.kind,
            });
        }
        let max = self.config.max_additional_lines;
        if self.additional_count() >= max {
            return Err(SelectionError::LineLimitReached { max });
        }
        let index = self.lines.len();
        self.lines.push(LineSelection::new(index));
        Ok(index)
    }

    /// Remove an additional line and renumber the rest to a contiguous
    /// 1..k sequence preserving relative order.
    ///
    /// # Errors
    /// `PrincipalLineImmutable` for index 0, `UnknownLine` otherwise.
    pub fn remove_line(&mut self, line_index: usize) -> Result<(), SelectionError> {
        if line_index == 0 {
            return Err(SelectionError::PrincipalLineImmutable);
        }
        let pos = self
            .lines
            .iter()
            .position(|l| l.line_index == line_index)
            .ok_or(SelectionError::UnknownLine { line_index })?;
        self.lines.remove(pos);
        for (i, line) in self.lines.iter_mut().enumerate() {
            line.line_index = i;
        }
        Ok(())
    }

    /// Update a line's portability request.
    ///
    /// Number/donor are written only when given. Unchecking keeps or wipes
    /// the stored fields according to the retention policy.
    pub fn set_portability(
        &mut self,
        line_index: usize,
        requested: bool,
        number: Option<&str>,
        donor: Option<&str>,
        retention: PortabilityRetention,
    ) -> Result<(), SelectionError> {
        let line = self.line_mut(line_index)?;
        line.portability.requested = requested;
        if let Some(number) = number {
            line.portability.number = number.trim().to_string();
        }
        if let Some(donor) = donor {
            line.portability.donor = donor.trim().to_string();
        }
        if !requested && retention == PortabilityRetention::ClearOnUncheck {
            line.portability.number.clear();
            line.portability.donor.clear();
        }
        Ok(())
    }

    /// Clear every line's selection and portability. Lines and sub-states
    /// survive; the node is reset, not destroyed.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Options currently offered for a line, in catalog order.
    ///
    /// For additional lines of a repeatable group in `Multi` state, the
    /// bonus option of the extra mapping is appended when the principal
    /// line's selection is a trigger.
    pub fn available_options<'a>(
        &self,
        line_index: usize,
        catalog: &'a Catalog,
    ) -> Result<Vec<&'a PlanRecord>, SelectionError> {
        let line = self
            .line(line_index)
            .ok_or(SelectionError::UnknownLine { line_index })?;
        Ok(line_options(
            &self.config,
            line,
            self.active_toggle.as_deref(),
            self.principal_code(),
            catalog,
        ))
    }
}

/// Pure option derivation for one line.
///
/// The principal line's current selection is an explicit argument: the
/// extra-option rule couples an additional line's option set to the
/// principal's choice, and that read-through is made visible here instead
/// of hiding inside the node.
#[must_use]
pub fn line_options<'a>(
    config: &WidgetConfig,
    line: &LineSelection,
    active_toggle: Option<&str>,
    principal_code: Option<&str>,
    catalog: &'a Catalog,
) -> Vec<&'a PlanRecord> {
    let prefixes: &[String] = match config.kind {
        ComponentKind::SingleSelect | ComponentKind::Generic => &config.prefixes,
        ComponentKind::ToggleSelect => active_toggle
            .and_then(|key| config.toggle_group(key))
            .map(|g| g.prefixes.as_slice())
            .unwrap_or(&[]),
        ComponentKind::RepeatableGroup => config.line_group_prefixes(line.line_state),
    };

    // Bonus rows share their trigger's family prefix, so the prefix match
    // would offer them unconditionally; they only enter through the
    // explicit append below.
    let mut options: Vec<&PlanRecord> = catalog
        .iter()
        .filter(|r| {
            group_matches(&r.code, prefixes)
                && r.extra_for.is_none()
                && !config.is_bonus_code(&r.code)
        })
        .collect();

    let bonus_applies = config.kind == ComponentKind::RepeatableGroup
        && !line.is_principal()
        && line.line_state == LineState::Multi;
    if bonus_applies {
        if let Some(bonus) = principal_code.and_then(|code| config.bonus_for(code)) {
            if let Some(record) = catalog.find(bonus) {
                options.push(record);
            }
        }
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tarifario_catalog::PlanRecord;
    use tarifario_structure::WidgetConfig;

    fn plan(code: &str, name: &str) -> PlanRecord {
        PlanRecord {
            code: code.to_string(),
            name: name.to_string(),
            regular_price: Some(12000.0),
            promo1_price: Some(10000.0),
            promo1_duration: tarifario_catalog::Duration::Months(12),
            promo2_price: None,
            promo2_duration: tarifario_catalog::Duration::Empty,
            detail_text: String::new(),
            section: String::new(),
            subsection: String::new(),
            extra_for: None,
        }
    }

    fn movil_catalog() -> Catalog {
        Catalog::from_records(vec![
            plan("NM01", "Multi 20GB"),
            plan("NM02", "Multi 50GB"),
            plan("NM02S", "Multi 50GB Bonus"),
            plan("ND01", "Datos 30GB"),
            plan("NV01", "Voz Ilimitada"),
        ])
    }

    fn movil_node() -> SelectionNode {
        SelectionNode::new(WidgetConfig::repeatable_group(
            "Movil",
            "nuevo",
            "multi:NM,datos:ND,voz:NV",
            4,
            "NM02:NM02S;NM03:NM03S",
        ))
    }

    #[test]
    fn new_node_has_principal_line_only() {
        let node = movil_node();
        assert_eq!(node.lines().len(), 1);
        assert!(node.lines()[0].is_principal());
        assert_eq!(node.additional_count(), 0);
    }

    #[test]
    fn toggle_node_defaults_to_first_group() {
        let node = SelectionNode::new(WidgetConfig::toggle_select(
            "Hogar",
            "duo",
            "fibra_tv:DT,fibra_fijo:DF",
        ));
        assert_eq!(node.active_toggle.as_deref(), Some("fibra_tv"));
    }

    #[test]
    fn add_line_respects_limit() {
        let mut node = SelectionNode::new(WidgetConfig::repeatable_group(
            "Movil", "nuevo", "multi:NM", 2, "",
        ));
        assert_eq!(node.add_line().unwrap(), 1);
        assert_eq!(node.add_line().unwrap(), 2);
        assert_eq!(
            node.add_line(),
            Err(SelectionError::LineLimitReached { max: 2 })
        );
        assert_eq!(node.additional_count(), 2);
    }

    #[test]
    fn add_line_rejected_on_non_repeatable() {
        let mut node = SelectionNode::new(WidgetConfig::single_select("Hogar", "trio", "T"));
        assert!(matches!(
            node.add_line(),
            Err(SelectionError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn remove_line_renumbers_contiguously() {
        let mut node = movil_node();
        node.add_line().unwrap();
        node.add_line().unwrap();
        node.add_line().unwrap();
        node.select(1, Some("NM01")).unwrap();
        node.select(3, Some("NM02")).unwrap();

        node.remove_line(2).unwrap();

        let indices: Vec<_> = node.lines().iter().map(|l| l.line_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        // Relative order preserved: old line 3 is now line 2
        assert_eq!(node.line(1).unwrap().chosen_code.as_deref(), Some("NM01"));
        assert_eq!(node.line(2).unwrap().chosen_code.as_deref(), Some("NM02"));
    }

    #[test]
    fn remove_principal_rejected() {
        let mut node = movil_node();
        assert_eq!(
            node.remove_line(0),
            Err(SelectionError::PrincipalLineImmutable)
        );
        assert_eq!(node.lines().len(), 1);
    }

    #[test]
    fn remove_unknown_line_rejected() {
        let mut node = movil_node();
        assert_eq!(
            node.remove_line(7),
            Err(SelectionError::UnknownLine { line_index: 7 })
        );
    }

    #[test]
    fn select_empty_code_clears() {
        let mut node = movil_node();
        node.select(0, Some("NM01")).unwrap();
        assert_eq!(node.principal_code(), Some("NM01"));
        node.select(0, Some("")).unwrap();
        assert_eq!(node.principal_code(), None);
        node.select(0, Some("NM01")).unwrap();
        node.select(0, None).unwrap();
        assert_eq!(node.principal_code(), None);
    }

    #[test]
    fn toggle_switch_clears_selection() {
        let mut node = SelectionNode::new(WidgetConfig::toggle_select(
            "Hogar",
            "duo",
            "fibra_tv:DT,fibra_fijo:DF",
        ));
        node.select(0, Some("DT01")).unwrap();
        node.toggle("fibra_fijo").unwrap();
        assert_eq!(node.active_toggle.as_deref(), Some("fibra_fijo"));
        assert_eq!(node.principal_code(), None);
    }

    #[test]
    fn toggle_unknown_key_rejected() {
        let mut node = SelectionNode::new(WidgetConfig::toggle_select("Hogar", "duo", "a:A"));
        node.select(0, Some("A1")).unwrap();
        assert!(matches!(
            node.toggle("missing"),
            Err(SelectionError::UnknownToggleKey { .. })
        ));
        // Rejection left state untouched
        assert_eq!(node.principal_code(), Some("A1"));
    }

    #[test]
    fn set_line_state_clears_selection() {
        let mut node = movil_node();
        node.select(0, Some("NM01")).unwrap();
        node.set_line_state(0, LineState::Datos).unwrap();
        assert_eq!(node.principal_code(), None);
        assert_eq!(node.line(0).unwrap().line_state, LineState::Datos);
    }

    #[test]
    fn options_follow_line_state() {
        let catalog = movil_catalog();
        let mut node = movil_node();

        let codes: Vec<_> = node
            .available_options(0, &catalog)
            .unwrap()
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(codes, vec!["NM01", "NM02"]);

        node.set_line_state(0, LineState::Voz).unwrap();
        let codes: Vec<_> = node
            .available_options(0, &catalog)
            .unwrap()
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(codes, vec!["NV01"]);
    }

    #[test]
    fn bonus_option_requires_trigger_and_multi_state() {
        let catalog = movil_catalog();
        let mut node = movil_node();
        node.add_line().unwrap();

        // No trigger chosen on the principal: no bonus
        let codes: Vec<_> = node
            .available_options(1, &catalog)
            .unwrap()
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(codes, vec!["NM01", "NM02"]);

        // Trigger chosen: bonus appears on the additional line only
        node.select(0, Some("NM02")).unwrap();
        let codes: Vec<_> = node
            .available_options(1, &catalog)
            .unwrap()
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(codes, vec!["NM01", "NM02", "NM02S"]);

        let principal: Vec<_> = node
            .available_options(0, &catalog)
            .unwrap()
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(principal, vec!["NM01", "NM02"]);

        // Switching the additional line away from Multi removes the bonus
        node.set_line_state(1, LineState::Datos).unwrap();
        let codes: Vec<_> = node
            .available_options(1, &catalog)
            .unwrap()
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(codes, vec!["ND01"]);
    }

    #[test]
    fn bonus_rows_never_in_base_options() {
        // NM02S matches the NM prefix (non-alphabetic follower), yet it
        // must only be offered through the trigger path
        let catalog = movil_catalog();
        let node = movil_node();
        let codes: Vec<_> = node
            .available_options(0, &catalog)
            .unwrap()
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(codes, vec!["NM01", "NM02"]);

        // Rows marked as a bonus for another plan are excluded even when
        // this widget's mapping does not name them
        let mut marked = plan("NM05S", "Multi 5GB Bonus");
        marked.extra_for = Some("NM05".to_string());
        let catalog = Catalog::from_records(vec![
            plan("NM01", "Multi 20GB"),
            marked,
        ]);
        let codes: Vec<_> = node
            .available_options(0, &catalog)
            .unwrap()
            .iter()
            .map(|r| r.code.clone())
            .collect();
        assert_eq!(codes, vec!["NM01"]);
    }

    #[test]
    fn portability_retention_policies() {
        let mut node = movil_node();
        node.set_portability(0, true, Some("987"), Some("Acme"), PortabilityRetention::Retain)
            .unwrap();
        node.set_portability(0, false, None, None, PortabilityRetention::Retain)
            .unwrap();
        let porta = &node.line(0).unwrap().portability;
        assert!(!porta.requested);
        assert_eq!(porta.number, "987");
        assert_eq!(porta.donor, "Acme");

        node.set_portability(0, false, None, None, PortabilityRetention::ClearOnUncheck)
            .unwrap();
        let porta = &node.line(0).unwrap().portability;
        assert!(porta.number.is_empty());
        assert!(porta.donor.is_empty());
    }

    #[test]
    fn clear_resets_values_keeps_lines() {
        let mut node = movil_node();
        node.add_line().unwrap();
        node.select(0, Some("NM01")).unwrap();
        node.set_portability(1, true, Some("1"), Some("X"), PortabilityRetention::Retain)
            .unwrap();

        node.clear();
        assert_eq!(node.lines().len(), 2);
        assert_eq!(node.principal_code(), None);
        assert!(!node.line(1).unwrap().portability.requested);
        assert!(node.line(1).unwrap().portability.number.is_empty());
    }
}
