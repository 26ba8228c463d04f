//! Widget configuration types
//!
//! A [`WidgetConfig`] describes one subsection of the form: which kind of
//! widget it renders, which catalog-code prefixes feed its option sets, how
//! many additional lines it allows and which bonus plans its extra mapping
//! unlocks. The kinds form a closed variant set; consumers branch on kind
//! only where behavior genuinely differs (add/remove lines, extra mapping).

use crate::grammar;
use serde::{Deserialize, Serialize};
use tarifario_catalog::{normalize, RawRow};

/// Closed set of widget kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// One select over a fixed prefix group ("trio")
    SingleSelect,
    /// Segmented toggle switching between prefix groups ("duo"/"uno")
    ToggleSelect,
    /// Principal line plus removable additional lines ("movil_group")
    RepeatableGroup,
    /// Fallback: plain select over the row's prefixes
    Generic,
}

impl ComponentKind {
    /// Map a raw component-type cell to a kind. Unknown types fall back to
    /// [`ComponentKind::Generic`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "trio" => ComponentKind::SingleSelect,
            "duo" | "uno" => ComponentKind::ToggleSelect,
            "movil_group" => ComponentKind::RepeatableGroup,
            _ => ComponentKind::Generic,
        }
    }
}

/// One named prefix group of a toggle or repeatable widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleGroup {
    /// Group key (toggle label or line-state key)
    pub key: String,
    /// Ordered catalog-code prefixes claimed by this group
    pub prefixes: Vec<String>,
}

/// Per-line sub-state of a repeatable group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineState {
    /// Voice + data bundle (the default)
    Multi,
    /// Data-only plans
    Datos,
    /// Voice-only plans
    Voz,
}

impl LineState {
    /// Key used in the `MultiPrefixes` grammar
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            LineState::Multi => "multi",
            LineState::Datos => "datos",
            LineState::Voz => "voz",
        }
    }

    /// Parse a grammar key back into a state
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "multi" => Some(LineState::Multi),
            "datos" => Some(LineState::Datos),
            "voz" => Some(LineState::Voz),
            _ => None,
        }
    }
}

impl Default for LineState {
    fn default() -> Self {
        LineState::Multi
    }
}

/// Configuration of one subsection widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Section (top-level tab) this widget belongs to
    pub section: String,
    /// Subsection (sub-tab) this widget renders
    pub subsection: String,
    /// Widget kind
    pub kind: ComponentKind,
    /// Prefixes for single/generic selects
    pub prefixes: Vec<String>,
    /// Named prefix groups for toggle selects
    pub toggle_groups: Vec<ToggleGroup>,
    /// Per-line-state prefix groups for repeatable groups
    pub line_groups: Vec<ToggleGroup>,
    /// Maximum number of additional lines (repeatable groups only)
    pub max_additional_lines: usize,
    /// Ordered trigger → bonus code pairs
    pub extra_mapping: Vec<(String, String)>,
}

impl WidgetConfig {
    /// Compile one raw structure row, resolving column aliases and parsing
    /// the cell grammars.
    #[must_use]
    pub fn from_raw(row: &RawRow) -> Self {
        let max_raw = normalize::resolve_field(row, &["MaxAdditional", "MaxAdicional"]);
        let max_additional_lines = normalize::normalize_number(&max_raw)
            .map(|v| v.max(0.0) as usize)
            .unwrap_or(4);
        Self {
            section: normalize::resolve_field(row, &["Section", "Sección", "Seccion"]),
            subsection: normalize::resolve_field(
                row,
                &["Subsection", "Subsección", "Subseccion"],
            ),
            kind: ComponentKind::from_raw(&normalize::resolve_field(
                row,
                &["ComponentType", "Tipo"],
            )),
            prefixes: grammar::parse_prefix_list(&normalize::resolve_field(row, &["Prefixes"])),
            toggle_groups: grammar::parse_toggle_options(&normalize::resolve_field(
                row,
                &["ToggleOptions"],
            )),
            line_groups: grammar::parse_toggle_options(&normalize::resolve_field(
                row,
                &["MultiPrefixes"],
            )),
            max_additional_lines,
            extra_mapping: grammar::parse_extra_mapping(&normalize::resolve_field(
                row,
                &["ExtraMapping"],
            )),
        }
    }

    /// Single-select widget over a prefix list
    #[must_use]
    pub fn single_select(
        section: impl Into<String>,
        subsection: impl Into<String>,
        prefixes: &str,
    ) -> Self {
        Self {
            section: section.into(),
            subsection: subsection.into(),
            kind: ComponentKind::SingleSelect,
            prefixes: grammar::parse_prefix_list(prefixes),
            toggle_groups: Vec::new(),
            line_groups: Vec::new(),
            max_additional_lines: 0,
            extra_mapping: Vec::new(),
        }
    }

    /// Toggle-select widget over named prefix groups
    #[must_use]
    pub fn toggle_select(
        section: impl Into<String>,
        subsection: impl Into<String>,
        toggle_options: &str,
    ) -> Self {
        Self {
            section: section.into(),
            subsection: subsection.into(),
            kind: ComponentKind::ToggleSelect,
            prefixes: Vec::new(),
            toggle_groups: grammar::parse_toggle_options(toggle_options),
            line_groups: Vec::new(),
            max_additional_lines: 0,
            extra_mapping: Vec::new(),
        }
    }

    /// Repeatable line-group widget
    #[must_use]
    pub fn repeatable_group(
        section: impl Into<String>,
        subsection: impl Into<String>,
        line_groups: &str,
        max_additional_lines: usize,
        extra_mapping: &str,
    ) -> Self {
        Self {
            section: section.into(),
            subsection: subsection.into(),
            kind: ComponentKind::RepeatableGroup,
            prefixes: Vec::new(),
            toggle_groups: Vec::new(),
            line_groups: grammar::parse_toggle_options(line_groups),
            max_additional_lines,
            extra_mapping: grammar::parse_extra_mapping(extra_mapping),
        }
    }

    /// Prefixes of the line group for a given sub-state, empty when the
    /// state has no group configured.
    #[must_use]
    pub fn line_group_prefixes(&self, state: LineState) -> &[String] {
        self.line_groups
            .iter()
            .find(|g| g.key.eq_ignore_ascii_case(state.key()))
            .map(|g| g.prefixes.as_slice())
            .unwrap_or(&[])
    }

    /// Toggle group by key
    #[must_use]
    pub fn toggle_group(&self, key: &str) -> Option<&ToggleGroup> {
        self.toggle_groups.iter().find(|g| g.key == key)
    }

    /// Key of the first toggle group (the default active toggle)
    #[must_use]
    pub fn first_toggle_key(&self) -> Option<&str> {
        self.toggle_groups.first().map(|g| g.key.as_str())
    }

    /// Bonus code unlocked when `trigger` is the principal selection
    #[must_use]
    pub fn bonus_for(&self, trigger: &str) -> Option<&str> {
        self.extra_mapping
            .iter()
            .find(|(t, _)| t == trigger)
            .map(|(_, b)| b.as_str())
    }

    /// True when `code` is a bonus side of the extra mapping. Bonus codes
    /// share the family prefix of their triggers (NM02S under NM), so the
    /// prefix match alone cannot keep them out of the base option set.
    #[must_use]
    pub fn is_bonus_code(&self, code: &str) -> bool {
        self.extra_mapping.iter().any(|(_, b)| b == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn kind_from_raw() {
        assert_eq!(ComponentKind::from_raw("trio"), ComponentKind::SingleSelect);
        assert_eq!(ComponentKind::from_raw("duo"), ComponentKind::ToggleSelect);
        assert_eq!(ComponentKind::from_raw("UNO"), ComponentKind::ToggleSelect);
        assert_eq!(
            ComponentKind::from_raw("movil_group"),
            ComponentKind::RepeatableGroup
        );
        assert_eq!(ComponentKind::from_raw("banner"), ComponentKind::Generic);
    }

    #[test]
    fn config_from_raw_repeatable() {
        let row = raw(&[
            ("Section", "Movil"),
            ("Subsection", "nuevo"),
            ("Tipo", "movil_group"),
            ("MultiPrefixes", "multi:NM,datos:ND,voz:NV"),
            ("MaxAdditional", "4"),
            ("ExtraMapping", "NM02:NM02S"),
        ]);
        let config = WidgetConfig::from_raw(&row);
        assert_eq!(config.kind, ComponentKind::RepeatableGroup);
        assert_eq!(config.max_additional_lines, 4);
        assert_eq!(config.line_group_prefixes(LineState::Multi), ["NM"]);
        assert_eq!(config.line_group_prefixes(LineState::Datos), ["ND"]);
        assert_eq!(config.bonus_for("NM02"), Some("NM02S"));
        assert_eq!(config.bonus_for("NM03"), None);
        assert!(config.is_bonus_code("NM02S"));
        assert!(!config.is_bonus_code("NM02"));
    }

    #[test]
    fn config_max_additional_defaults_to_four() {
        let row = raw(&[("Section", "Movil"), ("Tipo", "movil_group")]);
        assert_eq!(WidgetConfig::from_raw(&row).max_additional_lines, 4);
    }

    #[test]
    fn toggle_select_builder_and_lookup() {
        let config = WidgetConfig::toggle_select("Hogar", "duo", "fibra_tv:DT,fibra_fijo:DF");
        assert_eq!(config.first_toggle_key(), Some("fibra_tv"));
        assert_eq!(config.toggle_group("fibra_fijo").unwrap().prefixes, ["DF"]);
        assert!(config.toggle_group("missing").is_none());
    }

    #[test]
    fn line_state_keys_round_trip() {
        for state in [LineState::Multi, LineState::Datos, LineState::Voz] {
            assert_eq!(LineState::from_key(state.key()), Some(state));
        }
        assert_eq!(LineState::from_key("otro"), None);
    }

    #[test]
    fn unconfigured_line_state_has_no_prefixes() {
        let config = WidgetConfig::repeatable_group("Movil", "nuevo", "multi:NM", 4, "");
        assert!(config.line_group_prefixes(LineState::Voz).is_empty());
    }
}
