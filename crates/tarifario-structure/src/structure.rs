//! Compiled form structure
//!
//! Groups widget configurations by section, preserving source order of
//! sections and of subsections within each. When the source carries no
//! structure table, a hard-coded default mirrors the shipped form.

use crate::config::WidgetConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tarifario_catalog::RawRow;

/// Ordered section → widget configurations map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    sections: IndexMap<String, Vec<WidgetConfig>>,
}

impl Structure {
    /// Compile raw structure rows, grouping by section in source order.
    /// Rows without a section name are dropped.
    #[must_use]
    pub fn compile(rows: &[RawRow]) -> Self {
        Self::from_configs(rows.iter().map(WidgetConfig::from_raw))
    }

    /// Group already-typed configs by section
    #[must_use]
    pub fn from_configs(configs: impl IntoIterator<Item = WidgetConfig>) -> Self {
        let mut sections: IndexMap<String, Vec<WidgetConfig>> = IndexMap::new();
        for config in configs {
            if config.section.is_empty() {
                tracing::debug!(subsection = %config.subsection, "dropping structure row without section");
                continue;
            }
            sections
                .entry(config.section.clone())
                .or_default()
                .push(config);
        }
        Self { sections }
    }

    /// Built-in structure used when the source has no structure table
    #[must_use]
    pub fn default_structure() -> Self {
        Self::from_configs([
            WidgetConfig::single_select("Hogar", "trio", "T"),
            WidgetConfig::toggle_select("Hogar", "duo", "fibra_tv:DT,fibra_fijo:DF,tv_fijo:DTF"),
            WidgetConfig::toggle_select("Hogar", "uno", "fibra:F,tv:TV,fijo:FI"),
            WidgetConfig::repeatable_group(
                "Movil",
                "nuevo",
                "multi:NM,datos:ND,voz:NV",
                4,
                "NM02:NM02S;NM03:NM03S",
            ),
            WidgetConfig::repeatable_group(
                "Movil",
                "cartera",
                "multi:CM,datos:CD,voz:CV",
                4,
                "CM02:CM02S;CM03:CM03S",
            ),
        ])
    }

    /// Section names in source order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Widgets of a section, in source order
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&[WidgetConfig]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// Widget of a specific subsection
    #[must_use]
    pub fn widget(&self, section: &str, subsection: &str) -> Option<&WidgetConfig> {
        self.sections
            .get(section)?
            .iter()
            .find(|w| w.subsection == subsection)
    }

    /// Iterate (section, widgets) pairs in source order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WidgetConfig])> {
        self.sections
            .iter()
            .map(|(name, widgets)| (name.as_str(), widgets.as_slice()))
    }

    /// Number of sections
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when no sections are configured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComponentKind, LineState};
    use std::collections::HashMap;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn compile_groups_by_section_in_order() {
        let rows = vec![
            raw(&[("Section", "Hogar"), ("Subsection", "trio"), ("Tipo", "trio")]),
            raw(&[("Section", "Movil"), ("Subsection", "nuevo"), ("Tipo", "movil_group")]),
            raw(&[("Section", "Hogar"), ("Subsection", "duo"), ("Tipo", "duo")]),
        ];
        let structure = Structure::compile(&rows);
        let names: Vec<_> = structure.section_names().collect();
        assert_eq!(names, vec!["Hogar", "Movil"]);

        let hogar = structure.section("Hogar").unwrap();
        assert_eq!(hogar.len(), 2);
        assert_eq!(hogar[0].subsection, "trio");
        assert_eq!(hogar[1].subsection, "duo");
    }

    #[test]
    fn compile_drops_sectionless_rows() {
        let rows = vec![raw(&[("Subsection", "orphan")])];
        assert!(Structure::compile(&rows).is_empty());
    }

    #[test]
    fn default_structure_shape() {
        let structure = Structure::default_structure();
        let names: Vec<_> = structure.section_names().collect();
        assert_eq!(names, vec!["Hogar", "Movil"]);

        let trio = structure.widget("Hogar", "trio").unwrap();
        assert_eq!(trio.kind, ComponentKind::SingleSelect);
        assert_eq!(trio.prefixes, ["T"]);
        assert_eq!(trio.max_additional_lines, 0);

        let uno = structure.widget("Hogar", "uno").unwrap();
        assert_eq!(uno.kind, ComponentKind::ToggleSelect);
        assert_eq!(uno.first_toggle_key(), Some("fibra"));

        let nuevo = structure.widget("Movil", "nuevo").unwrap();
        assert_eq!(nuevo.kind, ComponentKind::RepeatableGroup);
        assert_eq!(nuevo.max_additional_lines, 4);
        assert_eq!(nuevo.line_group_prefixes(LineState::Voz), ["NV"]);
        assert_eq!(nuevo.bonus_for("NM03"), Some("NM03S"));

        let cartera = structure.widget("Movil", "cartera").unwrap();
        assert_eq!(cartera.line_group_prefixes(LineState::Multi), ["CM"]);
        assert_eq!(cartera.bonus_for("CM02"), Some("CM02S"));
    }

    #[test]
    fn widget_lookup_misses() {
        let structure = Structure::default_structure();
        assert!(structure.widget("Hogar", "missing").is_none());
        assert!(structure.widget("Missing", "trio").is_none());
    }
}
