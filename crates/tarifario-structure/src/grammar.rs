//! Mini-grammars for structure cells
//!
//! Structure rows pack option groups into single cells:
//! - toggle options / line groups: `key:prefix1|prefix2,key2:prefix,...`
//! - extra mapping: `triggerCode:bonusCode;trigger2:bonus2`
//! - plain prefix lists: `T,DT,DTF`
//!
//! Malformed entries are dropped, not rejected: a structure cell can never
//! fail the load.

use crate::config::ToggleGroup;

/// Parse `key:prefix1|prefix2,...` into an ordered list of toggle groups.
/// Entries with an empty key are dropped.
#[must_use]
pub fn parse_toggle_options(raw: &str) -> Vec<ToggleGroup> {
    raw.split(',')
        .filter_map(|entry| {
            let (key, prefixes) = split_pair(entry, ':')?;
            if key.is_empty() {
                return None;
            }
            Some(ToggleGroup {
                key: key.to_string(),
                prefixes: prefixes
                    .split('|')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

/// Parse `trigger:bonus;trigger2:bonus2` into ordered (trigger, bonus)
/// pairs. Pairs missing either side are dropped.
#[must_use]
pub fn parse_extra_mapping(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|entry| {
            let (trigger, bonus) = split_pair(entry, ':')?;
            if trigger.is_empty() || bonus.is_empty() {
                return None;
            }
            Some((trigger.to_string(), bonus.to_string()))
        })
        .collect()
}

/// Parse a comma-separated prefix list, trimming and dropping empties.
#[must_use]
pub fn parse_prefix_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split one `key:value` entry, trimming both sides. The value may be
/// empty; a missing `:` yields an empty value rather than dropping the key.
fn split_pair(entry: &str, sep: char) -> Option<(&str, &str)> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    match entry.split_once(sep) {
        Some((k, v)) => Some((k.trim(), v.trim())),
        None => Some((entry, "")),
    }
}
