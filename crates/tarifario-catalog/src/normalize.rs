//! Raw-row field resolution and numeric coercion
//!
//! Source tables arrive with inconsistent headers and locale-mixed numeric
//! formatting. This module resolves each logical field from an ordered list
//! of accepted column aliases and coerces numeric cells, degrading to empty
//! values (never failing the load) on malformed input.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A raw source row: column name → raw cell value
pub type RawRow = HashMap<String, String>;

/// Values treated as "no value" rather than parse failures
const EMPTY_SENTINELS: &[&str] = &["no aplica", "noaplica", "n/a", "na", "-"];

/// Columns the catalog sheet is expected to carry (lowercased)
const REQUIRED_COLUMNS: &[&str] = &[
    "código", "plan", "valor", "promo1", "meses1", "promo2", "meses2", "detalles",
];

/// First run of digits with optional sign and separator characters
static NUMERIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d[\d.,]*").expect("numeric pattern is valid"));

/// Resolve a logical field from an ordered list of column aliases.
/// The first alias with a non-empty value wins; absent fields resolve to
/// an empty string.
#[must_use]
pub fn resolve_field(row: &RawRow, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Coerce a raw cell into a number.
///
/// Recognizes both `1.234,56` (thousands `.`, decimal `,`) and `1234.56`
/// styles by scanning for which separators are present. Sentinel values
/// ("n/a", "-", "no aplica") and unparseable cells yield `None`.
#[must_use]
pub fn normalize_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_sentinel(trimmed) {
        return None;
    }

    let run = NUMERIC_RUN.find(trimmed)?.as_str();
    let has_dot = run.contains('.');
    let has_comma = run.contains(',');

    let cleaned = if has_dot && has_comma {
        // European style: dot = thousands, comma = decimal
        run.replace('.', "").replace(',', ".")
    } else if has_comma {
        run.replace(',', ".")
    } else if run.matches('.').count() > 1 {
        // Multiple dots can only be thousands separators
        run.replace('.', "")
    } else {
        run.to_string()
    };

    cleaned.parse::<f64>().ok()
}

/// Coerce a raw cell into a promotional duration.
///
/// A parseable number is floored to whole months; any other non-empty,
/// non-sentinel text is preserved verbatim (e.g. `"12 meses"` still parses
/// as 12 months, but `"un año"` survives as text).
#[must_use]
pub fn normalize_duration(raw: &str) -> crate::Duration {
    let trimmed = raw.trim();
    if trimmed.is_empty() || is_sentinel(trimmed) {
        return crate::Duration::Empty;
    }
    match normalize_number(trimmed) {
        Some(value) => crate::Duration::Months(value.floor() as i64),
        None => crate::Duration::Text(trimmed.to_string()),
    }
}

fn is_sentinel(value: &str) -> bool {
    let lowered = value.to_lowercase();
    EMPTY_SENTINELS.contains(&lowered.as_str())
}

/// Warn (non-fatally) when the required column set is absent from the
/// header row. Column matching is case-insensitive; alias columns may still
/// cover a missing canonical name, which is why this is only a warning.
pub fn warn_missing_headers(first_row: Option<&RawRow>) {
    let Some(row) = first_row else { return };
    let headers: Vec<String> = row.keys().map(|k| k.to_lowercase()).collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .copied()
        .collect();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "catalog header is missing required columns");
    }
}
