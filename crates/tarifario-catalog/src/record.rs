//! Plan records and the catalog container
//!
//! A [`PlanRecord`] is one priced row of the source table; the [`Catalog`]
//! is the ordered set of all rows, loaded once at startup and read-only for
//! the remainder of the session.

use crate::normalize::{self, RawRow};
use serde::{Deserialize, Serialize};

/// Promotional duration field
///
/// Durations come in as free text: a clean integer ("12"), an annotated
/// value ("12 meses") or nothing at all. A clean integer is floored; any
/// other non-empty text is preserved verbatim for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Duration {
    /// Whole number of months
    Months(i64),
    /// Original trimmed text, kept as-is
    Text(String),
    /// No duration given
    Empty,
}

impl Duration {
    /// Display label: `"12 meses"` for integral months, the raw text for
    /// textual values, `"-"` when empty.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Duration::Months(n) => format!("{n} meses"),
            Duration::Text(t) => t.clone(),
            Duration::Empty => "-".to_string(),
        }
    }

    /// Raw value for template fields: months as digits, text verbatim,
    /// empty string when absent.
    #[must_use]
    pub fn raw(&self) -> String {
        match self {
            Duration::Months(n) => n.to_string(),
            Duration::Text(t) => t.clone(),
            Duration::Empty => String::new(),
        }
    }

    /// Numeric month count, accepting textual values that happen to parse
    /// as a number.
    #[must_use]
    pub fn as_months(&self) -> Option<i64> {
        match self {
            Duration::Months(n) => Some(*n),
            Duration::Text(t) => t.trim().parse::<f64>().ok().map(|v| v as i64),
            Duration::Empty => None,
        }
    }

    /// True when no duration was given
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Duration::Empty)
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::Empty
    }
}

/// One priced plan row
///
/// Immutable once loaded. `code` is the lookup key; prices are `None` when
/// the source cell was empty or unparseable (never coerced to zero at this
/// layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Unique plan code (lookup key)
    pub code: String,
    /// Commercial plan name
    pub name: String,
    /// Undiscounted monthly price
    pub regular_price: Option<f64>,
    /// First promotional price
    pub promo1_price: Option<f64>,
    /// Duration of the first promotion
    pub promo1_duration: Duration,
    /// Second promotional price
    pub promo2_price: Option<f64>,
    /// Duration of the second promotion
    pub promo2_duration: Duration,
    /// Free-text plan description
    pub detail_text: String,
    /// Section the row belongs to
    pub section: String,
    /// Subsection the row belongs to
    pub subsection: String,
    /// Code of the plan this row is a bonus for, if any
    pub extra_for: Option<String>,
}

impl PlanRecord {
    /// Build a record from a raw row, resolving column aliases and coercing
    /// numeric fields. Malformed cells degrade to empty values.
    #[must_use]
    pub fn from_raw(row: &RawRow) -> Self {
        let extra_for = normalize::resolve_field(row, &["ExtraFor", "Extra_for"]);
        Self {
            code: normalize::resolve_field(row, &["Código", "Codigo", "Code"]),
            name: normalize::resolve_field(row, &["Plan", "Name"]),
            regular_price: normalize::normalize_number(&normalize::resolve_field(
                row,
                &["Valor", "Value", "Price"],
            )),
            promo1_price: normalize::normalize_number(&normalize::resolve_field(
                row,
                &["Promo1", "Promo_1"],
            )),
            promo1_duration: normalize::normalize_duration(&normalize::resolve_field(
                row,
                &["Meses1", "Meses_1"],
            )),
            promo2_price: normalize::normalize_number(&normalize::resolve_field(
                row,
                &["Promo2", "Promo_2"],
            )),
            promo2_duration: normalize::normalize_duration(&normalize::resolve_field(
                row,
                &["Meses2", "Meses_2"],
            )),
            detail_text: normalize::resolve_field(row, &["Detalles", "Details"]),
            section: normalize::resolve_field(row, &["Section", "Sección", "Seccion"]),
            subsection: normalize::resolve_field(row, &["Subsection", "Subsección", "Subseccion"]),
            extra_for: if extra_for.is_empty() {
                None
            } else {
                Some(extra_for)
            },
        }
    }
}

/// Ordered catalog of plan records
///
/// Insertion order is source order. Codes are assumed unique; on duplicates
/// the last row wins on lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    records: Vec<PlanRecord>,
}

impl Catalog {
    /// Create an empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from raw rows
    ///
    /// Emits a non-fatal warning when the required column set is absent
    /// from the header of the first row.
    #[must_use]
    pub fn from_rows(rows: &[RawRow]) -> Self {
        normalize::warn_missing_headers(rows.first());
        Self {
            records: rows.iter().map(PlanRecord::from_raw).collect(),
        }
    }

    /// Build a catalog from already-typed records
    #[inline]
    #[must_use]
    pub fn from_records(records: Vec<PlanRecord>) -> Self {
        Self { records }
    }

    /// Look up a plan by code. On duplicate codes, the last row wins.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&PlanRecord> {
        if code.is_empty() {
            return None;
        }
        self.records.iter().rev().find(|r| r.code == code)
    }

    /// Iterate records in source order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PlanRecord> {
        self.records.iter()
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the catalog holds no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
