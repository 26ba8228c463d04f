//! Derivation engine
//!
//! `derive` is a pure, synchronous read of the selection tree: it resolves
//! each line's chosen code against the catalog and produces display
//! blocks, priced lines, section totals, the plan tally and the contract
//! paragraphs. A line whose code does not resolve contributes nothing to
//! totals, tally or paragraphs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tarifario_catalog::{Catalog, Duration, PlanRecord};
use tarifario_selection::{LineSelection, SelectionNode, SelectionTree};

/// Section whose derivation carries contract paragraphs
pub const MOBILE_SECTION: &str = "Movil";

/// Prompt shown for lines without a resolved plan
pub const SELECT_PROMPT: &str = "Selecciona un plan para ver detalles.";

/// One detail block per line of the active subsection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailBlock {
    /// "Línea Principal" / "Adicional N"
    pub label: String,
    /// Resolved plan name; `None` renders the placeholder prompt
    pub plan_name: Option<String>,
    /// Plan detail text, or the placeholder prompt when unresolved
    pub detail_text: String,
}

/// One priced line of the active subsection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    /// Line label
    pub label: String,
    /// Resolved plan name
    pub plan_name: String,
    /// First promotional price, if any
    pub promo_price: Option<f64>,
    /// Duration of the promotion
    pub promo_duration: Duration,
    /// Undiscounted price, if any
    pub regular_price: Option<f64>,
}

impl PricedLine {
    /// Price summary text, `"-"` for missing values:
    /// `"Promo1: $10000 (12 meses) / Sin descuento: $12000"`.
    #[must_use]
    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if let Some(promo) = self.promo_price {
            parts.push(format!(
                "Promo1: ${} ({})",
                fmt_number(promo),
                self.promo_duration.label()
            ));
        }
        if let Some(regular) = self.regular_price {
            parts.push(format!("Sin descuento: ${}", fmt_number(regular)));
        }
        if parts.is_empty() {
            parts.push("Sin descuento: $-".to_string());
        }
        parts.join(" / ")
    }
}

/// Section totals over all resolved lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Σ promo price, falling back to the regular price per line
    pub with_discount: f64,
    /// Σ regular price
    pub without_discount: f64,
}

/// Result of deriving one section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    /// Detail blocks for the lines of the active subsection
    pub detail_blocks: Vec<DetailBlock>,
    /// Priced lines of the active subsection (resolved lines only)
    pub priced_lines: Vec<PricedLine>,
    /// Totals across all subsections of the section
    pub totals: Totals,
    /// Contract paragraphs (mobile section only), in line order
    pub paragraphs: Vec<String>,
    /// plan name → line count, first-occurrence order
    pub plan_tally: IndexMap<String, usize>,
    /// True iff any resolved line has a complete portability request
    pub has_any_portability: bool,
}

/// Derive display blocks, totals and contract prose for one section.
///
/// Detail and priced blocks cover the section's active subsection; totals,
/// tally, portability and paragraphs scan every subsection of the section
/// in structure order. `holder` is the customer name addressed by the
/// opening paragraph.
#[must_use]
pub fn derive(
    section: &str,
    holder: &str,
    catalog: &Catalog,
    tree: &SelectionTree,
) -> Derivation {
    let Some(state) = tree.section(section) else {
        return Derivation::default();
    };

    let mut derivation = Derivation::default();

    // Active-subsection display blocks
    let active_sub = tree
        .active_subsection(section)
        .or_else(|| state.iter().next().map(|(name, _)| name));
    if let Some(node) = active_sub.and_then(|sub| state.node(sub)) {
        fill_display_blocks(&mut derivation, node, catalog);
    }

    // Section-wide scan: subsections in structure order, lines in order
    let mut resolved_count = 0usize;
    for (_, node) in state.iter() {
        for line in node.lines() {
            let Some(plan) = line
                .chosen_code
                .as_deref()
                .and_then(|code| catalog.find(code))
            else {
                continue;
            };

            *derivation
                .plan_tally
                .entry(plan_display_name(plan))
                .or_insert(0) += 1;
            derivation.totals.without_discount += plan.regular_price.unwrap_or(0.0);
            derivation.totals.with_discount += plan
                .promo1_price
                .or(plan.regular_price)
                .unwrap_or(0.0);
            if line.portability.is_complete() {
                derivation.has_any_portability = true;
            }

            if section == MOBILE_SECTION {
                derivation
                    .paragraphs
                    .push(line_paragraph(holder, plan, line, resolved_count == 0));
            }
            resolved_count += 1;
        }
    }

    derivation
}

fn fill_display_blocks(derivation: &mut Derivation, node: &SelectionNode, catalog: &Catalog) {
    for line in node.lines() {
        let plan = line
            .chosen_code
            .as_deref()
            .and_then(|code| catalog.find(code));
        derivation.detail_blocks.push(match plan {
            Some(plan) => DetailBlock {
                label: line.label(),
                plan_name: Some(plan.name.clone()),
                detail_text: plan.detail_text.clone(),
            },
            None => DetailBlock {
                label: line.label(),
                plan_name: None,
                detail_text: SELECT_PROMPT.to_string(),
            },
        });
        if let Some(plan) = plan {
            derivation.priced_lines.push(PricedLine {
                label: line.label(),
                plan_name: plan.name.clone(),
                promo_price: plan.promo1_price,
                promo_duration: plan.promo1_duration.clone(),
                regular_price: plan.regular_price,
            });
        }
    }
}

/// One contract sentence for a resolved line.
///
/// The first resolved line opens addressed to the customer; the rest
/// continue. Promo and portability clauses are appended comma-first and
/// joined with " y ".
fn line_paragraph(holder: &str, plan: &PlanRecord, line: &LineSelection, first: bool) -> String {
    let valor = plan.regular_price.map(fmt_number).unwrap_or_default();
    let mut paragraph = if first {
        format!(
            "Sr./Sra. {holder}, Confirmamos el {}, con valor normal de ${valor}",
            plan.name
        )
    } else {
        format!(
            "Confirmamos siguiente plan, el {}, con valor normal de ${valor}",
            plan.name
        )
    };

    let mut clauses = Vec::new();
    if let Some(promo) = plan.promo1_price {
        let mut clause = format!("y promoción de ${}", fmt_number(promo));
        match &plan.promo1_duration {
            Duration::Empty => {}
            duration => {
                clause.push_str(" por ");
                clause.push_str(&duration.label());
            }
        }
        clauses.push(clause);
    }
    if line.portability.is_complete() {
        clauses.push(format!(
            "portabilidad del número {} desde la compañía {}",
            line.portability.number, line.portability.donor
        ));
    }

    if !clauses.is_empty() {
        paragraph.push_str(", ");
        paragraph.push_str(&clauses.join(" y "));
    }
    paragraph.push('.');
    paragraph
}

fn plan_display_name(plan: &PlanRecord) -> String {
    if plan.name.is_empty() {
        "Sin nombre".to_string()
    } else {
        plan.name.clone()
    }
}

/// Format a price without trailing `.0` noise: 12000.0 → "12000",
/// 1234.56 → "1234.56".
#[must_use]
pub fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
