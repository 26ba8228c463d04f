//! Contract field composition
//!
//! Builds the flat key → string map consumed by the document template. The
//! section decides the template: "Hogar" fills the home-bundle template,
//! everything else the default one with the mobile paragraphs and the
//! conditional legal/billing/pickup texts.

use crate::derivation::{fmt_number, Derivation, MOBILE_SECTION};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tarifario_catalog::{Catalog, PlanRecord};
use tarifario_selection::SelectionTree;

/// Legal disclosure included when any line carries a portability request
pub const PORTABILITY_DISCLOSURE: &str = "¿Autoriza usted mediante esta grabación a Pacífico Cable SPA a solicitar al OAP toda información necesaria para activar el proceso? Necesito que me indique su número telefónico actual, la compañía donante, su RUT y su nombre completo.\n\nLa portabilidad solo aplica al número telefónico. Su compañía actual podría cobrar por servicios pendientes. El cambio se realiza entre 03:00 y 05:00 AM, con posible breve interrupción. En caso de retracto, puede realizarlo hasta las 20:00 horas del día en que se active el servicio.\n";

/// Billing terms for new mobile customers
const NOC_NUEVO: &str = "En Mundo, nuestros servicios tienen el cobro por mes adelantado con seis ciclos de facturación distintos con fecha de inicio 1, 5, 10, 15, 20 y 25 de cada mes. La primera boleta se emitirá en el ciclo más cercano a la activación de los servicios, con 20 días continuos de plazo para pagar. Si no se paga 5 días después, el servicio se suspende y la reposición cuesta $2.500.";

/// Identifier of the document template to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateId {
    /// Home-bundle contract template
    Hogar,
    /// Default contract template (mobile and anything else)
    Default,
}

/// How the customer receives the SIM card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupMode {
    /// Pickup at a branch office
    Branch,
    /// Delivery to the customer's address
    Home,
}

impl Default for PickupMode {
    fn default() -> Self {
        PickupMode::Branch
    }
}

/// Form inputs gathered outside the selection tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractInputs {
    /// Customer (contract holder) name
    pub holder: String,
    /// Customer address
    pub address: String,
    /// Selected branch office
    pub branch: String,
    /// Existing billing cycle (portfolio customers)
    pub billing_cycle: String,
    /// Contract date
    pub date: String,
    /// SIM delivery mode
    pub pickup: PickupMode,
    /// Executive handling the sale
    pub executive: String,
}

/// Compose the template fields for a section.
///
/// Returns the template to fill and the key → value map; keys match the
/// `<<KEY>>` placeholders of the shipped templates.
#[must_use]
pub fn compose_fields(
    section: &str,
    derivation: &Derivation,
    inputs: &ContractInputs,
    catalog: &Catalog,
    tree: &SelectionTree,
) -> (TemplateId, IndexMap<String, String>) {
    let plan = first_resolved_plan(section, catalog, tree);
    let (template, fields) = if section.eq_ignore_ascii_case("hogar") {
        (TemplateId::Hogar, hogar_fields(plan, inputs))
    } else {
        (
            TemplateId::Default,
            default_fields(plan, derivation, inputs, tree),
        )
    };
    tracing::debug!(%section, ?template, fields = fields.len(), "composed contract fields");
    (template, fields)
}

/// First line of the section's active subsection with a resolved plan
#[must_use]
pub fn first_resolved_plan<'a>(
    section: &str,
    catalog: &'a Catalog,
    tree: &SelectionTree,
) -> Option<&'a PlanRecord> {
    let state = tree.section(section)?;
    let sub = tree
        .active_subsection(section)
        .or_else(|| state.iter().next().map(|(name, _)| name))?;
    state
        .node(sub)?
        .lines()
        .iter()
        .find_map(|line| line.chosen_code.as_deref().and_then(|c| catalog.find(c)))
}

fn hogar_fields(plan: Option<&PlanRecord>, inputs: &ContractInputs) -> IndexMap<String, String> {
    let mut fields = IndexMap::new();
    fields.insert("NOMBRE".to_string(), inputs.holder.clone());
    fields.insert(
        "PLAN".to_string(),
        plan.map(|p| p.name.clone()).unwrap_or_default(),
    );
    fields.insert("DIRECCION".to_string(), inputs.address.clone());
    fields.insert("VALOR".to_string(), money(plan.and_then(|p| p.regular_price)));
    fields.insert("PROMO1".to_string(), money(plan.and_then(|p| p.promo1_price)));
    fields.insert(
        "MESES1".to_string(),
        plan.map(|p| p.promo1_duration.raw()).unwrap_or_default(),
    );
    // Template quirk kept from the shipped form: both derived month keys
    // hold duration + 1, the "MESES1-1" name notwithstanding.
    fields.insert(
        "MESES1-1".to_string(),
        months_plus_one(plan.map(|p| &p.promo1_duration)),
    );
    fields.insert(
        "MESES2+1".to_string(),
        months_plus_one(plan.map(|p| &p.promo2_duration)),
    );
    fields.insert("PROMO2".to_string(), money(plan.and_then(|p| p.promo2_price)));
    fields.insert(
        "MESES2".to_string(),
        plan.map(|p| p.promo2_duration.raw()).unwrap_or_default(),
    );
    fields.insert(
        "DETALLES".to_string(),
        plan.map(|p| p.detail_text.clone()).unwrap_or_default(),
    );
    fields.insert("FECHA".to_string(), inputs.date.clone());
    fields.insert("EJECUTIVO".to_string(), inputs.executive.clone());
    fields
}

fn default_fields(
    plan: Option<&PlanRecord>,
    derivation: &Derivation,
    inputs: &ContractInputs,
    tree: &SelectionTree,
) -> IndexMap<String, String> {
    let mut fields = IndexMap::new();
    fields.insert("NOMBRE".to_string(), inputs.holder.clone());
    fields.insert("DIRECCION".to_string(), inputs.address.clone());
    fields.insert("SUCURSAL".to_string(), inputs.branch.clone());
    fields.insert(
        "PLAN".to_string(),
        plan.map(|p| p.name.clone()).unwrap_or_default(),
    );
    fields.insert(
        "VALOR_PLAN".to_string(),
        money(plan.and_then(|p| p.regular_price)),
    );
    fields.insert(
        "VALOR_PROMO".to_string(),
        money(plan.and_then(|p| p.promo1_price)),
    );
    fields.insert(
        "VALOR_PROMO2".to_string(),
        money(plan.and_then(|p| p.promo2_price)),
    );
    fields.insert(
        "DURACION".to_string(),
        plan.map(|p| p.promo1_duration.raw()).unwrap_or_default(),
    );
    fields.insert("CICLO".to_string(), inputs.billing_cycle.clone());
    fields.insert("FECHA".to_string(), inputs.date.clone());
    fields.insert("MOVIL".to_string(), derivation.paragraphs.join("\n\n"));
    fields.insert("CONDICION".to_string(), condicion_text(derivation));
    fields.insert("NOC".to_string(), noc_text(inputs, tree));
    fields.insert("OBTEN".to_string(), obten_text(inputs));
    fields.insert("ALL".to_string(), all_text(derivation));
    fields.insert("EJECUTIVO".to_string(), inputs.executive.clone());
    fields
}

/// Legal portability disclosure, or a single space so the template
/// placeholder collapses cleanly.
fn condicion_text(derivation: &Derivation) -> String {
    if derivation.has_any_portability {
        PORTABILITY_DISCLOSURE.to_string()
    } else {
        " ".to_string()
    }
}

/// Billing text keyed by the mobile section's active subsection
fn noc_text(inputs: &ContractInputs, tree: &SelectionTree) -> String {
    match tree
        .active_subsection(MOBILE_SECTION)
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("nuevo") => NOC_NUEVO.to_string(),
        Some("cartera") => format!(
            "Nuestros servicios se facturan por mes adelantado y se acoplan a su actual \
             ciclo de facturación {}. Puede aplicarse un cobro proporcional el día de la \
             activación si corresponde.",
            inputs.billing_cycle
        ),
        _ => String::new(),
    }
}

/// SIM delivery text by pickup mode
fn obten_text(inputs: &ContractInputs) -> String {
    match inputs.pickup {
        PickupMode::Branch => format!(
            "En la sucursal seleccionada por usted {}. El retiro y activación de su Sim Card \
             puede realizarlo a partir del día hábil siguiente (24 horas).",
            inputs.branch
        ),
        PickupMode::Home => format!(
            "La tarjeta SIM será enviada a su dirección {}, en un plazo de 2 a 5 días hábiles, \
             una vez recibida debe activarla siguiendo las indicaciones entregadas junto con su \
             Sim Card. Si tiene dudas o consultas puede realizarlas al 6009100100 o al \
             442160800 opción móvil. (Activación Opción 5)",
            inputs.address
        ),
    }
}

/// Summary sentence over the plan tally and section totals
fn all_text(derivation: &Derivation) -> String {
    if derivation.plan_tally.is_empty() {
        return String::new();
    }
    let entries: Vec<String> = derivation
        .plan_tally
        .iter()
        .map(|(name, count)| {
            let plural = if *count == 1 { "linea" } else { "lineas" };
            format!("{count} {plural} con el {name}")
        })
        .collect();
    format!(
        "Usted está contratando {}, con valor total de ${} y con descuento quedaría en ${}.",
        entries.join(", "),
        fmt_number(derivation.totals.without_discount),
        fmt_number(derivation.totals.with_discount),
    )
}

fn money(value: Option<f64>) -> String {
    value.map(fmt_number).unwrap_or_default()
}

fn months_plus_one(duration: Option<&tarifario_catalog::Duration>) -> String {
    duration
        .and_then(|d| d.as_months())
        .map(|m| (m + 1).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::derive;
    use pretty_assertions::assert_eq;
    use tarifario_catalog::Duration;
    use tarifario_structure::Structure;

    fn plan(code: &str, name: &str) -> PlanRecord {
        PlanRecord {
            code: code.to_string(),
            name: name.to_string(),
            regular_price: Some(12000.0),
            promo1_price: Some(10000.0),
            promo1_duration: Duration::Months(12),
            promo2_price: Some(11000.0),
            promo2_duration: Duration::Months(6),
            detail_text: "Detalle".to_string(),
            section: String::new(),
            subsection: String::new(),
            extra_for: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_records(vec![plan("T1", "Trio Full"), plan("NM01", "Multi 20GB")])
    }

    fn inputs() -> ContractInputs {
        ContractInputs {
            holder: "Ana Silva".into(),
            address: "Av. Siempre Viva 742".into(),
            branch: "Temuco Centro".into(),
            billing_cycle: "5".into(),
            date: "2024-06-01".into(),
            pickup: PickupMode::Branch,
            executive: "Pedro Rojas".into(),
        }
    }

    #[test]
    fn hogar_section_uses_hogar_template() {
        let catalog = catalog();
        let mut tree = SelectionTree::from_structure(&Structure::default_structure());
        tree.activate("Hogar", "trio").unwrap();
        tree.select("Hogar", "trio", 0, Some("T1")).unwrap();

        let derivation = derive("Hogar", "Ana Silva", &catalog, &tree);
        let (template, fields) = compose_fields("Hogar", &derivation, &inputs(), &catalog, &tree);

        assert_eq!(template, TemplateId::Hogar);
        assert_eq!(fields["PLAN"], "Trio Full");
        assert_eq!(fields["VALOR"], "12000");
        assert_eq!(fields["PROMO1"], "10000");
        assert_eq!(fields["MESES1"], "12");
        assert_eq!(fields["MESES1-1"], "13");
        assert_eq!(fields["MESES2+1"], "7");
        assert_eq!(fields["EJECUTIVO"], "Pedro Rojas");
        assert!(!fields.contains_key("MOVIL"));
    }

    #[test]
    fn hogar_fields_empty_without_selection() {
        let catalog = catalog();
        let mut tree = SelectionTree::from_structure(&Structure::default_structure());
        tree.activate("Hogar", "trio").unwrap();

        let derivation = derive("Hogar", "Ana", &catalog, &tree);
        let (_, fields) = compose_fields("Hogar", &derivation, &inputs(), &catalog, &tree);
        assert_eq!(fields["PLAN"], "");
        assert_eq!(fields["VALOR"], "");
        assert_eq!(fields["MESES1-1"], "");
        assert_eq!(fields["NOMBRE"], "Ana Silva");
    }

    #[test]
    fn movil_section_uses_default_template() {
        let catalog = catalog();
        let mut tree = SelectionTree::from_structure(&Structure::default_structure());
        tree.activate("Movil", "nuevo").unwrap();
        tree.select("Movil", "nuevo", 0, Some("NM01")).unwrap();

        let derivation = derive("Movil", "Ana Silva", &catalog, &tree);
        let (template, fields) = compose_fields("Movil", &derivation, &inputs(), &catalog, &tree);

        assert_eq!(template, TemplateId::Default);
        assert!(fields["MOVIL"].starts_with("Sr./Sra. Ana Silva"));
        assert_eq!(
            fields["ALL"],
            "Usted está contratando 1 linea con el Multi 20GB, con valor total de $12000 \
             y con descuento quedaría en $10000."
        );
        assert_eq!(fields["NOC"], NOC_NUEVO);
        assert!(fields["OBTEN"].contains("Temuco Centro"));
        // No portability: placeholder collapses to a space
        assert_eq!(fields["CONDICION"], " ");
    }

    #[test]
    fn condicion_included_with_portability() {
        let catalog = catalog();
        let mut tree = SelectionTree::from_structure(&Structure::default_structure());
        tree.activate("Movil", "nuevo").unwrap();
        tree.select("Movil", "nuevo", 0, Some("NM01")).unwrap();
        tree.set_portability("Movil", "nuevo", 0, true, Some("987"), Some("Acme"))
            .unwrap();

        let derivation = derive("Movil", "Ana", &catalog, &tree);
        let (_, fields) = compose_fields("Movil", &derivation, &inputs(), &catalog, &tree);
        assert_eq!(fields["CONDICION"], PORTABILITY_DISCLOSURE);
    }

    #[test]
    fn noc_cartera_interpolates_cycle() {
        let catalog = catalog();
        let mut tree = SelectionTree::from_structure(&Structure::default_structure());
        tree.activate("Movil", "cartera").unwrap();

        let derivation = derive("Movil", "Ana", &catalog, &tree);
        let (_, fields) = compose_fields("Movil", &derivation, &inputs(), &catalog, &tree);
        assert!(fields["NOC"].contains("ciclo de facturación 5"));
    }

    #[test]
    fn obten_home_delivery_uses_address() {
        let catalog = catalog();
        let tree = SelectionTree::from_structure(&Structure::default_structure());
        let derivation = Derivation::default();
        let mut inputs = inputs();
        inputs.pickup = PickupMode::Home;

        let (_, fields) = compose_fields("Movil", &derivation, &inputs, &catalog, &tree);
        assert!(fields["OBTEN"].contains("Av. Siempre Viva 742"));
        assert!(fields["OBTEN"].contains("2 a 5 días hábiles"));
    }

    #[test]
    fn all_text_plural_and_empty() {
        let mut derivation = Derivation::default();
        assert_eq!(all_text(&derivation), "");

        derivation.plan_tally.insert("Multi 20GB".into(), 2);
        derivation.totals.without_discount = 24000.0;
        derivation.totals.with_discount = 20000.0;
        assert_eq!(
            all_text(&derivation),
            "Usted está contratando 2 lineas con el Multi 20GB, con valor total de $24000 \
             y con descuento quedaría en $20000."
        );
    }
}
