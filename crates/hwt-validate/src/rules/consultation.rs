//! Rule set for `ConsultationReport` documents.

use hwt_ingest::Element;
use hwt_model::RuleViolation;

use crate::checks::{check_count, check_decimal, check_enumeration, check_period, require_text};

const TARGET_POPULATIONS: [&str; 3] = ["Adulto", "Pediátrico", "Todos"];
const LIST_TYPES: [&str; 2] = ["Geral", "Oncológica"];
const RESPONSE_TIERS: [&str; 3] = ["Expedited", "Priority", "Normal"];

pub fn apply(root: &Element, violations: &mut Vec<RuleViolation>) {
    require_text(root, &["Header", "InstitutionId"], violations);
    let period = require_text(root, &["Header", "Period"], violations);
    check_period(period, "Header/Period", violations);

    let Some(list) = root.child("SpecialtyList") else {
        return;
    };
    for (index, specialty) in list.children_named("Specialty").into_iter().enumerate() {
        let prefix = format!("SpecialtyList/Specialty[{index}]");
        check_specialty_entry(specialty, &prefix, violations);
    }
}

fn check_specialty_entry(specialty: &Element, prefix: &str, violations: &mut Vec<RuleViolation>) {
    if specialty.child_text("Name").is_none() {
        violations.push(RuleViolation::new(
            format!("{prefix}/Name"),
            "required field is missing or blank",
        ));
    }
    check_enumeration(
        specialty.child_text("TargetPopulation"),
        &TARGET_POPULATIONS,
        &format!("{prefix}/TargetPopulation"),
        violations,
    );
    check_enumeration(
        specialty.child_text("ListType"),
        &LIST_TYPES,
        &format!("{prefix}/ListType"),
        violations,
    );
    if let Some(response) = specialty.child("ResponseTime") {
        for tier in RESPONSE_TIERS {
            check_decimal(
                response.child_text(tier),
                &format!("{prefix}/ResponseTime/{tier}"),
                violations,
            );
        }
    }
    check_count(
        specialty.child_text("PatientCount"),
        &format!("{prefix}/PatientCount"),
        violations,
    );
}
