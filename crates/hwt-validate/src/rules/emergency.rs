//! Rule set for `EmergencyReport` documents.

use hwt_ingest::Element;
use hwt_model::{EMERGENCY_TYPOLOGIES, RuleViolation, TriageCategory};

use crate::checks::{check_count, check_enumeration, check_timestamp, require_text};

/// Canonical unit states (feminine agreement with "urgência").
const STATES: [&str; 2] = ["Aberta", "Fechada"];

pub fn apply(root: &Element, violations: &mut Vec<RuleViolation>) {
    require_text(root, &["Header", "InstitutionId"], violations);
    let timestamp = require_text(root, &["Header", "Timestamp"], violations);
    check_timestamp(timestamp, "Header/Timestamp", violations);

    let typology = require_text(root, &["Typology"], violations);
    check_enumeration(typology, &EMERGENCY_TYPOLOGIES, "Typology", violations);

    let state = require_text(root, &["State"], violations);
    check_enumeration(state, &STATES, "State", violations);

    let triage_names: Vec<&str> = TriageCategory::ALL
        .into_iter()
        .map(|c| c.display_name())
        .collect();

    if let Some(waiting) = root.child("WaitingList") {
        for (index, item) in waiting.children_named("Item").into_iter().enumerate() {
            let prefix = format!("WaitingList/Item[{index}]");
            check_triage_item(item, &prefix, &triage_names, true, violations);
        }
    }

    if let Some(observation) = root.child("ObservationList") {
        for (index, item) in observation.children_named("Item").into_iter().enumerate() {
            let prefix = format!("ObservationList/Item[{index}]");
            check_triage_item(item, &prefix, &triage_names, false, violations);
        }
    }
}

fn check_triage_item(
    item: &Element,
    prefix: &str,
    triage_names: &[&str],
    with_wait: bool,
    violations: &mut Vec<RuleViolation>,
) {
    let color_field = format!("{prefix}/TriageColor");
    match item.child_text("TriageColor") {
        Some(color) => check_enumeration(Some(color), triage_names, &color_field, violations),
        None => violations.push(RuleViolation::new(
            color_field,
            "required field is missing or blank",
        )),
    }
    check_count(
        item.child_text("PatientCount"),
        &format!("{prefix}/PatientCount"),
        violations,
    );
    if with_wait {
        check_count(
            item.child_text("WaitMinutes"),
            &format!("{prefix}/WaitMinutes"),
            violations,
        );
    }
}
