//! Rule set for `SurgeryReport` documents.

use hwt_ingest::Element;
use hwt_model::RuleViolation;

use crate::checks::{check_count, check_decimal, check_enumeration, check_period, require_text};

const LIST_TYPES: [&str; 2] = ["Geral", "Oncológica"];

pub fn apply(root: &Element, violations: &mut Vec<RuleViolation>) {
    require_text(root, &["Header", "InstitutionId"], violations);
    let period = require_text(root, &["Header", "Period"], violations);
    check_period(period, "Header/Period", violations);

    let Some(list) = root.child("SpecialtyList") else {
        return;
    };
    for (index, specialty) in list.children_named("Specialty").into_iter().enumerate() {
        let prefix = format!("SpecialtyList/Specialty[{index}]");

        if specialty.child_text("Name").is_none() {
            violations.push(RuleViolation::new(
                format!("{prefix}/Name"),
                "required field is missing or blank",
            ));
        }

        // General vs oncological is decided by this tag, never inferred from
        // the specialty text, so it must be present and canonical.
        let list_type_field = format!("{prefix}/ListType");
        match specialty.child_text("ListType") {
            Some(list_type) => {
                check_enumeration(Some(list_type), &LIST_TYPES, &list_type_field, violations);
            }
            None => violations.push(RuleViolation::new(
                list_type_field,
                "required field is missing or blank",
            )),
        }

        check_decimal(
            specialty.child_text("WaitDays"),
            &format!("{prefix}/WaitDays"),
            violations,
        );
        check_count(
            specialty.child_text("SurgeryCount"),
            &format!("{prefix}/SurgeryCount"),
            violations,
        );
        check_count(
            specialty.child_text("PatientCount"),
            &format!("{prefix}/PatientCount"),
            violations,
        );
    }
}
