//! Shared field-level checks used by the per-kind rule sets.
//!
//! Each check either pushes a [`RuleViolation`] into the accumulator or does
//! nothing; none of them aborts the run, so a single pass reports every
//! defect in the document.

use chrono::NaiveDateTime;

use hwt_ingest::Element;
use hwt_model::{ReferencePeriod, RuleViolation};

/// Require a non-blank text value at `path` under `root`.
pub fn require_text<'a>(
    root: &'a Element,
    path: &[&str],
    violations: &mut Vec<RuleViolation>,
) -> Option<&'a str> {
    let field = path.join("/");
    match root.path(path).and_then(Element::text) {
        Some(text) => Some(text),
        None => {
            violations.push(RuleViolation::new(field, "required field is missing or blank"));
            None
        }
    }
}

/// Case-sensitive membership check against a canonical value set.
pub fn check_enumeration(
    value: Option<&str>,
    allowed: &[&str],
    field: &str,
    violations: &mut Vec<RuleViolation>,
) {
    if let Some(value) = value
        && !allowed.contains(&value)
    {
        violations.push(RuleViolation::new(
            field,
            format!("'{value}' is not one of the canonical values [{}]", allowed.join(", ")),
        ));
    }
}

/// Non-negative integer check; absent values pass (missing optional → 0
/// happens later, in the transformer).
pub fn check_count(value: Option<&str>, field: &str, violations: &mut Vec<RuleViolation>) {
    if let Some(raw) = value
        && raw.parse::<u32>().is_err()
    {
        violations.push(RuleViolation::new(
            field,
            format!("'{raw}' is not a non-negative integer"),
        ));
    }
}

/// Non-negative decimal check.
pub fn check_decimal(value: Option<&str>, field: &str, violations: &mut Vec<RuleViolation>) {
    if let Some(raw) = value {
        match raw.parse::<f64>() {
            Ok(parsed) if parsed >= 0.0 => {}
            _ => violations.push(RuleViolation::new(
                field,
                format!("'{raw}' is not a non-negative number"),
            )),
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SS` timestamp check.
pub fn check_timestamp(value: Option<&str>, field: &str, violations: &mut Vec<RuleViolation>) {
    if let Some(raw) = value
        && NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").is_err()
    {
        violations.push(RuleViolation::new(
            field,
            format!("'{raw}' is not a YYYY-MM-DDTHH:MM:SS timestamp"),
        ));
    }
}

/// `YYYY-MM` reference-period check (month must be 1-12). Delegates to the
/// model's period parser so validation and transformation cannot disagree on
/// what a period is.
pub fn check_period(value: Option<&str>, field: &str, violations: &mut Vec<RuleViolation>) {
    if let Some(raw) = value
        && ReferencePeriod::parse(raw).is_none()
    {
        violations.push(RuleViolation::new(
            field,
            format!("'{raw}' is not a valid YYYY-MM period"),
        ));
    }
}
