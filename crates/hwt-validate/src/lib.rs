//! Business-rule validation for wait-time submission documents.
//!
//! Validation runs after well-formedness (the ingest crate already produced
//! an element tree) and before transformation. It is a pure function of its
//! input: the same document always yields the same violation list.
//!
//! The rule sets ACCUMULATE violations instead of aborting on the first one,
//! so a rejection carries every defect in the document. The live pipeline and
//! the bulk load both consume this field-level list.

pub mod checks;
pub mod rules;

use hwt_ingest::Element;
use hwt_model::{DocumentKind, RuleViolation};

/// Validate an element tree against the rule set for `kind`.
///
/// Returns all violated rules; `Ok(())` means the document may be
/// transformed.
pub fn validate(root: &Element, kind: DocumentKind) -> Result<(), Vec<RuleViolation>> {
    let mut violations = Vec::new();

    if root.name != kind.root_element() {
        violations.push(RuleViolation::new(
            "/",
            format!(
                "expected root element <{}>, found <{}>",
                kind.root_element(),
                root.name
            ),
        ));
        // Without the right root there is nothing meaningful to check below.
        return Err(violations);
    }

    match kind {
        DocumentKind::Emergency => rules::emergency::apply(root, &mut violations),
        DocumentKind::Consultation => rules::consultation::apply(root, &mut violations),
        DocumentKind::Surgery => rules::surgery::apply(root, &mut violations),
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
