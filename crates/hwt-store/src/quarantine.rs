//! Quarantined reference rows from the bulk load path.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use hwt_model::Hospital;

/// A hospital row that failed field-level checks during bulk load.
///
/// Shaped like the target entity, with whatever fields did parse filled in,
/// plus the defect description. Kept out of the main collection so that one
/// contains only fully-valid rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarantinedHospital {
    pub hospital: Hospital,
    pub reason: String,
    pub offending_fields: Vec<String>,
    pub detected_at: NaiveDateTime,
}
