//! Bulk hospital reference load.
//!
//! Applies the same field-level policy as the live path: rows with defects
//! go to the hospital quarantine carrying the defect reason and the list of
//! offending fields; the main collection only ever receives fully-valid
//! rows.

use chrono::Utc;
use serde::Serialize;

use hwt_ingest::HospitalCsvRow;
use hwt_model::{Hospital, RegionHierarchy};
use hwt_store::{QuarantinedHospital, StoreError, WaitTimeStore};

/// Counts from one bulk load run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkLoadSummary {
    pub loaded: usize,
    pub quarantined: usize,
}

/// Upsert valid hospital rows; quarantine defective ones field-by-field.
pub fn load_hospitals(
    store: &dyn WaitTimeStore,
    rows: Vec<HospitalCsvRow>,
) -> Result<BulkLoadSummary, StoreError> {
    let mut summary = BulkLoadSummary::default();

    for row in rows {
        let (hospital, offending_fields) = convert_row(&row);
        if offending_fields.is_empty() {
            store.upsert_hospital(hospital)?;
            summary.loaded += 1;
        } else {
            store.quarantine_hospital(QuarantinedHospital {
                hospital,
                reason: "field-level validation failed".to_string(),
                offending_fields,
                detected_at: Utc::now().naive_utc(),
            })?;
            summary.quarantined += 1;
        }
    }

    tracing::info!(
        loaded = summary.loaded,
        quarantined = summary.quarantined,
        "bulk hospital load finished"
    );
    Ok(summary)
}

/// Build a hospital from a raw row, collecting per-field defects.
///
/// The returned entity keeps every field that did parse, so quarantined rows
/// stay diagnosable.
fn convert_row(row: &HospitalCsvRow) -> (Hospital, Vec<String>) {
    let mut offending = Vec::new();

    let id = non_blank(row.hospital_id.as_deref());
    if id.is_none() {
        offending.push("HospitalID".to_string());
    }
    let name = non_blank(row.hospital_name.as_deref());
    if name.is_none() {
        offending.push("HospitalName".to_string());
    }

    let latitude = parse_coordinate(row.latitude.as_deref(), "Latitude", &mut offending);
    let longitude = parse_coordinate(row.longitude.as_deref(), "Longitude", &mut offending);

    let hospital = Hospital {
        id: id.unwrap_or_default(),
        name: name.unwrap_or_default(),
        address: non_blank(row.address.as_deref()),
        district: non_blank(row.district.as_deref()),
        regions: RegionHierarchy {
            nuts1: non_blank(row.nuts1.as_deref()),
            nuts2: non_blank(row.nuts2.as_deref()),
            nuts3: non_blank(row.nuts3.as_deref()),
        },
        latitude,
        longitude,
        phone: non_blank(row.phone.as_deref()),
        email: non_blank(row.email.as_deref()),
    };
    (hospital, offending)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_coordinate(
    value: Option<&str>,
    field: &str,
    offending: &mut Vec<String>,
) -> Option<f64> {
    let raw = non_blank(value)?;
    match raw.parse::<f64>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            offending.push(field.to_string());
            None
        }
    }
}
