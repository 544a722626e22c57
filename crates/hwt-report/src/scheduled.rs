//! Queries over consultation and surgery records.
//!
//! These facts reference services by key; every query starts by loading the
//! service table once and classifying records through it, so oncology status
//! comes from the stored tag rather than from re-matching free text.

use std::collections::BTreeMap;

use serde::Serialize;

use hwt_model::{ConsultationSurgeryRecord, ListType, Service, ServiceType};
use hwt_store::{StoreError, WaitTimeStore};

use crate::params::{DateRange, Granularity, mean, period_anchor, round2};

fn service_table(store: &dyn WaitTimeStore) -> Result<BTreeMap<u32, Service>, StoreError> {
    Ok(store
        .services()?
        .into_iter()
        .map(|service| (service.key, service))
        .collect())
}

/// Running (sum, sample count) pair for one mean.
#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    samples: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.samples += 1;
    }

    fn mean(&self) -> Option<f64> {
        mean(self.sum, self.samples)
    }
}

// --- oncology vs non-oncology response difference --------------------------

#[derive(Debug, Clone)]
pub struct OncologyDifferenceParams {
    pub range: DateRange,
    /// Exact specialty to restrict to; all consultation specialties otherwise.
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OncologyDifferenceRow {
    pub oncology_mean: Option<f64>,
    pub non_oncology_mean: Option<f64>,
    /// Oncology mean minus non-oncology mean; `None` when either side has no
    /// data for the filter.
    pub difference: Option<f64>,
}

/// Mean consultation response time, oncology vs the rest.
pub fn oncology_response_difference(
    store: &dyn WaitTimeStore,
    params: &OncologyDifferenceParams,
) -> Result<OncologyDifferenceRow, StoreError> {
    let services = service_table(store)?;
    let mut oncology = Accumulator::default();
    let mut non_oncology = Accumulator::default();

    for record in matched_records(store, params.range)? {
        let Some(service) = services.get(&record.service_key) else {
            continue;
        };
        if service.service_type != ServiceType::Consultation {
            continue;
        }
        if let Some(specialty) = &params.specialty
            && service.specialty != *specialty
        {
            continue;
        }
        if service.oncological {
            oncology.push(record.avg_wait_days);
        } else {
            non_oncology.push(record.avg_wait_days);
        }
    }

    let oncology_mean = oncology.mean().map(round2);
    let non_oncology_mean = non_oncology.mean().map(round2);
    let difference = match (oncology.mean(), non_oncology.mean()) {
        (Some(onco), Some(other)) => Some(round2(onco - other)),
        _ => None,
    };
    Ok(OncologyDifferenceRow {
        oncology_mean,
        non_oncology_mean,
        difference,
    })
}

// --- scheduled surgery wait, General vs Oncological ------------------------

#[derive(Debug, Clone)]
pub struct SurgeryWaitParams {
    pub range: DateRange,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurgeryWaitRow {
    pub list_type: ListType,
    pub mean_wait_days: f64,
    pub total_patients: u64,
    pub record_count: usize,
}

/// Mean scheduled-surgery wait split by waiting-list type, ascending by mean.
pub fn scheduled_surgery_wait(
    store: &dyn WaitTimeStore,
    params: &SurgeryWaitParams,
) -> Result<Vec<SurgeryWaitRow>, StoreError> {
    let services = service_table(store)?;
    // Index 0 holds the general list, index 1 the oncological one.
    let mut groups = [(Accumulator::default(), 0u64); 2];

    for record in matched_records(store, params.range)? {
        let Some(service) = services.get(&record.service_key) else {
            continue;
        };
        if service.service_type != ServiceType::Surgery {
            continue;
        }
        if let Some(specialty) = &params.specialty
            && service.specialty != *specialty
        {
            continue;
        }
        let (accumulator, patients) = &mut groups[usize::from(service.oncological)];
        accumulator.push(record.avg_wait_days);
        *patients += u64::from(record.patient_count);
    }

    let mut rows = Vec::new();
    for (slot, list_type) in [ListType::General, ListType::Oncological]
        .into_iter()
        .enumerate()
    {
        let (accumulator, patients) = groups[slot];
        if let Some(value) = accumulator.mean() {
            rows.push(SurgeryWaitRow {
                list_type,
                mean_wait_days: round2(value),
                total_patients: patients,
                record_count: accumulator.samples,
            });
        }
    }
    rows.sort_by(|a, b| a.mean_wait_days.total_cmp(&b.mean_wait_days));
    Ok(rows)
}

// --- consultation vs surgery discrepancy per time bucket --------------------

#[derive(Debug, Clone)]
pub struct DiscrepancyParams {
    pub range: DateRange,
    pub granularity: Granularity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscrepancyRow {
    pub bucket: String,
    pub consultation_mean: f64,
    pub surgery_mean: f64,
    /// Surgery mean minus consultation mean.
    pub discrepancy: f64,
}

/// Surgery-vs-consultation mean wait gap per time bucket, ordered by bucket.
///
/// Buckets where either side has no data are omitted: a gap against nothing
/// is not a gap.
pub fn consultation_surgery_discrepancy(
    store: &dyn WaitTimeStore,
    params: &DiscrepancyParams,
) -> Result<Vec<DiscrepancyRow>, StoreError> {
    let services = service_table(store)?;
    let mut buckets: BTreeMap<String, (Accumulator, Accumulator)> = BTreeMap::new();

    for record in matched_records(store, params.range)? {
        let Some(service) = services.get(&record.service_key) else {
            continue;
        };
        let Some(anchor) = period_anchor(record.period) else {
            continue;
        };
        let bucket = params.granularity.bucket_key(anchor);
        let (consultation, surgery) = buckets.entry(bucket).or_default();
        match service.service_type {
            ServiceType::Consultation => consultation.push(record.avg_wait_days),
            ServiceType::Surgery => surgery.push(record.avg_wait_days),
            ServiceType::Emergency => {}
        }
    }

    let mut rows = Vec::new();
    for (bucket, (consultation, surgery)) in buckets {
        if let (Some(consultation_mean), Some(surgery_mean)) =
            (consultation.mean(), surgery.mean())
        {
            rows.push(DiscrepancyRow {
                bucket,
                consultation_mean: round2(consultation_mean),
                surgery_mean: round2(surgery_mean),
                discrepancy: round2(surgery_mean - consultation_mean),
            });
        }
    }
    Ok(rows)
}

// --- shared record scan -----------------------------------------------------

fn matched_records(
    store: &dyn WaitTimeStore,
    range: DateRange,
) -> Result<impl Iterator<Item = ConsultationSurgeryRecord>, StoreError> {
    Ok(store
        .consultation_surgery_records()?
        .into_iter()
        .filter(move |record| range.contains_period(record.period)))
}
