//! Queries over emergency wait records.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use serde::Serialize;

use hwt_model::{EmergencyWaitRecord, TriageCategory};
use hwt_store::{StoreError, WaitTimeStore};

use crate::params::{DateRange, DayPeriod, Granularity, mean, round2};

/// Emergency-type descriptions counting as pediatric, matched
/// case-insensitively and tolerating both accented and plain spellings.
fn is_pediatric(description: &str) -> bool {
    let lowered = description.to_lowercase();
    lowered.contains("pediatr") || lowered.contains("pediátr")
}

// --- mean waiting population by typology and triage category ---------------

#[derive(Debug, Clone)]
pub struct MeanWaitingParams {
    pub range: DateRange,
    /// Exact typology description to restrict to; all typologies otherwise.
    pub typology: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanWaitingRow {
    pub typology: String,
    pub category: TriageCategory,
    pub mean_queue_length: f64,
}

/// Mean number of waiting patients per (typology, triage category).
///
/// Every matched record contributes one sample per category, zero entries
/// included, so the mean reflects the full reporting history of the window.
pub fn mean_waiting_by_typology(
    store: &dyn WaitTimeStore,
    params: &MeanWaitingParams,
) -> Result<Vec<MeanWaitingRow>, StoreError> {
    let mut groups: BTreeMap<String, ([u64; 5], u64)> = BTreeMap::new();

    for record in matched_records(store, params.range)? {
        if let Some(typology) = &params.typology
            && record.emergency_type.description != *typology
        {
            continue;
        }
        let (sums, samples) = groups
            .entry(record.emergency_type.description.clone())
            .or_default();
        for (slot, category) in TriageCategory::ALL.into_iter().enumerate() {
            sums[slot] += u64::from(record.triage.entry(category).queue_length);
        }
        *samples += 1;
    }

    let mut rows = Vec::new();
    for (typology, (sums, samples)) in groups {
        for (slot, category) in TriageCategory::ALL.into_iter().enumerate() {
            if let Some(value) = mean(sums[slot] as f64, samples as usize) {
                rows.push(MeanWaitingRow {
                    typology: typology.clone(),
                    category,
                    mean_queue_length: round2(value),
                });
            }
        }
    }
    Ok(rows)
}

// --- triage percentage distribution ----------------------------------------

#[derive(Debug, Clone)]
pub struct TriageDistributionParams {
    pub range: DateRange,
    pub granularity: Granularity,
    pub hospital_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageDistributionRow {
    pub bucket: String,
    pub day_period: DayPeriod,
    pub category: TriageCategory,
    pub patient_count: u64,
    pub percentage: f64,
}

/// Share of each triage category per (time bucket, day period).
///
/// Empty buckets are omitted rather than reported as divisions by zero; the
/// five percentages of any emitted bucket sum to exactly 100.00.
pub fn triage_percentage_distribution(
    store: &dyn WaitTimeStore,
    params: &TriageDistributionParams,
) -> Result<Vec<TriageDistributionRow>, StoreError> {
    let mut groups: BTreeMap<(String, DayPeriod), [u64; 5]> = BTreeMap::new();

    for record in matched_records(store, params.range)? {
        if let Some(hospital_id) = &params.hospital_id
            && record.institution_id != *hospital_id
        {
            continue;
        }
        let bucket = params.granularity.bucket_key(record.recorded_at.date());
        let day_period = DayPeriod::from_time(record.recorded_at);
        let sums = groups.entry((bucket, day_period)).or_default();
        for (slot, category) in TriageCategory::ALL.into_iter().enumerate() {
            sums[slot] += u64::from(record.triage.entry(category).queue_length);
        }
    }

    let mut rows = Vec::new();
    for ((bucket, day_period), sums) in groups {
        let total: u64 = sums.iter().sum();
        if total == 0 {
            continue;
        }
        let shares = percentage_shares(&sums, total);
        for (slot, category) in TriageCategory::ALL.into_iter().enumerate() {
            rows.push(TriageDistributionRow {
                bucket: bucket.clone(),
                day_period,
                category,
                patient_count: sums[slot],
                percentage: shares[slot],
            });
        }
    }
    Ok(rows)
}

/// Splits category counts into percentages summing to exactly 100.00.
///
/// Independent rounding can drift the bucket total away from 100, so each
/// share is first floored to hundredths of a percent and the leftover
/// hundredths go to the slots with the largest discarded remainders (more
/// severe categories first on ties).
fn percentage_shares(sums: &[u64; 5], total: u64) -> [f64; 5] {
    let mut hundredths = [0u64; 5];
    let mut remainders = [0u64; 5];
    for slot in 0..5 {
        let scaled = u128::from(sums[slot]) * 10_000;
        hundredths[slot] = (scaled / u128::from(total)) as u64;
        remainders[slot] = (scaled % u128::from(total)) as u64;
    }
    let mut leftover = 10_000u64.saturating_sub(hundredths.iter().sum());
    let mut order = [0usize, 1, 2, 3, 4];
    order.sort_by(|a, b| remainders[*b].cmp(&remainders[*a]));
    for slot in order {
        if leftover == 0 {
            break;
        }
        if remainders[slot] > 0 {
            hundredths[slot] += 1;
            leftover -= 1;
        }
    }
    hundredths.map(|value| value as f64 / 100.0)
}

// --- pediatric mean wait by region -----------------------------------------

#[derive(Debug, Clone)]
pub struct PediatricRegionParams {
    pub range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PediatricRegionRow {
    /// NUTS-II region (district fallback); `None` for hospitals missing from
    /// the reference data.
    pub region: Option<String>,
    pub mean_wait_minutes: f64,
    pub hospital_count: usize,
}

/// Mean pediatric emergency wait per region, ascending.
///
/// Each hospital first gets its own mean (over the summed category wait
/// times of its records); regions then average those hospital means, so a
/// frequently-reporting hospital does not dominate its region.
pub fn pediatric_mean_wait_by_region(
    store: &dyn WaitTimeStore,
    params: &PediatricRegionParams,
) -> Result<Vec<PediatricRegionRow>, StoreError> {
    let mut per_hospital: BTreeMap<String, (u64, usize)> = BTreeMap::new();
    for record in matched_records(store, params.range)? {
        if !is_pediatric(&record.emergency_type.description) {
            continue;
        }
        let (sum, samples) = per_hospital.entry(record.institution_id.clone()).or_default();
        *sum += record.triage.total_wait_minutes();
        *samples += 1;
    }

    let mut regions: BTreeMap<Option<String>, (f64, usize)> = BTreeMap::new();
    for (institution_id, (sum, samples)) in per_hospital {
        let Some(hospital_mean) = mean(sum as f64, samples) else {
            continue;
        };
        let region = store
            .hospital(&institution_id)?
            .and_then(|hospital| hospital.region().map(str::to_string));
        let (total, count) = regions.entry(region).or_default();
        *total += hospital_mean;
        *count += 1;
    }

    let mut rows: Vec<PediatricRegionRow> = regions
        .into_iter()
        .filter_map(|(region, (total, count))| {
            mean(total, count).map(|value| PediatricRegionRow {
                region,
                mean_wait_minutes: round2(value),
                hospital_count: count,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.mean_wait_minutes
            .total_cmp(&b.mean_wait_minutes)
            .then_with(|| a.region.cmp(&b.region))
    });
    Ok(rows)
}

// --- top hospitals by pediatric wait ---------------------------------------

#[derive(Debug, Clone)]
pub struct TopHospitalsParams {
    pub range: DateRange,
    pub limit: usize,
}

impl TopHospitalsParams {
    pub fn new(range: DateRange) -> Self {
        Self { range, limit: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopHospitalRow {
    pub hospital_id: String,
    pub hospital_name: String,
    pub region: Option<String>,
    pub mean_wait_minutes: f64,
    pub record_count: usize,
}

/// Hospitals ranked ascending by mean count-weighted pediatric wait.
///
/// Per record the wait is weighted by queue length across categories;
/// records with an empty queue carry no wait signal and are skipped. Ties
/// break on hospital id ascending.
pub fn top_hospitals_pediatric(
    store: &dyn WaitTimeStore,
    params: &TopHospitalsParams,
) -> Result<Vec<TopHospitalRow>, StoreError> {
    let mut per_hospital: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in matched_records(store, params.range)? {
        if !is_pediatric(&record.emergency_type.description) {
            continue;
        }
        let Some(weighted) = weighted_wait(&record) else {
            continue;
        };
        let (sum, samples) = per_hospital.entry(record.institution_id.clone()).or_default();
        *sum += weighted;
        *samples += 1;
    }

    let mut rows = Vec::new();
    for (hospital_id, (sum, samples)) in per_hospital {
        let Some(value) = mean(sum, samples) else {
            continue;
        };
        let hospital = store.hospital(&hospital_id)?;
        rows.push(TopHospitalRow {
            hospital_name: store.resolve_hospital_name(&hospital_id)?,
            region: hospital.and_then(|h| h.region().map(str::to_string)),
            hospital_id,
            mean_wait_minutes: round2(value),
            record_count: samples,
        });
    }
    rows.sort_by(|a, b| {
        a.mean_wait_minutes
            .total_cmp(&b.mean_wait_minutes)
            .then_with(|| a.hospital_id.cmp(&b.hospital_id))
    });
    rows.truncate(params.limit);
    Ok(rows)
}

/// Queue-length-weighted mean wait of one record, `None` when no patient is
/// waiting in any category.
fn weighted_wait(record: &EmergencyWaitRecord) -> Option<f64> {
    let mut weighted_sum = 0u64;
    let mut lengths = 0u64;
    for category in TriageCategory::ALL {
        let entry = record.triage.entry(category);
        weighted_sum += u64::from(entry.wait_minutes) * u64::from(entry.queue_length);
        lengths += u64::from(entry.queue_length);
    }
    if lengths == 0 {
        None
    } else {
        Some(weighted_sum as f64 / lengths as f64)
    }
}

// --- time-of-day evolution --------------------------------------------------

#[derive(Debug, Clone)]
pub struct EvolutionParams {
    pub day: NaiveDate,
    pub hospital_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionRow {
    /// 15-minute bucket start, `HH:MM`.
    pub bucket: String,
    pub total_attendance: u64,
    pub mean_wait_minutes: f64,
    pub record_count: usize,
    /// Whether this bucket's mean wait exceeds 1.2x the day's overall mean.
    pub peak: bool,
}

/// Attendance and mean wait per 15-minute bucket across one calendar day.
pub fn time_of_day_evolution(
    store: &dyn WaitTimeStore,
    params: &EvolutionParams,
) -> Result<Vec<EvolutionRow>, StoreError> {
    let mut buckets: BTreeMap<String, (u64, f64, usize)> = BTreeMap::new();
    let mut day_sum = 0.0;
    let mut day_samples = 0usize;

    for record in store.emergency_records()? {
        if record.recorded_at.date() != params.day {
            continue;
        }
        if let Some(hospital_id) = &params.hospital_id
            && record.institution_id != *hospital_id
        {
            continue;
        }
        let minute = record.recorded_at.minute() / 15 * 15;
        let bucket = format!("{:02}:{:02}", record.recorded_at.hour(), minute);
        // Wait signal of one record: the plain mean of its five category
        // wait times.
        let wait = record.triage.total_wait_minutes() as f64 / 5.0;
        day_sum += wait;
        day_samples += 1;

        let (attendance, wait_sum, samples) = buckets.entry(bucket).or_default();
        *attendance += record.triage.total_queue_length();
        *wait_sum += wait;
        *samples += 1;
    }

    let daily_mean = mean(day_sum, day_samples).unwrap_or(0.0);
    let mut rows = Vec::new();
    for (bucket, (attendance, wait_sum, samples)) in buckets {
        let Some(value) = mean(wait_sum, samples) else {
            continue;
        };
        rows.push(EvolutionRow {
            bucket,
            total_attendance: attendance,
            mean_wait_minutes: round2(value),
            record_count: samples,
            peak: value > 1.2 * daily_mean,
        });
    }
    Ok(rows)
}

// --- shared record scan -----------------------------------------------------

fn matched_records(
    store: &dyn WaitTimeStore,
    range: DateRange,
) -> Result<impl Iterator<Item = EmergencyWaitRecord>, StoreError> {
    Ok(store
        .emergency_records()?
        .into_iter()
        .filter(move |record| range.contains(record.recorded_at)))
}
