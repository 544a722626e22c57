//! Read-only aggregation queries over persisted wait-time data.
//!
//! All queries are pure reads against the store and may run concurrently
//! with ingestion; they see whatever is committed at scan time. Means and
//! percentages are rounded to two decimals, and every division is guarded:
//! an empty denominator yields `None` or an omitted row, never NaN.

pub mod emergency;
pub mod params;
pub mod scheduled;

pub use emergency::{
    EvolutionParams, EvolutionRow, MeanWaitingParams, MeanWaitingRow, PediatricRegionParams,
    PediatricRegionRow, TopHospitalRow, TopHospitalsParams, TriageDistributionParams,
    TriageDistributionRow, mean_waiting_by_typology, pediatric_mean_wait_by_region,
    time_of_day_evolution, top_hospitals_pediatric, triage_percentage_distribution,
};
pub use params::{DateRange, DayPeriod, Granularity};
pub use scheduled::{
    DiscrepancyParams, DiscrepancyRow, OncologyDifferenceParams, OncologyDifferenceRow,
    SurgeryWaitParams, SurgeryWaitRow, consultation_surgery_discrepancy,
    oncology_response_difference, scheduled_surgery_wait,
};
