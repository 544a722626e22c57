//! Canonical fact records produced by the ingestion pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::{ListType, Month, Priority, ServiceType, TargetPopulation, TriageCategory, UnitState};

/// Wait time and queue length for one triage category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageEntry {
    pub wait_minutes: u32,
    pub queue_length: u32,
}

/// Per-category triage breakdown.
///
/// One field per category guarantees the key set is always exactly the five
/// Manchester categories; entries a submission omits stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageBreakdown {
    pub red: TriageEntry,
    pub orange: TriageEntry,
    pub yellow: TriageEntry,
    pub green: TriageEntry,
    pub blue: TriageEntry,
}

impl TriageBreakdown {
    pub fn entry(&self, category: TriageCategory) -> &TriageEntry {
        match category {
            TriageCategory::Red => &self.red,
            TriageCategory::Orange => &self.orange,
            TriageCategory::Yellow => &self.yellow,
            TriageCategory::Green => &self.green,
            TriageCategory::Blue => &self.blue,
        }
    }

    pub fn entry_mut(&mut self, category: TriageCategory) -> &mut TriageEntry {
        match category {
            TriageCategory::Red => &mut self.red,
            TriageCategory::Orange => &mut self.orange,
            TriageCategory::Yellow => &mut self.yellow,
            TriageCategory::Green => &mut self.green,
            TriageCategory::Blue => &mut self.blue,
        }
    }

    /// Total number of waiting patients across all categories.
    pub fn total_queue_length(&self) -> u64 {
        TriageCategory::ALL
            .into_iter()
            .map(|c| u64::from(self.entry(c).queue_length))
            .sum()
    }

    /// Sum of the five category wait times, in minutes.
    pub fn total_wait_minutes(&self) -> u64 {
        TriageCategory::ALL
            .into_iter()
            .map(|c| u64::from(self.entry(c).wait_minutes))
            .sum()
    }
}

/// Code + free-text description of the reporting emergency unit type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyType {
    pub code: Option<String>,
    pub description: String,
}

/// One emergency wait-time submission, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyWaitRecord {
    pub institution_id: String,
    pub recorded_at: NaiveDateTime,
    pub emergency_type: EmergencyType,
    pub state: UnitState,
    /// Waiting-list breakdown; always carries all five categories.
    pub triage: TriageBreakdown,
    /// Observation-list breakdown (patients under observation, no wait
    /// times reported). Kept separate so waiting-list totals stay exact.
    pub observation: TriageBreakdown,
}

/// Reference period of a monthly consultation/surgery report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReferencePeriod {
    pub year: i32,
    pub month: Month,
}

impl ReferencePeriod {
    /// Parse a `YYYY-MM` string. The month is 1-indexed into the fixed
    /// 12-name table; out-of-range months fail.
    pub fn parse(raw: &str) -> Option<ReferencePeriod> {
        let (year, month) = raw.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        let year: i32 = year.parse().ok()?;
        let month = Month::from_number(month.parse().ok()?)?;
        Some(ReferencePeriod { year, month })
    }

    /// `YYYY-MM` bucket key for month-granularity grouping.
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month.number())
    }
}

/// One (specialty x priority) wait-time fact extracted from a monthly
/// consultation or surgery report, after reference resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationSurgeryRecord {
    pub hospital_name: String,
    pub service_key: u32,
    pub avg_wait_days: f64,
    pub period: ReferencePeriod,
    pub patient_count: u32,
}

/// A consultation/surgery fact before its service reference is resolved.
///
/// Carries the raw specialty metadata the resolver needs to allocate or find
/// the service key; the transformer owns records in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionalRecord {
    pub institution_id: String,
    pub specialty: String,
    pub priority: Priority,
    pub service_type: ServiceType,
    pub list_type: ListType,
    pub target_population: Option<TargetPopulation>,
    pub avg_wait_days: f64,
    pub period: ReferencePeriod,
    pub patient_count: u32,
}

impl ProvisionalRecord {
    /// Whether this fact belongs to an oncological waiting list.
    ///
    /// Surgery entries carry an explicit list-type tag; consultation entries
    /// fall back to the specialty description. Computed once here so queries
    /// never re-match free text.
    pub fn oncological(&self) -> bool {
        match self.service_type {
            ServiceType::Surgery => self.list_type.is_oncological(),
            _ => {
                self.list_type.is_oncological()
                    || self.specialty.to_lowercase().contains("oncolog")
            }
        }
    }
}

/// Output of one successful transformation: a document yields either a single
/// emergency record or one or more provisional consultation/surgery facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputRecord {
    Emergency(EmergencyWaitRecord),
    ConsultationSurgery(ProvisionalRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_defaults_to_zero_for_all_categories() {
        let breakdown = TriageBreakdown::default();
        for category in TriageCategory::ALL {
            assert_eq!(breakdown.entry(category).queue_length, 0);
            assert_eq!(breakdown.entry(category).wait_minutes, 0);
        }
        assert_eq!(breakdown.total_queue_length(), 0);
    }

    #[test]
    fn breakdown_totals() {
        let mut breakdown = TriageBreakdown::default();
        breakdown.entry_mut(TriageCategory::Red).queue_length = 2;
        breakdown.entry_mut(TriageCategory::Red).wait_minutes = 10;
        breakdown.entry_mut(TriageCategory::Green).queue_length = 5;
        breakdown.entry_mut(TriageCategory::Green).wait_minutes = 3;
        assert_eq!(breakdown.total_queue_length(), 7);
        assert_eq!(breakdown.total_wait_minutes(), 13);
    }

    #[test]
    fn period_month_key_is_zero_padded() {
        let period = ReferencePeriod {
            year: 2025,
            month: Month::March,
        };
        assert_eq!(period.month_key(), "2025-03");
    }

    #[test]
    fn period_parses_and_rejects() {
        let period = ReferencePeriod::parse("2025-03").unwrap();
        assert_eq!(period.year, 2025);
        assert_eq!(period.month, Month::March);
        assert!(ReferencePeriod::parse("2025-00").is_none());
        assert!(ReferencePeriod::parse("2025-13").is_none());
        assert!(ReferencePeriod::parse("2025-3").is_none());
        assert!(ReferencePeriod::parse("bad").is_none());
    }

    #[test]
    fn oncological_tag_prefers_explicit_list_type() {
        let record = ProvisionalRecord {
            institution_id: "101".to_string(),
            specialty: "Cirurgia Geral".to_string(),
            priority: Priority::Normal,
            service_type: ServiceType::Surgery,
            list_type: ListType::Oncological,
            target_population: None,
            avg_wait_days: 12.0,
            period: ReferencePeriod {
                year: 2025,
                month: Month::January,
            },
            patient_count: 4,
        };
        assert!(record.oncological());
    }
}
