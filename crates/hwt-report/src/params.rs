//! Shared query parameter types and numeric helpers.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use hwt_model::ReferencePeriod;

/// Inclusive calendar-day range every query filters on.
///
/// Monthly consultation/surgery facts are anchored on the first day of their
/// reference period for range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = at.date();
        day >= self.start && day <= self.end
    }

    pub fn contains_period(&self, period: ReferencePeriod) -> bool {
        period_anchor(period).is_some_and(|day| day >= self.start && day <= self.end)
    }
}

/// First calendar day of a reference period.
pub(crate) fn period_anchor(period: ReferencePeriod) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(period.year, period.month.number(), 1)
}

/// Time-bucket width for the bucketed queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// Bucket key for a calendar day: `YYYY-MM-DD`, ISO `YYYY-Www`, or
    /// `YYYY-MM`.
    pub fn bucket_key(&self, day: NaiveDate) -> String {
        match self {
            Granularity::Day => day.format("%Y-%m-%d").to_string(),
            Granularity::Week => {
                let week = day.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Granularity::Month => day.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            other => Err(format!("unknown granularity `{other}`")),
        }
    }
}

/// Coarse day-period split used by the triage distribution query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Night,
}

impl DayPeriod {
    /// Morning is [08:00, 16:00), afternoon [16:00, 24:00), night the rest.
    pub fn from_time(at: NaiveDateTime) -> Self {
        match at.hour() {
            8..=15 => DayPeriod::Morning,
            16..=23 => DayPeriod::Afternoon,
            _ => DayPeriod::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Night => "night",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Round to two decimal places, the precision of every reported figure.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Guarded mean: `None` for an empty sample instead of NaN.
pub(crate) fn mean(sum: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn day_period_boundaries() {
        assert_eq!(DayPeriod::from_time(at(7, 59)), DayPeriod::Night);
        assert_eq!(DayPeriod::from_time(at(8, 0)), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_time(at(15, 59)), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_time(at(16, 0)), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_time(at(23, 59)), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_time(at(0, 0)), DayPeriod::Night);
    }

    #[test]
    fn bucket_keys_per_granularity() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(Granularity::Day.bucket_key(day), "2025-01-01");
        // 2025-01-01 falls in ISO week 2025-W01.
        assert_eq!(Granularity::Week.bucket_key(day), "2025-W01");
        assert_eq!(Granularity::Month.bucket_key(day), "2025-01");

        // ISO week years differ from calendar years at the boundary.
        let new_year = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(Granularity::Week.bucket_key(new_year), "2022-W52");
    }

    #[test]
    fn granularity_round_trips_from_str() {
        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            assert_eq!(
                granularity.as_str().parse::<Granularity>().unwrap(),
                granularity
            );
        }
        assert!("hourly".parse::<Granularity>().is_err());
    }

    #[test]
    fn rounding_and_guarded_mean() {
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(1.2345), 1.23);
        assert_eq!(round2(7.0), 7.0);
        assert_eq!(mean(10.0, 4), Some(2.5));
        assert_eq!(mean(0.0, 0), None);
    }
}
