// Aggregation engine
//
// Every operation is deterministic: groupings go through BTreeMap or are
// sorted with an explicit tie-break, so repeated runs over the same workbook
// print identical reports.

pub mod cancellations;
pub mod employees;
pub mod latency;
pub mod other;
pub mod trend;
pub mod volume;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{AppointmentRecord, ProcedureCountTable};

pub use cancellations::{
    CategoryStats, cancellation_rate, cancellations_by_category, category_breakdown,
};
pub use employees::{
    CancelerDetail, CancelerSummary, EmployeeCancellations, EmployeeCount, EmployeeDetail,
    HeatmapMatrix, canceler_detail, canceler_summary, category_by_employee_heatmap,
    employee_cancellation_counts, employee_detail, employee_scheduling_counts,
};
pub use latency::{BucketCount, LatencySummary, cancellation_latency, latency_summary};
pub use other::{ProcedureTypeStats, high_cancellation_procedures, other_procedure_breakdown};
pub use trend::{CategoryTrend, WeeklyCount, weekly_trend, weekly_trend_by_category};
pub use volume::{CategoryVolume, procedures_by_category};

/// Inclusive appointment-date filter. Missing bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Records without an appointment date only pass an unbounded range
    pub fn contains(&self, record: &AppointmentRecord) -> bool {
        match record.appointment_day() {
            Some(day) => self.contains_date(day),
            None => self.is_unbounded(),
        }
    }

    pub fn filter(&self, records: &[AppointmentRecord]) -> Vec<AppointmentRecord> {
        records
            .iter()
            .filter(|r| self.contains(r))
            .cloned()
            .collect()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bound = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "…".to_string());
        if self.is_unbounded() {
            write!(f, "all dates")
        } else {
            write!(f, "{} to {}", bound(self.from), bound(self.to))
        }
    }
}

/// Sum of the Total column of the count table
pub fn total_procedures(table: &ProcedureCountTable) -> f64 {
    table.rows.iter().map(|row| row.total()).sum()
}

/// `part / whole * 100`, or 0 when `whole` is 0
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// Median of `values`, sorting them in place
pub(crate) fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    Some(if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::ProcedureCount;

    #[test]
    fn test_total_procedures() {
        let table = ProcedureCountTable {
            periods: vec!["Jan".into(), "Feb".into()],
            rows: vec![
                ProcedureCount::new("Open MRI Lumbar", vec![10.0, 5.0]),
                ProcedureCount::new("CT Head", vec![0.0, 2.0]),
            ],
        };
        assert_eq!(total_procedures(&table), 17.0);
        assert_eq!(total_procedures(&ProcedureCountTable::default()), 0.0);
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = DateRange::new(Some(day("2024-03-01")), Some(day("2024-03-31")));
        assert!(range.contains_date(day("2024-03-01")));
        assert!(range.contains_date(day("2024-03-31")));
        assert!(!range.contains_date(day("2024-04-01")));

        let open_end = DateRange::new(Some(day("2024-03-01")), None);
        assert!(open_end.contains_date(day("2030-01-01")));
    }

    #[test]
    fn test_undated_records_only_in_unbounded_range() {
        let mut record = completed("2024-03-01", "CT Head", "alice");
        record.appointment_date = None;

        assert!(DateRange::unbounded().contains(&record));
        assert!(!DateRange::new(None, Some(day("2024-12-31"))).contains(&record));
    }

    #[test]
    fn test_percentage_handles_zero() {
        assert_eq!(percentage(3.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
    }
}
