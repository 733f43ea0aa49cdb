//! Drill-down into procedures that fell through to OTHER
//!
//! Unclassified names are where new keywords come from, so the report lists
//! them by raw procedure type.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DateRange, median, percentage};
use crate::models::{AppointmentRecord, Category};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureTypeStats {
    pub procedure_type: String,
    pub total: usize,
    pub cancellations: usize,
    pub cancellation_rate: f64,
}

/// Per raw procedure type within OTHER, most frequent first
pub fn other_procedure_breakdown(
    records: &[AppointmentRecord],
    range: &DateRange,
) -> Vec<ProcedureTypeStats> {
    let mut grouped: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.category == Category::Other && range.contains(r))
    {
        let entry = grouped.entry(record.procedure_type.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if record.is_cancellation() {
            entry.1 += 1;
        }
    }

    let mut stats: Vec<ProcedureTypeStats> = grouped
        .into_iter()
        .map(|(procedure_type, (total, cancellations))| ProcedureTypeStats {
            procedure_type: procedure_type.to_string(),
            total,
            cancellations,
            cancellation_rate: percentage(cancellations as f64, total as f64),
        })
        .collect();
    stats.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.procedure_type.cmp(&b.procedure_type))
    });
    stats
}

/// Rows with at least `min_total` appointments whose rate is strictly above
/// the median rate of all rows, highest rate first
pub fn high_cancellation_procedures(
    rows: &[ProcedureTypeStats],
    min_total: usize,
) -> Vec<ProcedureTypeStats> {
    let mut rates: Vec<f64> = rows.iter().map(|r| r.cancellation_rate).collect();
    let Some(median_rate) = median(&mut rates) else {
        return Vec::new();
    };

    let mut high: Vec<ProcedureTypeStats> = rows
        .iter()
        .filter(|r| r.total >= min_total && r.cancellation_rate > median_rate)
        .cloned()
        .collect();
    high.sort_by(|a, b| {
        b.cancellation_rate
            .total_cmp(&a.cancellation_rate)
            .then_with(|| a.procedure_type.cmp(&b.procedure_type))
    });
    high
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    fn row(name: &str, total: usize, cancellations: usize) -> ProcedureTypeStats {
        ProcedureTypeStats {
            procedure_type: name.to_string(),
            total,
            cancellations,
            cancellation_rate: percentage(cancellations as f64, total as f64),
        }
    }

    #[test]
    fn test_other_breakdown_only_counts_other() {
        let records = vec![
            completed("2024-03-01", "Echo Stress Test", "alice"),
            cancelled("2024-03-02", "Echo Stress Test", "alice", "bob"),
            completed("2024-03-03", "Holter Monitor", "alice"),
            completed("2024-03-03", "CT Head", "alice"),
        ];
        let stats = other_procedure_breakdown(&records, &DateRange::unbounded());
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].procedure_type, "Echo Stress Test");
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[0].cancellation_rate, 50.0);
        assert_eq!(stats[1].procedure_type, "Holter Monitor");
    }

    #[test]
    fn test_high_cancellation_filter() {
        let rows = vec![
            row("A", 10, 8),
            row("B", 10, 1),
            row("C", 3, 3),
            row("D", 6, 3),
        ];
        // rates 80, 10, 100, 50 -> median 65
        let high = high_cancellation_procedures(&rows, 5);
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].procedure_type, "A");

        assert!(high_cancellation_procedures(&[], 5).is_empty());
    }
}
