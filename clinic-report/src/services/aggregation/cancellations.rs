//! Cancellation counts and rates per procedure category

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DateRange, percentage};
use crate::models::{AppointmentRecord, Category};

/// Per-category appointment and cancellation figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub appointments: usize,
    pub cancellations: usize,
    /// Cancellations as a percentage of this category's appointments
    pub cancellation_rate: f64,
    /// Cancellations as a percentage of all procedures performed
    pub share_of_procedures: f64,
}

/// Count cancellations (cancelled or no-show) per category within `range`.
/// Categories without cancellations are absent.
pub fn cancellations_by_category(
    records: &[AppointmentRecord],
    range: &DateRange,
) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.is_cancellation() && range.contains(r))
    {
        *counts.entry(record.category).or_insert(0) += 1;
    }
    counts
}

/// Cancellations as a percentage of all appointments in `range`
pub fn cancellation_rate(records: &[AppointmentRecord], range: &DateRange) -> f64 {
    let (total, cancelled) = records
        .iter()
        .filter(|r| range.contains(r))
        .fold((0usize, 0usize), |(total, cancelled), r| {
            (total + 1, cancelled + usize::from(r.is_cancellation()))
        });
    percentage(cancelled as f64, total as f64)
}

/// Full per-category table for the overview.
///
/// Sorted by share of procedures performed (descending), then category order.
/// Without a procedure total every share is 0 and the order is category order.
pub fn category_breakdown(
    records: &[AppointmentRecord],
    range: &DateRange,
    total_procedures: Option<f64>,
) -> Vec<CategoryStats> {
    let mut grouped: BTreeMap<Category, (usize, usize)> = BTreeMap::new();
    for record in records.iter().filter(|r| range.contains(r)) {
        let entry = grouped.entry(record.category).or_insert((0, 0));
        entry.0 += 1;
        if record.is_cancellation() {
            entry.1 += 1;
        }
    }

    let procedures = total_procedures.unwrap_or(0.0);
    let mut stats: Vec<CategoryStats> = grouped
        .into_iter()
        .map(|(category, (appointments, cancellations))| CategoryStats {
            category,
            appointments,
            cancellations,
            cancellation_rate: percentage(cancellations as f64, appointments as f64),
            share_of_procedures: percentage(cancellations as f64, procedures),
        })
        .collect();

    stats.sort_by(|a, b| {
        b.share_of_procedures
            .total_cmp(&a.share_of_procedures)
            .then(a.category.cmp(&b.category))
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_all_completed_yields_nothing() {
        let records = vec![
            completed("2024-03-01", "CT Head", "alice"),
            completed("2024-03-02", "MRI Brain", "bob"),
        ];
        let range = DateRange::unbounded();
        assert!(cancellations_by_category(&records, &range).is_empty());
        assert_eq!(cancellation_rate(&records, &range), 0.0);
    }

    #[test]
    fn test_counts_cancelled_and_no_show() {
        let records = vec![
            cancelled("2024-03-01", "CT Head", "alice", "bob"),
            no_show("2024-03-02", "CT Chest", "alice"),
            completed("2024-03-03", "CT Abdomen", "alice"),
            cancelled("2024-03-04", "US Pelvis", "alice", "bob"),
        ];
        let counts = cancellations_by_category(&records, &DateRange::unbounded());
        assert_eq!(counts.get(&Category::Ct), Some(&2));
        assert_eq!(counts.get(&Category::Ultrasound), Some(&1));
        assert_eq!(cancellation_rate(&records, &DateRange::unbounded()), 75.0);
    }

    #[test]
    fn test_range_scopes_counts_and_rate() {
        let records = vec![
            cancelled("2024-03-01", "CT Head", "alice", "bob"),
            completed("2024-04-02", "CT Chest", "alice"),
            completed("2024-04-03", "CT Chest", "alice"),
        ];
        let april = DateRange::new(Some(day("2024-04-01")), Some(day("2024-04-30")));
        assert!(cancellations_by_category(&records, &april).is_empty());
        assert_eq!(cancellation_rate(&records, &april), 0.0);

        let empty = DateRange::new(Some(day("2025-01-01")), None);
        assert_eq!(cancellation_rate(&records, &empty), 0.0);
    }

    #[test]
    fn test_rate_is_bounded() {
        let records = vec![
            cancelled("2024-03-01", "CT Head", "alice", "bob"),
            no_show("2024-03-02", "CT Head", "alice"),
        ];
        let rate = cancellation_rate(&records, &DateRange::unbounded());
        assert!((0.0..=100.0).contains(&rate));
        assert_eq!(rate, 100.0);
    }

    #[test]
    fn test_category_breakdown() {
        let records = vec![
            cancelled("2024-03-01", "CT Head", "alice", "bob"),
            completed("2024-03-02", "CT Chest", "alice"),
            cancelled("2024-03-03", "MRI Brain", "alice", "bob"),
            cancelled("2024-03-04", "MRI Knee", "alice", "bob"),
        ];
        let stats = category_breakdown(&records, &DateRange::unbounded(), Some(200.0));
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, Category::Mri);
        assert_eq!(stats[0].cancellations, 2);
        assert_eq!(stats[0].cancellation_rate, 100.0);
        assert_eq!(stats[0].share_of_procedures, 1.0);
        assert_eq!(stats[1].category, Category::Ct);
        assert_eq!(stats[1].cancellation_rate, 50.0);

        let no_total = category_breakdown(&records, &DateRange::unbounded(), None);
        assert_eq!(no_total[0].category, Category::Ct);
        assert_eq!(no_total[0].share_of_procedures, 0.0);
    }
}
