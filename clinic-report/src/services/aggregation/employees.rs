//! Per-employee scheduling and cancellation figures

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::cancellations::{CategoryStats, category_breakdown};
use super::{DateRange, percentage};
use crate::models::{AppointmentRecord, Category};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeCount {
    pub employee: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeCancellations {
    pub employee: String,
    pub cancellations: usize,
    /// Number of distinct procedure categories this employee cancelled
    pub unique_categories: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelerSummary {
    pub employees: usize,
    pub total: usize,
    pub average: f64,
    pub max: usize,
}

/// created_by × category appointment counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapMatrix {
    /// Row labels, sorted by name
    pub employees: Vec<String>,
    /// Column labels, category order, only categories that occur
    pub categories: Vec<Category>,
    /// `counts[row][col]`
    pub counts: Vec<Vec<usize>>,
}

impl HeatmapMatrix {
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn get(&self, employee: &str, category: Category) -> usize {
        let row = self.employees.iter().position(|e| e == employee);
        let col = self.categories.iter().position(|c| *c == category);
        match (row, col) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    /// Each row as a percentage of that employee's appointments
    pub fn row_percentages(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let total: usize = row.iter().sum();
                row.iter()
                    .map(|&count| percentage(count as f64, total as f64))
                    .collect()
            })
            .collect()
    }
}

/// Drill-down for one scheduling employee
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeDetail {
    pub employee: String,
    pub total: usize,
    pub cancellations: usize,
    pub cancellation_rate: f64,
    pub categories: Vec<CategoryStats>,
    pub appointments: Vec<AppointmentRecord>,
}

/// Drill-down for one cancelling employee
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelerDetail {
    pub employee: String,
    /// Newest appointment first
    pub appointments: Vec<AppointmentRecord>,
    /// Raw procedure type → cancellations, largest first
    pub procedure_types: Vec<(String, usize)>,
}

/// Order by count descending, then name ascending
fn ranked(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Appointments booked per employee (`created_by`), busiest first
pub fn employee_scheduling_counts(records: &[AppointmentRecord]) -> Vec<EmployeeCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| !r.created_by.is_empty()) {
        *counts.entry(record.created_by.clone()).or_insert(0) += 1;
    }

    ranked(counts)
        .into_iter()
        .map(|(employee, count)| EmployeeCount { employee, count })
        .collect()
}

/// Cancellations per `canceled_by` within `range`.
///
/// Ranked by count descending; ties are ordered by name.
pub fn employee_cancellation_counts(
    records: &[AppointmentRecord],
    range: &DateRange,
) -> Vec<EmployeeCancellations> {
    let mut grouped: BTreeMap<String, (usize, BTreeSet<Category>)> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.is_cancellation() && range.contains(r))
    {
        let Some(employee) = record.canceled_by.as_ref() else {
            continue;
        };
        let entry = grouped.entry(employee.clone()).or_default();
        entry.0 += 1;
        entry.1.insert(record.category);
    }

    let mut result: Vec<EmployeeCancellations> = grouped
        .into_iter()
        .map(|(employee, (cancellations, categories))| EmployeeCancellations {
            employee,
            cancellations,
            unique_categories: categories.len(),
        })
        .collect();
    result.sort_by(|a, b| {
        b.cancellations
            .cmp(&a.cancellations)
            .then_with(|| a.employee.cmp(&b.employee))
    });
    result
}

pub fn canceler_summary(counts: &[EmployeeCancellations]) -> CancelerSummary {
    let total: usize = counts.iter().map(|c| c.cancellations).sum();
    CancelerSummary {
        employees: counts.len(),
        total,
        average: if counts.is_empty() {
            0.0
        } else {
            total as f64 / counts.len() as f64
        },
        max: counts.iter().map(|c| c.cancellations).max().unwrap_or(0),
    }
}

/// Cross-tabulate appointments by scheduler and category
pub fn category_by_employee_heatmap(records: &[AppointmentRecord]) -> HeatmapMatrix {
    let mut cells: BTreeMap<String, BTreeMap<Category, usize>> = BTreeMap::new();
    let mut present: BTreeSet<Category> = BTreeSet::new();

    for record in records.iter().filter(|r| !r.created_by.is_empty()) {
        present.insert(record.category);
        *cells
            .entry(record.created_by.clone())
            .or_default()
            .entry(record.category)
            .or_insert(0) += 1;
    }

    let categories: Vec<Category> = present.into_iter().collect();
    let mut employees = Vec::with_capacity(cells.len());
    let mut counts = Vec::with_capacity(cells.len());
    for (employee, row) in cells {
        counts.push(
            categories
                .iter()
                .map(|c| row.get(c).copied().unwrap_or(0))
                .collect(),
        );
        employees.push(employee);
    }

    HeatmapMatrix {
        employees,
        categories,
        counts,
    }
}

/// Everything one scheduler booked within `range`
pub fn employee_detail(
    records: &[AppointmentRecord],
    range: &DateRange,
    employee: &str,
) -> EmployeeDetail {
    let appointments: Vec<AppointmentRecord> = records
        .iter()
        .filter(|r| r.created_by == employee && range.contains(r))
        .cloned()
        .collect();

    let total = appointments.len();
    let cancellations = appointments.iter().filter(|r| r.is_cancellation()).count();

    EmployeeDetail {
        employee: employee.to_string(),
        total,
        cancellations,
        cancellation_rate: percentage(cancellations as f64, total as f64),
        categories: category_breakdown(&appointments, &DateRange::unbounded(), None),
        appointments,
    }
}

/// Everything one employee cancelled within `range`
pub fn canceler_detail(
    records: &[AppointmentRecord],
    range: &DateRange,
    employee: &str,
) -> CancelerDetail {
    let mut appointments: Vec<AppointmentRecord> = records
        .iter()
        .filter(|r| {
            r.is_cancellation() && r.canceled_by.as_deref() == Some(employee) && range.contains(r)
        })
        .cloned()
        .collect();
    // None sorts before Some, so reversing puts undated rows last
    appointments.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));

    let mut types: BTreeMap<String, usize> = BTreeMap::new();
    for record in &appointments {
        *types.entry(record.procedure_type.clone()).or_insert(0) += 1;
    }

    CancelerDetail {
        employee: employee.to_string(),
        appointments,
        procedure_types: ranked(types),
    }
}

/// Distinct scheduler names, sorted
pub fn schedulers(records: &[AppointmentRecord]) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .iter()
        .map(|r| r.created_by.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    names.into_iter().map(String::from).collect()
}

/// Distinct canceler names, sorted
pub fn cancelers(records: &[AppointmentRecord]) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .iter()
        .filter(|r| r.is_cancellation())
        .filter_map(|r| r.canceled_by.as_deref())
        .collect();
    names.into_iter().map(String::from).collect()
}
