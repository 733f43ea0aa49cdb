//! `employees`: who books what

use anyhow::Result;
use serde::Serialize;

use super::{ReportContext, resolve_employee, to_json};
use crate::cli::OutputFormat;
use crate::excel::cells::format_datetime;
use crate::render::{self, Align};
use crate::services::aggregation::employees::schedulers;
use crate::services::aggregation::{
    DateRange, EmployeeCount, EmployeeDetail, HeatmapMatrix, category_by_employee_heatmap,
    employee_detail, employee_scheduling_counts,
};

#[derive(Debug, Clone, Serialize)]
pub struct EmployeesReport {
    pub range: DateRange,
    pub volume: Vec<EmployeeCount>,
    pub heatmap: HeatmapMatrix,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<EmployeeDetail>,
}

pub fn build(ctx: &ReportContext, employee: Option<&str>) -> Result<EmployeesReport> {
    let records = ctx.range.filter(&ctx.dataset.appointments);

    let detail = match employee {
        Some(name) => {
            let name = resolve_employee(name, &schedulers(&records), "scheduler")?;
            Some(employee_detail(&records, &DateRange::unbounded(), &name))
        }
        None => None,
    };

    Ok(EmployeesReport {
        range: ctx.range,
        volume: employee_scheduling_counts(&records),
        heatmap: category_by_employee_heatmap(&records),
        detail,
    })
}

pub fn handle(ctx: &ReportContext, employee: Option<&str>) -> Result<String> {
    let report = build(ctx, employee)?;
    match ctx.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Csv => render_csv(&report),
        OutputFormat::Text => Ok(render_text(&report, ctx.config.top_employees)),
    }
}

/// CSV is the heatmap in long form, or the detail appointments when requested
fn render_csv(report: &EmployeesReport) -> Result<String> {
    if let Some(detail) = &report.detail {
        let rows: Vec<Vec<String>> = detail
            .appointments
            .iter()
            .map(|a| {
                vec![
                    a.appointment_date.map(format_datetime).unwrap_or_default(),
                    a.category.to_string(),
                    a.procedure_type.clone(),
                    a.status.to_string(),
                ]
            })
            .collect();
        return render::csv::to_csv(
            &["Appointment Date", "Procedure Category", "Type", "Status"],
            &rows,
        );
    }

    let heatmap = &report.heatmap;
    let mut rows = Vec::new();
    for employee in &heatmap.employees {
        for category in &heatmap.categories {
            rows.push(vec![
                employee.clone(),
                category.to_string(),
                heatmap.get(employee, *category).to_string(),
            ]);
        }
    }
    render::csv::to_csv(&["Created By", "Procedure Category", "Count"], &rows)
}

pub fn render_text(report: &EmployeesReport, top: usize) -> String {
    let mut out = String::new();

    render::section(&mut out, &format!("Employee Volume ({})", report.range));
    if report.volume.is_empty() {
        render::no_data(&mut out, "No appointments in the selected date range.");
        return out;
    }
    let chart: Vec<(String, f64)> = report
        .volume
        .iter()
        .take(top)
        .map(|e| (e.employee.clone(), e.count as f64))
        .collect();
    render::bar_chart(&mut out, &chart, render::format_count);

    render::section(&mut out, "Procedure Distribution by Employee (% of employee's work)");
    render_heatmap(&mut out, &report.heatmap);

    if let Some(detail) = &report.detail {
        render_detail(&mut out, detail);
    }

    out
}

fn render_heatmap(out: &mut String, heatmap: &HeatmapMatrix) {
    if heatmap.is_empty() {
        render::no_data(out, "No scheduling data available.");
        return;
    }
    let labels: Vec<String> = heatmap.categories.iter().map(|c| c.to_string()).collect();
    let mut headers: Vec<(&str, Align)> = vec![("Employee", Align::Left)];
    headers.extend(labels.iter().map(|l| (l.as_str(), Align::Right)));

    let rows: Vec<Vec<String>> = heatmap
        .employees
        .iter()
        .zip(heatmap.counts.iter().zip(heatmap.row_percentages()))
        .map(|(employee, (counts, pct))| {
            let mut row = vec![employee.clone()];
            row.extend(
                counts
                    .iter()
                    .zip(pct)
                    .map(|(count, p)| format!("{} ({:.0}%)", count, p)),
            );
            row
        })
        .collect();

    render::table(out, &headers, &rows);
}

fn render_detail(out: &mut String, detail: &EmployeeDetail) {
    render::section(out, &format!("Detailed Analysis for {}", detail.employee));
    render::metric(out, "Total Procedures", &render::format_count(detail.total as f64));
    render::metric(
        out,
        "Cancelled Procedures",
        &render::format_count(detail.cancellations as f64),
    );
    render::metric(
        out,
        "Cancellation Rate",
        &render::format_percent(detail.cancellation_rate),
    );

    render::push_line(out, "");
    let rows: Vec<Vec<String>> = detail
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.to_string(),
                c.appointments.to_string(),
                c.cancellations.to_string(),
                render::format_percent(c.cancellation_rate),
            ]
        })
        .collect();
    render::table(
        out,
        &[
            ("Category", Align::Left),
            ("Total", Align::Right),
            ("Cancelled", Align::Right),
            ("Rate", Align::Right),
        ],
        &rows,
    );

    render::section(out, &format!("Procedures Scheduled by {}", detail.employee));
    let rows: Vec<Vec<String>> = detail
        .appointments
        .iter()
        .map(|a| {
            vec![
                a.appointment_date
                    .map(format_datetime)
                    .unwrap_or_else(|| "N/A".to_string()),
                a.category.to_string(),
                a.status.to_string(),
            ]
        })
        .collect();
    render::table(
        out,
        &[
            ("Appointment Date", Align::Left),
            ("Category", Align::Left),
            ("Status", Align::Left),
        ],
        &rows,
    );
}
