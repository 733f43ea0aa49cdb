//! `cancelers`: who cancels appointments

use anyhow::Result;
use serde::Serialize;

use super::{ReportContext, resolve_employee, to_json};
use crate::cli::OutputFormat;
use crate::excel::cells::format_datetime;
use crate::render::{self, Align};
use crate::services::aggregation::employees::cancelers;
use crate::services::aggregation::{
    CancelerDetail, CancelerSummary, DateRange, EmployeeCancellations, canceler_detail,
    canceler_summary, employee_cancellation_counts,
};

#[derive(Debug, Clone, Serialize)]
pub struct CancelersReport {
    pub range: DateRange,
    pub employees: Vec<EmployeeCancellations>,
    pub summary: CancelerSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<CancelerDetail>,
}

pub fn build(ctx: &ReportContext, employee: Option<&str>) -> Result<CancelersReport> {
    let records = &ctx.dataset.appointments;
    let employees = employee_cancellation_counts(records, &ctx.range);

    let detail = match employee {
        Some(name) => {
            let in_range = ctx.range.filter(records);
            let name = resolve_employee(name, &cancelers(&in_range), "canceler")?;
            Some(canceler_detail(records, &ctx.range, &name))
        }
        None => None,
    };

    Ok(CancelersReport {
        range: ctx.range,
        summary: canceler_summary(&employees),
        employees,
        detail,
    })
}

pub fn handle(ctx: &ReportContext, employee: Option<&str>) -> Result<String> {
    let report = build(ctx, employee)?;
    match ctx.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Csv => render_csv(&report),
        OutputFormat::Text => Ok(render_text(&report, ctx.config.top_cancelers)),
    }
}

fn render_csv(report: &CancelersReport) -> Result<String> {
    if let Some(detail) = &report.detail {
        return render::csv::to_csv(
            &["Appointment Date", "Type", "Created Date", "Canceled Date"],
            &detail_rows(detail, ""),
        );
    }

    let rows: Vec<Vec<String>> = report
        .employees
        .iter()
        .map(|e| {
            vec![
                e.employee.clone(),
                e.cancellations.to_string(),
                e.unique_categories.to_string(),
            ]
        })
        .collect();
    render::csv::to_csv(&["Employee", "Cancellations", "Unique Procedures"], &rows)
}

fn detail_rows(detail: &CancelerDetail, missing: &str) -> Vec<Vec<String>> {
    let show = |dt: Option<chrono::NaiveDateTime>| {
        dt.map(format_datetime).unwrap_or_else(|| missing.to_string())
    };
    detail
        .appointments
        .iter()
        .map(|a| {
            vec![
                show(a.appointment_date),
                a.procedure_type.clone(),
                show(a.created_date),
                show(a.canceled_date),
            ]
        })
        .collect()
}

pub fn render_text(report: &CancelersReport, top: usize) -> String {
    let mut out = String::new();

    render::section(&mut out, &format!("Cancellations by Employee ({})", report.range));
    if report.employees.is_empty() {
        render::no_data(&mut out, "No cancellations in the selected date range.");
        return out;
    }

    let chart: Vec<(String, f64)> = report
        .employees
        .iter()
        .take(top)
        .map(|e| (e.employee.clone(), e.cancellations as f64))
        .collect();
    render::bar_chart(&mut out, &chart, render::format_count);

    let rows: Vec<Vec<String>> = report
        .employees
        .iter()
        .take(top)
        .map(|e| {
            vec![
                e.employee.clone(),
                e.cancellations.to_string(),
                e.unique_categories.to_string(),
            ]
        })
        .collect();
    render::section(&mut out, "Ranking");
    render::table(
        &mut out,
        &[
            ("Employee", Align::Left),
            ("Cancellations", Align::Right),
            ("Different Procedures", Align::Right),
        ],
        &rows,
    );

    render::section(&mut out, "Summary Statistics");
    render::metric(
        &mut out,
        "Total Cancellations",
        &render::format_count(report.summary.total as f64),
    );
    render::metric(
        &mut out,
        "Average per Employee",
        &format!("{:.1}", report.summary.average),
    );
    render::metric(
        &mut out,
        "Maximum by Single Employee",
        &render::format_count(report.summary.max as f64),
    );

    if let Some(detail) = &report.detail {
        render::section(&mut out, &format!("Cancelled Appointments by {}", detail.employee));
        if detail.appointments.is_empty() {
            render::no_data(
                &mut out,
                &format!(
                    "No cancellations found for {} in the selected date range.",
                    detail.employee
                ),
            );
            return out;
        }
        render::table(
            &mut out,
            &[
                ("Appointment Date", Align::Left),
                ("Type", Align::Left),
                ("Created Date", Align::Left),
                ("Canceled Date", Align::Left),
            ],
            &detail_rows(detail, "N/A"),
        );

        render::section(&mut out, "Cancellations by Procedure Type");
        let chart: Vec<(String, f64)> = detail
            .procedure_types
            .iter()
            .map(|(name, count)| (name.clone(), *count as f64))
            .collect();
        render::bar_chart(&mut out, &chart, render::format_count);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context;
    use super::*;

    #[test]
    fn test_build_ranking() {
        let ctx = context(OutputFormat::Text);
        let report = build(&ctx, None).unwrap();
        let names: Vec<&str> = report.employees.iter().map(|e| e.employee.as_str()).collect();
        assert_eq!(names, vec!["zoe", "adam"]);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.max, 2);
        assert_eq!(report.summary.average, 1.5);
    }

    #[test]
    fn test_detail() {
        let ctx = context(OutputFormat::Text);
        let report = build(&ctx, Some("zoe")).unwrap();
        let detail = report.detail.unwrap();
        assert_eq!(detail.appointments.len(), 2);
        assert_eq!(detail.appointments[0].procedure_type, "MRI Brain");
    }

    #[test]
    fn test_outputs() {
        let out = handle(&context(OutputFormat::Text), Some("adam")).unwrap();
        assert!(out.contains("Cancelled Appointments by adam"));
        assert!(out.contains("Echo Stress Test"));

        let csv = handle(&context(OutputFormat::Csv), None).unwrap();
        assert_eq!(csv, "Employee,Cancellations,Unique Procedures\nzoe,2,2\nadam,1,1\n");

        let json = handle(&context(OutputFormat::Json), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("detail").is_none());
        assert_eq!(value["employees"][0]["employee"], "zoe");
    }
}
