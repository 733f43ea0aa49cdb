//! `overview`: headline metrics and cancellations per procedure category

use anyhow::Result;
use serde::Serialize;

use super::{ReportContext, to_json};
use crate::cli::OutputFormat;
use crate::models::Category;
use crate::render::{self, Align};
use crate::services::aggregation::{
    CategoryStats, CategoryTrend, CategoryVolume, DateRange, ProcedureTypeStats, WeeklyCount,
    cancellation_rate, cancellations_by_category, category_breakdown,
    high_cancellation_procedures, other_procedure_breakdown, procedures_by_category, weekly_trend,
    weekly_trend_by_category,
};

#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub range: DateRange,
    /// `None` when the Patients Seen Report could not be read
    pub total_procedures: Option<f64>,
    /// Patients Seen Report totals per category; empty when unavailable
    pub procedure_volume: Vec<CategoryVolume>,
    pub appointments: usize,
    pub total_cancellations: usize,
    pub cancellation_rate: f64,
    pub categories: Vec<CategoryStats>,
    pub weekly_trend: Vec<WeeklyCount>,
    pub weekly_trend_by_category: Vec<CategoryTrend>,
    pub other_procedures: Vec<ProcedureTypeStats>,
    pub high_cancellation_procedures: Vec<ProcedureTypeStats>,
}

pub fn build(ctx: &ReportContext) -> OverviewReport {
    let records = &ctx.dataset.appointments;
    let range = &ctx.range;
    let total_procedures = ctx.total_procedures();

    let other_procedures = other_procedure_breakdown(records, range);
    let high = high_cancellation_procedures(
        &other_procedures,
        ctx.config.high_rate_min_appointments,
    );

    OverviewReport {
        range: *range,
        total_procedures,
        procedure_volume: ctx
            .dataset
            .procedure_counts()
            .map(procedures_by_category)
            .unwrap_or_default(),
        appointments: records.iter().filter(|r| range.contains(r)).count(),
        total_cancellations: cancellations_by_category(records, range).values().sum(),
        cancellation_rate: cancellation_rate(records, range),
        categories: category_breakdown(records, range, total_procedures),
        weekly_trend: weekly_trend(records, range),
        weekly_trend_by_category: weekly_trend_by_category(records, range),
        other_procedures,
        high_cancellation_procedures: high,
    }
}

pub fn handle(ctx: &ReportContext) -> Result<String> {
    let report = build(ctx);
    match ctx.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Csv => render_csv(&report),
        OutputFormat::Text => Ok(render_text(&report, ctx.config.top_other_procedures)),
    }
}

fn category_rows(report: &OverviewReport) -> Vec<Vec<String>> {
    report
        .categories
        .iter()
        .map(|s| {
            vec![
                s.category.to_string(),
                s.appointments.to_string(),
                s.cancellations.to_string(),
                render::format_percent(s.cancellation_rate),
                render::format_percent(s.share_of_procedures),
            ]
        })
        .collect()
}

fn render_csv(report: &OverviewReport) -> Result<String> {
    render::csv::to_csv(
        &[
            "Procedure Category",
            "Appointments",
            "Cancelled",
            "Cancellation Rate",
            "Share of Procedures",
        ],
        &category_rows(report),
    )
}

pub fn render_text(report: &OverviewReport, top_other: usize) -> String {
    let mut out = String::new();

    render::section(&mut out, &format!("Cancellation Overview ({})", report.range));
    let total = report
        .total_procedures
        .map(render::format_count)
        .unwrap_or_else(|| "unavailable".to_string());
    render::metric(&mut out, "Total Procedures Performed", &total);
    render::metric(&mut out, "Appointments", &report.appointments.to_string());
    render::metric(
        &mut out,
        "Total Cancellations",
        &render::format_count(report.total_cancellations as f64),
    );
    render::metric(
        &mut out,
        "Cancellation Rate",
        &render::format_percent(report.cancellation_rate),
    );

    if report.appointments == 0 {
        render::no_data(&mut out, "No appointments in the selected date range.");
        return out;
    }

    render::section(&mut out, "Cancellations by Procedure Type");
    if report.total_procedures.is_some() {
        let chart: Vec<(String, f64)> = report
            .categories
            .iter()
            .filter(|s| s.category != Category::Other)
            .map(|s| (s.category.to_string(), s.share_of_procedures))
            .collect();
        render::bar_chart(&mut out, &chart, render::format_percent);
    } else {
        render::no_data(
            &mut out,
            "Patients Seen Report unavailable; share of procedures not computed.",
        );
    }

    render::section(&mut out, "Detailed Metrics");
    render::table(
        &mut out,
        &[
            ("Category", Align::Left),
            ("Appointments", Align::Right),
            ("Cancelled", Align::Right),
            ("Rate", Align::Right),
            ("Share", Align::Right),
        ],
        &category_rows(report),
    );

    render::section(&mut out, "Procedures Performed by Category");
    if report.procedure_volume.is_empty() {
        render::no_data(&mut out, "No procedure volumes available.");
    } else {
        let rows: Vec<Vec<String>> = report
            .procedure_volume
            .iter()
            .map(|v| vec![v.category.to_string(), render::format_count(v.procedures)])
            .collect();
        render::table(
            &mut out,
            &[("Category", Align::Left), ("Procedures", Align::Right)],
            &rows,
        );
    }

    render::section(&mut out, "Weekly Cancellations");
    if report.weekly_trend.is_empty() {
        render::no_data(&mut out, "No cancellations in the selected date range.");
    } else {
        let chart: Vec<(String, f64)> = report
            .weekly_trend
            .iter()
            .map(|w| {
                (
                    format!("{}-W{:02} ({})", w.iso_year, w.week, w.week_start),
                    w.count as f64,
                )
            })
            .collect();
        render::bar_chart(&mut out, &chart, render::format_count);
    }

    render::section(&mut out, "OTHER Category Analysis");
    if report.other_procedures.is_empty() {
        render::no_data(
            &mut out,
            "No procedures categorized as OTHER in the selected date range.",
        );
        return out;
    }
    let other_rows: Vec<Vec<String>> = report
        .other_procedures
        .iter()
        .take(top_other)
        .map(procedure_row)
        .collect();
    render::table(&mut out, &procedure_headers(), &other_rows);
    render::push_line(
        &mut out,
        &format!(
            "  Total unique procedure types in OTHER category: {}",
            report.other_procedures.len()
        ),
    );

    render::section(&mut out, "High Cancellation Rate Procedures");
    if report.high_cancellation_procedures.is_empty() {
        render::no_data(
            &mut out,
            "No procedures meeting the high cancellation rate criteria found.",
        );
    } else {
        let rows: Vec<Vec<String>> = report
            .high_cancellation_procedures
            .iter()
            .map(procedure_row)
            .collect();
        render::table(&mut out, &procedure_headers(), &rows);
    }

    out
}

fn procedure_headers() -> [(&'static str, Align); 4] {
    [
        ("Procedure Type", Align::Left),
        ("Total", Align::Right),
        ("Cancelled", Align::Right),
        ("Rate", Align::Right),
    ]
}

fn procedure_row(stats: &ProcedureTypeStats) -> Vec<String> {
    vec![
        stats.procedure_type.clone(),
        stats.total.to_string(),
        stats.cancellations.to_string(),
        render::format_percent(stats.cancellation_rate),
    ]
}
