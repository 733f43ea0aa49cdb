//! Excel report export
//!
//! Writes every report section to its own sheet:
//! - Summary: headline metrics
//! - Categories: per-category cancellations and rates
//! - Weekly Trend: cancellations per ISO week
//! - Employees: appointments booked per employee
//! - Heatmap: employee × category counts
//! - Cancelers: cancellations per cancelling employee
//! - Timing: cancellation latency buckets
//! - Other Procedures: raw procedure types that classified as OTHER
//! - Procedures Performed: the Patients Seen Report as loaded

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::*;

use crate::models::ProcedureCountTable;
use crate::services::aggregation::{
    BucketCount, CategoryStats, DateRange, EmployeeCancellations, EmployeeCount, HeatmapMatrix,
    LatencySummary, ProcedureTypeStats, WeeklyCount,
};

/// All sections of the exported workbook
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub generated: String,
    pub source: String,
    pub range: DateRange,
    pub total_procedures: Option<f64>,
    pub appointments: usize,
    pub total_cancellations: usize,
    pub cancellation_rate: f64,
    pub categories: Vec<CategoryStats>,
    pub weekly_trend: Vec<WeeklyCount>,
    pub volume: Vec<EmployeeCount>,
    pub heatmap: HeatmapMatrix,
    pub cancelers: Vec<EmployeeCancellations>,
    pub latency: Vec<BucketCount>,
    pub latency_summary: Option<LatencySummary>,
    pub other_procedures: Vec<ProcedureTypeStats>,
    /// `None` when the Patients Seen Report could not be read
    pub procedure_counts: Option<ProcedureCountTable>,
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
}

fn percent_format() -> Format {
    Format::new().set_num_format("0.0\"%\"")
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let format = header_format();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &format)?;
    }
    Ok(())
}

/// Build the workbook in memory
pub fn build_report_workbook(report: &ReportBundle) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    create_summary_sheet(&mut workbook, report)?;
    create_categories_sheet(&mut workbook, report)?;
    create_weekly_sheet(&mut workbook, report)?;
    create_employees_sheet(&mut workbook, report)?;
    create_heatmap_sheet(&mut workbook, report)?;
    create_cancelers_sheet(&mut workbook, report)?;
    create_timing_sheet(&mut workbook, report)?;
    create_other_sheet(&mut workbook, report)?;
    create_procedures_sheet(&mut workbook, report)?;

    Ok(workbook)
}

/// Export the report to an .xlsx file
pub fn export_report_to_excel(report: &ReportBundle, file_path: &Path) -> Result<()> {
    let mut workbook = build_report_workbook(report)?;
    workbook
        .save(file_path)
        .with_context(|| format!("Failed to save Excel file: {}", file_path.display()))?;

    log::info!("Report exported to: {}", file_path.display());
    Ok(())
}

fn create_summary_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;

    let title_format = Format::new().set_bold().set_font_size(16);
    let bold_format = Format::new().set_bold();

    sheet.write_string_with_format(0, 0, "Diagnostic Clinic Report", &title_format)?;
    sheet.write_string(1, 0, format!("Generated: {}", report.generated))?;
    sheet.write_string(2, 0, format!("Source: {}", report.source))?;
    sheet.write_string(3, 0, format!("Date range: {}", report.range))?;

    let mut row = 5u32;
    sheet.write_string_with_format(row, 0, "Metric", &bold_format)?;
    sheet.write_string_with_format(row, 1, "Value", &bold_format)?;
    row += 1;

    sheet.write_string(row, 0, "Total Procedures Performed")?;
    match report.total_procedures {
        Some(total) => sheet.write_number(row, 1, total)?,
        None => sheet.write_string(row, 1, "unavailable")?,
    };
    row += 1;

    sheet.write_string(row, 0, "Appointments")?;
    sheet.write_number(row, 1, report.appointments as f64)?;
    row += 1;

    sheet.write_string(row, 0, "Total Cancellations")?;
    sheet.write_number(row, 1, report.total_cancellations as f64)?;
    row += 1;

    sheet.write_string(row, 0, "Cancellation Rate")?;
    sheet.write_number_with_format(row, 1, report.cancellation_rate, &percent_format())?;

    sheet.autofit();
    Ok(())
}

fn create_categories_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Categories")?;
    write_headers(
        sheet,
        &[
            "Procedure Category",
            "Appointments",
            "Cancelled",
            "Cancellation Rate",
            "Share of Procedures",
        ],
    )?;

    let pct = percent_format();
    for (i, stats) in report.categories.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, stats.category.label())?;
        sheet.write_number(row, 1, stats.appointments as f64)?;
        sheet.write_number(row, 2, stats.cancellations as f64)?;
        sheet.write_number_with_format(row, 3, stats.cancellation_rate, &pct)?;
        sheet.write_number_with_format(row, 4, stats.share_of_procedures, &pct)?;
    }

    sheet.autofit();
    Ok(())
}

fn create_weekly_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Weekly Trend")?;
    write_headers(sheet, &["ISO Year", "Week", "Week Starting", "Cancellations"])?;

    for (i, week) in report.weekly_trend.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, week.iso_year as f64)?;
        sheet.write_number(row, 1, week.week as f64)?;
        sheet.write_string(row, 2, week.week_start.to_string())?;
        sheet.write_number(row, 3, week.count as f64)?;
    }

    sheet.autofit();
    Ok(())
}

fn create_employees_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Employees")?;
    write_headers(sheet, &["Created By", "Appointments"])?;

    for (i, employee) in report.volume.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &employee.employee)?;
        sheet.write_number(row, 1, employee.count as f64)?;
    }

    sheet.autofit();
    Ok(())
}

fn create_heatmap_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Heatmap")?;

    let heatmap = &report.heatmap;
    let mut headers = vec!["Employee"];
    headers.extend(heatmap.categories.iter().map(|c| c.label()));
    write_headers(sheet, &headers)?;

    for (i, (employee, counts)) in heatmap.employees.iter().zip(&heatmap.counts).enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, employee)?;
        for (j, count) in counts.iter().enumerate() {
            sheet.write_number(row, j as u16 + 1, *count as f64)?;
        }
    }

    sheet.autofit();
    Ok(())
}

fn create_cancelers_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Cancelers")?;
    write_headers(sheet, &["Employee", "Cancellations", "Unique Procedures"])?;

    for (i, employee) in report.cancelers.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &employee.employee)?;
        sheet.write_number(row, 1, employee.cancellations as f64)?;
        sheet.write_number(row, 2, employee.unique_categories as f64)?;
    }

    sheet.autofit();
    Ok(())
}

fn create_timing_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Timing")?;
    write_headers(sheet, &["Time Category", "Cancellations"])?;

    let mut row = 1u32;
    for bucket in &report.latency {
        sheet.write_string(row, 0, bucket.bucket.label())?;
        sheet.write_number(row, 1, bucket.count as f64)?;
        row += 1;
    }

    if let Some(summary) = &report.latency_summary {
        row += 1;
        let bold_format = Format::new().set_bold();
        sheet.write_string_with_format(row, 0, "Summary Statistics", &bold_format)?;
        row += 1;
        for (label, value) in [
            ("Average Hours", summary.mean_hours),
            ("Median Hours", summary.median_hours),
            ("Max Hours", summary.max_hours),
        ] {
            sheet.write_string(row, 0, label)?;
            sheet.write_number(row, 1, value)?;
            row += 1;
        }
    }

    sheet.autofit();
    Ok(())
}

fn create_other_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Other Procedures")?;
    write_headers(
        sheet,
        &["Procedure Type", "Total", "Cancelled", "Cancellation Rate"],
    )?;

    if report.other_procedures.is_empty() {
        sheet.write_string(1, 0, "No procedures categorized as OTHER")?;
    }

    let pct = percent_format();
    for (i, stats) in report.other_procedures.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &stats.procedure_type)?;
        sheet.write_number(row, 1, stats.total as f64)?;
        sheet.write_number(row, 2, stats.cancellations as f64)?;
        sheet.write_number_with_format(row, 3, stats.cancellation_rate, &pct)?;
    }

    sheet.autofit();
    Ok(())
}

fn create_procedures_sheet(workbook: &mut Workbook, report: &ReportBundle) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Procedures Performed")?;

    let table = match &report.procedure_counts {
        Some(table) if !table.is_empty() => table,
        Some(_) => {
            sheet.write_string(0, 0, "Patients Seen Report has no procedure rows")?;
            return Ok(());
        }
        None => {
            sheet.write_string(0, 0, "Patients Seen Report unavailable")?;
            return Ok(());
        }
    };

    let mut headers = vec!["Procedure Type", "Procedure Category"];
    headers.extend(table.periods.iter().map(String::as_str));
    headers.push("Total");
    write_headers(sheet, &headers)?;

    let total_col = table.periods.len() as u16 + 2;
    for (i, count) in table.rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, count.procedure_type())?;
        sheet.write_string(row, 1, count.category().label())?;
        for (j, value) in count.counts().iter().enumerate() {
            sheet.write_number(row, j as u16 + 2, *value)?;
        }
        sheet.write_number(row, total_col, count.total())?;
    }

    sheet.autofit();
    Ok(())
}
