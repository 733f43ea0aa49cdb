//! `export`: every report section written to one Excel workbook

use std::path::Path;

use anyhow::Result;
use colored::*;

use super::ReportContext;
use crate::excel::{self, report::ReportBundle};
use crate::services::aggregation::{
    cancellation_latency, category_by_employee_heatmap, employee_cancellation_counts,
    employee_scheduling_counts, latency_summary,
};

pub fn build(ctx: &ReportContext) -> ReportBundle {
    let overview = super::overview::build(ctx);
    let in_range = ctx.range.filter(&ctx.dataset.appointments);

    ReportBundle {
        generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        source: ctx.config.data_path.display().to_string(),
        range: ctx.range,
        total_procedures: overview.total_procedures,
        appointments: overview.appointments,
        total_cancellations: overview.total_cancellations,
        cancellation_rate: overview.cancellation_rate,
        categories: overview.categories,
        weekly_trend: overview.weekly_trend,
        volume: employee_scheduling_counts(&in_range),
        heatmap: category_by_employee_heatmap(&in_range),
        cancelers: employee_cancellation_counts(&ctx.dataset.appointments, &ctx.range),
        latency: cancellation_latency(&in_range),
        latency_summary: latency_summary(&in_range),
        other_procedures: overview.other_procedures,
        procedure_counts: ctx.dataset.procedure_counts().cloned(),
    }
}

pub fn handle(ctx: &ReportContext, output: &Path) -> Result<String> {
    let bundle = build(ctx);
    excel::export_report_to_excel(&bundle, output)?;
    Ok(format!(
        "Report exported to: {}\n",
        output.display().to_string().bright_green()
    ))
}

/// In-memory variant used by tests
#[cfg(test)]
fn export_to_buffer(ctx: &ReportContext) -> Result<Vec<u8>> {
    use crate::excel::report::build_report_workbook;

    let mut workbook = build_report_workbook(&build(ctx))?;
    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context;
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn test_bundle_matches_overview() {
        let ctx = context(OutputFormat::Text);
        let bundle = build(&ctx);
        assert_eq!(bundle.total_procedures, Some(100.0));
        assert_eq!(bundle.total_cancellations, 4);
        assert_eq!(bundle.cancelers.len(), 2);
        assert_eq!(bundle.volume.len(), 3);
        assert_eq!(bundle.latency.len(), 5);
        assert_eq!(bundle.procedure_counts.map(|t| t.rows.len()), Some(2));
    }

    #[test]
    fn test_export_to_buffer() {
        let ctx = context(OutputFormat::Text);
        let bytes = export_to_buffer(&ctx).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_export_to_file() {
        let ctx = context(OutputFormat::Text);
        let path = std::env::temp_dir().join(format!("{}.xlsx", uuid::Uuid::new_v4()));
        let message = handle(&ctx, &path).unwrap();
        let exists = path.is_file();
        let _ = std::fs::remove_file(&path);

        assert!(exists);
        assert!(message.contains("Report exported to"));
    }
}
