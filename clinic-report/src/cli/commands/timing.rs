//! `timing`: how long after booking appointments get cancelled

use anyhow::Result;
use serde::Serialize;

use super::{ReportContext, to_json};
use crate::cli::OutputFormat;
use crate::render;
use crate::services::aggregation::{
    BucketCount, DateRange, LatencySummary, cancellation_latency, latency_summary,
};

#[derive(Debug, Clone, Serialize)]
pub struct TimingReport {
    pub range: DateRange,
    pub buckets: Vec<BucketCount>,
    pub summary: Option<LatencySummary>,
}

pub fn build(ctx: &ReportContext) -> TimingReport {
    let records = ctx.range.filter(&ctx.dataset.appointments);
    TimingReport {
        range: ctx.range,
        buckets: cancellation_latency(&records),
        summary: latency_summary(&records),
    }
}

pub fn handle(ctx: &ReportContext) -> Result<String> {
    let report = build(ctx);
    match ctx.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Csv => render::csv::to_csv(&["Time Category", "Cancellations"], &bucket_rows(&report)),
        OutputFormat::Text => Ok(render_text(&report)),
    }
}

fn bucket_rows(report: &TimingReport) -> Vec<Vec<String>> {
    report
        .buckets
        .iter()
        .map(|b| vec![b.bucket.to_string(), b.count.to_string()])
        .collect()
}

pub fn render_text(report: &TimingReport) -> String {
    let mut out = String::new();
    render::section(
        &mut out,
        &format!("Time Between Scheduling and Cancellation ({})", report.range),
    );

    let Some(summary) = &report.summary else {
        render::no_data(&mut out, "No valid time differences found in cancellations.");
        return out;
    };

    let total = summary.valid as f64;
    let chart: Vec<(String, f64)> = report
        .buckets
        .iter()
        .map(|b| (b.bucket.to_string(), b.count as f64))
        .collect();
    render::bar_chart(&mut out, &chart, |count| {
        format!(
            "{} ({})",
            render::format_count(count),
            render::format_percent(crate::services::aggregation::percentage(count, total))
        )
    });

    render::section(&mut out, "Summary Statistics");
    render::metric(&mut out, "Average Hours", &format!("{:.1}", summary.mean_hours));
    render::metric(&mut out, "Median Hours", &format!("{:.1}", summary.median_hours));
    render::metric(&mut out, "Max Hours", &format!("{:.1}", summary.max_hours));
    if summary.negative > 0 {
        render::no_data(
            &mut out,
            &format!(
                "{} cancellations were excluded because they precede their booking time.",
                summary.negative
            ),
        );
    }

    out
}
