//! Weekly cancellation trends

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::DateRange;
use crate::models::{AppointmentRecord, Category};

/// Cancellations in one ISO week
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyCount {
    pub iso_year: i32,
    pub week: u32,
    /// Monday of the ISO week
    pub week_start: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTrend {
    pub category: Category,
    pub weeks: Vec<WeeklyCount>,
}

fn week_key(record: &AppointmentRecord) -> Option<(i32, u32)> {
    let iso = record.appointment_day()?.iso_week();
    Some((iso.year(), iso.week()))
}

fn into_series(buckets: BTreeMap<(i32, u32), usize>) -> Vec<WeeklyCount> {
    buckets
        .into_iter()
        .filter_map(|((iso_year, week), count)| {
            Some(WeeklyCount {
                iso_year,
                week,
                week_start: NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon)?,
                count,
            })
        })
        .collect()
}

/// Cancellations per ISO week of the appointment date, ascending by week
pub fn weekly_trend(records: &[AppointmentRecord], range: &DateRange) -> Vec<WeeklyCount> {
    let mut buckets = BTreeMap::new();
    for key in records
        .iter()
        .filter(|r| r.is_cancellation() && range.contains(r))
        .filter_map(week_key)
    {
        *buckets.entry(key).or_insert(0) += 1;
    }
    into_series(buckets)
}

/// Same as [`weekly_trend`], split per category (category order)
pub fn weekly_trend_by_category(
    records: &[AppointmentRecord],
    range: &DateRange,
) -> Vec<CategoryTrend> {
    let mut per_category: BTreeMap<Category, BTreeMap<(i32, u32), usize>> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.is_cancellation() && range.contains(r))
    {
        if let Some(key) = week_key(record) {
            *per_category
                .entry(record.category)
                .or_default()
                .entry(key)
                .or_insert(0) += 1;
        }
    }

    per_category
        .into_iter()
        .map(|(category, buckets)| CategoryTrend {
            category,
            weeks: into_series(buckets),
        })
        .collect()
}
