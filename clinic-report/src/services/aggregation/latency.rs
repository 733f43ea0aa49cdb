//! Time between booking an appointment and cancelling it

use chrono::TimeDelta;
use serde::{Serialize, Serializer};

use super::median;
use crate::models::AppointmentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LatencyBucket {
    UnderTenMinutes,
    TenMinutesToHour,
    OneToFiveHours,
    FiveToDay,
    OverDay,
}

impl LatencyBucket {
    pub const ALL: [LatencyBucket; 5] = [
        LatencyBucket::UnderTenMinutes,
        LatencyBucket::TenMinutesToHour,
        LatencyBucket::OneToFiveHours,
        LatencyBucket::FiveToDay,
        LatencyBucket::OverDay,
    ];

    /// Place a non-negative delta. Upper bounds are inclusive.
    pub fn for_delta(delta: TimeDelta) -> Option<LatencyBucket> {
        if delta < TimeDelta::zero() {
            return None;
        }
        let bucket = if delta <= TimeDelta::minutes(10) {
            LatencyBucket::UnderTenMinutes
        } else if delta <= TimeDelta::hours(1) {
            LatencyBucket::TenMinutesToHour
        } else if delta <= TimeDelta::hours(5) {
            LatencyBucket::OneToFiveHours
        } else if delta <= TimeDelta::hours(24) {
            LatencyBucket::FiveToDay
        } else {
            LatencyBucket::OverDay
        };
        Some(bucket)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LatencyBucket::UnderTenMinutes => "<10 mins",
            LatencyBucket::TenMinutesToHour => "10m-1h",
            LatencyBucket::OneToFiveHours => "1-5h",
            LatencyBucket::FiveToDay => "5-24h",
            LatencyBucket::OverDay => ">24h",
        }
    }
}

impl std::fmt::Display for LatencyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for LatencyBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub bucket: LatencyBucket,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    /// Cancellations with both timestamps and a non-negative delta
    pub valid: usize,
    /// Cancellations whose cancel time precedes the booking time
    pub negative: usize,
    pub mean_hours: f64,
    pub median_hours: f64,
    pub max_hours: f64,
}

fn valid_deltas(records: &[AppointmentRecord]) -> impl Iterator<Item = TimeDelta> + '_ {
    records
        .iter()
        .filter(|r| r.is_cancellation())
        .filter_map(|r| r.cancellation_delta())
        .filter(|d| *d >= TimeDelta::zero())
}

fn hours(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 3_600_000.0
}

/// Histogram of cancellation latency, every bucket present and in order
pub fn cancellation_latency(records: &[AppointmentRecord]) -> Vec<BucketCount> {
    let mut counts = [0usize; LatencyBucket::ALL.len()];
    for bucket in valid_deltas(records).filter_map(LatencyBucket::for_delta) {
        counts[bucket as usize] += 1;
    }

    LatencyBucket::ALL
        .iter()
        .zip(counts)
        .map(|(&bucket, count)| BucketCount { bucket, count })
        .collect()
}

/// Mean / median / max latency in hours; `None` when nothing is measurable
pub fn latency_summary(records: &[AppointmentRecord]) -> Option<LatencySummary> {
    let mut values: Vec<f64> = valid_deltas(records).map(hours).collect();
    let median_hours = median(&mut values)?;

    let negative = records
        .iter()
        .filter(|r| r.is_cancellation())
        .filter_map(|r| r.cancellation_delta())
        .filter(|d| *d < TimeDelta::zero())
        .count();

    let n = values.len();
    Some(LatencySummary {
        valid: n,
        negative,
        mean_hours: values.iter().sum::<f64>() / n as f64,
        median_hours,
        max_hours: values[n - 1],
    })
}
