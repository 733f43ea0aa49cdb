//! Appointment records from the "Dashboard Cancel No Show" sheet

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use super::Category;

/// Appointment status as exported by the scheduling system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentStatus {
    Cancelled,
    NoShow,
    Completed,
    Other(String),
}

impl AppointmentStatus {
    /// Parse a status cell. Case and punctuation tolerant.
    pub fn parse(raw: &str) -> Self {
        let squashed: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match squashed.as_str() {
            "cancelled" | "canceled" => AppointmentStatus::Cancelled,
            "noshow" => AppointmentStatus::NoShow,
            "completed" | "complete" => AppointmentStatus::Completed,
            _ => AppointmentStatus::Other(raw.trim().to_string()),
        }
    }

    /// Cancelled and no-show appointments both count as cancellations
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No Show",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One normalized appointment row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentRecord {
    pub appointment_date: Option<NaiveDateTime>,
    pub procedure_type: String,
    pub status: AppointmentStatus,
    pub created_by: String,
    pub created_date: Option<NaiveDateTime>,
    pub canceled_by: Option<String>,
    pub canceled_date: Option<NaiveDateTime>,
    pub category: Category,
}

impl AppointmentRecord {
    /// Build a record, deriving the category from the procedure type
    pub fn new(
        appointment_date: Option<NaiveDateTime>,
        procedure_type: impl Into<String>,
        status: AppointmentStatus,
        created_by: impl Into<String>,
        created_date: Option<NaiveDateTime>,
        canceled_by: Option<String>,
        canceled_date: Option<NaiveDateTime>,
    ) -> Self {
        let procedure_type = procedure_type.into();
        let category = Category::classify(&procedure_type);
        Self {
            appointment_date,
            procedure_type,
            status,
            created_by: created_by.into(),
            created_date,
            canceled_by,
            canceled_date,
            category,
        }
    }

    pub fn appointment_day(&self) -> Option<NaiveDate> {
        self.appointment_date.map(|dt| dt.date())
    }

    pub fn is_cancellation(&self) -> bool {
        self.status.is_cancellation()
    }

    /// Time between booking and cancellation, when both timestamps exist
    pub fn cancellation_delta(&self) -> Option<chrono::TimeDelta> {
        match (self.created_date, self.canceled_date) {
            (Some(created), Some(canceled)) => Some(canceled - created),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(AppointmentStatus::parse("Cancelled"), AppointmentStatus::Cancelled);
        assert_eq!(AppointmentStatus::parse(" canceled "), AppointmentStatus::Cancelled);
        assert_eq!(AppointmentStatus::parse("No Show"), AppointmentStatus::NoShow);
        assert_eq!(AppointmentStatus::parse("NO-SHOW"), AppointmentStatus::NoShow);
        assert_eq!(AppointmentStatus::parse("Completed"), AppointmentStatus::Completed);
        assert_eq!(
            AppointmentStatus::parse("Rescheduled"),
            AppointmentStatus::Other("Rescheduled".to_string())
        );
    }

    #[test]
    fn test_is_cancellation() {
        assert!(AppointmentStatus::Cancelled.is_cancellation());
        assert!(AppointmentStatus::NoShow.is_cancellation());
        assert!(!AppointmentStatus::Completed.is_cancellation());
        assert!(!AppointmentStatus::Other("Arrived".into()).is_cancellation());
    }

    #[test]
    fn test_record_derives_category() {
        let record = AppointmentRecord::new(
            None,
            "US Abdomen Complete",
            AppointmentStatus::Completed,
            "alice",
            None,
            None,
            None,
        );
        assert_eq!(record.category, Category::Ultrasound);
        assert!(record.cancellation_delta().is_none());
    }
}
