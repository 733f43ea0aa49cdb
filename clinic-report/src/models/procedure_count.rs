//! Procedure volumes from the "Patients Seen Report" sheet

use serde::Serialize;

use super::Category;

/// Per-period counts for one procedure type.
///
/// `total` always equals the sum of `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureCount {
    procedure_type: String,
    counts: Vec<f64>,
    total: f64,
}

impl ProcedureCount {
    pub fn new(procedure_type: impl Into<String>, counts: Vec<f64>) -> Self {
        let total = counts.iter().sum();
        Self {
            procedure_type: procedure_type.into(),
            counts,
            total,
        }
    }

    pub fn procedure_type(&self) -> &str {
        &self.procedure_type
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn category(&self) -> Category {
        Category::classify(&self.procedure_type)
    }
}

/// The normalized count table: period column names plus one row per procedure
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcedureCountTable {
    pub periods: Vec<String>,
    pub rows: Vec<ProcedureCount>,
}

impl ProcedureCountTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_row_sum() {
        let row = ProcedureCount::new("Open MRI Lumbar", vec![10.0, 5.0]);
        assert_eq!(row.total(), 15.0);
        assert_eq!(row.category(), Category::OpenMri);
    }

    #[test]
    fn test_empty_table() {
        assert!(ProcedureCountTable::default().is_empty());
        let table = ProcedureCountTable {
            periods: vec!["Jan".into()],
            rows: vec![ProcedureCount::new("CT Chest", vec![0.0])],
        };
        assert!(!table.is_empty());
        assert_eq!(table.rows[0].counts(), &[0.0]);
    }
}
