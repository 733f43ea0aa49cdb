//! Procedure volumes from the Patients Seen Report, rolled up per category

use serde::Serialize;

use crate::models::{Category, ProcedureCountTable};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryVolume {
    pub category: Category,
    pub procedures: f64,
}

/// Procedures performed per category, report order, categories with no
/// volume left out
pub fn procedures_by_category(table: &ProcedureCountTable) -> Vec<CategoryVolume> {
    let mut totals = [0.0f64; Category::ALL.len()];
    for row in &table.rows {
        totals[row.category() as usize] += row.total();
    }

    Category::ALL
        .iter()
        .zip(totals)
        .filter(|(_, procedures)| *procedures > 0.0)
        .map(|(&category, procedures)| CategoryVolume {
            category,
            procedures,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcedureCount;

    #[test]
    fn test_rolls_up_in_report_order() {
        let table = ProcedureCountTable {
            periods: vec!["Jan".into(), "Feb".into()],
            rows: vec![
                ProcedureCount::new("MRI Brain", vec![3.0, 1.0]),
                ProcedureCount::new("Open MRI Lumbar", vec![10.0, 5.0]),
                ProcedureCount::new("MRI Knee", vec![2.0, 0.0]),
                ProcedureCount::new("Knee X-Ray", vec![0.0, 0.0]),
            ],
        };

        let volume = procedures_by_category(&table);
        assert_eq!(
            volume,
            vec![
                CategoryVolume { category: Category::OpenMri, procedures: 15.0 },
                CategoryVolume { category: Category::Mri, procedures: 6.0 },
            ]
        );
    }

    #[test]
    fn test_empty_table() {
        assert!(procedures_by_category(&ProcedureCountTable::default()).is_empty());
    }
}
