//! Read the "Patients Seen Report" sheet into a procedure count table
//!
//! The sheet is a loose pivot: procedure names in the first populated column,
//! one column per period after that. Blank rows and columns are common, as are
//! stray text cells in the numeric area.

use calamine::Data;

use super::cells::{cell_to_number, cell_to_string, is_empty_cell, is_empty_row};
use crate::models::{ProcedureCount, ProcedureCountTable};

pub const SHEET_NAME: &str = "Patients Seen Report";

/// Parse sheet rows (header first) into a count table
pub fn parse_procedure_count_rows<'a, I>(rows: I) -> ProcedureCountTable
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter().skip_while(|row| is_empty_row(row));

    let Some(header) = rows.next() else {
        return ProcedureCountTable::default();
    };
    let body: Vec<&[Data]> = rows.filter(|row| !is_empty_row(row)).collect();

    let width = body
        .iter()
        .map(|row| row.len())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    // A column survives when any data cell in it is populated
    let kept: Vec<usize> = (0..width)
        .filter(|&col| {
            body.iter()
                .any(|row| row.get(col).is_some_and(|cell| !is_empty_cell(cell)))
        })
        .collect();

    let Some((&name_col, value_cols)) = kept.split_first() else {
        return ProcedureCountTable::default();
    };

    let periods = value_cols
        .iter()
        .map(|&col| {
            let name = header.get(col).map(cell_to_string).unwrap_or_default();
            if name.is_empty() {
                format!("Unnamed: {}", col)
            } else {
                name
            }
        })
        .collect();

    let rows = body
        .iter()
        .map(|row| {
            let name = row.get(name_col).map(cell_to_string).unwrap_or_default();
            let counts = value_cols
                .iter()
                .map(|&col| row.get(col).map(cell_to_number).unwrap_or(0.0))
                .collect();
            ProcedureCount::new(name, counts)
        })
        .collect();

    ProcedureCountTable { periods, rows }
}
