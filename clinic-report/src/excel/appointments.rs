//! Read the "Dashboard Cancel No Show" sheet into appointment records

use calamine::Data;

use super::cells::{cell_to_datetime, get_cell_string, is_empty_row};
use crate::error::LoadError;
use crate::models::{AppointmentRecord, AppointmentStatus};

pub const SHEET_NAME: &str = "Dashboard Cancel No Show";

/// Required columns with the raw export headers accepted in their place
const COLUMNS: [(&str, &[&str]); 7] = [
    ("Appointment Date", &["Appt Date"]),
    ("Type", &[]),
    ("Status", &[]),
    ("Created By", &[]),
    ("Created Date", &["Created Date/Time"]),
    ("Canceled By", &[]),
    ("Canceled Date", &["Canceled Date/Time"]),
];

/// Resolved column positions
#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    appointment_date: usize,
    procedure_type: usize,
    status: usize,
    created_by: usize,
    created_date: usize,
    canceled_by: usize,
    canceled_date: usize,
}

fn find_column(headers: &[String], name: &str, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .or_else(|| headers.iter().position(|h| aliases.contains(&h.as_str())))
}

fn resolve_columns(headers: &[String]) -> Result<ColumnIndices, LoadError> {
    let mut found = [0usize; 7];
    for (slot, (name, aliases)) in found.iter_mut().zip(COLUMNS.iter()) {
        *slot = find_column(headers, name, aliases).ok_or_else(|| LoadError::MissingColumn {
            sheet: SHEET_NAME.to_string(),
            column: name.to_string(),
        })?;
    }

    Ok(ColumnIndices {
        appointment_date: found[0],
        procedure_type: found[1],
        status: found[2],
        created_by: found[3],
        created_date: found[4],
        canceled_by: found[5],
        canceled_date: found[6],
    })
}

/// Parse sheet rows (header first) into appointment records.
///
/// Date cells that cannot be parsed are kept as missing; only a missing
/// column fails the sheet.
pub fn parse_appointment_rows<'a, I>(rows: I) -> Result<Vec<AppointmentRecord>, LoadError>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter().skip_while(|row| is_empty_row(row));

    let headers: Vec<String> = match rows.next() {
        Some(header) => (0..header.len())
            .map(|i| get_cell_string(header, i))
            .collect(),
        None => {
            return Err(LoadError::MissingColumn {
                sheet: SHEET_NAME.to_string(),
                column: COLUMNS[0].0.to_string(),
            });
        }
    };
    let cols = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut unparsed_dates = 0usize;

    for (row_idx, row) in rows.enumerate() {
        if is_empty_row(row) {
            log::debug!("{}: skipping empty row {}", SHEET_NAME, row_idx + 2);
            continue;
        }

        let mut date_at = |col: usize| {
            let cell = row.get(col).unwrap_or(&Data::Empty);
            let parsed = cell_to_datetime(cell);
            if parsed.is_none() && !super::cells::is_empty_cell(cell) {
                unparsed_dates += 1;
                log::debug!(
                    "{}: row {} column {} has unparseable date {:?}",
                    SHEET_NAME,
                    row_idx + 2,
                    headers.get(col).map(String::as_str).unwrap_or(""),
                    cell
                );
            }
            parsed
        };

        let appointment_date = date_at(cols.appointment_date);
        let created_date = date_at(cols.created_date);
        let canceled_date = date_at(cols.canceled_date);

        let canceled_by = Some(get_cell_string(row, cols.canceled_by)).filter(|s| !s.is_empty());

        records.push(AppointmentRecord::new(
            appointment_date,
            get_cell_string(row, cols.procedure_type),
            AppointmentStatus::parse(&get_cell_string(row, cols.status)),
            get_cell_string(row, cols.created_by),
            created_date,
            canceled_by,
            canceled_date,
        ));
    }

    if unparsed_dates > 0 {
        log::info!(
            "{}: {} date cells could not be parsed and were treated as missing",
            SHEET_NAME,
            unparsed_dates
        );
    }

    Ok(records)
}
