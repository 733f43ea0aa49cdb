//! Excel import of the clinic export and Excel export of the finished report
//!
//! The workbook carries two sheets:
//! - "Dashboard Cancel No Show": one row per appointment (required)
//! - "Patients Seen Report": procedure volumes per period (optional section)

pub mod appointments;
pub mod cells;
pub mod procedure_counts;
pub mod report;

use std::io::{Read, Seek};
use std::path::Path;

use calamine::{Data, Range, Reader, Xlsx, open_workbook};

use crate::error::LoadError;
use crate::models::{AppointmentRecord, ProcedureCountTable};

pub use appointments::parse_appointment_rows;
pub use procedure_counts::parse_procedure_count_rows;
pub use report::export_report_to_excel;

/// Everything read from one workbook
#[derive(Debug)]
pub struct Dataset {
    pub appointments: Vec<AppointmentRecord>,
    /// A broken count sheet only disables the sections that need it
    pub procedure_counts: Result<ProcedureCountTable, LoadError>,
}

impl Dataset {
    pub fn procedure_counts(&self) -> Option<&ProcedureCountTable> {
        self.procedure_counts.as_ref().ok()
    }
}

/// Load the workbook at `path`
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Opened workbook {}", path.display());

    load_from_workbook(&mut workbook)
}

/// Load from an already opened workbook (any seekable source)
pub fn load_from_workbook<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
) -> Result<Dataset, LoadError> {
    let range = read_sheet(workbook, appointments::SHEET_NAME)?;
    let appointments = parse_appointment_rows(range.rows())?;
    log::info!(
        "Loaded {} appointments from '{}'",
        appointments.len(),
        appointments::SHEET_NAME
    );

    let procedure_counts = read_sheet(workbook, procedure_counts::SHEET_NAME)
        .map(|range| parse_procedure_count_rows(range.rows()));
    match &procedure_counts {
        Ok(table) => log::info!(
            "Loaded {} procedure rows across {} periods from '{}'",
            table.rows.len(),
            table.periods.len(),
            procedure_counts::SHEET_NAME
        ),
        Err(e) => log::warn!("Could not process Patients Seen Report: {}", e),
    }

    Ok(Dataset {
        appointments,
        procedure_counts,
    })
}

fn read_sheet<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    sheet_name: &str,
) -> Result<Range<Data>, LoadError> {
    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(LoadError::MissingSheet(sheet_name.to_string()));
    }

    workbook
        .worksheet_range(sheet_name)
        .map_err(|source| LoadError::Sheet {
            sheet: sheet_name.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use rust_xlsxwriter::Workbook;

    const APPOINTMENT_HEADERS: [&str; 7] = [
        "Appt Date",
        "Type",
        "Status",
        "Created By",
        "Created Date/Time",
        "Canceled By",
        "Canceled Date/Time",
    ];

    fn build_workbook(with_counts: bool) -> Vec<u8> {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(appointments::SHEET_NAME).unwrap();
        for (col, header) in APPOINTMENT_HEADERS.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        let rows = [
            ["2024-03-04 09:00", "MRI Brain", "Cancelled", "alice", "2024-03-01 08:00", "bob", "2024-03-01 08:05"],
            ["2024-03-05 10:00", "Knee X-Ray", "Completed", "alice", "2024-03-02 08:00", "", ""],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32 + 1, c as u16, *value).unwrap();
                }
            }
        }

        if with_counts {
            let counts = workbook.add_worksheet();
            counts.set_name(procedure_counts::SHEET_NAME).unwrap();
            counts.write_string(0, 0, "Procedure Type").unwrap();
            counts.write_string(0, 1, "Jan").unwrap();
            counts.write_string(0, 2, "Feb").unwrap();
            counts.write_string(1, 0, "Open MRI Lumbar").unwrap();
            counts.write_number(1, 1, 10.0).unwrap();
            counts.write_number(1, 2, 5.0).unwrap();
        }

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_load_from_buffer() {
        let bytes = build_workbook(true);
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        let dataset = load_from_workbook(&mut workbook).unwrap();

        assert_eq!(dataset.appointments.len(), 2);
        assert_eq!(dataset.appointments[0].canceled_by.as_deref(), Some("bob"));
        let counts = dataset.procedure_counts().unwrap();
        assert_eq!(counts.rows[0].total(), 15.0);
    }

    #[test]
    fn test_missing_count_sheet_is_not_fatal() {
        let bytes = build_workbook(false);
        let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
        let dataset = load_from_workbook(&mut workbook).unwrap();

        assert_eq!(dataset.appointments.len(), 2);
        assert!(matches!(
            dataset.procedure_counts,
            Err(LoadError::MissingSheet(ref name)) if name == procedure_counts::SHEET_NAME
        ));
    }

    #[test]
    fn test_missing_appointment_sheet_is_fatal() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Something Else").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let mut reader = Xlsx::new(Cursor::new(bytes)).unwrap();
        let err = load_from_workbook(&mut reader).unwrap_err();
        assert!(matches!(err, LoadError::MissingSheet(ref name) if name == appointments::SHEET_NAME));
    }

    #[test]
    fn test_file_not_found() {
        let path = std::env::temp_dir().join(format!("{}.xlsx", uuid::Uuid::new_v4()));
        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(p) if p == path));
    }

    #[test]
    fn test_unreadable_workbook() {
        let path = std::env::temp_dir().join(format!("{}.xlsx", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"Appointment Date,Type\n2024-03-04,CT Head\n").unwrap();

        let result = load_dataset(&path);
        let _ = std::fs::remove_file(&path);

        match result {
            Err(LoadError::Workbook { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected a workbook error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_appointment_column_is_fatal() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(appointments::SHEET_NAME).unwrap();
        for (col, header) in APPOINTMENT_HEADERS
            .iter()
            .filter(|h| **h != "Status")
            .enumerate()
        {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let mut reader = Xlsx::new(Cursor::new(bytes)).unwrap();
        let err = load_from_workbook(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { ref sheet, ref column }
                if sheet == appointments::SHEET_NAME && column == "Status"
        ));
    }

    #[test]
    fn test_load_dataset_from_disk() {
        let path = std::env::temp_dir().join(format!("{}.xlsx", uuid::Uuid::new_v4()));
        std::fs::write(&path, build_workbook(true)).unwrap();

        let dataset = load_dataset(&path);
        let _ = std::fs::remove_file(&path);

        let dataset = dataset.unwrap();
        assert_eq!(dataset.appointments.len(), 2);
        assert!(dataset.procedure_counts.is_ok());
    }
}
