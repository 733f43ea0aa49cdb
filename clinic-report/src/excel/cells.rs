//! Cell coercion helpers shared by the sheet readers

use calamine::{Data, ExcelDateTime, ExcelDateTimeType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Largest serial Excel can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

pub fn is_empty_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn is_empty_row(row: &[Data]) -> bool {
    row.iter().all(is_empty_cell)
}

/// Render a cell as trimmed text
pub fn get_cell_string(row: &[Data], col: usize) -> String {
    row.get(col).map(cell_to_string).unwrap_or_default()
}

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_datetime().map(format_datetime).unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

/// Coerce a cell to a number; anything non-numeric becomes 0
pub fn cell_to_number(cell: &Data) -> f64 {
    match cell {
        Data::Int(i) => *i as f64,
        Data::Float(f) if f.is_finite() => *f,
        Data::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Coerce a cell to a timestamp. Unparseable cells are `None`, never an error.
pub fn cell_to_datetime(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime(),
        Data::Float(f) => serial_to_datetime(*f),
        Data::Int(i) => serial_to_datetime(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_datetime_str(s),
        _ => None,
    }
}

/// Convert a bare serial number to a timestamp.
///
/// Plain numeric cells carry no date system, so the 1900 system is assumed.
/// Typed date cells go through [`ExcelDateTime::as_datetime`] instead.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false).as_datetime()
}

pub fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    None
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hm(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert_eq!(
            parse_datetime_str("2024-03-04 08:15"),
            Some(ymd_hm(2024, 3, 4, 8, 15))
        );
        assert_eq!(
            parse_datetime_str("03/04/2024 2:30 PM"),
            Some(ymd_hm(2024, 3, 4, 14, 30))
        );
        assert_eq!(
            parse_datetime_str("03/04/2024"),
            Some(ymd_hm(2024, 3, 4, 0, 0))
        );
        assert_eq!(parse_datetime_str("not a date"), None);
        assert_eq!(parse_datetime_str(""), None);
    }

    #[test]
    fn test_serial_to_datetime() {
        // 45355.5 is 2024-03-04 12:00
        assert_eq!(serial_to_datetime(45355.5), Some(ymd_hm(2024, 3, 4, 12, 0)));
        assert_eq!(serial_to_datetime(-1.0), None);
        assert_eq!(serial_to_datetime(f64::NAN), None);
    }

    #[test]
    fn test_date_cells_follow_workbook_date_system() {
        // 43893 in the 1904 system and 45355 in the 1900 system are both 2024-03-04
        let mac = Data::DateTime(ExcelDateTime::new(43893.0, ExcelDateTimeType::DateTime, true));
        let windows = Data::DateTime(ExcelDateTime::new(
            45355.0,
            ExcelDateTimeType::DateTime,
            false,
        ));

        assert_eq!(cell_to_datetime(&mac), Some(ymd_hm(2024, 3, 4, 0, 0)));
        assert_eq!(cell_to_datetime(&windows), Some(ymd_hm(2024, 3, 4, 0, 0)));
        assert_eq!(cell_to_string(&mac), "2024-03-04 00:00");
    }

    #[test]
    fn test_cell_to_datetime_variants() {
        assert_eq!(
            cell_to_datetime(&Data::String("2024-03-04 08:15".into())),
            Some(ymd_hm(2024, 3, 4, 8, 15))
        );
        assert_eq!(
            cell_to_datetime(&Data::Float(45355.5)),
            Some(ymd_hm(2024, 3, 4, 12, 0))
        );
        assert_eq!(cell_to_datetime(&Data::Empty), None);
        assert_eq!(cell_to_datetime(&Data::Bool(true)), None);
    }

    #[test]
    fn test_cell_to_number_coerces_to_zero() {
        assert_eq!(cell_to_number(&Data::Int(4)), 4.0);
        assert_eq!(cell_to_number(&Data::Float(2.5)), 2.5);
        assert_eq!(cell_to_number(&Data::String(" 1,250 ".into())), 1250.0);
        assert_eq!(cell_to_number(&Data::String("n/a".into())), 0.0);
        assert_eq!(cell_to_number(&Data::Empty), 0.0);
        assert_eq!(cell_to_number(&Data::Bool(true)), 0.0);
    }

    #[test]
    fn test_empty_detection() {
        assert!(is_empty_row(&[Data::Empty, Data::String("  ".into())]));
        assert!(!is_empty_row(&[Data::Empty, Data::Int(0)]));
    }
}
