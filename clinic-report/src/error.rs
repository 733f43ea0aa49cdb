//! Errors raised while loading the clinic workbook

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Data file not found at {}. Please ensure the data file exists.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to open Excel file {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::XlsxError,
    },
}
