//! Normalized data model shared by the loader, aggregations and renderers

pub mod appointment;
pub mod category;
pub mod procedure_count;

pub use appointment::{AppointmentRecord, AppointmentStatus};
pub use category::Category;
pub use procedure_count::{ProcedureCount, ProcedureCountTable};
