pub mod csv;
pub mod error;
pub mod xml;

pub use crate::csv::{HospitalCsvRow, read_hospital_file, read_hospital_rows};
pub use error::IngestError;
pub use xml::{Element, parse_document};
