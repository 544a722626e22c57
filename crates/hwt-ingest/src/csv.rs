//! CSV reader for the bulk hospital reference load.
//!
//! The reference file is `;`-separated with one row per hospital. Rows are
//! read loosely into raw string fields; deciding which rows are usable (and
//! quarantining the rest field-by-field) is the pipeline's job, not the
//! reader's.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::IngestError;

/// One raw row of the hospital reference CSV.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HospitalCsvRow {
    #[serde(rename = "HospitalID", default)]
    pub hospital_id: Option<String>,
    #[serde(rename = "HospitalName", default)]
    pub hospital_name: Option<String>,
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
    #[serde(rename = "District", default)]
    pub district: Option<String>,
    #[serde(rename = "NUTSIDescription", default)]
    pub nuts1: Option<String>,
    #[serde(rename = "NUTSIIDescription", default)]
    pub nuts2: Option<String>,
    #[serde(rename = "NUTSIIIDescription", default)]
    pub nuts3: Option<String>,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<String>,
    #[serde(rename = "PhoneNum", default)]
    pub phone: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
}

/// Read hospital rows from any reader.
pub fn read_hospital_rows<R: Read>(reader: R) -> Result<Vec<HospitalCsvRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: HospitalCsvRow = record?;
        rows.push(row);
    }
    tracing::debug!(rows = rows.len(), "read hospital reference csv");
    Ok(rows)
}

/// Read hospital rows from a file path.
pub fn read_hospital_file(path: &Path) -> Result<Vec<HospitalCsvRow>, IngestError> {
    let file = std::fs::File::open(path)?;
    read_hospital_rows(file)
}
