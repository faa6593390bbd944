//! CSV import of daily attendance.
//!
//! Columns: `employee_id`, `date` (`YYYY-MM-DD` or RFC 3339) and `status`
//! (`present`, `absent`, `late` or `friday_off`).

use std::io::Read;

use payroll_core::{AttendanceRecord, AttendanceStatus, RepositoryError, SalesRepository};
use serde::Deserialize;
use thiserror::Error;

use crate::date::parse_date;

#[derive(Debug, Error)]
pub enum AttendanceLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unrecognised attendance status '{status}' on row {row}")]
    InvalidStatus { status: String, row: usize },

    #[error("invalid date '{value}' on row {row}")]
    InvalidDate { value: String, row: usize },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for AttendanceLoaderError {
    fn from(err: csv::Error) -> Self {
        AttendanceLoaderError::CsvParse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    employee_id: String,
    date: String,
    status: String,
}

pub struct AttendanceCsvLoader;

impl AttendanceCsvLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<AttendanceRecord>, AttendanceLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        csv_reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row = result?;
                let row_number = idx + 1;
                let status = AttendanceStatus::parse(&row.status).ok_or_else(|| {
                    AttendanceLoaderError::InvalidStatus {
                        status: row.status.clone(),
                        row: row_number,
                    }
                })?;
                let date = parse_date(&row.date).ok_or_else(|| {
                    AttendanceLoaderError::InvalidDate {
                        value: row.date.clone(),
                        row: row_number,
                    }
                })?;
                Ok(AttendanceRecord {
                    employee_id: row.employee_id,
                    date,
                    status,
                })
            })
            .collect()
    }

    /// Upserts every record; a later record for the same employee and day
    /// replaces the earlier status.
    pub async fn load<R: SalesRepository + ?Sized>(
        repo: &R,
        records: &[AttendanceRecord],
    ) -> Result<usize, AttendanceLoaderError> {
        for record in records {
            repo.upsert_attendance(record).await?;
        }
        Ok(records.len())
    }
}
