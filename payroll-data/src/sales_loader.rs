//! CSV import of closed sales.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column           | Required | Notes                                                  |
//! |------------------|----------|--------------------------------------------------------|
//! | `id`             | yes      | Unique sale identifier                                 |
//! | `employee_id`    | yes      |                                                        |
//! | `client_name`    | yes      |                                                        |
//! | `project_name`   | yes      |                                                        |
//! | `invoice_amount` | yes      | Full contracted value                                  |
//! | `advance_amount` | no       | Payment collected upfront; empty cell reads as 0       |
//! | `date`           | yes      | `YYYY-MM-DD` or an RFC 3339 timestamp                  |
//! | `status`         | yes      | A status code, or `true`/`false` for confirmed/pending |
//!
//! ```csv
//! id,employee_id,client_name,project_name,invoice_amount,advance_amount,date,status
//! s-1001,rep-1,Northwind,ERP rollout,125000,25000,2025-06-03,verified
//! s-1002,rep-1,Contoso,Landing page,18000,,2025-06-05,true
//! ```

use std::io::Read;

use payroll_core::{RepositoryError, Sale, SaleStatus, SalesRepository};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::date::parse_date;

#[derive(Debug, Error)]
pub enum SalesLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// `row` is 1-based, not counting the header.
    #[error("unrecognised sale status '{status}' on row {row}")]
    InvalidStatus { status: String, row: usize },

    #[error("invalid date '{value}' on row {row}")]
    InvalidDate { value: String, row: usize },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for SalesLoaderError {
    fn from(err: csv::Error) -> Self {
        SalesLoaderError::CsvParse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    employee_id: String,
    client_name: String,
    project_name: String,
    invoice_amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount_or_zero")]
    advance_amount: Decimal,
    date: String,
    status: String,
}

fn deserialize_amount_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse::<Decimal>()
            .map_err(serde::de::Error::custom),
        _ => Ok(Decimal::ZERO),
    }
}

/// Accepts a status code or the boolean confirmed flag.
fn parse_status(value: &str) -> Option<SaleStatus> {
    let value = value.trim();
    SaleStatus::parse(value).or_else(|| match value.to_ascii_lowercase().as_str() {
        "true" => Some(SaleStatus::from_confirmed(true)),
        "false" => Some(SaleStatus::from_confirmed(false)),
        _ => None,
    })
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<Sale, SalesLoaderError> {
    let status = parse_status(&row.status).ok_or_else(|| SalesLoaderError::InvalidStatus {
        status: row.status.clone(),
        row: row_number,
    })?;
    let date = parse_date(&row.date).ok_or_else(|| SalesLoaderError::InvalidDate {
        value: row.date.clone(),
        row: row_number,
    })?;

    Ok(Sale {
        id: row.id,
        employee_id: row.employee_id,
        client_name: row.client_name,
        project_name: row.project_name,
        invoice_amount: row.invoice_amount,
        advance_amount: row.advance_amount,
        date,
        status,
    })
}

/// Loader for sales from CSV into any [`SalesRepository`].
pub struct SalesCsvLoader;

impl SalesCsvLoader {
    /// Parses sales from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<Sale>, SalesLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        csv_reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| convert_row(result?, idx + 1))
            .collect()
    }

    /// Writes `sales` through the repository and returns the number written.
    ///
    /// A sale whose id already exists is replaced, so loading the same file
    /// twice leaves one copy of each sale.
    pub async fn load<R: SalesRepository + ?Sized>(
        repo: &R,
        sales: &[Sale],
    ) -> Result<usize, SalesLoaderError> {
        let mut inserted = 0;

        for sale in sales {
            match repo.delete_sale(&sale.id).await {
                Ok(()) => debug!(id = %sale.id, "replacing existing sale"),
                Err(RepositoryError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
            repo.insert_sale(sale).await?;
            inserted += 1;
        }

        Ok(inserted)
    }
}
