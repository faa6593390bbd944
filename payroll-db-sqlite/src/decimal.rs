//! Column helpers for monetary and count values.
//!
//! SQLite keeps whole-number REAL values as INTEGER when they are written
//! through untyped SQL (seed files, the `sqlite3` shell), so money columns are
//! read by inspecting the storage class of each value.

use payroll_core::RepositoryError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

fn column_error(
    column: &str,
    e: impl std::fmt::Display,
) -> RepositoryError {
    RepositoryError::Database(format!("Column '{}' not found: {}", column, e))
}

/// Reads a decimal stored as INTEGER or REAL. NULL reads as zero.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row.try_get_raw(column).map_err(|e| column_error(column, e))?;
    let type_name = value_ref.type_info().name().to_string();

    match type_name.as_str() {
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get INTEGER from '{}': {}", column, e))
            })?;
            Ok(Decimal::from(val))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            Decimal::try_from(val).map_err(|e| {
                RepositoryError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        "NULL" => Ok(Decimal::ZERO),
        other => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            other, column
        ))),
    }
}

/// Reads a non-negative INTEGER count such as a sales target.
pub fn get_count(
    row: &SqliteRow,
    column: &str,
) -> Result<u32, RepositoryError> {
    let val: i64 = row.try_get(column).map_err(|e| column_error(column, e))?;
    u32::try_from(val).map_err(|_| {
        RepositoryError::Database(format!("Value {} in '{}' is not a valid count", val, column))
    })
}

/// Converts a Decimal to f64 for REAL storage.
pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}
