use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::models::{AttendanceRecord, CompanySettings, Sale, SettingsOverride};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait SalesRepository: Send + Sync {
    // Sales
    async fn list_sales(&self, employee_id: Option<&str>) -> Result<Vec<Sale>, RepositoryError>;
    async fn insert_sale(&self, sale: &Sale) -> Result<(), RepositoryError>;
    async fn delete_sale(&self, id: &str) -> Result<(), RepositoryError>;

    // Attendance
    async fn list_attendance(
        &self,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError>;

    /// Inserts the record, or replaces the status of the existing record for
    /// the same employee and date.
    async fn upsert_attendance(&self, record: &AttendanceRecord) -> Result<(), RepositoryError>;

    async fn delete_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<(), RepositoryError>;

    // Company settings
    async fn get_company_settings(&self) -> Result<CompanySettings, RepositoryError>;
    async fn save_company_settings(
        &self,
        settings: &CompanySettings,
    ) -> Result<(), RepositoryError>;

    // Representative overrides
    async fn get_settings_override(
        &self,
        employee_id: &str,
    ) -> Result<Option<SettingsOverride>, RepositoryError>;

    async fn save_settings_override(
        &self,
        employee_id: &str,
        settings: &SettingsOverride,
    ) -> Result<(), RepositoryError>;
}

/// Stored company settings, or [`CompanySettings::default`] when none are
/// stored.
pub async fn company_settings(repo: &dyn SalesRepository) -> Result<CompanySettings, RepositoryError> {
    match repo.get_company_settings().await {
        Ok(settings) => Ok(settings),
        Err(RepositoryError::NotFound) => {
            debug!("no stored company settings; using defaults");
            Ok(CompanySettings::default())
        }
        Err(e) => Err(e),
    }
}

/// `company` with the stored override of `employee_id` applied, if any.
pub async fn apply_override(
    repo: &dyn SalesRepository,
    employee_id: &str,
    company: CompanySettings,
) -> Result<CompanySettings, RepositoryError> {
    Ok(match repo.get_settings_override(employee_id).await? {
        Some(rep) => company.with_override(&rep),
        None => company,
    })
}

/// Effective settings for `employee_id`.
///
/// Falls back to [`CompanySettings::default`] when no company settings are
/// stored, then applies the employee's override if one exists.
pub async fn resolve_settings(
    repo: &dyn SalesRepository,
    employee_id: &str,
) -> Result<CompanySettings, RepositoryError> {
    let company = company_settings(repo).await?;
    apply_override(repo, employee_id, company).await
}
