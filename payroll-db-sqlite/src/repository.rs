use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use payroll_core::{
    AttendanceRecord, AttendanceStatus, CompanySettings, OpenTierRate, RepositoryError, Sale,
    SaleStatus, SalesRepository, SettingsOverride, TierRate, TieredBonusRates,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::debug;

use crate::decimal::{decimal_to_f64, get_count, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connects to `database_url`, creating the database file if missing.
    ///
    /// Accepts a bare path (`payroll.db`), a sqlx URL (`sqlite:payroll.db`),
    /// or `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        // An in-memory database exists once per connection.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(seed = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_error(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn get_text(
    row: &SqliteRow,
    column: &str,
) -> Result<String, RepositoryError> {
    row.try_get(column).map_err(db_error)
}

fn get_date(
    row: &SqliteRow,
    column: &str,
) -> Result<NaiveDate, RepositoryError> {
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get {}: {}", column, e)))
}

fn row_to_sale(row: &SqliteRow) -> Result<Sale, RepositoryError> {
    let status = get_text(row, "status")?;
    Ok(Sale {
        id: get_text(row, "id")?,
        employee_id: get_text(row, "employee_id")?,
        client_name: get_text(row, "client_name")?,
        project_name: get_text(row, "project_name")?,
        invoice_amount: get_decimal(row, "invoice_amount")?,
        advance_amount: get_decimal(row, "advance_amount")?,
        date: get_date(row, "date")?,
        status: SaleStatus::parse(&status)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid sale status: {}", status)))?,
    })
}

fn row_to_attendance(row: &SqliteRow) -> Result<AttendanceRecord, RepositoryError> {
    let status = get_text(row, "status")?;
    Ok(AttendanceRecord {
        employee_id: get_text(row, "employee_id")?,
        date: get_date(row, "date")?,
        status: AttendanceStatus::parse(&status).ok_or_else(|| {
            RepositoryError::Database(format!("Invalid attendance status: {}", status))
        })?,
    })
}

fn row_to_settings(row: &SqliteRow) -> Result<CompanySettings, RepositoryError> {
    let tier = |n: u8| -> Result<TierRate, RepositoryError> {
        Ok(TierRate {
            min: get_count(row, &format!("tier{n}_min"))?,
            max: get_count(row, &format!("tier{n}_max"))?,
            amount: get_decimal(row, &format!("tier{n}_amount"))?,
        })
    };

    Ok(CompanySettings {
        base_salary: get_decimal(row, "base_salary")?,
        sales_target: get_count(row, "sales_target")?,
        revenue_target: get_decimal(row, "revenue_target")?,
        weekly_revenue_target: get_decimal(row, "weekly_revenue_target")?,
        monthly_revenue_target: get_decimal(row, "monthly_revenue_target")?,
        yearly_revenue_target: get_decimal(row, "yearly_revenue_target")?,
        daily_lead_target: get_count(row, "daily_lead_target")?,
        monthly_lead_target: get_count(row, "monthly_lead_target")?,
        project_bonus_threshold: get_decimal(row, "project_bonus_threshold")?,
        project_bonus_rate: get_decimal(row, "project_bonus_rate")?,
        deduction_per_missed_sale: get_decimal(row, "deduction_per_missed_sale")?,
        tiered_bonus_rates: TieredBonusRates {
            tier1: tier(1)?,
            tier2: tier(2)?,
            tier3: tier(3)?,
            tier4: OpenTierRate {
                min: get_count(row, "tier4_min")?,
                amount: get_decimal(row, "tier4_amount")?,
            },
        },
        payment_schedule: get_text(row, "payment_schedule")?,
        working_hours: get_text(row, "working_hours")?,
    })
}

#[async_trait]
impl SalesRepository for SqliteRepository {
    async fn list_sales(
        &self,
        employee_id: Option<&str>,
    ) -> Result<Vec<Sale>, RepositoryError> {
        const BASE_QUERY: &str =
            "SELECT id, employee_id, client_name, project_name, invoice_amount,
                    advance_amount, date, status
             FROM sales";

        let rows = match employee_id {
            Some(employee_id) => {
                sqlx::query(&format!("{} WHERE employee_id = ? ORDER BY date, id", BASE_QUERY))
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query(&format!("{} ORDER BY date, id", BASE_QUERY))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(db_error)?;

        rows.iter().map(row_to_sale).collect()
    }

    async fn insert_sale(
        &self,
        sale: &Sale,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO sales (id, employee_id, client_name, project_name,
                                invoice_amount, advance_amount, date, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&sale.id)
        .bind(&sale.employee_id)
        .bind(&sale.client_name)
        .bind(&sale.project_name)
        .bind(decimal_to_f64(sale.invoice_amount))
        .bind(decimal_to_f64(sale.advance_amount))
        .bind(sale.date)
        .bind(sale.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn delete_sale(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_attendance(
        &self,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        const BASE_QUERY: &str = "SELECT employee_id, date, status FROM attendance";

        let rows = match employee_id {
            Some(employee_id) => {
                sqlx::query(&format!("{} WHERE employee_id = ? ORDER BY date", BASE_QUERY))
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query(&format!("{} ORDER BY employee_id, date", BASE_QUERY))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(db_error)?;

        rows.iter().map(row_to_attendance).collect()
    }

    async fn upsert_attendance(
        &self,
        record: &AttendanceRecord,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO attendance (employee_id, date, status) VALUES (?, ?, ?)
             ON CONFLICT (employee_id, date) DO UPDATE SET status = excluded.status",
        )
        .bind(&record.employee_id)
        .bind(record.date)
        .bind(record.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn delete_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM attendance WHERE employee_id = ? AND date = ?")
            .bind(employee_id)
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn get_company_settings(&self) -> Result<CompanySettings, RepositoryError> {
        let row = sqlx::query("SELECT * FROM company_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_settings(&row)
    }

    async fn save_company_settings(
        &self,
        settings: &CompanySettings,
    ) -> Result<(), RepositoryError> {
        let tiers = &settings.tiered_bonus_rates;
        sqlx::query(
            "INSERT OR REPLACE INTO company_settings (
                id, base_salary, sales_target, revenue_target,
                weekly_revenue_target, monthly_revenue_target, yearly_revenue_target,
                daily_lead_target, monthly_lead_target,
                project_bonus_threshold, project_bonus_rate, deduction_per_missed_sale,
                tier1_min, tier1_max, tier1_amount,
                tier2_min, tier2_max, tier2_amount,
                tier3_min, tier3_max, tier3_amount,
                tier4_min, tier4_amount,
                payment_schedule, working_hours, updated_at
            ) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                      CURRENT_TIMESTAMP)",
        )
        .bind(decimal_to_f64(settings.base_salary))
        .bind(settings.sales_target)
        .bind(decimal_to_f64(settings.revenue_target))
        .bind(decimal_to_f64(settings.weekly_revenue_target))
        .bind(decimal_to_f64(settings.monthly_revenue_target))
        .bind(decimal_to_f64(settings.yearly_revenue_target))
        .bind(settings.daily_lead_target)
        .bind(settings.monthly_lead_target)
        .bind(decimal_to_f64(settings.project_bonus_threshold))
        .bind(decimal_to_f64(settings.project_bonus_rate))
        .bind(decimal_to_f64(settings.deduction_per_missed_sale))
        .bind(tiers.tier1.min)
        .bind(tiers.tier1.max)
        .bind(decimal_to_f64(tiers.tier1.amount))
        .bind(tiers.tier2.min)
        .bind(tiers.tier2.max)
        .bind(decimal_to_f64(tiers.tier2.amount))
        .bind(tiers.tier3.min)
        .bind(tiers.tier3.max)
        .bind(decimal_to_f64(tiers.tier3.amount))
        .bind(tiers.tier4.min)
        .bind(decimal_to_f64(tiers.tier4.amount))
        .bind(&settings.payment_schedule)
        .bind(&settings.working_hours)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_settings_override(
        &self,
        employee_id: &str,
    ) -> Result<Option<SettingsOverride>, RepositoryError> {
        let row = sqlx::query("SELECT overrides FROM settings_overrides WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let json = get_text(&row, "overrides")?;
        serde_json::from_str(&json).map(Some).map_err(|e| {
            RepositoryError::Database(format!(
                "Invalid settings override for '{}': {}",
                employee_id, e
            ))
        })
    }

    async fn save_settings_override(
        &self,
        employee_id: &str,
        settings: &SettingsOverride,
    ) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(settings).map_err(db_error)?;

        sqlx::query(
            "INSERT INTO settings_overrides (employee_id, overrides) VALUES (?, ?)
             ON CONFLICT (employee_id) DO UPDATE
             SET overrides = excluded.overrides, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(employee_id)
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}
