//! Data loading for each `payroll` subcommand.
//!
//! Every function fetches what it needs from the repository up front and then
//! hands plain slices to the calculators in `payroll_core::calculations`.

use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use payroll_core::calculations::{
    CommissionHistory, PayrollCalculator, PayrollOverview, RepMetrics, Timeframe, monthly_history,
    payroll_overview, rep_metrics,
};
use payroll_core::db::RepositoryRegistry;
use payroll_core::{
    CompanySettings, PayrollCalculation, SalesRepository, apply_override, resolve_settings,
};
use payroll_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

/// Registry with every backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Company-wide settings: the `--settings` file when given, otherwise the
/// stored settings, otherwise the defaults.
async fn company_settings(
    repo: &dyn SalesRepository,
    file_settings: Option<&CompanySettings>,
) -> Result<CompanySettings> {
    match file_settings {
        Some(settings) => {
            debug!("using settings file in place of stored company settings");
            Ok(settings.clone())
        }
        None => payroll_core::company_settings(repo)
            .await
            .context("Failed to load company settings"),
    }
}

/// Settings used for `employee_id`: the company settings with the employee's
/// stored override applied on top.
pub async fn effective_settings(
    repo: &dyn SalesRepository,
    employee_id: &str,
    file_settings: Option<&CompanySettings>,
) -> Result<CompanySettings> {
    let settings = match file_settings {
        Some(settings) => {
            debug!("using settings file in place of stored company settings");
            apply_override(repo, employee_id, settings.clone()).await
        }
        None => resolve_settings(repo, employee_id).await,
    };
    settings.with_context(|| format!("Failed to load settings for {employee_id}"))
}

/// Payroll for `employee_id` in a 1-based calendar `month`.
pub async fn run_payroll(
    repo: &dyn SalesRepository,
    employee_id: &str,
    year: i32,
    month: u32,
    file_settings: Option<&CompanySettings>,
) -> Result<PayrollCalculation> {
    let month0 = month
        .checked_sub(1)
        .with_context(|| format!("month must be between 1 and 12, got {month}"))?;

    let settings = effective_settings(repo, employee_id, file_settings).await?;
    let sales = repo
        .list_sales(Some(employee_id))
        .await
        .context("Failed to load sales")?;
    let attendance = repo
        .list_attendance(Some(employee_id))
        .await
        .context("Failed to load attendance")?;

    let result = PayrollCalculator::new(settings)
        .calculate_month(employee_id, year, month0, &sales, &attendance)
        .with_context(|| format!("Failed to calculate payroll for {employee_id}"))?;

    info!(employee_id, period = %result.period, net_pay = %result.net_pay, "payroll calculated");
    Ok(result)
}

/// Month-by-month commission history for `employee_id`.
pub async fn commission_history(
    repo: &dyn SalesRepository,
    employee_id: &str,
) -> Result<CommissionHistory> {
    let sales = repo
        .list_sales(Some(employee_id))
        .await
        .context("Failed to load sales")?;

    let history = monthly_history(employee_id, &sales);
    info!(employee_id, months = history.entries.len(), "commission history built");
    Ok(history)
}

/// KPIs for `employee_id` over the `timeframe` window containing `today`.
pub async fn metrics(
    repo: &dyn SalesRepository,
    employee_id: &str,
    timeframe: Timeframe,
    today: NaiveDate,
    file_settings: Option<&CompanySettings>,
) -> Result<RepMetrics> {
    let settings = effective_settings(repo, employee_id, file_settings).await?;
    let sales = repo
        .list_sales(Some(employee_id))
        .await
        .context("Failed to load sales")?;

    Ok(rep_metrics(employee_id, &sales, &settings, timeframe, today))
}

/// Salary and commission totals across employees.
///
/// With no `employee_ids`, every employee with at least one stored sale is
/// included. An employee's individual salary is the base salary of their
/// settings override, when they have one.
pub async fn overview(
    repo: &dyn SalesRepository,
    employee_ids: &[String],
    file_settings: Option<&CompanySettings>,
) -> Result<PayrollOverview> {
    let sales = repo.list_sales(None).await.context("Failed to load sales")?;
    let employee_ids: Vec<String> = if employee_ids.is_empty() {
        sales
            .iter()
            .map(|sale| sale.employee_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        employee_ids.to_vec()
    };

    let settings = company_settings(repo, file_settings).await?;

    let mut salaries = HashMap::new();
    for employee_id in &employee_ids {
        let rep_override = repo
            .get_settings_override(employee_id)
            .await
            .with_context(|| format!("Failed to load settings override for {employee_id}"))?;
        if let Some(base_salary) = rep_override.and_then(|rep| rep.base_salary) {
            salaries.insert(employee_id.clone(), base_salary);
        }
    }

    let result = payroll_overview(&employee_ids, &sales, &settings, &salaries);
    info!(employees = result.employee_count, "payroll overview built");
    Ok(result)
}
