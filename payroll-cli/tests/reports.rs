//! Runs each report against a seeded in-memory SQLite database.

use chrono::NaiveDate;
use payroll_cli::app;
use payroll_cli::report::{OutputFormat, render};
use payroll_core::calculations::Timeframe;
use payroll_core::db::DbConfig;
use payroll_core::{
    AttendanceRecord, AttendanceStatus, CompanySettings, Sale, SaleStatus, SalesRepository,
    SettingsOverride,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(
    y: i32,
    m: u32,
    d: u32,
) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sale(
    id: &str,
    employee_id: &str,
    on: NaiveDate,
    invoice_amount: Decimal,
    advance_amount: Decimal,
    status: SaleStatus,
) -> Sale {
    Sale {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        client_name: "Client".to_string(),
        project_name: "Project".to_string(),
        invoice_amount,
        advance_amount,
        date: on,
        status,
    }
}

/// rep-1: two confirmed June sales (one with too small an advance), one
/// pending June sale and one confirmed May sale; present every working day of
/// June. rep-2: one confirmed June sale.
async fn seeded_repository() -> Box<dyn SalesRepository> {
    let repo = app::build_registry()
        .create(&DbConfig::default())
        .await
        .expect("Should open in-memory database");

    let sales = [
        sale("s-1", "rep-1", date(2025, 6, 3), dec!(100000), dec!(30000), SaleStatus::Verified),
        sale("s-2", "rep-1", date(2025, 6, 10), dec!(60000), dec!(5000), SaleStatus::Delivered),
        sale("s-3", "rep-1", date(2025, 6, 12), dec!(40000), dec!(0), SaleStatus::Pending),
        sale("s-4", "rep-1", date(2025, 5, 20), dec!(80000), dec!(20000), SaleStatus::Verified),
        sale("s-5", "rep-2", date(2025, 6, 4), dec!(50000), dec!(10000), SaleStatus::Verified),
    ];
    for sale in &sales {
        repo.insert_sale(sale).await.expect("Should insert sale");
    }
    for day in 1..=26 {
        repo.upsert_attendance(&AttendanceRecord {
            employee_id: "rep-1".to_string(),
            date: date(2025, 6, day),
            status: AttendanceStatus::Present,
        })
        .await
        .expect("Should upsert attendance");
    }
    repo
}

// =============================================================================
// run
// =============================================================================

#[tokio::test]
async fn payroll_uses_seeded_company_settings() {
    let repo = seeded_repository().await;

    let result = app::run_payroll(repo.as_ref(), "rep-1", 2025, 6, None)
        .await
        .unwrap();

    assert_eq!(result.confirmed_sales_count, 2);
    assert_eq!(result.total_revenue, dec!(160000));
    assert_eq!(result.days_worked, 26);
    assert_eq!(result.base_salary, dec!(30000));
    assert_eq!(result.project_bonuses, dec!(8000));
    assert_eq!(result.tiered_bonuses, dec!(0));
    assert_eq!(result.deductions, dec!(40000));
    assert_eq!(result.net_pay, dec!(-2000));
    assert_eq!(result.target_progress.sales_progress, dec!(16.67));
    assert_eq!(result.target_progress.revenue_progress, dec!(40));
}

#[tokio::test]
async fn payroll_with_settings_file_keeps_employee_override() {
    let repo = seeded_repository().await;
    repo.save_settings_override(
        "rep-1",
        &SettingsOverride {
            base_salary: Some(dec!(26000)),
            ..SettingsOverride::default()
        },
    )
    .await
    .unwrap();
    let file_settings = CompanySettings {
        sales_target: 2,
        deduction_per_missed_sale: dec!(0),
        ..CompanySettings::default()
    };

    let result = app::run_payroll(repo.as_ref(), "rep-1", 2025, 6, Some(&file_settings))
        .await
        .unwrap();

    assert_eq!(result.base_salary, dec!(26000));
    assert_eq!(result.deductions, dec!(0));
    assert_eq!(result.net_pay, dec!(34000));
    assert!(result.target_progress.is_target_met);
}

#[tokio::test]
async fn effective_settings_without_file_match_resolved_settings() {
    let repo = seeded_repository().await;
    repo.save_settings_override(
        "rep-1",
        &SettingsOverride {
            sales_target: Some(6),
            ..SettingsOverride::default()
        },
    )
    .await
    .unwrap();

    let settings = app::effective_settings(repo.as_ref(), "rep-1", None).await.unwrap();

    assert_eq!(settings.sales_target, 6);
    assert_eq!(
        settings,
        payroll_core::resolve_settings(repo.as_ref(), "rep-1").await.unwrap()
    );
}

#[tokio::test]
async fn payroll_rejects_month_zero() {
    let repo = seeded_repository().await;

    let err = app::run_payroll(repo.as_ref(), "rep-1", 2025, 0, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("month must be between 1 and 12"));
}

#[tokio::test]
async fn payroll_month_thirteen_is_an_invalid_period() {
    let repo = seeded_repository().await;

    let err = app::run_payroll(repo.as_ref(), "rep-1", 2025, 13, None)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("month must be between 0 and 11, got 12"));
}

#[tokio::test]
async fn payroll_for_unknown_employee_is_all_deductions() {
    let repo = seeded_repository().await;

    let result = app::run_payroll(repo.as_ref(), "rep-9", 2025, 6, None)
        .await
        .unwrap();

    assert_eq!(result.days_worked, 0);
    assert_eq!(result.base_salary, dec!(0));
    assert_eq!(result.deductions, dec!(0));
    assert_eq!(result.net_pay, dec!(0));
}

// =============================================================================
// history / metrics / overview
// =============================================================================

#[tokio::test]
async fn history_counts_only_valid_commissions() {
    let repo = seeded_repository().await;

    let history = app::commission_history(repo.as_ref(), "rep-1").await.unwrap();

    let months: Vec<_> = history
        .entries
        .iter()
        .map(|entry| (entry.year, entry.month, entry.amount))
        .collect();
    assert_eq!(months, vec![(2025, 5, dec!(8000)), (2025, 6, dec!(10000))]);
    assert_eq!(history.total_paid, dec!(18000));
    assert_eq!(history.monthly_average, dec!(9000));
    assert_eq!(history.growth_rate, dec!(25));
}

#[tokio::test]
async fn monthly_and_yearly_metrics() {
    let repo = seeded_repository().await;
    let today = date(2025, 6, 20);

    let monthly = app::metrics(repo.as_ref(), "rep-1", Timeframe::Monthly, today, None)
        .await
        .unwrap();
    let yearly = app::metrics(repo.as_ref(), "rep-1", Timeframe::Yearly, today, None)
        .await
        .unwrap();

    assert_eq!(monthly.sales_count, 2);
    assert_eq!(monthly.revenue, dec!(160000));
    assert_eq!(monthly.commission, dec!(16000));
    assert_eq!(monthly.target, dec!(500000));
    assert_eq!(monthly.progress_percent, dec!(32));

    assert_eq!(yearly.sales_count, 3);
    assert_eq!(yearly.revenue, dec!(240000));
    assert_eq!(yearly.progress_percent, dec!(5));
}

#[tokio::test]
async fn overview_defaults_to_every_employee_with_sales() {
    let repo = seeded_repository().await;
    repo.save_settings_override(
        "rep-2",
        &SettingsOverride {
            base_salary: Some(dec!(28000)),
            ..SettingsOverride::default()
        },
    )
    .await
    .unwrap();

    let overview = app::overview(repo.as_ref(), &[], None).await.unwrap();

    let lines: Vec<_> = overview
        .employees
        .iter()
        .map(|line| (line.employee_id.as_str(), line.base_salary, line.salary))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("rep-1", dec!(30000), dec!(48000)),
            ("rep-2", dec!(28000), dec!(33000)),
        ]
    );
    assert_eq!(overview.employee_count, 2);
    assert_eq!(overview.total_salary_expense, dec!(81000));
    assert_eq!(overview.total_bonuses, dec!(23000));
}

// =============================================================================
// rendering
// =============================================================================

#[tokio::test]
async fn json_payroll_report_parses_back() {
    let repo = seeded_repository().await;
    let result = app::run_payroll(repo.as_ref(), "rep-1", 2025, 6, None)
        .await
        .unwrap();

    let json = render(&result, OutputFormat::Json).unwrap();

    let parsed: payroll_core::PayrollCalculation = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result);
}

#[tokio::test]
async fn text_history_report_for_employee_without_sales() {
    let repo = seeded_repository().await;
    let history = app::commission_history(repo.as_ref(), "rep-9").await.unwrap();

    let text = render(&history, OutputFormat::Text).unwrap();

    assert_eq!(text, "No commissions recorded\n");
}
