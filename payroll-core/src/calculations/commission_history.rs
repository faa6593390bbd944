//! Commission ledger built from per-sale commission evaluations.
//!
//! Only confirmed sales the evaluator marks valid contribute. Amounts are
//! grouped by calendar month for the history view and summed per employee for
//! the payroll overview.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::commission::evaluate_sale;
use crate::calculations::common::{percent, round_half_up};
use crate::{CompanySettings, Sale};

/// Commission earned in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionMonth {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionHistory {
    /// Months with at least one valid commission, oldest first.
    pub entries: Vec<CommissionMonth>,
    pub total_paid: Decimal,
    pub monthly_average: Decimal,
    /// Change from the first to the last month as a percentage of the first.
    pub growth_rate: Decimal,
}

/// One employee's line in the payroll overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayroll {
    pub employee_id: String,
    pub base_salary: Decimal,
    pub commission: Decimal,
    pub salary: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollOverview {
    pub employees: Vec<EmployeePayroll>,
    pub total_salary_expense: Decimal,
    pub total_bonuses: Decimal,
    pub employee_count: usize,
}

/// Valid commissions of the employee's confirmed sales.
fn valid_commissions<'a>(
    employee_id: &'a str,
    sales: &'a [Sale],
) -> impl Iterator<Item = (&'a Sale, Decimal)> + 'a {
    sales
        .iter()
        .filter(move |sale| sale.employee_id == employee_id && sale.is_confirmed())
        .filter_map(|sale| {
            let result = evaluate_sale(sale);
            result.is_valid.then_some((sale, result.commission))
        })
}

/// Total valid commission of the employee across all periods.
pub fn total_commission(
    employee_id: &str,
    sales: &[Sale],
) -> Decimal {
    let total: Decimal = valid_commissions(employee_id, sales)
        .map(|(_, commission)| commission)
        .sum();
    round_half_up(total)
}

/// Groups the employee's valid commissions by calendar month.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::commission_history::monthly_history;
/// use payroll_core::{Sale, SaleStatus};
///
/// let sale = |month, amount| Sale {
///     id: format!("s-{month}"),
///     employee_id: "rep-1".to_string(),
///     client_name: "Acme".to_string(),
///     project_name: "Portal".to_string(),
///     invoice_amount: amount,
///     advance_amount: amount,
///     date: NaiveDate::from_ymd_opt(2025, month, 10).unwrap(),
///     status: SaleStatus::Verified,
/// };
///
/// let history = monthly_history("rep-1", &[sale(1, dec!(100000)), sale(3, dec!(150000))]);
///
/// assert_eq!(history.entries.len(), 2);
/// assert_eq!(history.total_paid, dec!(25000));
/// assert_eq!(history.growth_rate, dec!(50));
/// ```
pub fn monthly_history(
    employee_id: &str,
    sales: &[Sale],
) -> CommissionHistory {
    let mut by_month: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for (sale, commission) in valid_commissions(employee_id, sales) {
        *by_month
            .entry((sale.date.year(), sale.date.month()))
            .or_insert(Decimal::ZERO) += commission;
    }

    let entries: Vec<CommissionMonth> = by_month
        .into_iter()
        .map(|((year, month), amount)| CommissionMonth {
            year,
            month,
            amount: round_half_up(amount),
        })
        .collect();

    let total_paid: Decimal = entries.iter().map(|entry| entry.amount).sum();
    let monthly_average = if entries.is_empty() {
        Decimal::ZERO
    } else {
        total_paid / Decimal::from(entries.len())
    };

    let growth_rate = match (entries.first(), entries.last()) {
        (Some(first), Some(last)) if entries.len() >= 2 => {
            percent(last.amount - first.amount, first.amount).unwrap_or(Decimal::ZERO)
        }
        _ => Decimal::ZERO,
    };

    CommissionHistory {
        entries,
        total_paid,
        monthly_average: round_half_up(monthly_average),
        growth_rate: round_half_up(growth_rate),
    }
}

/// Salary overview across employees.
///
/// Each salary is the employee's individual base salary from `salaries`, or
/// the company base salary when none is recorded, plus their total valid
/// commission.
pub fn payroll_overview(
    employee_ids: &[String],
    sales: &[Sale],
    settings: &CompanySettings,
    salaries: &HashMap<String, Decimal>,
) -> PayrollOverview {
    let employees: Vec<EmployeePayroll> = employee_ids
        .iter()
        .map(|employee_id| {
            let base_salary = salaries
                .get(employee_id)
                .copied()
                .unwrap_or(settings.base_salary);
            let commission = total_commission(employee_id, sales);
            EmployeePayroll {
                employee_id: employee_id.clone(),
                base_salary,
                commission,
                salary: base_salary + commission,
            }
        })
        .collect();

    PayrollOverview {
        total_salary_expense: employees.iter().map(|e| e.salary).sum(),
        total_bonuses: employees.iter().map(|e| e.commission).sum(),
        employee_count: employees.len(),
        employees,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::SaleStatus;

    fn sale(
        employee_id: &str,
        date: (i32, u32, u32),
        invoice_amount: Decimal,
        advance_amount: Decimal,
        status: SaleStatus,
    ) -> Sale {
        Sale {
            id: format!("{employee_id}-{}-{}-{}", date.0, date.1, date.2),
            employee_id: employee_id.to_string(),
            client_name: "Client".to_string(),
            project_name: "Project".to_string(),
            invoice_amount,
            advance_amount,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            status,
        }
    }

    fn valid(
        employee_id: &str,
        date: (i32, u32, u32),
        invoice_amount: Decimal,
    ) -> Sale {
        sale(employee_id, date, invoice_amount, invoice_amount, SaleStatus::Verified)
    }

    // =========================================================================
    // total_commission tests
    // =========================================================================

    #[test]
    fn total_commission_skips_ineligible_and_unconfirmed_sales() {
        let sales = vec![
            valid("rep-1", (2025, 1, 5), dec!(100000)),
            // too small
            valid("rep-1", (2025, 1, 6), dec!(40000)),
            // advance too low
            sale("rep-1", (2025, 1, 7), dec!(100000), dec!(1000), SaleStatus::Delivered),
            // not confirmed
            sale("rep-1", (2025, 1, 8), dec!(100000), dec!(100000), SaleStatus::Pending),
            // other employee
            valid("rep-2", (2025, 1, 9), dec!(100000)),
            sale("rep-1", (2024, 12, 1), dec!(60000), dec!(12000), SaleStatus::Delivered),
        ];

        assert_eq!(total_commission("rep-1", &sales), dec!(16000));
    }

    #[test]
    fn total_commission_without_sales_is_zero() {
        assert_eq!(total_commission("rep-1", &[]), dec!(0));
    }

    // =========================================================================
    // monthly_history tests
    // =========================================================================

    #[test]
    fn monthly_history_groups_by_calendar_month_in_order() {
        let sales = vec![
            valid("rep-1", (2025, 3, 20), dec!(80000)),
            valid("rep-1", (2024, 11, 2), dec!(50000)),
            valid("rep-1", (2025, 3, 1), dec!(120000)),
        ];

        let history = monthly_history("rep-1", &sales);

        assert_eq!(
            history.entries,
            vec![
                CommissionMonth {
                    year: 2024,
                    month: 11,
                    amount: dec!(5000),
                },
                CommissionMonth {
                    year: 2025,
                    month: 3,
                    amount: dec!(20000),
                },
            ]
        );
        assert_eq!(history.total_paid, dec!(25000));
        assert_eq!(history.monthly_average, dec!(12500));
        assert_eq!(history.growth_rate, dec!(300));
    }

    #[test]
    fn monthly_history_single_month_has_no_growth() {
        let history = monthly_history("rep-1", &[valid("rep-1", (2025, 2, 2), dec!(70000))]);

        assert_eq!(history.entries.len(), 1);
        assert_eq!(history.monthly_average, dec!(7000));
        assert_eq!(history.growth_rate, dec!(0));
    }

    #[test]
    fn monthly_history_declining_commission_has_negative_growth() {
        let sales = vec![
            valid("rep-1", (2025, 1, 2), dec!(200000)),
            valid("rep-1", (2025, 2, 2), dec!(150000)),
        ];

        let history = monthly_history("rep-1", &sales);

        assert_eq!(history.growth_rate, dec!(-25));
    }

    #[test]
    fn monthly_history_empty_is_all_zero() {
        let history = monthly_history("rep-1", &[valid("rep-2", (2025, 1, 2), dec!(90000))]);

        assert_eq!(history, CommissionHistory::default());
    }

    // =========================================================================
    // payroll_overview tests
    // =========================================================================

    #[test]
    fn payroll_overview_prefers_individual_salary() {
        let sales = vec![
            valid("rep-1", (2025, 4, 1), dec!(100000)),
            valid("rep-2", (2025, 4, 1), dec!(55000)),
        ];
        let salaries = HashMap::from([("rep-2".to_string(), dec!(45000))]);
        let employees = vec!["rep-1".to_string(), "rep-2".to_string(), "rep-3".to_string()];

        let overview = payroll_overview(&employees, &sales, &CompanySettings::default(), &salaries);

        assert_eq!(
            overview.employees,
            vec![
                EmployeePayroll {
                    employee_id: "rep-1".to_string(),
                    base_salary: dec!(30000),
                    commission: dec!(10000),
                    salary: dec!(40000),
                },
                EmployeePayroll {
                    employee_id: "rep-2".to_string(),
                    base_salary: dec!(45000),
                    commission: dec!(5500),
                    salary: dec!(50500),
                },
                EmployeePayroll {
                    employee_id: "rep-3".to_string(),
                    base_salary: dec!(30000),
                    commission: dec!(0),
                    salary: dec!(30000),
                },
            ]
        );
        assert_eq!(overview.total_salary_expense, dec!(120500));
        assert_eq!(overview.total_bonuses, dec!(15500));
        assert_eq!(overview.employee_count, 3);
    }

    #[test]
    fn payroll_overview_without_employees_is_empty() {
        let overview = payroll_overview(&[], &[], &CompanySettings::default(), &HashMap::new());

        assert_eq!(overview, PayrollOverview::default());
    }
}
