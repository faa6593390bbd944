//! Monthly payroll calculation for a sales representative.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Keep the employee's sales dated inside the pay period |
//! | 2    | Keep the employee's attendance records inside the pay period |
//! | 3    | Confirmed sales: count and total invoice revenue |
//! | 4    | Project bonus: invoice × rate for each confirmed sale above the threshold |
//! | 5    | Tiered bonus: per-sale amounts for bands 13-15, 16-20, 21-25, 26+ once the target is met |
//! | 6    | Days worked (present or late) against working days in the month |
//! | 7    | Base salary pro-rated by attendance |
//! | 8    | Deduction per missed sale, pro-rated by attendance |
//! | 9    | Net pay: Line 7 + Line 4 + Line 5 − Line 8 (not floored at zero) |
//!
//! # Tier Breakpoints
//!
//! The band edges are fixed at 12/15/20/25. They are not derived from
//! [`TieredBonusRates`](crate::TieredBonusRates) `min`/`max` nor from the
//! configured sales target; the target only gates whether any band pays. A
//! target above 12 therefore still pays tier 1 from the 13th sale once the
//! target itself is reached.
//!
//! # Rounding
//!
//! Arithmetic is exact; monetary amounts and percentages are rounded half-up
//! to two decimal places when the result is assembled, and net pay is the sum
//! of the rounded components.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use payroll_core::calculations::PayrollCalculator;
//! use payroll_core::{AttendanceRecord, AttendanceStatus, PayPeriod};
//!
//! // June 2025: 30 calendar days, 26 working days.
//! let period = PayPeriod::new(2025, 5).unwrap();
//! let attendance: Vec<_> = (1..=20)
//!     .map(|day| AttendanceRecord {
//!         employee_id: "rep-1".to_string(),
//!         date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
//!         status: AttendanceStatus::Present,
//!     })
//!     .collect();
//!
//! let result = PayrollCalculator::default()
//!     .calculate("rep-1", period, &[], &attendance)
//!     .unwrap();
//!
//! // 30000 × 20/26
//! assert_eq!(result.base_salary, dec!(23076.92));
//! // 12 missed sales × 4000 × 20/26
//! assert_eq!(result.deductions, dec!(36923.08));
//! assert_eq!(result.net_pay, dec!(-13846.16));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{checked_sum, percent, round_half_up};
use crate::{
    AttendanceRecord, CompanySettings, PayPeriod, PayrollCalculation, PeriodError, Sale,
    SettingsError, TargetProgress,
};

/// Fixed sales-count bands as `(sales already covered, last sale in band)`.
///
/// A band pays for each sale above its floor, up to its ceiling; the last
/// band has no ceiling.
const TIER_BANDS: [(u32, Option<u32>); 4] = [
    (12, Some(15)),
    (15, Some(20)),
    (20, Some(25)),
    (25, None),
];

/// Errors that can occur during payroll calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollError {
    #[error("invalid company settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    #[error("invalid pay period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    #[error("{0} is too large to represent")]
    Overflow(&'static str),
}

/// Calculator for one employee's monthly payroll.
///
/// Holds the effective [`CompanySettings`] (company policy with any
/// representative override already applied) and computes a
/// [`PayrollCalculation`] from unfiltered sales and attendance.
#[derive(Debug, Clone, Default)]
pub struct PayrollCalculator {
    settings: CompanySettings,
}

impl PayrollCalculator {
    pub fn new(settings: CompanySettings) -> Self {
        Self { settings }
    }

    /// Calculates the payroll of `employee_id` for `period`.
    ///
    /// `sales` and `attendance` may contain records of other employees and
    /// other months; they are filtered here. Inputs are never modified and the
    /// same inputs always produce the same result.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidSettings`] if the settings fail
    /// [`CompanySettings::validate`], and [`PayrollError::Overflow`] if
    /// revenue, bonuses or progress exceed the range of [`Decimal`].
    pub fn calculate(
        &self,
        employee_id: &str,
        period: PayPeriod,
        sales: &[Sale],
        attendance: &[AttendanceRecord],
    ) -> Result<PayrollCalculation, PayrollError> {
        self.settings.validate()?;

        // Steps 1-3: period sales and confirmed totals
        let confirmed: Vec<&Sale> = sales
            .iter()
            .filter(|sale| sale.employee_id == employee_id && period.contains(sale.date))
            .filter(|sale| sale.is_confirmed())
            .collect();
        let confirmed_sales_count = confirmed.len() as u32;
        let total_revenue = checked_sum(confirmed.iter().map(|sale| sale.invoice_amount))
            .ok_or(PayrollError::Overflow("total revenue"))?;

        // Step 4: project bonuses
        let project_bonuses = self
            .project_bonuses(&confirmed)
            .map(round_half_up)
            .ok_or(PayrollError::Overflow("project bonuses"))?;

        // Step 5: tiered bonuses
        let tiered_bonuses = round_half_up(self.tiered_bonuses(confirmed_sales_count));

        // Step 6: attendance
        let days_worked = attendance
            .iter()
            .filter(|record| record.employee_id == employee_id && period.contains(record.date))
            .filter(|record| record.status.counts_as_worked())
            .count() as u32;
        let working_days = period.working_days();

        // Step 7: pro-rated base salary
        let base_salary =
            round_half_up(self.pro_rate(self.settings.base_salary, days_worked, working_days));

        // Step 8: deductions for missed sales
        let deductions = round_half_up(self.deductions(
            confirmed_sales_count,
            days_worked,
            working_days,
        ));

        // Step 9: net pay
        let net_pay = checked_sum([base_salary, project_bonuses, tiered_bonuses, -deductions])
            .ok_or(PayrollError::Overflow("net pay"))?;

        let target_progress = self.target_progress(confirmed_sales_count, total_revenue)?;

        debug!(
            employee_id,
            period = %period,
            confirmed_sales_count,
            days_worked,
            working_days,
            net_pay = %net_pay,
            "calculated payroll"
        );

        Ok(PayrollCalculation {
            employee_id: employee_id.to_string(),
            period,
            base_salary,
            days_worked,
            total_days: working_days,
            confirmed_sales_count,
            total_revenue: round_half_up(total_revenue),
            project_bonuses,
            tiered_bonuses,
            deductions,
            net_pay,
            target_progress,
        })
    }

    /// [`calculate`](Self::calculate) for a 0-indexed `month0` of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidPeriod`] for a month outside 0..=11, or
    /// any error of [`calculate`](Self::calculate).
    pub fn calculate_month(
        &self,
        employee_id: &str,
        year: i32,
        month0: u32,
        sales: &[Sale],
        attendance: &[AttendanceRecord],
    ) -> Result<PayrollCalculation, PayrollError> {
        let period = PayPeriod::new(year, month0)?;
        self.calculate(employee_id, period, sales, attendance)
    }

    /// Sum of `invoice × rate` over confirmed sales strictly above the threshold.
    fn project_bonuses(
        &self,
        confirmed: &[&Sale],
    ) -> Option<Decimal> {
        confirmed
            .iter()
            .filter(|sale| sale.invoice_amount > self.settings.project_bonus_threshold)
            .try_fold(Decimal::ZERO, |total, sale| {
                total.checked_add(sale.invoice_amount.checked_mul(self.settings.project_bonus_rate)?)
            })
    }

    /// Cumulative band bonuses; zero until the sales target is reached.
    ///
    /// With 27 sales every band pays: 3 × tier1 + 5 × tier2 + 5 × tier3 +
    /// 2 × tier4.
    fn tiered_bonuses(
        &self,
        confirmed_sales_count: u32,
    ) -> Decimal {
        if confirmed_sales_count < self.settings.sales_target {
            return Decimal::ZERO;
        }

        let rates = &self.settings.tiered_bonus_rates;
        let amounts = [
            rates.tier1.amount,
            rates.tier2.amount,
            rates.tier3.amount,
            rates.tier4.amount,
        ];

        TIER_BANDS
            .iter()
            .zip(amounts)
            .filter(|((floor, _), _)| confirmed_sales_count > *floor)
            .map(|((floor, ceiling), amount)| {
                let top = ceiling.map_or(confirmed_sales_count, |c| confirmed_sales_count.min(c));
                Decimal::from(top - floor) * amount
            })
            .sum()
    }

    /// Missed sales below target × penalty, pro-rated by attendance.
    fn deductions(
        &self,
        confirmed_sales_count: u32,
        days_worked: u32,
        working_days: u32,
    ) -> Decimal {
        let missed_sales = self.settings.sales_target.saturating_sub(confirmed_sales_count);
        let penalty = Decimal::from(missed_sales) * self.settings.deduction_per_missed_sale;
        self.pro_rate(penalty, days_worked, working_days)
    }

    /// Scales `amount` by `days_worked / working_days`.
    ///
    /// A month with no working days pro-rates to zero.
    fn pro_rate(
        &self,
        amount: Decimal,
        days_worked: u32,
        working_days: u32,
    ) -> Decimal {
        match (amount * Decimal::from(days_worked)).checked_div(Decimal::from(working_days)) {
            Some(scaled) => scaled,
            None => {
                warn!(
                    amount = %amount,
                    days_worked,
                    working_days,
                    "No working days in period; pro-rated amount is zero"
                );
                Decimal::ZERO
            }
        }
    }

    /// Progress against both targets. A zero target reports 0% progress.
    fn target_progress(
        &self,
        confirmed_sales_count: u32,
        total_revenue: Decimal,
    ) -> Result<TargetProgress, PayrollError> {
        let sales_target = self.settings.sales_target;
        let sales_progress = if sales_target == 0 {
            warn!(sales_target, "Sales target is zero; sales progress reported as 0");
            Decimal::ZERO
        } else {
            percent(Decimal::from(confirmed_sales_count), Decimal::from(sales_target))
                .ok_or(PayrollError::Overflow("sales progress"))?
        };

        let revenue_target = self.settings.revenue_target;
        let revenue_progress = if revenue_target.is_zero() {
            warn!(
                revenue_target = %revenue_target,
                "Revenue target is zero; revenue progress reported as 0"
            );
            Decimal::ZERO
        } else {
            percent(total_revenue, revenue_target)
                .ok_or(PayrollError::Overflow("revenue progress"))?
        };

        Ok(TargetProgress {
            sales_progress: round_half_up(sales_progress),
            revenue_progress: round_half_up(revenue_progress),
            is_target_met: confirmed_sales_count >= sales_target,
        })
    }
}
