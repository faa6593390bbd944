use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pay_period::PayPeriod;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProgress {
    /// Confirmed sales as a percentage of the sales target.
    pub sales_progress: Decimal,
    /// Confirmed revenue as a percentage of the revenue target.
    pub revenue_progress: Decimal,
    pub is_target_met: bool,
}

/// One employee's payroll breakdown for a month.
///
/// Always derived from sales, attendance and settings; never a source of
/// truth on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    pub employee_id: String,
    pub period: PayPeriod,
    /// Base salary pro-rated by attendance.
    pub base_salary: Decimal,
    pub days_worked: u32,
    /// Working days in the month.
    pub total_days: u32,
    pub confirmed_sales_count: u32,
    pub total_revenue: Decimal,
    pub project_bonuses: Decimal,
    pub tiered_bonuses: Decimal,
    pub deductions: Decimal,
    pub net_pay: Decimal,
    pub target_progress: TargetProgress,
}
