//! Commission and payroll calculations for sales representatives.
//!
//! All calculators are synchronous and pure: they read slices of sales and
//! attendance fetched beforehand and never modify them.

pub mod commission;
pub mod commission_history;
pub mod common;
pub mod payroll;
pub mod rep_metrics;

pub use commission::{CommissionResult, calculate_commission, evaluate_sale};
pub use commission_history::{
    CommissionHistory, CommissionMonth, EmployeePayroll, PayrollOverview, monthly_history,
    payroll_overview, total_commission,
};
pub use payroll::{PayrollCalculator, PayrollError};
pub use rep_metrics::{RepMetrics, RevenuePoint, Timeframe, rep_metrics};
