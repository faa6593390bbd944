//! Rendering of calculation results for the terminal.
//!
//! `text` output is a fixed-width summary meant for people; `json` output is
//! the serde form of the result record, pretty-printed.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use payroll_core::PayrollCalculation;
use payroll_core::calculations::{CommissionHistory, CommissionResult, PayrollOverview, RepMetrics};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Human-readable rendering of a result record.
pub trait TextReport {
    fn to_text(&self) -> String;
}

/// Renders `value` in the requested format. The result ends with a newline.
pub fn render<T>(
    value: &T,
    format: OutputFormat,
) -> Result<String>
where
    T: Serialize + TextReport,
{
    let mut out = match format {
        OutputFormat::Text => value.to_text(),
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

fn money(value: Decimal) -> String {
    format!("{value:.2}")
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

// `write!` into a String cannot fail; results are ignored throughout.

impl TextReport for PayrollCalculation {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Payroll for {} ({})", self.employee_id, self.period);
        let _ = writeln!(out, "  {:<18}{} of {}", "Days worked", self.days_worked, self.total_days);
        let _ = writeln!(out, "  {:<18}{}", "Confirmed sales", self.confirmed_sales_count);
        let _ = writeln!(out, "  {:<18}{:>12}", "Revenue", money(self.total_revenue));
        let _ = writeln!(out, "  {:<18}{:>12}", "Base salary", money(self.base_salary));
        let _ = writeln!(out, "  {:<18}{:>12}", "Project bonuses", money(self.project_bonuses));
        let _ = writeln!(out, "  {:<18}{:>12}", "Tiered bonuses", money(self.tiered_bonuses));
        let _ = writeln!(out, "  {:<18}{:>12}", "Deductions", money(self.deductions));
        let _ = writeln!(out, "  {:<18}{:>12}", "Net pay", money(self.net_pay));
        let progress = &self.target_progress;
        let _ = writeln!(out, "  {:<18}{:>11}%", "Sales progress", money(progress.sales_progress));
        let _ = writeln!(out, "  {:<18}{:>11}%", "Revenue progress", money(progress.revenue_progress));
        let _ = writeln!(out, "  {:<18}{}", "Target met", yes_no(progress.is_target_met));
        out
    }
}

impl TextReport for CommissionResult {
    fn to_text(&self) -> String {
        if self.is_valid {
            format!("Commission payable: {}", money(self.commission))
        } else {
            format!("No commission: {}", self.message)
        }
    }
}

impl TextReport for CommissionHistory {
    fn to_text(&self) -> String {
        let mut out = String::new();
        if self.entries.is_empty() {
            let _ = writeln!(out, "No commissions recorded");
            return out;
        }
        for entry in &self.entries {
            let _ = writeln!(out, "  {:04}-{:02}  {:>12}", entry.year, entry.month, money(entry.amount));
        }
        let _ = writeln!(out, "  {:<18}{:>12}", "Total paid", money(self.total_paid));
        let _ = writeln!(out, "  {:<18}{:>12}", "Monthly average", money(self.monthly_average));
        let _ = writeln!(out, "  {:<18}{:>11}%", "Growth", money(self.growth_rate));
        out
    }
}

impl TextReport for PayrollOverview {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "  {:<14}{:>12}{:>12}{:>12}",
            "Employee", "Base", "Commission", "Salary"
        );
        for line in &self.employees {
            let _ = writeln!(
                out,
                "  {:<14}{:>12}{:>12}{:>12}",
                line.employee_id,
                money(line.base_salary),
                money(line.commission),
                money(line.salary)
            );
        }
        let _ = writeln!(out, "  {:<18}{}", "Employees", self.employee_count);
        let _ = writeln!(out, "  {:<18}{:>12}", "Salary expense", money(self.total_salary_expense));
        let _ = writeln!(out, "  {:<18}{:>12}", "Bonuses", money(self.total_bonuses));
        out
    }
}

impl TextReport for RepMetrics {
    fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} metrics for {} as of {}",
            self.timeframe, self.employee_id, self.as_of
        );
        let _ = writeln!(out, "  {:<18}{}", "Confirmed sales", self.sales_count);
        let _ = writeln!(out, "  {:<18}{:>12}", "Revenue", money(self.revenue));
        let _ = writeln!(out, "  {:<18}{:>12}", "Commission", money(self.commission));
        let _ = writeln!(out, "  {:<18}{:>12}", "Target", money(self.target));
        let _ = writeln!(out, "  {:<18}{:>11}%", "Progress", money(self.progress_percent));
        out
    }
}
