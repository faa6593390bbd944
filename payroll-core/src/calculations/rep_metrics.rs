//! Revenue KPIs for one representative over a reporting window.
//!
//! The commission shown here is a flat 10% estimate of confirmed revenue and
//! does not apply the per-sale eligibility rules of
//! [`commission`](crate::calculations::commission).

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::commission::COMMISSION_RATE;
use crate::calculations::common::{percent, round_half_up};
use crate::{CompanySettings, Sale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// Sunday through Saturday.
    Weekly,
    Monthly,
    Yearly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Whether `date` falls in the same window as `today`.
    pub fn contains(
        &self,
        today: NaiveDate,
        date: NaiveDate,
    ) -> bool {
        match self {
            Self::Weekly => {
                date.week(Weekday::Sun).first_day() == today.week(Weekday::Sun).first_day()
            }
            Self::Monthly => date.year() == today.year() && date.month() == today.month(),
            Self::Yearly => date.year() == today.year(),
        }
    }

    /// The revenue target for this window.
    pub fn target(
        &self,
        settings: &CompanySettings,
    ) -> Decimal {
        match self {
            Self::Weekly => settings.weekly_revenue_target,
            Self::Monthly => settings.monthly_revenue_target,
            Self::Yearly => settings.yearly_revenue_target,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepMetrics {
    pub employee_id: String,
    pub timeframe: Timeframe,
    pub as_of: NaiveDate,
    pub sales_count: u32,
    pub revenue: Decimal,
    pub commission: Decimal,
    pub target: Decimal,
    /// Revenue as a percentage of target, capped at 100.
    pub progress_percent: Decimal,
    /// Confirmed sales in the window, oldest first.
    pub series: Vec<RevenuePoint>,
}

/// Computes the representative's KPIs for the window around `today`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::rep_metrics::{rep_metrics, Timeframe};
/// use payroll_core::{CompanySettings, Sale, SaleStatus};
///
/// let sale = Sale {
///     id: "s-1".to_string(),
///     employee_id: "rep-1".to_string(),
///     client_name: "Acme".to_string(),
///     project_name: "Portal".to_string(),
///     invoice_amount: dec!(250000),
///     advance_amount: dec!(0),
///     date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
///     status: SaleStatus::Delivered,
/// };
/// let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
///
/// let metrics = rep_metrics("rep-1", &[sale], &CompanySettings::default(), Timeframe::Monthly, today);
///
/// assert_eq!(metrics.commission, dec!(25000));
/// assert_eq!(metrics.progress_percent, dec!(50));
/// ```
pub fn rep_metrics(
    employee_id: &str,
    sales: &[Sale],
    settings: &CompanySettings,
    timeframe: Timeframe,
    today: NaiveDate,
) -> RepMetrics {
    let mut window: Vec<&Sale> = sales
        .iter()
        .filter(|sale| sale.employee_id == employee_id && sale.is_confirmed())
        .filter(|sale| timeframe.contains(today, sale.date))
        .collect();
    window.sort_by_key(|sale| sale.date);

    let revenue: Decimal = window.iter().map(|sale| sale.invoice_amount).sum();
    let target = timeframe.target(settings);
    let progress_percent = if target.is_zero() {
        warn!(%timeframe, "Revenue target is zero; progress reported as 0");
        Decimal::ZERO
    } else {
        // Too large to represent means far past the cap.
        percent(revenue, target).map_or(Decimal::ONE_HUNDRED, |p| p.min(Decimal::ONE_HUNDRED))
    };

    RepMetrics {
        employee_id: employee_id.to_string(),
        timeframe,
        as_of: today,
        sales_count: window.len() as u32,
        revenue: round_half_up(revenue),
        commission: round_half_up(revenue * COMMISSION_RATE),
        target,
        progress_percent: round_half_up(progress_percent),
        series: window
            .iter()
            .map(|sale| RevenuePoint {
                date: sale.date,
                amount: sale.invoice_amount,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::SaleStatus;

    fn date(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(
        employee_id: &str,
        on: NaiveDate,
        invoice_amount: Decimal,
        status: SaleStatus,
    ) -> Sale {
        Sale {
            id: format!("{employee_id}-{on}"),
            employee_id: employee_id.to_string(),
            client_name: "Client".to_string(),
            project_name: "Project".to_string(),
            invoice_amount,
            advance_amount: dec!(0),
            date: on,
            status,
        }
    }

    // =========================================================================
    // Timeframe tests
    // =========================================================================

    #[test]
    fn weekly_window_runs_sunday_to_saturday() {
        // 2025-06-18 is a Wednesday
        let today = date(2025, 6, 18);

        assert!(Timeframe::Weekly.contains(today, date(2025, 6, 15)));
        assert!(Timeframe::Weekly.contains(today, date(2025, 6, 21)));
        assert!(!Timeframe::Weekly.contains(today, date(2025, 6, 14)));
        assert!(!Timeframe::Weekly.contains(today, date(2025, 6, 22)));
    }

    #[test]
    fn monthly_window_is_calendar_month() {
        let today = date(2025, 6, 1);

        assert!(Timeframe::Monthly.contains(today, date(2025, 6, 30)));
        assert!(!Timeframe::Monthly.contains(today, date(2025, 5, 31)));
        assert!(!Timeframe::Monthly.contains(today, date(2024, 6, 10)));
    }

    #[test]
    fn yearly_window_is_calendar_year() {
        let today = date(2025, 6, 1);

        assert!(Timeframe::Yearly.contains(today, date(2025, 1, 1)));
        assert!(Timeframe::Yearly.contains(today, date(2025, 12, 31)));
        assert!(!Timeframe::Yearly.contains(today, date(2024, 12, 31)));
    }

    #[test]
    fn timeframe_parse_round_trips_names() {
        for timeframe in [Timeframe::Weekly, Timeframe::Monthly, Timeframe::Yearly] {
            assert_eq!(Timeframe::parse(timeframe.as_str()), Some(timeframe));
        }
        assert_eq!(Timeframe::parse("daily"), None);
    }

    // =========================================================================
    // rep_metrics tests
    // =========================================================================

    #[test]
    fn rep_metrics_sums_confirmed_sales_in_window() {
        let today = date(2025, 6, 18);
        let sales = vec![
            sale("rep-1", date(2025, 6, 17), dec!(30000), SaleStatus::Verified),
            sale("rep-1", date(2025, 6, 16), dec!(20000), SaleStatus::Delivered),
            sale("rep-1", date(2025, 6, 16), dec!(90000), SaleStatus::Pending),
            sale("rep-1", date(2025, 6, 10), dec!(70000), SaleStatus::Verified),
            sale("rep-2", date(2025, 6, 17), dec!(45000), SaleStatus::Verified),
        ];

        let metrics = rep_metrics(
            "rep-1",
            &sales,
            &CompanySettings::default(),
            Timeframe::Weekly,
            today,
        );

        assert_eq!(
            metrics,
            RepMetrics {
                employee_id: "rep-1".to_string(),
                timeframe: Timeframe::Weekly,
                as_of: today,
                sales_count: 2,
                revenue: dec!(50000),
                commission: dec!(5000),
                target: dec!(100000),
                progress_percent: dec!(50),
                series: vec![
                    RevenuePoint {
                        date: date(2025, 6, 16),
                        amount: dec!(20000),
                    },
                    RevenuePoint {
                        date: date(2025, 6, 17),
                        amount: dec!(30000),
                    },
                ],
            }
        );
    }

    #[test]
    fn rep_metrics_caps_progress_at_one_hundred() {
        let today = date(2025, 3, 9);
        let sales = vec![
            sale("rep-1", date(2025, 1, 9), dec!(3000000), SaleStatus::Verified),
            sale("rep-1", date(2025, 2, 9), dec!(2500000), SaleStatus::Verified),
        ];

        let metrics = rep_metrics(
            "rep-1",
            &sales,
            &CompanySettings::default(),
            Timeframe::Yearly,
            today,
        );

        assert_eq!(metrics.revenue, dec!(5500000));
        assert_eq!(metrics.progress_percent, dec!(100));
    }

    #[test]
    fn rep_metrics_caps_progress_too_large_to_represent() {
        let settings = CompanySettings {
            monthly_revenue_target: dec!(1),
            ..CompanySettings::default()
        };
        let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        let today = date(2025, 6, 18);
        let sales = vec![sale("rep-1", date(2025, 6, 2), huge, SaleStatus::Verified)];

        let metrics = rep_metrics("rep-1", &sales, &settings, Timeframe::Monthly, today);

        assert_eq!(metrics.revenue, huge);
        assert_eq!(metrics.progress_percent, dec!(100));
    }

    #[test]
    fn rep_metrics_commission_ignores_eligibility_rules() {
        let today = date(2025, 6, 18);
        let sales = vec![sale("rep-1", date(2025, 6, 2), dec!(12000), SaleStatus::Verified)];

        let metrics = rep_metrics(
            "rep-1",
            &sales,
            &CompanySettings::default(),
            Timeframe::Monthly,
            today,
        );

        assert_eq!(metrics.commission, dec!(1200));
    }

    #[test]
    fn rep_metrics_zero_target_reports_zero_progress() {
        let settings = CompanySettings {
            monthly_revenue_target: dec!(0),
            ..CompanySettings::default()
        };
        let today = date(2025, 6, 18);
        let sales = vec![sale("rep-1", date(2025, 6, 2), dec!(12000), SaleStatus::Verified)];

        let metrics = rep_metrics("rep-1", &sales, &settings, Timeframe::Monthly, today);

        assert_eq!(metrics.progress_percent, dec!(0));
        assert_eq!(metrics.revenue, dec!(12000));
    }

    #[test]
    fn rep_metrics_without_sales_is_zero() {
        let metrics = rep_metrics(
            "rep-1",
            &[],
            &CompanySettings::default(),
            Timeframe::Monthly,
            date(2025, 6, 18),
        );

        assert_eq!(metrics.sales_count, 0);
        assert_eq!(metrics.revenue, dec!(0));
        assert_eq!(metrics.progress_percent, dec!(0));
        assert!(metrics.series.is_empty());
    }
}
