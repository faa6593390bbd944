use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::company_settings::{CompanySettings, TieredBonusRates};

/// Per-representative adjustments layered over [`CompanySettings`].
///
/// Every field is optional; `None` keeps the company value. The tier table is
/// replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsOverride {
    pub base_salary: Option<Decimal>,
    pub sales_target: Option<u32>,
    pub revenue_target: Option<Decimal>,
    pub weekly_revenue_target: Option<Decimal>,
    pub monthly_revenue_target: Option<Decimal>,
    pub yearly_revenue_target: Option<Decimal>,
    pub daily_lead_target: Option<u32>,
    pub monthly_lead_target: Option<u32>,
    pub project_bonus_threshold: Option<Decimal>,
    pub project_bonus_rate: Option<Decimal>,
    pub deduction_per_missed_sale: Option<Decimal>,
    pub tiered_bonus_rates: Option<TieredBonusRates>,
    pub payment_schedule: Option<String>,
    pub working_hours: Option<String>,
}

impl SettingsOverride {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl CompanySettings {
    /// Returns the effective settings for one representative.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::{CompanySettings, SettingsOverride};
    ///
    /// let company = CompanySettings::default();
    /// let rep = SettingsOverride {
    ///     sales_target: Some(15),
    ///     ..SettingsOverride::default()
    /// };
    ///
    /// let effective = company.with_override(&rep);
    /// assert_eq!(effective.sales_target, 15);
    /// assert_eq!(effective.base_salary, dec!(30000));
    /// ```
    pub fn with_override(&self, rep: &SettingsOverride) -> CompanySettings {
        let company = self.clone();
        CompanySettings {
            base_salary: rep.base_salary.unwrap_or(company.base_salary),
            sales_target: rep.sales_target.unwrap_or(company.sales_target),
            revenue_target: rep.revenue_target.unwrap_or(company.revenue_target),
            weekly_revenue_target: rep
                .weekly_revenue_target
                .unwrap_or(company.weekly_revenue_target),
            monthly_revenue_target: rep
                .monthly_revenue_target
                .unwrap_or(company.monthly_revenue_target),
            yearly_revenue_target: rep
                .yearly_revenue_target
                .unwrap_or(company.yearly_revenue_target),
            daily_lead_target: rep.daily_lead_target.unwrap_or(company.daily_lead_target),
            monthly_lead_target: rep
                .monthly_lead_target
                .unwrap_or(company.monthly_lead_target),
            project_bonus_threshold: rep
                .project_bonus_threshold
                .unwrap_or(company.project_bonus_threshold),
            project_bonus_rate: rep.project_bonus_rate.unwrap_or(company.project_bonus_rate),
            deduction_per_missed_sale: rep
                .deduction_per_missed_sale
                .unwrap_or(company.deduction_per_missed_sale),
            tiered_bonus_rates: rep
                .tiered_bonus_rates
                .clone()
                .unwrap_or(company.tiered_bonus_rates),
            payment_schedule: rep
                .payment_schedule
                .clone()
                .unwrap_or(company.payment_schedule),
            working_hours: rep.working_hours.clone().unwrap_or(company.working_hours),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_override_keeps_company_settings() {
        let company = CompanySettings::default();

        let effective = company.with_override(&SettingsOverride::default());

        assert_eq!(effective, company);
        assert!(SettingsOverride::default().is_empty());
    }

    #[test]
    fn override_replaces_only_named_fields() {
        let company = CompanySettings::default();
        let rep = SettingsOverride {
            base_salary: Some(dec!(45000)),
            deduction_per_missed_sale: Some(dec!(2500)),
            working_hours: Some("10 AM - 7 PM".to_string()),
            ..SettingsOverride::default()
        };

        let effective = company.with_override(&rep);

        assert_eq!(effective.base_salary, dec!(45000));
        assert_eq!(effective.deduction_per_missed_sale, dec!(2500));
        assert_eq!(effective.working_hours, "10 AM - 7 PM");
        assert_eq!(effective.sales_target, company.sales_target);
        assert_eq!(effective.project_bonus_rate, company.project_bonus_rate);
        assert_eq!(effective.tiered_bonus_rates, company.tiered_bonus_rates);
        assert!(!rep.is_empty());
    }

    #[test]
    fn override_replaces_tier_table_whole() {
        let company = CompanySettings::default();
        let mut tiers = TieredBonusRates::default();
        tiers.tier1.amount = dec!(2500);
        let rep = SettingsOverride {
            tiered_bonus_rates: Some(tiers.clone()),
            ..SettingsOverride::default()
        };

        let effective = company.with_override(&rep);

        assert_eq!(effective.tiered_bonus_rates, tiers);
    }
}
