use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by [`CompanySettings::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("base salary must be non-negative, got {0}")]
    NegativeBaseSalary(Decimal),

    #[error("revenue target must be non-negative, got {0}")]
    NegativeRevenueTarget(Decimal),

    #[error("project bonus threshold must be non-negative, got {0}")]
    NegativeProjectBonusThreshold(Decimal),

    #[error("project bonus rate must be between 0 and 1, got {0}")]
    InvalidProjectBonusRate(Decimal),

    #[error("deduction per missed sale must be non-negative, got {0}")]
    NegativeDeductionPerMissedSale(Decimal),

    #[error("tier {tier} bonus amount must be non-negative, got {amount}")]
    NegativeTierAmount { tier: u8, amount: Decimal },
}

/// A bounded sales-count band paying a flat amount per sale inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRate {
    pub min: u32,
    pub max: u32,
    pub amount: Decimal,
}

/// The top band, open-ended upward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTierRate {
    pub min: u32,
    pub amount: Decimal,
}

/// Per-sale bonus amounts for the four sales-count bands.
///
/// `min`/`max` are descriptive. The payroll calculator applies the fixed
/// breakpoints 13-15, 16-20, 21-25 and 26+ and only reads `amount` from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredBonusRates {
    pub tier1: TierRate,
    pub tier2: TierRate,
    pub tier3: TierRate,
    pub tier4: OpenTierRate,
}

impl Default for TieredBonusRates {
    fn default() -> Self {
        Self {
            tier1: TierRate {
                min: 13,
                max: 15,
                amount: Decimal::from(2000),
            },
            tier2: TierRate {
                min: 16,
                max: 20,
                amount: Decimal::from(3000),
            },
            tier3: TierRate {
                min: 21,
                max: 25,
                amount: Decimal::from(4000),
            },
            tier4: OpenTierRate {
                min: 26,
                amount: Decimal::from(6000),
            },
        }
    }
}

/// Company-wide compensation policy.
///
/// Missing fields take their documented defaults when deserialized, so a
/// settings file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanySettings {
    /// Monthly salary at full attendance with no deductions.
    pub base_salary: Decimal,
    /// Confirmed sales expected per month.
    pub sales_target: u32,
    pub revenue_target: Decimal,
    pub weekly_revenue_target: Decimal,
    pub monthly_revenue_target: Decimal,
    pub yearly_revenue_target: Decimal,
    pub daily_lead_target: u32,
    pub monthly_lead_target: u32,
    /// A confirmed sale must exceed this amount to earn a project bonus.
    pub project_bonus_threshold: Decimal,
    pub project_bonus_rate: Decimal,
    pub deduction_per_missed_sale: Decimal,
    pub tiered_bonus_rates: TieredBonusRates,
    pub payment_schedule: String,
    pub working_hours: String,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            base_salary: Decimal::from(30000),
            sales_target: 12,
            revenue_target: Decimal::from(400000),
            weekly_revenue_target: Decimal::from(100000),
            monthly_revenue_target: Decimal::from(500000),
            yearly_revenue_target: Decimal::from(4800000),
            daily_lead_target: 8,
            monthly_lead_target: 200,
            project_bonus_threshold: Decimal::from(50000),
            project_bonus_rate: Decimal::new(5, 2),
            deduction_per_missed_sale: Decimal::from(4000),
            tiered_bonus_rates: TieredBonusRates::default(),
            payment_schedule: "Paid between 1st and 7th of next month".to_string(),
            working_hours: "9:00 AM – 6:00 PM, Monday–Saturday (Fridays off)".to_string(),
        }
    }
}

impl CompanySettings {
    /// Validates the monetary policy values.
    ///
    /// Zero targets are accepted; the calculators report zero progress for
    /// them instead of dividing by zero.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if:
    /// - any monetary amount is negative
    /// - `project_bonus_rate` is not in [0, 1]
    /// - any tier amount is negative
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::{CompanySettings, SettingsError};
    ///
    /// let settings = CompanySettings {
    ///     project_bonus_rate: dec!(1.5),
    ///     ..CompanySettings::default()
    /// };
    ///
    /// assert_eq!(
    ///     settings.validate(),
    ///     Err(SettingsError::InvalidProjectBonusRate(dec!(1.5)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.base_salary < Decimal::ZERO {
            return Err(SettingsError::NegativeBaseSalary(self.base_salary));
        }
        if self.revenue_target < Decimal::ZERO {
            return Err(SettingsError::NegativeRevenueTarget(self.revenue_target));
        }
        if self.project_bonus_threshold < Decimal::ZERO {
            return Err(SettingsError::NegativeProjectBonusThreshold(
                self.project_bonus_threshold,
            ));
        }
        if self.project_bonus_rate < Decimal::ZERO || self.project_bonus_rate > Decimal::ONE {
            return Err(SettingsError::InvalidProjectBonusRate(
                self.project_bonus_rate,
            ));
        }
        if self.deduction_per_missed_sale < Decimal::ZERO {
            return Err(SettingsError::NegativeDeductionPerMissedSale(
                self.deduction_per_missed_sale,
            ));
        }

        let tiers = &self.tiered_bonus_rates;
        let amounts = [
            tiers.tier1.amount,
            tiers.tier2.amount,
            tiers.tier3.amount,
            tiers.tier4.amount,
        ];
        for (index, amount) in amounts.into_iter().enumerate() {
            if amount < Decimal::ZERO {
                return Err(SettingsError::NegativeTierAmount {
                    tier: index as u8 + 1,
                    amount,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let settings = CompanySettings::default();

        assert_eq!(settings.base_salary, dec!(30000));
        assert_eq!(settings.sales_target, 12);
        assert_eq!(settings.revenue_target, dec!(400000));
        assert_eq!(settings.project_bonus_threshold, dec!(50000));
        assert_eq!(settings.project_bonus_rate, dec!(0.05));
        assert_eq!(settings.deduction_per_missed_sale, dec!(4000));
        assert_eq!(settings.tiered_bonus_rates.tier1.amount, dec!(2000));
        assert_eq!(settings.tiered_bonus_rates.tier2.amount, dec!(3000));
        assert_eq!(settings.tiered_bonus_rates.tier3.amount, dec!(4000));
        assert_eq!(settings.tiered_bonus_rates.tier4.amount, dec!(6000));
        assert_eq!(settings.tiered_bonus_rates.tier4.min, 26);
    }

    #[test]
    fn validate_accepts_defaults() {
        assert_eq!(CompanySettings::default().validate(), Ok(()));
    }

    #[test]
    fn validate_accepts_zero_targets() {
        let settings = CompanySettings {
            sales_target: 0,
            revenue_target: dec!(0),
            ..CompanySettings::default()
        };

        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_base_salary() {
        let settings = CompanySettings {
            base_salary: dec!(-1),
            ..CompanySettings::default()
        };

        assert_eq!(
            settings.validate(),
            Err(SettingsError::NegativeBaseSalary(dec!(-1)))
        );
    }

    #[test]
    fn validate_rejects_bonus_rate_above_one() {
        let settings = CompanySettings {
            project_bonus_rate: dec!(1.01),
            ..CompanySettings::default()
        };

        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvalidProjectBonusRate(dec!(1.01)))
        );
    }

    #[test]
    fn validate_accepts_bonus_rate_bounds() {
        for rate in [dec!(0), dec!(1)] {
            let settings = CompanySettings {
                project_bonus_rate: rate,
                ..CompanySettings::default()
            };
            assert_eq!(settings.validate(), Ok(()));
        }
    }

    #[test]
    fn validate_rejects_negative_deduction() {
        let settings = CompanySettings {
            deduction_per_missed_sale: dec!(-4000),
            ..CompanySettings::default()
        };

        assert_eq!(
            settings.validate(),
            Err(SettingsError::NegativeDeductionPerMissedSale(dec!(-4000)))
        );
    }

    #[test]
    fn validate_names_the_offending_tier() {
        let mut settings = CompanySettings::default();
        settings.tiered_bonus_rates.tier3.amount = dec!(-10);

        assert_eq!(
            settings.validate(),
            Err(SettingsError::NegativeTierAmount {
                tier: 3,
                amount: dec!(-10)
            })
        );
    }
}
