mod attendance;
mod company_settings;
mod pay_period;
mod payroll_calculation;
mod sale;
mod settings_override;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use company_settings::{CompanySettings, OpenTierRate, SettingsError, TierRate, TieredBonusRates};
pub use pay_period::{PayPeriod, PeriodError};
pub use payroll_calculation::{PayrollCalculation, TargetProgress};
pub use sale::{Sale, SaleStatus};
pub use settings_override::SettingsOverride;
