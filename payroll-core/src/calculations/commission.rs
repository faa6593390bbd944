//! Per-sale commission eligibility.
//!
//! A sale earns a flat 10% commission on its project amount, but only when
//! the project is at least 50,000 and the advance collected covers at least
//! 20% of the project amount. The project-size rule is checked first, so a
//! small project with no advance reports the project-size reason.
//!
//! This policy is separate from the payroll project bonus, which uses the
//! employer-side threshold and rate from [`crate::CompanySettings`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::calculations::commission::calculate_commission;
//!
//! let result = calculate_commission(dec!(50000), dec!(10000));
//! assert!(result.is_valid);
//! assert_eq!(result.commission, dec!(5000));
//!
//! let result = calculate_commission(dec!(49999.99), dec!(49999.99));
//! assert!(!result.is_valid);
//! assert_eq!(result.message, "No commission for projects under 50K");
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Sale;

/// Smallest project amount that can earn a commission.
pub const MIN_PROJECT_AMOUNT: Decimal = Decimal::from_parts(50000, 0, 0, false, 0);

/// Fraction of the project amount that must be collected upfront (0.20).
pub const MIN_ADVANCE_PERCENTAGE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// Commission paid on an eligible project amount (0.10).
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

pub const PROJECT_TOO_SMALL: &str = "No commission for projects under 50K";
pub const ADVANCE_TOO_LOW: &str = "Advance must be at least 20% of project cost";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionResult {
    pub commission: Decimal,
    pub is_valid: bool,
    /// Reason the sale is ineligible; empty when valid.
    pub message: String,
}

impl CommissionResult {
    fn ineligible(reason: &str) -> Self {
        Self {
            commission: Decimal::ZERO,
            is_valid: false,
            message: reason.to_string(),
        }
    }
}

/// Evaluates commission eligibility for one sale's monetary terms.
///
/// Never fails: any pair of amounts, including zero or negative values, maps
/// to exactly one of the three outcomes.
pub fn calculate_commission(
    project_amount: Decimal,
    advance_amount: Decimal,
) -> CommissionResult {
    if project_amount < MIN_PROJECT_AMOUNT {
        return CommissionResult::ineligible(PROJECT_TOO_SMALL);
    }

    if advance_amount < project_amount * MIN_ADVANCE_PERCENTAGE {
        return CommissionResult::ineligible(ADVANCE_TOO_LOW);
    }

    CommissionResult {
        commission: project_amount * COMMISSION_RATE,
        is_valid: true,
        message: String::new(),
    }
}

/// [`calculate_commission`] over a sale's invoice and advance amounts.
pub fn evaluate_sale(sale: &Sale) -> CommissionResult {
    calculate_commission(sale.invoice_amount, sale.advance_amount)
}
