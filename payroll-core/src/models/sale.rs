use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a closed sale.
///
/// Only [`SaleStatus::Verified`] and [`SaleStatus::Delivered`] count as
/// confirmed for targets, bonuses and commissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    PendingReview,
    Verified,
    Rejected,
    Delivered,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PendingReview => "pending_review",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::Delivered => "delivered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "pending_review" => Some(Self::PendingReview),
            "verified" => Some(Self::Verified),
            "rejected" => Some(Self::Rejected),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// Maps the boolean confirmation flag used by payroll feeds onto a status.
    pub fn from_confirmed(confirmed: bool) -> Self {
        if confirmed { Self::Verified } else { Self::Pending }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Verified | Self::Delivered)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    /// Sales representative who closed the sale.
    pub employee_id: String,
    pub client_name: String,
    pub project_name: String,
    /// Full contracted value of the sale (invoice / total cost).
    pub invoice_amount: Decimal,
    /// Amount collected upfront.
    pub advance_amount: Decimal,
    pub date: NaiveDate,
    pub status: SaleStatus,
}

impl Sale {
    pub fn is_confirmed(&self) -> bool {
        self.status.is_confirmed()
    }
}
