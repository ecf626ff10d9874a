//! Platform fee computation for withdrawals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;

/// Fee figures frozen onto a withdrawal request at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Percentage rate applied.
    pub platform_fee_percent: Decimal,
    /// Fee deducted, rounded to whole currency units.
    pub platform_fee: Money,
    /// Amount the consultant actually receives.
    pub actual_amount_paid: Money,
}

impl FeeBreakdown {
    /// Computes the fee for `amount` at `percent` percent.
    ///
    /// The fee never exceeds the amount, so the paid amount is never
    /// negative even for a misconfigured rate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use consultant_wallet::domain::value_objects::Money;
    /// use consultant_wallet::domain::withdrawal::FeeBreakdown;
    /// use rust_decimal::Decimal;
    ///
    /// let breakdown = FeeBreakdown::compute(Money::new(5000), Decimal::from(2));
    /// assert_eq!(breakdown.platform_fee, Money::new(100));
    /// assert_eq!(breakdown.actual_amount_paid, Money::new(4900));
    /// ```
    #[must_use]
    pub fn compute(amount: Money, percent: Decimal) -> Self {
        let platform_fee = amount.percentage(percent).min(amount).max(Money::zero());
        Self {
            platform_fee_percent: percent,
            platform_fee,
            actual_amount_paid: amount - platform_fee,
        }
    }
}
