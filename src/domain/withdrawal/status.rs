//! Withdrawal status and the transitions between statuses.
//!
//! ```text
//! pending -> approved -> processing -> completed
//!    |          |             |
//!    +----------+--> cancelled +--> failed
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Lifecycle status of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Requested, funds reserved, awaiting review.
    #[default]
    Pending,
    /// Approved by an operator, not yet sent.
    Approved,
    /// Payout handed to the payment provider.
    Processing,
    /// Paid out.
    Completed,
    /// The payout provider reported a failure.
    Failed,
    /// Rejected or cancelled before payout.
    Cancelled,
}

impl WithdrawalStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Approved,
        Self::Processing,
        Self::Completed,
        Self::Failed,
        Self::Cancelled,
    ];

    /// Returns `true` for statuses that accept no further transition.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns `true` while the request still holds reserved funds.
    #[must_use]
    pub const fn holds_reservation(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved | Self::Processing)
    }

    /// Returns `true` if moving from `self` to `target` is a legal step.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Approved | Self::Cancelled)
                | (Self::Approved, Self::Processing | Self::Cancelled)
                | (Self::Processing, Self::Completed | Self::Failed)
        )
    }

    /// Validates a transition and returns the target status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` naming both statuses
    /// when the step is not legal.
    pub const fn transition_to(self, target: Self) -> DomainResult<Self> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(DomainError::InvalidStateTransition {
                current: self,
                attempted: target,
            })
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        formatter.write_str(label)
    }
}
