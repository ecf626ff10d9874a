//! Domain errors for wallet and withdrawal rules.
//!
//! These are the failures the pure domain functions can report. The
//! application layer lifts them into `ServiceError` together with the
//! not-found and storage failures that only exist at that boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Money, PayoutMethodId};
use crate::domain::withdrawal::WithdrawalStatus;

/// Errors raised by wallet and withdrawal domain rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    /// The available balance does not cover the requested amount.
    InsufficientBalance {
        /// The amount that was requested.
        requested: Money,
        /// The available balance at the time of the check.
        available: Money,
    },

    /// The amount is not valid for the operation (zero or negative).
    InvalidAmount(String),

    /// A withdrawal transition was attempted from an incompatible status.
    InvalidStateTransition {
        /// The status the request is currently in.
        current: WithdrawalStatus,
        /// The status the caller tried to move it to.
        attempted: WithdrawalStatus,
    },

    /// The wallet has no saved payout method with this id.
    PayoutMethodNotFound(PayoutMethodId),

    /// A default payout method was requested but none is set.
    NoDefaultPayoutMethod,

    /// A payout destination is missing a required attribute.
    InvalidPayoutDestination(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientBalance {
                requested,
                available,
            } => write!(
                formatter,
                "Insufficient balance: requested {requested}, available {available}"
            ),
            Self::InvalidAmount(reason) => write!(formatter, "Invalid amount: {reason}"),
            Self::InvalidStateTransition { current, attempted } => write!(
                formatter,
                "Invalid state transition: cannot move withdrawal from {current} to {attempted}"
            ),
            Self::PayoutMethodNotFound(method_id) => {
                write!(formatter, "Payout method not found: {method_id}")
            }
            Self::NoDefaultPayoutMethod => write!(formatter, "No default payout method is set"),
            Self::InvalidPayoutDestination(reason) => {
                write!(formatter, "Invalid payout destination: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
