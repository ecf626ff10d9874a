//! Errors surfaced by the wallet and withdrawal services.

use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{ConsultantId, Money, PayoutMethodId, WithdrawalId};
use crate::domain::withdrawal::WithdrawalStatus;
use crate::infrastructure::StoreError;

/// Coarse category of a service error, for mapping onto transport status
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Resource not found (HTTP 404).
    NotFound,
    /// Bad request due to invalid input (HTTP 400).
    BadRequest,
    /// Conflict with current state (HTTP 409).
    Conflict,
    /// Internal server error (HTTP 500).
    Internal,
}

/// Failure of a service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The requested amount is below the configured minimum.
    #[error("Withdrawal of {requested} is below the minimum of {minimum}")]
    BelowMinimum {
        /// The amount that was requested.
        requested: Money,
        /// The configured minimum.
        minimum: Money,
    },

    /// The available balance does not cover the requested amount.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// The amount that was requested.
        requested: Money,
        /// The available balance at the time of the check.
        available: Money,
    },

    /// The consultant has no wallet.
    #[error("Wallet not found for consultant {0}")]
    WalletNotFound(ConsultantId),

    /// No withdrawal request has this id.
    #[error("Withdrawal request not found: {0}")]
    RequestNotFound(WithdrawalId),

    /// The request is not in a status that allows the transition.
    #[error("Invalid state transition: cannot move withdrawal from {current} to {attempted}")]
    InvalidStateTransition {
        /// The status the request is currently in.
        current: WithdrawalStatus,
        /// The status the caller tried to move it to.
        attempted: WithdrawalStatus,
    },

    /// The amount is not valid for the operation.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The wallet has no saved payout method with this id.
    #[error("Payout method not found: {0}")]
    PayoutMethodNotFound(PayoutMethodId),

    /// A default payout method was requested but none is set.
    #[error("No default payout method is set")]
    NoDefaultPayoutMethod,

    /// A payout destination is missing a required attribute.
    #[error("Invalid payout destination: {0}")]
    InvalidPayoutDestination(String),

    /// Concurrent updates kept invalidating the operation.
    #[error("Concurrent modification: gave up after {attempts} attempts")]
    ConcurrencyConflict {
        /// Commit attempts made.
        attempts: usize,
    },

    /// The store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ServiceError {
    /// Maps this error to a transport-neutral category.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use consultant_wallet::application::{ErrorKind, ServiceError};
    /// use consultant_wallet::domain::WithdrawalId;
    ///
    /// let error = ServiceError::RequestNotFound(WithdrawalId::generate());
    /// assert_eq!(error.kind(), ErrorKind::NotFound);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::WalletNotFound(_) | Self::RequestNotFound(_) | Self::PayoutMethodNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::BelowMinimum { .. }
            | Self::InsufficientBalance { .. }
            | Self::InvalidAmount(_)
            | Self::NoDefaultPayoutMethod
            | Self::InvalidPayoutDestination(_) => ErrorKind::BadRequest,
            Self::InvalidStateTransition { .. } | Self::ConcurrencyConflict { .. } => {
                ErrorKind::Conflict
            }
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InsufficientBalance {
                requested,
                available,
            } => Self::InsufficientBalance {
                requested,
                available,
            },
            DomainError::InvalidAmount(reason) => Self::InvalidAmount(reason),
            DomainError::InvalidStateTransition { current, attempted } => {
                Self::InvalidStateTransition { current, attempted }
            }
            DomainError::PayoutMethodNotFound(method_id) => Self::PayoutMethodNotFound(method_id),
            DomainError::NoDefaultPayoutMethod => Self::NoDefaultPayoutMethod,
            DomainError::InvalidPayoutDestination(reason) => Self::InvalidPayoutDestination(reason),
        }
    }
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
