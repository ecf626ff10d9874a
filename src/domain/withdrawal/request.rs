//! Withdrawal request entity.
//!
//! A request is created in `pending` and only ever moves forward. Every
//! transition method is pure: it validates the current status and returns an
//! updated copy with the matching timestamp set and the version bumped. Once a
//! request reaches a terminal status it is never changed again.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{ConsultantId, Money, PayoutMethodId, Timestamp, WithdrawalId};
use crate::domain::wallet::{PayoutDestination, PayoutMethods};
use crate::domain::withdrawal::fee::FeeBreakdown;
use crate::domain::withdrawal::status::WithdrawalStatus;

/// Which payout destination a new withdrawal should use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "selection", content = "value", rename_all = "snake_case")]
pub enum MethodSelection {
    /// A saved method, by id.
    Saved(PayoutMethodId),
    /// The wallet's default method.
    Default,
    /// A destination used for this request only.
    OneOff(PayoutDestination),
}

impl MethodSelection {
    /// Resolves the selection against the wallet's saved methods and captures
    /// an immutable snapshot.
    ///
    /// # Errors
    ///
    /// - `DomainError::PayoutMethodNotFound` for an unknown saved id
    /// - `DomainError::NoDefaultPayoutMethod` if no default is set
    /// - `DomainError::InvalidPayoutDestination` for an incomplete one-off
    pub fn resolve(&self, methods: &PayoutMethods) -> DomainResult<PayoutSnapshot> {
        match self {
            Self::Saved(method_id) => methods
                .get(method_id)
                .map(|method| PayoutSnapshot {
                    method_id: Some(method.id),
                    destination: method.destination.clone(),
                })
                .ok_or(DomainError::PayoutMethodNotFound(*method_id)),
            Self::Default => methods
                .default_method()
                .map(|method| PayoutSnapshot {
                    method_id: Some(method.id),
                    destination: method.destination.clone(),
                })
                .ok_or(DomainError::NoDefaultPayoutMethod),
            Self::OneOff(destination) => {
                destination.validate()?;
                Ok(PayoutSnapshot {
                    method_id: None,
                    destination: destination.clone(),
                })
            }
        }
    }
}

/// Copy of the payout destination taken when the request was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutSnapshot {
    /// Saved method the snapshot came from, if any.
    pub method_id: Option<PayoutMethodId>,
    /// Destination details at request time.
    pub destination: PayoutDestination,
}

/// A consultant's request to withdraw funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Request identifier.
    pub id: WithdrawalId,
    /// Consultant who requested it.
    pub owner_id: ConsultantId,
    /// Gross amount reserved from the wallet.
    pub amount: Money,
    /// Current lifecycle status.
    pub status: WithdrawalStatus,
    /// Payout destination captured at request time.
    pub method: PayoutSnapshot,
    /// Fee figures frozen at request time.
    pub fee: FeeBreakdown,
    /// When the request was created.
    pub requested_at: Timestamp,
    /// When an operator approved it.
    pub approved_at: Option<Timestamp>,
    /// When the payout was started.
    pub processed_at: Option<Timestamp>,
    /// When the payout was confirmed.
    pub completed_at: Option<Timestamp>,
    /// When the request was rejected or cancelled.
    pub cancelled_at: Option<Timestamp>,
    /// When the payout failed.
    pub failed_at: Option<Timestamp>,
    /// Operator notes; holds the reason on rejection or failure.
    pub admin_notes: Option<String>,
    /// Payment provider reference for the payout.
    pub external_reference: Option<String>,
    /// Optimistic concurrency version, starting at 1.
    pub version: u64,
}

impl WithdrawalRequest {
    /// Creates a pending request at version 1.
    #[must_use]
    pub const fn new(
        id: WithdrawalId,
        owner_id: ConsultantId,
        amount: Money,
        method: PayoutSnapshot,
        fee: FeeBreakdown,
        requested_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            amount,
            status: WithdrawalStatus::Pending,
            method,
            fee,
            requested_at,
            approved_at: None,
            processed_at: None,
            completed_at: None,
            cancelled_at: None,
            failed_at: None,
            admin_notes: None,
            external_reference: None,
            version: 1,
        }
    }

    /// `pending -> approved`. Notes, when given, replace the admin notes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless pending.
    pub fn approve(&self, notes: Option<String>, at: Timestamp) -> DomainResult<Self> {
        let mut next = self.advance(WithdrawalStatus::Approved)?;
        next.approved_at = Some(at);
        if notes.is_some() {
            next.admin_notes = notes;
        }
        Ok(next)
    }

    /// `approved -> processing`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless approved.
    pub fn start_processing(&self, at: Timestamp) -> DomainResult<Self> {
        let mut next = self.advance(WithdrawalStatus::Processing)?;
        next.processed_at = Some(at);
        Ok(next)
    }

    /// `processing -> completed`, recording the provider reference.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless processing.
    pub fn complete(
        &self,
        external_reference: Option<String>,
        at: Timestamp,
    ) -> DomainResult<Self> {
        let mut next = self.advance(WithdrawalStatus::Completed)?;
        next.completed_at = Some(at);
        if external_reference.is_some() {
            next.external_reference = external_reference;
        }
        Ok(next)
    }

    /// `pending | approved -> cancelled`, storing the reason as admin notes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless pending or approved.
    pub fn cancel(&self, reason: impl Into<String>, at: Timestamp) -> DomainResult<Self> {
        let mut next = self.advance(WithdrawalStatus::Cancelled)?;
        next.cancelled_at = Some(at);
        next.admin_notes = Some(reason.into());
        Ok(next)
    }

    /// `processing -> failed`, storing the reason as admin notes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` unless processing.
    pub fn fail(&self, reason: impl Into<String>, at: Timestamp) -> DomainResult<Self> {
        let mut next = self.advance(WithdrawalStatus::Failed)?;
        next.failed_at = Some(at);
        next.admin_notes = Some(reason.into());
        Ok(next)
    }

    fn advance(&self, target: WithdrawalStatus) -> DomainResult<Self> {
        let status = self.status.transition_to(target)?;
        Ok(Self {
            status,
            version: self.version + 1,
            ..self.clone()
        })
    }
}
