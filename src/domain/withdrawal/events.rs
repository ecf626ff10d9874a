//! Domain events raised by withdrawal transitions.
//!
//! One event is produced per committed transition. Events are published only
//! after the commit that produced them succeeded, so a consumer never sees a
//! change that was later rolled back.
//!
//! # Available Events
//!
//! - [`WithdrawalEventKind::RequestReceived`] - A request was created and funds reserved
//! - [`WithdrawalEventKind::Approved`] - An operator approved the request
//! - [`WithdrawalEventKind::Processing`] - The payout was handed to the provider
//! - [`WithdrawalEventKind::Completed`] - The payout settled
//! - [`WithdrawalEventKind::Cancelled`] - The request was rejected or cancelled
//! - [`WithdrawalEventKind::Failed`] - The payout failed and funds were released

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ConsultantId, EventId, Money, Timestamp, WithdrawalId};
use crate::domain::withdrawal::request::WithdrawalRequest;
use crate::domain::withdrawal::status::WithdrawalStatus;

/// What happened to a withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WithdrawalEventKind {
    /// The request was created in `pending`.
    RequestReceived {
        /// Fee deducted at payout.
        platform_fee: Money,
        /// Amount the consultant will receive.
        actual_amount_paid: Money,
    },
    /// An operator approved the request.
    Approved {
        /// Operator notes, if any.
        notes: Option<String>,
    },
    /// The payout is in flight.
    Processing,
    /// The payout settled.
    Completed {
        /// Provider reference for the payout.
        reference: Option<String>,
        /// Amount actually paid out.
        amount_paid: Money,
    },
    /// The request was rejected or cancelled before payout.
    Cancelled {
        /// Why it was cancelled.
        reason: String,
    },
    /// The payout failed.
    Failed {
        /// Why it failed.
        reason: String,
    },
}

/// Fact recorded for a committed withdrawal transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalEvent {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// Consultant the withdrawal belongs to.
    pub consultant_id: ConsultantId,
    /// Withdrawal the event is about.
    pub withdrawal_id: WithdrawalId,
    /// Gross amount of the withdrawal.
    pub amount: Money,
    /// Transition-specific details.
    #[serde(flatten)]
    pub kind: WithdrawalEventKind,
    /// When the transition was committed.
    pub occurred_at: Timestamp,
}

impl WithdrawalEvent {
    /// Builds the event matching the current status of `request`.
    #[must_use]
    pub fn for_request(request: &WithdrawalRequest, occurred_at: Timestamp) -> Self {
        let kind = match request.status {
            WithdrawalStatus::Pending => WithdrawalEventKind::RequestReceived {
                platform_fee: request.fee.platform_fee,
                actual_amount_paid: request.fee.actual_amount_paid,
            },
            WithdrawalStatus::Approved => WithdrawalEventKind::Approved {
                notes: request.admin_notes.clone(),
            },
            WithdrawalStatus::Processing => WithdrawalEventKind::Processing,
            WithdrawalStatus::Completed => WithdrawalEventKind::Completed {
                reference: request.external_reference.clone(),
                amount_paid: request.fee.actual_amount_paid,
            },
            WithdrawalStatus::Cancelled => WithdrawalEventKind::Cancelled {
                reason: request.admin_notes.clone().unwrap_or_default(),
            },
            WithdrawalStatus::Failed => WithdrawalEventKind::Failed {
                reason: request.admin_notes.clone().unwrap_or_default(),
            },
        };
        Self {
            event_id: EventId::generate(),
            consultant_id: request.owner_id,
            withdrawal_id: request.id,
            amount: request.amount,
            kind,
            occurred_at,
        }
    }

    /// Dotted event type name used on the wire.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self.kind {
            WithdrawalEventKind::RequestReceived { .. } => "withdrawal.request_received",
            WithdrawalEventKind::Approved { .. } => "withdrawal.approved",
            WithdrawalEventKind::Processing => "withdrawal.processing",
            WithdrawalEventKind::Completed { .. } => "withdrawal.completed",
            WithdrawalEventKind::Cancelled { .. } => "withdrawal.cancelled",
            WithdrawalEventKind::Failed { .. } => "withdrawal.failed",
        }
    }
}
