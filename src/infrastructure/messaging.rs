//! Conversion of withdrawal events into notification messages.
//!
//! A [`NotificationMessage`] is the flat, transport-ready form of a
//! [`WithdrawalEvent`]: identifiers and timestamps as strings plus the full
//! event as a JSON payload. The conversion is a pure function; delivery is the
//! business of a [`Notifier`](crate::infrastructure::Notifier).
//!
//! # Example
//!
//! ```rust,ignore
//! use consultant_wallet::infrastructure::event_to_message;
//!
//! let message = event_to_message(&event)?;
//! assert_eq!(message.event_type, "withdrawal.approved");
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::withdrawal::WithdrawalEvent;
use crate::infrastructure::notifier::NotifyError;

/// Message handed to a notifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Unique identifier of the event.
    pub event_id: String,
    /// Dotted event type, such as `withdrawal.completed`.
    pub event_type: String,
    /// Consultant to notify.
    pub consultant_id: String,
    /// Withdrawal the event is about.
    pub withdrawal_id: String,
    /// Full event serialized as JSON.
    pub payload: serde_json::Value,
    /// ISO 8601 time of the transition.
    pub occurred_at: String,
}

/// Converts a withdrawal event to a notification message.
///
/// # Errors
///
/// Returns `NotifyError::Serialization` if the event cannot be encoded as
/// JSON.
pub fn event_to_message(event: &WithdrawalEvent) -> Result<NotificationMessage, NotifyError> {
    let payload = serde_json::to_value(event)
        .map_err(|error| NotifyError::Serialization(error.to_string()))?;

    Ok(NotificationMessage {
        event_id: event.event_id.to_string(),
        event_type: event.event_type().to_string(),
        consultant_id: event.consultant_id.to_string(),
        withdrawal_id: event.withdrawal_id.to_string(),
        payload,
        occurred_at: event.occurred_at.to_iso_string(),
    })
}
