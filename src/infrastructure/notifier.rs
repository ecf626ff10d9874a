//! Notification dispatch.
//!
//! Services hand committed [`WithdrawalEvent`]s to an [`EventPublisher`],
//! which enqueues them on a bounded channel without waiting. A dispatcher
//! task drains the channel, converts each event with
//! [`event_to_message`] and passes it to a [`Notifier`]. Full channels,
//! closed channels and notifier failures are logged and dropped; they never
//! reach the service that produced the event.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::domain::withdrawal::WithdrawalEvent;
use crate::infrastructure::messaging::{NotificationMessage, event_to_message};

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised while delivering a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The event could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The downstream channel rejected the message.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

// =============================================================================
// Notifier
// =============================================================================

/// Outbound notification channel (email, push, webhook...).
pub trait Notifier: Send + Sync {
    /// Delivers one message.
    fn notify(&self, message: NotificationMessage) -> BoxFuture<'_, Result<(), NotifyError>>;
}

/// Notifier that writes every message to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, message: NotificationMessage) -> BoxFuture<'_, Result<(), NotifyError>> {
        async move {
            tracing::info!(
                event_type = %message.event_type,
                consultant_id = %message.consultant_id,
                withdrawal_id = %message.withdrawal_id,
                "notification dispatched"
            );
            Ok(())
        }
        .boxed()
    }
}

/// Notifier that keeps delivered messages in memory.
///
/// Built with [`InMemoryNotifier::failing`] it rejects every message instead,
/// which is how callers check that delivery failures stay contained.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    messages: Arc<Mutex<Vec<NotificationMessage>>>,
    fail: bool,
}

impl InMemoryNotifier {
    /// Creates a notifier that records messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier that rejects every message.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Messages delivered so far, in delivery order.
    #[must_use]
    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.messages.lock().clone()
    }

    /// Event types delivered so far, in delivery order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .map(|message| message.event_type.clone())
            .collect()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, message: NotificationMessage) -> BoxFuture<'_, Result<(), NotifyError>> {
        async move {
            if self.fail {
                return Err(NotifyError::Delivery(format!(
                    "rejected {}",
                    message.event_type
                )));
            }
            self.messages.lock().push(message);
            Ok(())
        }
        .boxed()
    }
}

// =============================================================================
// Publisher / Dispatcher
// =============================================================================

/// Non-blocking handle services use to publish committed events.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: Option<mpsc::Sender<WithdrawalEvent>>,
}

impl EventPublisher {
    /// Creates a publisher and the receiving end of its bounded channel.
    #[must_use]
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<WithdrawalEvent>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Creates a publisher and spawns a dispatcher delivering to `notifier`.
    ///
    /// Must be called from within a tokio runtime. The dispatcher stops once
    /// every clone of the publisher has been dropped.
    pub fn spawn(buffer: usize, notifier: Arc<dyn Notifier>) -> (Self, JoinHandle<()>) {
        let (publisher, receiver) = Self::channel(buffer);
        (publisher, spawn_dispatcher(receiver, notifier))
    }

    /// Creates a publisher that discards every event.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { sender: None }
    }

    /// Enqueues an event without waiting. Returns `true` if it was accepted.
    pub fn publish(&self, event: WithdrawalEvent) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };
        match sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    event_type = event.event_type(),
                    withdrawal_id = %event.withdrawal_id,
                    "notification channel full, event dropped"
                );
                false
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(
                    event_type = event.event_type(),
                    withdrawal_id = %event.withdrawal_id,
                    "notification channel closed, event dropped"
                );
                false
            }
        }
    }
}

/// Spawns a task delivering every received event to `notifier`.
pub fn spawn_dispatcher(
    mut receiver: mpsc::Receiver<WithdrawalEvent>,
    notifier: Arc<dyn Notifier>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            let delivery = match event_to_message(&event) {
                Ok(message) => notifier.notify(message).await,
                Err(error) => Err(error),
            };
            if let Err(error) = delivery {
                tracing::warn!(
                    event_type = event.event_type(),
                    withdrawal_id = %event.withdrawal_id,
                    %error,
                    "notification failed"
                );
            }
        }
        tracing::debug!("notification dispatcher stopped");
    })
}
