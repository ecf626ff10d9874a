//! Reload-and-retry loop for optimistic commits.
//!
//! Writers that hold the wallet lease never race each other; conflicts come
//! from lease-free writers such as a balance query opening the wallet.

use std::future::Future;

use crate::application::errors::{ServiceError, ServiceResult};

/// Runs `attempt` until it succeeds, fails with anything other than a store
/// version conflict, or `max_attempts` conflicts have been seen.
///
/// Each call of `attempt` must reload the records it changes, so a retry
/// validates against the state that won the race. Business failures such as
/// `InsufficientBalance` are returned on the spot.
///
/// # Errors
///
/// Returns the first non-conflict error of `attempt`, or
/// `ServiceError::ConcurrencyConflict` once the attempts are used up.
pub async fn retry_on_conflict<T, F, Fut>(
    operation: &'static str,
    max_attempts: usize,
    mut attempt: F,
) -> ServiceResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ServiceResult<T>>,
{
    let max_attempts = max_attempts.max(1);
    for attempt_number in 1..=max_attempts {
        match attempt().await {
            Err(ServiceError::Storage(error)) if error.is_conflict() => {
                tracing::warn!(
                    operation,
                    attempt = attempt_number,
                    max_attempts,
                    %error,
                    "commit conflicted, reloading"
                );
                tokio::task::yield_now().await;
            }
            outcome => return outcome,
        }
    }
    tracing::warn!(operation, max_attempts, "giving up after repeated conflicts");
    Err(ServiceError::ConcurrencyConflict {
        attempts: max_attempts,
    })
}
