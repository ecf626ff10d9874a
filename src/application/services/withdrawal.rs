//! Withdrawal orchestration.
//!
//! Each operation takes the owning wallet's lease, loads the records it
//! needs, validates the transition with the pure domain functions, applies
//! the matching ledger effect and commits wallet and request together. Only
//! after a successful commit is the event published.
//!
//! | Operation | From | To | Ledger effect |
//! |---|---|---|---|
//! | `request_withdrawal` | | pending | reserve |
//! | `approve` | pending | approved | |
//! | `start_processing` | approved | processing | |
//! | `complete` | processing | completed | settle |
//! | `reject` | pending, approved | cancelled | release |
//! | `fail` | processing | failed | release |

use std::sync::Arc;

use crate::application::errors::{ServiceError, ServiceResult};
use crate::application::ledger::{self, LedgerOutcome};
use crate::application::services::retry::retry_on_conflict;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{ConsultantId, Money, Timestamp, WithdrawalId};
use crate::domain::wallet::Wallet;
use crate::domain::withdrawal::{
    FeeBreakdown, MethodSelection, WithdrawalEvent, WithdrawalRequest, WithdrawalStatus,
};
use crate::infrastructure::{EventPublisher, LedgerCommit, LedgerStore, WalletConfig};

/// Drives withdrawal requests through their lifecycle.
#[derive(Clone)]
pub struct WithdrawalService {
    store: Arc<dyn LedgerStore>,
    publisher: EventPublisher,
    config: WalletConfig,
}

impl WithdrawalService {
    /// Creates a service over `store` publishing to `publisher`.
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        publisher: EventPublisher,
        config: WalletConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            config,
        }
    }

    /// Creates a pending withdrawal and reserves its amount.
    ///
    /// The platform fee is computed once here and frozen on the request.
    ///
    /// # Errors
    ///
    /// - `ServiceError::BelowMinimum` if `amount` is under the configured minimum
    /// - `ServiceError::WalletNotFound` if the consultant has no wallet
    /// - `ServiceError::InsufficientBalance` if available funds fall short
    /// - `ServiceError::PayoutMethodNotFound`, `ServiceError::NoDefaultPayoutMethod`
    ///   or `ServiceError::InvalidPayoutDestination` if the method cannot be resolved
    /// - `ServiceError::ConcurrencyConflict` if the wallet kept changing underneath
    #[tracing::instrument(skip_all, fields(consultant_id = %owner_id, amount = %amount))]
    pub async fn request_withdrawal(
        &self,
        owner_id: ConsultantId,
        amount: Money,
        selection: MethodSelection,
    ) -> ServiceResult<WithdrawalRequest> {
        if amount < self.config.minimum_withdrawal {
            return Err(ServiceError::BelowMinimum {
                requested: amount,
                minimum: self.config.minimum_withdrawal,
            });
        }

        let selection = &selection;
        let withdrawal_id = WithdrawalId::generate();
        let attempts = self.config.max_commit_attempts;
        let request = retry_on_conflict("request_withdrawal", attempts, move || {
            self.try_request(owner_id, withdrawal_id, amount, selection)
        })
        .await?;

        tracing::info!(
            %withdrawal_id,
            platform_fee = %request.fee.platform_fee,
            actual_amount_paid = %request.fee.actual_amount_paid,
            "withdrawal requested"
        );
        self.publish(&request);
        Ok(request)
    }

    async fn try_request(
        &self,
        owner_id: ConsultantId,
        withdrawal_id: WithdrawalId,
        amount: Money,
        selection: &MethodSelection,
    ) -> ServiceResult<WithdrawalRequest> {
        let _lease = self.store.lease_wallet(owner_id).await;
        let wallet = self.load_wallet(owner_id).await?;
        let snapshot = selection.resolve(&wallet.payout_methods)?;
        let fee = FeeBreakdown::compute(amount, self.config.platform_fee_percent);
        let at = Timestamp::now();

        let reserved = ledger::reserve_for_withdrawal(&wallet, amount, withdrawal_id, at)?;
        let request = WithdrawalRequest::new(withdrawal_id, owner_id, amount, snapshot, fee, at);

        self.store
            .commit(LedgerCommit::both(reserved, request.clone()))
            .await?;
        Ok(request)
    }

    /// `pending -> approved`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::RequestNotFound` or
    /// `ServiceError::InvalidStateTransition`.
    #[tracing::instrument(skip_all, fields(withdrawal_id = %withdrawal_id))]
    pub async fn approve(
        &self,
        withdrawal_id: WithdrawalId,
        notes: Option<String>,
    ) -> ServiceResult<WithdrawalRequest> {
        self.advance(withdrawal_id, "approve", move |request, at| {
            request.approve(notes.clone(), at)
        })
        .await
    }

    /// `approved -> processing`.
    ///
    /// # Errors
    ///
    /// Same as [`WithdrawalService::approve`].
    #[tracing::instrument(skip_all, fields(withdrawal_id = %withdrawal_id))]
    pub async fn start_processing(
        &self,
        withdrawal_id: WithdrawalId,
    ) -> ServiceResult<WithdrawalRequest> {
        self.advance(withdrawal_id, "start_processing", |request, at| {
            request.start_processing(at)
        })
        .await
    }

    /// `processing -> completed`. The reservation leaves pending and the net
    /// amount is added to the wallet's lifetime withdrawn total.
    ///
    /// # Errors
    ///
    /// Same as [`WithdrawalService::approve`], plus
    /// `ServiceError::WalletNotFound` if the wallet has disappeared.
    #[tracing::instrument(skip_all, fields(withdrawal_id = %withdrawal_id))]
    pub async fn complete(
        &self,
        withdrawal_id: WithdrawalId,
        external_reference: Option<String>,
    ) -> ServiceResult<WithdrawalRequest> {
        self.advance(withdrawal_id, "complete", move |request, at| {
            request.complete(external_reference.clone(), at)
        })
        .await
    }

    /// `pending | approved -> cancelled`. The reserved amount returns to the
    /// available balance and `reason` is kept as the admin notes.
    ///
    /// # Errors
    ///
    /// Same as [`WithdrawalService::complete`].
    #[tracing::instrument(skip_all, fields(withdrawal_id = %withdrawal_id))]
    pub async fn reject(
        &self,
        withdrawal_id: WithdrawalId,
        reason: impl Into<String>,
    ) -> ServiceResult<WithdrawalRequest> {
        let reason: String = reason.into();
        self.advance(withdrawal_id, "reject", move |request, at| {
            request.cancel(reason.clone(), at)
        })
        .await
    }

    /// `processing -> failed`. The reserved amount returns to the available
    /// balance and `reason` is kept as the admin notes.
    ///
    /// # Errors
    ///
    /// Same as [`WithdrawalService::complete`].
    #[tracing::instrument(skip_all, fields(withdrawal_id = %withdrawal_id))]
    pub async fn fail(
        &self,
        withdrawal_id: WithdrawalId,
        reason: impl Into<String>,
    ) -> ServiceResult<WithdrawalRequest> {
        let reason: String = reason.into();
        self.advance(withdrawal_id, "fail", move |request, at| {
            request.fail(reason.clone(), at)
        })
        .await
    }

    /// Looks up a withdrawal request.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::RequestNotFound` for an unknown id.
    pub async fn find(&self, withdrawal_id: WithdrawalId) -> ServiceResult<WithdrawalRequest> {
        self.load_request(withdrawal_id).await
    }

    /// Lists a consultant's withdrawal requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if the store failed.
    pub async fn list_for_consultant(
        &self,
        owner_id: ConsultantId,
    ) -> ServiceResult<Vec<WithdrawalRequest>> {
        Ok(self.store.list_withdrawals(owner_id).await?)
    }

    async fn advance<F>(
        &self,
        withdrawal_id: WithdrawalId,
        operation: &'static str,
        step: F,
    ) -> ServiceResult<WithdrawalRequest>
    where
        F: Fn(&WithdrawalRequest, Timestamp) -> DomainResult<WithdrawalRequest>,
    {
        let step = &step;
        let attempts = self.config.max_commit_attempts;
        let request = retry_on_conflict(operation, attempts, move || {
            self.try_advance(withdrawal_id, step)
        })
        .await?;

        tracing::info!(
            consultant_id = %request.owner_id,
            status = %request.status,
            "withdrawal {operation} committed"
        );
        self.publish(&request);
        Ok(request)
    }

    async fn try_advance<F>(
        &self,
        withdrawal_id: WithdrawalId,
        step: &F,
    ) -> ServiceResult<WithdrawalRequest>
    where
        F: Fn(&WithdrawalRequest, Timestamp) -> DomainResult<WithdrawalRequest>,
    {
        let owner_id = self.load_request(withdrawal_id).await?.owner_id;
        let _lease = self.store.lease_wallet(owner_id).await;
        // reload: another writer may have moved the request while we waited
        let current = self.load_request(withdrawal_id).await?;
        let at = Timestamp::now();
        let next = step(&current, at)?;

        let commit = match next.status {
            WithdrawalStatus::Completed => {
                let wallet = self.load_wallet(next.owner_id).await?;
                let outcome = ledger::settle_withdrawal(
                    &wallet,
                    next.amount,
                    next.fee.actual_amount_paid,
                    &next.method.destination,
                    next.id,
                    at,
                );
                LedgerCommit::both(checked(outcome, &next), next.clone())
            }
            WithdrawalStatus::Cancelled | WithdrawalStatus::Failed => {
                let wallet = self.load_wallet(next.owner_id).await?;
                let outcome = ledger::release_reservation(&wallet, next.amount, next.id, at);
                LedgerCommit::both(checked(outcome, &next), next.clone())
            }
            WithdrawalStatus::Pending
            | WithdrawalStatus::Approved
            | WithdrawalStatus::Processing => LedgerCommit::withdrawal(next.clone()),
        };

        self.store.commit(commit).await?;
        Ok(next)
    }

    async fn load_wallet(&self, owner_id: ConsultantId) -> ServiceResult<Wallet> {
        self.store
            .load_wallet(owner_id)
            .await?
            .ok_or(ServiceError::WalletNotFound(owner_id))
    }

    async fn load_request(&self, withdrawal_id: WithdrawalId) -> ServiceResult<WithdrawalRequest> {
        self.store
            .load_withdrawal(withdrawal_id)
            .await?
            .ok_or(ServiceError::RequestNotFound(withdrawal_id))
    }

    fn publish(&self, request: &WithdrawalRequest) {
        self.publisher
            .publish(WithdrawalEvent::for_request(request, Timestamp::now()));
    }
}

/// Logs a pending-bucket clamp and returns the wallet to commit.
fn checked(outcome: LedgerOutcome, request: &WithdrawalRequest) -> Wallet {
    if let Some(clamp) = outcome.clamp {
        tracing::warn!(
            consultant_id = %request.owner_id,
            withdrawal_id = %request.id,
            requested = %clamp.requested,
            held = %clamp.held,
            "pending balance clamped at zero"
        );
    }
    outcome.wallet
}
