//! Wallet service: earnings, balances and payout methods.
//!
//! Wallets are created lazily, the first time a consultant is credited or
//! asks for a balance. Every mutation takes the wallet's lease, loads the
//! wallet, applies a pure ledger or payout method operation and commits the
//! next revision before releasing the lease. A version conflict can still
//! come from a writer outside the lease; the whole step is then repeated
//! against the fresh record.

use std::sync::Arc;

use crate::application::errors::{ServiceError, ServiceResult};
use crate::application::ledger::{self, IdempotencyCheckResult};
use crate::application::services::retry::retry_on_conflict;
use crate::domain::value_objects::{ConsultantId, Money, OrderReference, PayoutMethodId, Timestamp};
use crate::domain::wallet::{PayoutDestination, PayoutMethod, Wallet, WalletTransaction};
use crate::infrastructure::{LedgerCommit, LedgerStore, StoreError, WalletConfig};

/// Result of crediting earnings for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EarningOutcome {
    /// The earnings were credited; holds the committed wallet.
    Credited(Wallet),
    /// The order had been credited before; holds the unchanged wallet.
    AlreadyCredited(Wallet),
}

impl EarningOutcome {
    /// The wallet after the operation.
    #[must_use]
    pub const fn wallet(&self) -> &Wallet {
        match self {
            Self::Credited(wallet) | Self::AlreadyCredited(wallet) => wallet,
        }
    }

    /// Returns `true` if this call moved money.
    #[must_use]
    pub const fn is_credited(&self) -> bool {
        matches!(self, Self::Credited(_))
    }
}

/// Earnings intake, balance queries and payout method management.
#[derive(Clone)]
pub struct WalletService {
    store: Arc<dyn LedgerStore>,
    config: WalletConfig,
}

impl WalletService {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, config: WalletConfig) -> Self {
        Self { store, config }
    }

    /// Credits earnings from a completed order.
    ///
    /// Crediting the same order twice is a no-op reported as
    /// [`EarningOutcome::AlreadyCredited`].
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidAmount` for a non-positive amount,
    /// `ServiceError::ConcurrencyConflict` if the wallet kept changing
    /// underneath, or `ServiceError::Storage` if the store failed.
    #[tracing::instrument(
        skip_all,
        fields(consultant_id = %owner_id, amount = %amount, order = %order)
    )]
    pub async fn credit_earning(
        &self,
        owner_id: ConsultantId,
        amount: Money,
        order: OrderReference,
    ) -> ServiceResult<EarningOutcome> {
        let order = &order;
        let attempts = self.config.max_commit_attempts;
        let outcome = retry_on_conflict("credit_earning", attempts, move || {
            self.try_credit_earning(owner_id, amount, order)
        })
        .await?;

        match &outcome {
            EarningOutcome::Credited(wallet) => tracing::info!(
                available = %wallet.available_balance,
                total_earnings = %wallet.total_earnings,
                "earnings credited"
            ),
            EarningOutcome::AlreadyCredited(_) => {
                tracing::info!("order already credited, nothing to do");
            }
        }
        Ok(outcome)
    }

    async fn try_credit_earning(
        &self,
        owner_id: ConsultantId,
        amount: Money,
        order: &OrderReference,
    ) -> ServiceResult<EarningOutcome> {
        let _lease = self.store.lease_wallet(owner_id).await;
        let wallet = self.find_or_open(owner_id).await?;
        let credited = self.store.load_credited_orders(owner_id).await?;
        if ledger::check_earning_idempotency(&credited, order)
            == IdempotencyCheckResult::AlreadyCredited
        {
            return Ok(EarningOutcome::AlreadyCredited(wallet));
        }

        let next = ledger::credit_earning(&wallet, amount, order, Timestamp::now())?;
        match self
            .store
            .commit(LedgerCommit::credit(next.clone(), order.clone()))
            .await
        {
            Ok(()) => Ok(EarningOutcome::Credited(next)),
            Err(StoreError::DuplicateCredit { .. }) => {
                Ok(EarningOutcome::AlreadyCredited(self.load_existing(owner_id).await?))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Returns the consultant's wallet, creating an empty one if none exists.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Storage` if the store failed.
    #[tracing::instrument(skip_all, fields(consultant_id = %owner_id))]
    pub async fn balance(&self, owner_id: ConsultantId) -> ServiceResult<Wallet> {
        self.find_or_open(owner_id).await
    }

    /// Returns up to `limit` transaction log entries, newest first.
    ///
    /// # Errors
    ///
    /// Same as [`WalletService::balance`].
    #[tracing::instrument(skip_all, fields(consultant_id = %owner_id))]
    pub async fn transactions(
        &self,
        owner_id: ConsultantId,
        limit: usize,
    ) -> ServiceResult<Vec<WalletTransaction>> {
        let wallet = self.find_or_open(owner_id).await?;
        Ok(wallet.transactions.recent(limit))
    }

    /// Saves a payout destination and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidPayoutDestination` for an incomplete
    /// destination, plus the concurrency and storage errors of every
    /// mutation.
    #[tracing::instrument(
        skip_all,
        fields(consultant_id = %owner_id, kind = destination.kind_label())
    )]
    pub async fn add_payout_method(
        &self,
        owner_id: ConsultantId,
        destination: PayoutDestination,
        make_default: bool,
    ) -> ServiceResult<PayoutMethodId> {
        let destination = &destination;
        let attempts = self.config.max_commit_attempts;
        let method_id = retry_on_conflict("add_payout_method", attempts, move || async move {
            let _lease = self.store.lease_wallet(owner_id).await;
            let wallet = self.find_or_open(owner_id).await?;
            let mut next = wallet.next_revision(Timestamp::now());
            let method_id = next.payout_methods.add(destination.clone(), make_default)?;
            self.store.commit(LedgerCommit::wallet(next)).await?;
            Ok::<_, ServiceError>(method_id)
        })
        .await?;

        tracing::info!(%method_id, "payout method added");
        Ok(method_id)
    }

    /// Removes a saved payout method, promoting the first remaining method if
    /// the default was removed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::WalletNotFound` or
    /// `ServiceError::PayoutMethodNotFound` for unknown records.
    #[tracing::instrument(skip_all, fields(consultant_id = %owner_id, method_id = %method_id))]
    pub async fn remove_payout_method(
        &self,
        owner_id: ConsultantId,
        method_id: PayoutMethodId,
    ) -> ServiceResult<PayoutMethod> {
        let attempts = self.config.max_commit_attempts;
        let removed = retry_on_conflict("remove_payout_method", attempts, move || async move {
            let _lease = self.store.lease_wallet(owner_id).await;
            let wallet = self.load_existing(owner_id).await?;
            let mut next = wallet.next_revision(Timestamp::now());
            let removed = next.payout_methods.remove(&method_id)?;
            self.store.commit(LedgerCommit::wallet(next)).await?;
            Ok::<_, ServiceError>(removed)
        })
        .await?;

        tracing::info!(was_default = removed.is_default, "payout method removed");
        Ok(removed)
    }

    /// Makes a saved payout method the default.
    ///
    /// # Errors
    ///
    /// Same as [`WalletService::remove_payout_method`].
    #[tracing::instrument(skip_all, fields(consultant_id = %owner_id, method_id = %method_id))]
    pub async fn set_default_payout_method(
        &self,
        owner_id: ConsultantId,
        method_id: PayoutMethodId,
    ) -> ServiceResult<()> {
        let attempts = self.config.max_commit_attempts;
        retry_on_conflict("set_default_payout_method", attempts, move || async move {
            let _lease = self.store.lease_wallet(owner_id).await;
            let wallet = self.load_existing(owner_id).await?;
            if wallet.payout_methods.default_method().map(|method| method.id) == Some(method_id) {
                return Ok(());
            }
            let mut next = wallet.next_revision(Timestamp::now());
            next.payout_methods.set_default(&method_id)?;
            self.store.commit(LedgerCommit::wallet(next)).await?;
            Ok::<_, ServiceError>(())
        })
        .await?;

        tracing::info!("default payout method changed");
        Ok(())
    }

    async fn load_existing(&self, owner_id: ConsultantId) -> ServiceResult<Wallet> {
        self.store
            .load_wallet(owner_id)
            .await?
            .ok_or(ServiceError::WalletNotFound(owner_id))
    }

    async fn find_or_open(&self, owner_id: ConsultantId) -> ServiceResult<Wallet> {
        if let Some(wallet) = self.store.load_wallet(owner_id).await? {
            return Ok(wallet);
        }

        let opened = Wallet::open(owner_id, self.config.transaction_log_capacity, Timestamp::now());
        match self.store.commit(LedgerCommit::wallet(opened.clone())).await {
            Ok(()) => {
                tracing::info!(consultant_id = %owner_id, "wallet opened");
                Ok(opened)
            }
            // another caller opened it first
            Err(error) if error.is_conflict() => self.load_existing(owner_id).await,
            Err(error) => Err(error.into()),
        }
    }
}
