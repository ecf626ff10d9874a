//! Wallet aggregate.
//!
//! One wallet exists per consultant. Balance fields are only changed through
//! the ledger operations in `application::ledger`, which return an updated
//! copy with the version bumped; the store accepts a copy only if its version
//! directly follows the stored one.
//!
//! The transaction log and the payout methods are persistent structures, so
//! each revision shares them with its predecessor instead of copying them.
//! Which orders were already credited is tracked by the store, not here,
//! which keeps a wallet record bounded by its log capacity.

use lambars::optics::{FunctionLens, Lens};
use lambars::persistent::PersistentTreeMap;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{ConsultantId, Money, OrderReference, Timestamp};
use crate::domain::wallet::payout_method::PayoutMethods;
use crate::domain::wallet::transaction_log::TransactionLog;

/// Orders whose earnings were credited to one wallet, with the time of the
/// credit.
pub type CreditedOrders = PersistentTreeMap<OrderReference, Timestamp>;

/// Per-consultant balance record.
///
/// `pending_balance` holds both uncleared earnings and funds locked by an
/// in-flight withdrawal; the two are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Consultant owning the wallet.
    pub owner_id: ConsultantId,
    /// Funds that may be withdrawn now. Never negative.
    pub available_balance: Money,
    /// Funds earmarked and not withdrawable. Never negative.
    pub pending_balance: Money,
    /// Lifetime credited earnings.
    pub total_earnings: Money,
    /// Lifetime amount paid out, net of fees.
    pub total_withdrawn: Money,
    /// Saved payout destinations.
    pub payout_methods: PayoutMethods,
    /// Recent balance-affecting events.
    pub transactions: TransactionLog,
    /// When the wallet was created.
    pub created_at: Timestamp,
    /// When the wallet was last changed.
    pub updated_at: Timestamp,
    /// Optimistic concurrency version, starting at 1.
    pub version: u64,
}

impl Wallet {
    /// Creates an empty wallet at version 1.
    #[must_use]
    pub fn open(owner_id: ConsultantId, transaction_log_capacity: usize, at: Timestamp) -> Self {
        Self {
            owner_id,
            available_balance: Money::zero(),
            pending_balance: Money::zero(),
            total_earnings: Money::zero(),
            total_withdrawn: Money::zero(),
            payout_methods: PayoutMethods::new(),
            transactions: TransactionLog::with_capacity(transaction_log_capacity),
            created_at: at,
            updated_at: at,
            version: 1,
        }
    }

    /// Checks that `amount` can be moved out of the available balance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` for a non-positive amount and
    /// `DomainError::InsufficientBalance` when available funds fall short.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use consultant_wallet::domain::value_objects::{ConsultantId, Money, Timestamp};
    /// use consultant_wallet::domain::wallet::Wallet;
    ///
    /// let mut wallet = Wallet::open(ConsultantId::generate(), 100, Timestamp::now());
    /// wallet.available_balance = Money::new(3000);
    ///
    /// assert!(wallet.can_reserve(&Money::new(2000)).is_ok());
    /// assert!(wallet.can_reserve(&Money::new(5000)).is_err());
    /// ```
    pub fn can_reserve(&self, amount: &Money) -> DomainResult<()> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount(format!(
                "withdrawal amount must be positive, got {amount}"
            )));
        }
        if self.available_balance < *amount {
            return Err(DomainError::InsufficientBalance {
                requested: *amount,
                available: self.available_balance,
            });
        }
        Ok(())
    }

    /// Returns `true` when both balance buckets are non-negative.
    #[must_use]
    pub fn balances_are_valid(&self) -> bool {
        !self.available_balance.is_negative() && !self.pending_balance.is_negative()
    }

    /// Returns a copy prepared for the next commit: version bumped and
    /// `updated_at` moved to `at`.
    #[must_use]
    pub fn next_revision(&self, at: Timestamp) -> Self {
        let bumped = Self::version_lens().modify(self.clone(), |version| version + 1);
        Self::updated_at_lens().set(bumped, at)
    }

    /// Lens focusing the `version` field.
    #[must_use]
    pub fn version_lens() -> impl Lens<Self, u64> + Clone {
        FunctionLens::new(
            |wallet: &Self| &wallet.version,
            |mut wallet: Self, version: u64| {
                wallet.version = version;
                wallet
            },
        )
    }

    /// Lens focusing the `updated_at` field.
    #[must_use]
    pub fn updated_at_lens() -> impl Lens<Self, Timestamp> + Clone {
        FunctionLens::new(
            |wallet: &Self| &wallet.updated_at,
            |mut wallet: Self, updated_at: Timestamp| {
                wallet.updated_at = updated_at;
                wallet
            },
        )
    }
}
