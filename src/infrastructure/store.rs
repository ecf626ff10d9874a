//! Persistence seam for wallets and withdrawal requests.
//!
//! Records are versioned. A [`LedgerCommit`] writes a wallet and/or a
//! withdrawal request as one unit: either every record in it is stored or
//! none is. Each record must carry the stored version plus one (version 1 for
//! a record that does not exist yet); anything else is a
//! [`StoreError::VersionConflict`] and nothing is written.
//!
//! Writers of one wallet serialize on its [`WalletLease`]: the lease is held
//! across load, validation and commit. The version check stays in place for
//! writers that do not take the lease.

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;

use crate::domain::value_objects::{ConsultantId, OrderReference, WithdrawalId};
use crate::domain::wallet::{CreditedOrders, Wallet};
use crate::domain::withdrawal::WithdrawalRequest;

// =============================================================================
// Error Types
// =============================================================================

/// Errors reported by a ledger store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A record in the commit does not follow the stored version.
    #[error("Version conflict on {record}: expected {expected}, found {found}")]
    VersionConflict {
        /// Which record kind conflicted.
        record: &'static str,
        /// Version the store would have accepted.
        expected: u64,
        /// Version carried by the commit.
        found: u64,
    },

    /// The commit names a wallet and a request owned by different consultants.
    #[error("Commit mixes records of consultants {wallet_owner} and {request_owner}")]
    OwnerMismatch {
        /// Owner of the wallet in the commit.
        wallet_owner: ConsultantId,
        /// Owner of the withdrawal request in the commit.
        request_owner: ConsultantId,
    },

    /// The commit credits an order that was already credited to the wallet.
    #[error("Order {order} was already credited to consultant {owner_id}")]
    DuplicateCredit {
        /// Owner of the wallet.
        owner_id: ConsultantId,
        /// The order credited twice.
        order: OrderReference,
    },

    /// The commit names a credited order but carries no wallet.
    #[error("Commit credits order {0} without a wallet revision")]
    CreditWithoutWallet(OrderReference),

    /// The backing storage could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns `true` if reloading and retrying may succeed.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

// =============================================================================
// Commit
// =============================================================================

/// Exclusive right to write one wallet, released on drop.
pub type WalletLease = OwnedMutexGuard<()>;

/// Records written together in one atomic commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerCommit {
    /// Next revision of a wallet.
    pub wallet: Option<Wallet>,
    /// Next revision of a withdrawal request.
    pub withdrawal: Option<WithdrawalRequest>,
    /// Order whose earnings the wallet revision credits.
    pub credited_order: Option<OrderReference>,
}

impl LedgerCommit {
    /// A commit touching only a wallet.
    #[must_use]
    pub const fn wallet(wallet: Wallet) -> Self {
        Self {
            wallet: Some(wallet),
            withdrawal: None,
            credited_order: None,
        }
    }

    /// A wallet revision crediting earnings for `order`.
    ///
    /// The store records the order beside the wallet and rejects the commit
    /// with [`StoreError::DuplicateCredit`] if it was recorded before.
    #[must_use]
    pub const fn credit(wallet: Wallet, order: OrderReference) -> Self {
        Self {
            wallet: Some(wallet),
            withdrawal: None,
            credited_order: Some(order),
        }
    }

    /// A commit touching only a withdrawal request.
    #[must_use]
    pub const fn withdrawal(request: WithdrawalRequest) -> Self {
        Self {
            wallet: None,
            withdrawal: Some(request),
            credited_order: None,
        }
    }

    /// A commit touching a wallet and one of its withdrawal requests.
    #[must_use]
    pub const fn both(wallet: Wallet, request: WithdrawalRequest) -> Self {
        Self {
            wallet: Some(wallet),
            withdrawal: Some(request),
            credited_order: None,
        }
    }

    /// Returns `true` when the commit writes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.wallet.is_none() && self.withdrawal.is_none()
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Versioned storage for wallets and withdrawal requests.
///
/// Implementations must apply a [`LedgerCommit`] atomically and let reads
/// proceed concurrently with other reads.
pub trait LedgerStore: Send + Sync {
    /// Waits for exclusive write access to a consultant's wallet.
    fn lease_wallet(&self, owner_id: ConsultantId) -> BoxFuture<'_, WalletLease>;

    /// Loads the wallet of a consultant, if one exists.
    fn load_wallet(
        &self,
        owner_id: ConsultantId,
    ) -> BoxFuture<'_, Result<Option<Wallet>, StoreError>>;

    /// Loads the orders already credited to a consultant's wallet.
    fn load_credited_orders(
        &self,
        owner_id: ConsultantId,
    ) -> BoxFuture<'_, Result<CreditedOrders, StoreError>>;

    /// Loads a withdrawal request by id.
    fn load_withdrawal(
        &self,
        withdrawal_id: WithdrawalId,
    ) -> BoxFuture<'_, Result<Option<WithdrawalRequest>, StoreError>>;

    /// Lists a consultant's withdrawal requests, newest first.
    fn list_withdrawals(
        &self,
        owner_id: ConsultantId,
    ) -> BoxFuture<'_, Result<Vec<WithdrawalRequest>, StoreError>>;

    /// Writes every record in `commit` or none of them.
    fn commit(&self, commit: LedgerCommit) -> BoxFuture<'_, Result<(), StoreError>>;
}
