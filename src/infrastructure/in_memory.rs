//! In-memory ledger store.
//!
//! Wallets, withdrawal requests and the credited-order index live in
//! persistent tree maps behind a single `tokio::sync::RwLock`. Reads share
//! the lock and clone out records that share structure with the stored ones.
//! A commit takes the write lock, checks every record's version and only then
//! applies the writes, so a failed check leaves the store unchanged.
//!
//! Wallet leases come from a fixed table of striped mutexes: consultants
//! hashing to the same stripe wait on each other, and the table never grows.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use lambars::persistent::PersistentTreeMap;
use tokio::sync::{Mutex, RwLock};

use crate::domain::value_objects::{ConsultantId, Timestamp, WithdrawalId};
use crate::domain::wallet::{CreditedOrders, Wallet};
use crate::domain::withdrawal::WithdrawalRequest;
use crate::infrastructure::store::{LedgerCommit, LedgerStore, StoreError, WalletLease};

const LEASE_STRIPES: usize = 64;

#[derive(Debug, Default)]
struct Records {
    wallets: PersistentTreeMap<ConsultantId, Wallet>,
    withdrawals: PersistentTreeMap<WithdrawalId, WithdrawalRequest>,
    credited: PersistentTreeMap<ConsultantId, CreditedOrders>,
}

/// Checks that `found` directly follows the stored version, treating a missing
/// record as version 0.
fn check_version(record: &'static str, stored: Option<u64>, found: u64) -> Result<(), StoreError> {
    let expected = stored.map_or(1, |version| version + 1);
    if found == expected {
        Ok(())
    } else {
        Err(StoreError::VersionConflict {
            record,
            expected,
            found,
        })
    }
}

/// Thread-safe in-memory implementation of [`LedgerStore`].
///
/// Cloning shares the underlying records and leases.
#[derive(Debug, Clone)]
pub struct InMemoryLedgerStore {
    records: Arc<RwLock<Records>>,
    leases: Arc<[Arc<Mutex<()>>]>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::default(),
            leases: (0..LEASE_STRIPES).map(|_| Arc::new(Mutex::new(()))).collect(),
        }
    }

    /// Number of stored wallets.
    pub async fn wallet_count(&self) -> usize {
        self.records.read().await.wallets.len()
    }

    fn stripe(&self, owner_id: ConsultantId) -> Arc<Mutex<()>> {
        let mut hasher = DefaultHasher::new();
        owner_id.hash(&mut hasher);
        let index = usize::try_from(hasher.finish() % LEASE_STRIPES as u64).unwrap_or(0);
        Arc::clone(&self.leases[index])
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl LedgerStore for InMemoryLedgerStore {
    fn lease_wallet(&self, owner_id: ConsultantId) -> BoxFuture<'_, WalletLease> {
        let stripe = self.stripe(owner_id);
        stripe.lock_owned().boxed()
    }

    fn load_wallet(
        &self,
        owner_id: ConsultantId,
    ) -> BoxFuture<'_, Result<Option<Wallet>, StoreError>> {
        async move {
            let guard = self.records.read().await;
            Ok(guard.wallets.get(&owner_id).cloned())
        }
        .boxed()
    }

    fn load_credited_orders(
        &self,
        owner_id: ConsultantId,
    ) -> BoxFuture<'_, Result<CreditedOrders, StoreError>> {
        async move {
            let guard = self.records.read().await;
            Ok(guard.credited.get(&owner_id).cloned().unwrap_or_default())
        }
        .boxed()
    }

    fn load_withdrawal(
        &self,
        withdrawal_id: WithdrawalId,
    ) -> BoxFuture<'_, Result<Option<WithdrawalRequest>, StoreError>> {
        async move {
            let guard = self.records.read().await;
            Ok(guard.withdrawals.get(&withdrawal_id).cloned())
        }
        .boxed()
    }

    fn list_withdrawals(
        &self,
        owner_id: ConsultantId,
    ) -> BoxFuture<'_, Result<Vec<WithdrawalRequest>, StoreError>> {
        async move {
            let guard = self.records.read().await;
            let mut requests: Vec<WithdrawalRequest> = guard
                .withdrawals
                .values()
                .filter(|request| request.owner_id == owner_id)
                .cloned()
                .collect();
            drop(guard);
            requests.sort_by(|left, right| {
                right
                    .requested_at
                    .cmp(&left.requested_at)
                    .then_with(|| right.id.cmp(&left.id))
            });
            Ok(requests)
        }
        .boxed()
    }

    fn commit(&self, commit: LedgerCommit) -> BoxFuture<'_, Result<(), StoreError>> {
        async move {
            if let (Some(wallet), Some(request)) = (&commit.wallet, &commit.withdrawal)
                && wallet.owner_id != request.owner_id
            {
                return Err(StoreError::OwnerMismatch {
                    wallet_owner: wallet.owner_id,
                    request_owner: request.owner_id,
                });
            }
            if let (None, Some(order)) = (&commit.wallet, &commit.credited_order) {
                return Err(StoreError::CreditWithoutWallet(order.clone()));
            }

            let mut guard = self.records.write().await;

            // Phase 1: every version and the credit index must line up
            if let Some(wallet) = &commit.wallet {
                let stored = guard.wallets.get(&wallet.owner_id).map(|stored| stored.version);
                check_version("wallet", stored, wallet.version)?;

                if let Some(order) = &commit.credited_order
                    && guard
                        .credited
                        .get(&wallet.owner_id)
                        .is_some_and(|credited| credited.contains_key(order))
                {
                    return Err(StoreError::DuplicateCredit {
                        owner_id: wallet.owner_id,
                        order: order.clone(),
                    });
                }
            }
            if let Some(request) = &commit.withdrawal {
                let stored = guard.withdrawals.get(&request.id).map(|stored| stored.version);
                check_version("withdrawal", stored, request.version)?;
            }

            // Phase 2: apply
            if let Some(wallet) = commit.wallet {
                tracing::debug!(
                    owner_id = %wallet.owner_id,
                    version = wallet.version,
                    "wallet stored"
                );
                if let Some(order) = commit.credited_order {
                    let credited = guard
                        .credited
                        .get(&wallet.owner_id)
                        .cloned()
                        .unwrap_or_default()
                        .insert(order, Timestamp::now());
                    guard.credited = guard.credited.insert(wallet.owner_id, credited);
                }
                guard.wallets = guard.wallets.insert(wallet.owner_id, wallet);
            }
            if let Some(request) = commit.withdrawal {
                tracing::debug!(
                    withdrawal_id = %request.id,
                    version = request.version,
                    "withdrawal stored"
                );
                guard.withdrawals = guard.withdrawals.insert(request.id, request);
            }
            Ok(())
        }
        .boxed()
    }
}
