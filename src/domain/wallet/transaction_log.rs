//! Bounded transaction history of a wallet.
//!
//! The log is a ring buffer: appending beyond capacity evicts the oldest
//! entries first. Entries are kept in the order they were appended.
//!
//! Entries live in a [`PersistentDeque`], so a new wallet revision shares
//! every retained entry with the revision it was derived from.

use std::fmt;

use lambars::persistent::PersistentDeque;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{EntryId, Money, OrderReference, Timestamp, WithdrawalId};

/// Number of entries a wallet keeps unless configured otherwise.
pub const DEFAULT_TRANSACTION_LOG_CAPACITY: usize = 100;

/// Category of a balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Funds deposited by an operator.
    Deposit,
    /// Funds reserved for or paid out by a withdrawal.
    Withdrawal,
    /// Income from a completed order.
    Earning,
    /// Platform fee charged to the wallet.
    Fee,
    /// Reserved funds returned to the available balance.
    Refund,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Earning => "earning",
            Self::Fee => "fee",
            Self::Refund => "refund",
        };
        formatter.write_str(label)
    }
}

/// What a transaction entry originated from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "reference", rename_all = "snake_case")]
pub enum TransactionLink {
    /// An order in the earnings system.
    Order(OrderReference),
    /// A withdrawal request.
    Withdrawal(WithdrawalId),
}

/// One entry of the transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Entry identifier.
    pub id: EntryId,
    /// Entry category.
    pub kind: TransactionKind,
    /// Signed amount: credits are positive, debits negative.
    pub amount: Money,
    /// Human-readable description.
    pub description: String,
    /// Originating order or withdrawal, if any.
    pub link: Option<TransactionLink>,
    /// When the entry was recorded.
    pub recorded_at: Timestamp,
}

impl WalletTransaction {
    /// Creates a new entry with a fresh id.
    #[must_use]
    pub fn new(
        kind: TransactionKind,
        amount: Money,
        description: impl Into<String>,
        link: Option<TransactionLink>,
        recorded_at: Timestamp,
    ) -> Self {
        Self {
            id: EntryId::generate(),
            kind,
            amount,
            description: description.into(),
            link,
            recorded_at,
        }
    }
}

/// Fixed-capacity, oldest-first-evicting transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LogRecord", into = "LogRecord")]
pub struct TransactionLog {
    capacity: usize,
    entries: PersistentDeque<WalletTransaction>,
}

/// Serialized form of the log.
#[derive(Serialize, Deserialize)]
struct LogRecord {
    capacity: usize,
    entries: Vec<WalletTransaction>,
}

impl From<TransactionLog> for LogRecord {
    fn from(log: TransactionLog) -> Self {
        Self {
            capacity: log.capacity,
            entries: log.entries.iter().cloned().collect(),
        }
    }
}

impl From<LogRecord> for TransactionLog {
    fn from(record: LogRecord) -> Self {
        record
            .entries
            .into_iter()
            .fold(Self::with_capacity(record.capacity), |mut log, entry| {
                log.push(entry);
                log
            })
    }
}

impl TransactionLog {
    /// Creates an empty log holding at most `capacity` entries (at least one).
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 { 1 } else { capacity };
        Self {
            capacity,
            entries: PersistentDeque::new(),
        }
    }

    /// Appends an entry, evicting the oldest entries while the log is over
    /// capacity. Returns how many entries were evicted.
    pub fn push(&mut self, entry: WalletTransaction) -> usize {
        let mut entries = self.entries.push_back(entry);
        let mut evicted = 0;
        while entries.len() > self.capacity {
            match entries.pop_front() {
                Some((rest, _)) => entries = rest,
                None => break,
            }
            evicted += 1;
        }
        self.entries = entries;
        evicted
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &WalletTransaction> {
        self.entries.iter()
    }

    /// Oldest retained entry.
    #[must_use]
    pub fn oldest(&self) -> Option<&WalletTransaction> {
        self.entries.front()
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&WalletTransaction> {
        self.entries.back()
    }

    /// Up to `limit` entries, newest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<WalletTransaction> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TRANSACTION_LOG_CAPACITY)
    }
}
