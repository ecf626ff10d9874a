//! Wallet aggregate and its parts.
//!
//! - [`aggregate`] - The per-consultant `Wallet` record
//! - [`payout_method`] - Saved payout destinations with a single default
//! - [`transaction_log`] - Bounded, oldest-first-evicting history

pub mod aggregate;
pub mod payout_method;
pub mod transaction_log;

pub use aggregate::{CreditedOrders, Wallet};
pub use payout_method::{PayoutDestination, PayoutMethod, PayoutMethods};
pub use transaction_log::{
    DEFAULT_TRANSACTION_LOG_CAPACITY, TransactionKind, TransactionLink, TransactionLog,
    WalletTransaction,
};
