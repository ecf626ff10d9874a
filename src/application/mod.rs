//! Application layer of the consultant wallet.
//!
//! - [`ledger`] - Pure balance mutations applied to a wallet
//! - [`services`] - Async services that load, validate, commit and publish
//! - [`errors`] - The `ServiceError` returned at the service boundary
//!
//! Services never mutate a stored record in place. They load it, compute the
//! next revision with the domain and ledger functions, and hand both the
//! wallet and the withdrawal request to the store as one commit.

pub mod errors;
pub mod ledger;
pub mod services;

pub use errors::{ErrorKind, ServiceError, ServiceResult};
pub use ledger::{IdempotencyCheckResult, LedgerOutcome, PendingClamp};
pub use services::{EarningOutcome, WalletService, WithdrawalService};
