//! Application services.
//!
//! - [`wallet`] - Earnings intake, balance queries and payout methods
//! - [`withdrawal`] - The withdrawal pipeline
//! - [`retry`] - Reload-and-retry loop shared by every mutation

pub mod retry;
pub mod wallet;
pub mod withdrawal;

pub use retry::retry_on_conflict;
pub use wallet::{EarningOutcome, WalletService};
pub use withdrawal::WithdrawalService;
