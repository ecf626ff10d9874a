//! Domain layer of the consultant wallet.
//!
//! Everything here is free of I/O: values, aggregates, the withdrawal state
//! machine and the rules that guard it. Functions take the current record and
//! return an updated copy; persisting it is the caller's business.
//!
//! # Structure
//!
//! - [`value_objects`] - Identifiers, money and timestamps
//! - [`wallet`] - The per-consultant wallet, payout methods and transaction log
//! - [`withdrawal`] - Withdrawal requests, statuses, fees and events
//! - [`errors`] - Failures reported by domain rules

pub mod errors;
pub mod value_objects;
pub mod wallet;
pub mod withdrawal;

pub use errors::{DomainError, DomainResult};
pub use value_objects::*;
pub use wallet::*;
pub use withdrawal::*;
