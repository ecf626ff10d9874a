//! # consultant-wallet
//!
//! Wallet ledger and withdrawal pipeline for consultants on a bidding
//! marketplace.
//!
//! The crate tracks the money owed to each consultant, moves funds between
//! the available and pending buckets as withdrawal requests progress through
//! an approval pipeline, computes platform fees, and keeps balances consistent
//! under concurrent requests.
//!
//! # Architecture
//!
//! The crate follows the Onion Architecture:
//!
//! - **Domain Layer**: values, the wallet aggregate, the withdrawal state machine
//! - **Application Layer**: pure ledger operations and the async services that
//!   load, validate, commit and publish
//! - **Infrastructure Layer**: configuration, the versioned record store,
//!   notification dispatch and tracing setup
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use consultant_wallet::application::{WalletService, WithdrawalService};
//! use consultant_wallet::domain::{
//!     ConsultantId, MethodSelection, Money, OrderReference, PayoutDestination,
//! };
//! use consultant_wallet::infrastructure::{EventPublisher, InMemoryLedgerStore, WalletConfig};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let config = WalletConfig::default();
//! let store = Arc::new(InMemoryLedgerStore::new());
//! let publisher = EventPublisher::disabled();
//! let wallets = WalletService::new(store.clone(), config.clone());
//! let withdrawals = WithdrawalService::new(store, publisher, config);
//!
//! let consultant = ConsultantId::generate();
//! let order = OrderReference::new("order-1").unwrap();
//! wallets.credit_earning(consultant, Money::new(10_000), order).await.unwrap();
//!
//! let destination = PayoutDestination::EWallet {
//!     provider: "GCash".to_string(),
//!     account_identifier: "09171234567".to_string(),
//! };
//! let request = withdrawals
//!     .request_withdrawal(consultant, Money::new(5_000), MethodSelection::OneOff(destination))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(request.fee.actual_amount_paid, Money::new(4_900));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod application;
pub mod domain;
pub mod infrastructure;
