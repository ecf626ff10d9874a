//! Infrastructure layer of the consultant wallet.
//!
//! - `config` - Settings loaded from environment variables
//! - `store` - The versioned `LedgerStore` seam and its commit unit
//! - `in_memory` - `tokio::sync::RwLock` backed store
//! - `messaging` - Event to notification message conversion
//! - `notifier` - Notifier trait, publisher and dispatcher task
//! - `telemetry` - Tracing subscriber setup

mod config;
mod in_memory;
mod messaging;
mod notifier;
mod store;
mod telemetry;

pub use config::{ConfigError, WalletConfig};
pub use in_memory::InMemoryLedgerStore;
pub use messaging::{NotificationMessage, event_to_message};
pub use notifier::{
    EventPublisher, InMemoryNotifier, LoggingNotifier, Notifier, NotifyError, spawn_dispatcher,
};
pub use store::{LedgerCommit, LedgerStore, StoreError, WalletLease};
pub use telemetry::{DEFAULT_FILTER, init_tracing};
