//! Withdrawal request, its lifecycle and the events it raises.
//!
//! - [`status`] - Statuses and the legal transitions between them
//! - [`request`] - The `WithdrawalRequest` entity and payout method selection
//! - [`fee`] - Platform fee computation
//! - [`events`] - Events published after each committed transition

pub mod events;
pub mod fee;
pub mod request;
pub mod status;

pub use events::{WithdrawalEvent, WithdrawalEventKind};
pub use fee::FeeBreakdown;
pub use request::{MethodSelection, PayoutSnapshot, WithdrawalRequest};
pub use status::WithdrawalStatus;
