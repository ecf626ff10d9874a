//! Value objects for the wallet domain.
//!
//! - [`Money`] - Amount in the platform currency backed by `Decimal`
//! - [`ConsultantId`], [`WithdrawalId`], [`PayoutMethodId`], [`EntryId`],
//!   [`EventId`] - UUID v7 identifiers
//! - [`OrderReference`] - Opaque reference into the earnings system
//! - [`Timestamp`] - UTC instant

mod identifiers;
mod money;
mod timestamp;

pub use identifiers::{
    ConsultantId, EntryId, EventId, IdentifierError, OrderReference, PayoutMethodId, WithdrawalId,
};
pub use money::{Money, MoneyError};
pub use timestamp::Timestamp;
