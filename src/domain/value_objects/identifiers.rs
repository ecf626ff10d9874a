//! Identifier value objects.
//!
//! Every entity in the ledger is addressed by a UUID v7 wrapped in its own
//! type, so a consultant id can never be passed where a withdrawal id is
//! expected. Order references come from the external earnings system and are
//! opaque strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The provided string is not a valid UUID.
    InvalidUuidFormat(String),
    /// The provided reference is empty.
    EmptyReference,
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUuidFormat(value) => write!(formatter, "Invalid UUID format: {value}"),
            Self::EmptyReference => write!(formatter, "Reference cannot be empty"),
        }
    }
}

impl std::error::Error for IdentifierError {}

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new time-ordered identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }

            /// Parses an identifier from its string form.
            ///
            /// # Errors
            ///
            /// Returns `IdentifierError::InvalidUuidFormat` if `value` is not a UUID.
            pub fn parse(value: &str) -> Result<Self, IdentifierError> {
                Uuid::from_str(value)
                    .map(Self)
                    .map_err(|_| IdentifierError::InvalidUuidFormat(value.to_string()))
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_identifier!(
    /// Identifies a consultant, and therefore the consultant's single wallet.
    ConsultantId
);

uuid_identifier!(
    /// Identifies a withdrawal request.
    WithdrawalId
);

uuid_identifier!(
    /// Identifies a saved payout method inside a wallet.
    PayoutMethodId
);

uuid_identifier!(
    /// Identifies a single entry of a wallet's transaction log.
    EntryId
);

uuid_identifier!(
    /// Identifies a published domain event.
    EventId
);

/// Reference to an order in the external earnings system.
///
/// # Examples
///
/// ```rust
/// use consultant_wallet::domain::value_objects::OrderReference;
///
/// let reference = OrderReference::new("order-1042").unwrap();
/// assert_eq!(reference.as_str(), "order-1042");
/// assert!(OrderReference::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderReference(String);

impl OrderReference {
    /// Creates an order reference, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::EmptyReference` for blank input.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            Err(IdentifierError::EmptyReference)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
