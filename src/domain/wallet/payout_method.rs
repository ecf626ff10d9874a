//! Saved payout destinations.
//!
//! A wallet keeps an ordered list of payout methods. At most one of them is
//! flagged as the default; every mutation below preserves that.

use std::fmt;

use lambars::persistent::PersistentVector;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::PayoutMethodId;

/// Where a withdrawal is paid out to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayoutDestination {
    /// Domestic bank transfer.
    BankTransfer {
        /// Name of the receiving bank.
        bank_name: String,
        /// Account holder name.
        account_name: String,
        /// Account number at the bank.
        account_number: String,
    },
    /// E-wallet provider account.
    EWallet {
        /// Provider name.
        provider: String,
        /// Account handle or phone number at the provider.
        account_identifier: String,
    },
    /// Card processor payout (for example a PayPal-style account).
    CardProcessor {
        /// Processor name.
        processor: String,
        /// Account email registered with the processor.
        account_email: String,
    },
    /// On-chain crypto transfer.
    Crypto {
        /// Network the address lives on.
        network: String,
        /// Receiving wallet address.
        address: String,
    },
}

impl PayoutDestination {
    /// Short label for the destination type.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::BankTransfer { .. } => "bank transfer",
            Self::EWallet { .. } => "e-wallet",
            Self::CardProcessor { .. } => "card processor",
            Self::Crypto { .. } => "crypto",
        }
    }

    /// Checks that every attribute of the destination is filled in.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayoutDestination` naming the first blank
    /// attribute.
    pub fn validate(&self) -> DomainResult<()> {
        let fields: Vec<(&str, &str)> = match self {
            Self::BankTransfer {
                bank_name,
                account_name,
                account_number,
            } => vec![
                ("bank_name", bank_name.as_str()),
                ("account_name", account_name.as_str()),
                ("account_number", account_number.as_str()),
            ],
            Self::EWallet {
                provider,
                account_identifier,
            } => vec![
                ("provider", provider.as_str()),
                ("account_identifier", account_identifier.as_str()),
            ],
            Self::CardProcessor {
                processor,
                account_email,
            } => vec![
                ("processor", processor.as_str()),
                ("account_email", account_email.as_str()),
            ],
            Self::Crypto { network, address } => {
                vec![("network", network.as_str()), ("address", address.as_str())]
            }
        };

        fields
            .iter()
            .find(|(_, value)| value.trim().is_empty())
            .map_or(Ok(()), |(name, _)| {
                Err(DomainError::InvalidPayoutDestination(format!(
                    "{} requires {name}",
                    self.kind_label()
                )))
            })
    }
}

impl fmt::Display for PayoutDestination {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BankTransfer {
                bank_name,
                account_number,
                ..
            } => write!(formatter, "{bank_name} account {}", masked(account_number)),
            Self::EWallet {
                provider,
                account_identifier,
            } => write!(formatter, "{provider} {}", masked(account_identifier)),
            Self::CardProcessor {
                processor,
                account_email,
            } => write!(formatter, "{processor} ({account_email})"),
            Self::Crypto { network, address } => {
                write!(formatter, "{network} address {}", masked(address))
            }
        }
    }
}

/// Keeps the last four characters of an account number visible.
fn masked(value: &str) -> String {
    let characters: Vec<char> = value.chars().collect();
    if characters.len() <= 4 {
        return value.to_string();
    }
    let visible: String = characters[characters.len() - 4..].iter().collect();
    format!("****{visible}")
}

/// A payout method saved on a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutMethod {
    /// Identifier of the method within the wallet.
    pub id: PayoutMethodId,
    /// Destination details.
    pub destination: PayoutDestination,
    /// Whether this is the wallet's default method.
    pub is_default: bool,
}

/// Ordered set of saved payout methods with at most one default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayoutMethods(PersistentVector<PayoutMethod>);

impl PayoutMethods {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self(PersistentVector::new())
    }

    /// Iterates the saved methods in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PayoutMethod> {
        self.0.iter()
    }

    /// Returns the number of saved methods.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no method is saved.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a method by id.
    #[must_use]
    pub fn get(&self, method_id: &PayoutMethodId) -> Option<&PayoutMethod> {
        self.0.iter().find(|method| method.id == *method_id)
    }

    /// Returns the default method, if any.
    #[must_use]
    pub fn default_method(&self) -> Option<&PayoutMethod> {
        self.0.iter().find(|method| method.is_default)
    }

    /// Adds a destination and returns the id assigned to it.
    ///
    /// The first saved method always becomes the default; later ones only
    /// when `make_default` is set, which clears the previous default.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPayoutDestination` if the destination is
    /// incomplete.
    pub fn add(
        &mut self,
        destination: PayoutDestination,
        make_default: bool,
    ) -> DomainResult<PayoutMethodId> {
        destination.validate()?;
        let id = PayoutMethodId::generate();
        let is_default = make_default || self.0.is_empty();
        let base = if is_default {
            self.with_default(None)
        } else {
            self.0.clone()
        };
        self.0 = base.push_back(PayoutMethod {
            id,
            destination,
            is_default,
        });
        Ok(id)
    }

    /// Removes a method. If it was the default, the first remaining method
    /// is promoted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PayoutMethodNotFound` for an unknown id.
    pub fn remove(&mut self, method_id: &PayoutMethodId) -> DomainResult<PayoutMethod> {
        let removed = self
            .get(method_id)
            .cloned()
            .ok_or(DomainError::PayoutMethodNotFound(*method_id))?;
        let remaining: PersistentVector<PayoutMethod> = self
            .0
            .iter()
            .filter(|method| method.id != *method_id)
            .cloned()
            .collect();
        let promoted = remaining
            .first()
            .filter(|_| removed.is_default)
            .map(|first| PayoutMethod {
                is_default: true,
                ..first.clone()
            });
        self.0 = match promoted {
            Some(first) => remaining.update(0, first).unwrap_or(remaining),
            None => remaining,
        };
        Ok(removed)
    }

    /// Makes the given method the only default.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PayoutMethodNotFound` for an unknown id.
    pub fn set_default(&mut self, method_id: &PayoutMethodId) -> DomainResult<()> {
        if self.get(method_id).is_none() {
            return Err(DomainError::PayoutMethodNotFound(*method_id));
        }
        self.0 = self.with_default(Some(method_id));
        Ok(())
    }

    /// Copy of the methods with only `method_id` flagged as default.
    fn with_default(&self, method_id: Option<&PayoutMethodId>) -> PersistentVector<PayoutMethod> {
        self.0
            .iter()
            .map(|method| PayoutMethod {
                is_default: Some(&method.id) == method_id,
                ..method.clone()
            })
            .collect()
    }
}
