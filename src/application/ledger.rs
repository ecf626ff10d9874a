//! Ledger operations on a wallet.
//!
//! Each operation is a pure function: it takes the stored wallet and returns
//! the next revision with the balance fields changed, one entry appended to
//! the transaction log and the version bumped. Nothing is persisted here; the
//! services commit the returned wallet together with any withdrawal change.
//!
//! # Operations
//!
//! | Operation | available | pending | totals | log entry |
//! |---|---|---|---|---|
//! | [`credit_earning`] | `+ amount` | | `total_earnings + amount` | earning, `+amount` |
//! | [`reserve_for_withdrawal`] | `- amount` | `+ amount` | | withdrawal, `-amount` |
//! | [`release_reservation`] | `+ amount` | `- amount` (floored) | | refund, `+amount` |
//! | [`settle_withdrawal`] | | `- reserved` (floored) | `total_withdrawn + paid` | withdrawal, `-paid` |
//!
//! Flooring the pending bucket at zero is reported back as a
//! [`PendingClamp`] so the caller can log it as an integrity signal.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, OrderReference, Timestamp, WithdrawalId};
use crate::domain::wallet::{
    CreditedOrders, PayoutDestination, TransactionKind, TransactionLink, Wallet,
    WalletTransaction,
};

/// Record that the pending bucket was floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingClamp {
    /// Amount the operation tried to remove from pending.
    pub requested: Money,
    /// Pending balance held before the operation.
    pub held: Money,
}

/// Result of an operation that may clamp the pending bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOutcome {
    /// Next revision of the wallet.
    pub wallet: Wallet,
    /// Present when pending held less than the operation removed.
    pub clamp: Option<PendingClamp>,
}

/// Result of checking whether an order was already credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdempotencyCheckResult {
    /// The order has not been credited to this wallet.
    NotFound,
    /// The order was credited before; crediting again would duplicate money.
    AlreadyCredited,
}

/// Checks whether earnings for `order` are already among `credited`.
#[must_use]
pub fn check_earning_idempotency(
    credited: &CreditedOrders,
    order: &OrderReference,
) -> IdempotencyCheckResult {
    if credited.contains_key(order) {
        IdempotencyCheckResult::AlreadyCredited
    } else {
        IdempotencyCheckResult::NotFound
    }
}

/// Credits earnings from a completed order.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` if `amount` is not positive.
///
/// # Examples
///
/// ```rust
/// use consultant_wallet::application::ledger::credit_earning;
/// use consultant_wallet::domain::{ConsultantId, Money, OrderReference, Timestamp, Wallet};
///
/// let wallet = Wallet::open(ConsultantId::generate(), 100, Timestamp::now());
/// let order = OrderReference::new("order-77").unwrap();
///
/// let credited = credit_earning(&wallet, Money::new(2_500), &order, Timestamp::now()).unwrap();
/// assert_eq!(credited.available_balance, Money::new(2_500));
/// assert_eq!(credited.total_earnings, Money::new(2_500));
/// ```
pub fn credit_earning(
    wallet: &Wallet,
    amount: Money,
    order: &OrderReference,
    at: Timestamp,
) -> DomainResult<Wallet> {
    if !amount.is_positive() {
        return Err(DomainError::InvalidAmount(format!(
            "earning amount must be positive, got {amount}"
        )));
    }

    let mut next = wallet.next_revision(at);
    next.total_earnings = next.total_earnings + amount;
    next.available_balance = next.available_balance + amount;
    next.transactions.push(WalletTransaction::new(
        TransactionKind::Earning,
        amount,
        format!("Earnings from order {order}"),
        Some(TransactionLink::Order(order.clone())),
        at,
    ));
    Ok(next)
}

/// Moves `amount` from available to pending for a new withdrawal.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` for a non-positive amount and
/// `DomainError::InsufficientBalance` when available funds fall short. The
/// wallet is left untouched in both cases.
pub fn reserve_for_withdrawal(
    wallet: &Wallet,
    amount: Money,
    withdrawal_id: WithdrawalId,
    at: Timestamp,
) -> DomainResult<Wallet> {
    wallet.can_reserve(&amount)?;

    let mut next = wallet.next_revision(at);
    next.available_balance = next.available_balance - amount;
    next.pending_balance = next.pending_balance + amount;
    next.transactions.push(WalletTransaction::new(
        TransactionKind::Withdrawal,
        -amount,
        format!("Withdrawal request {withdrawal_id}"),
        Some(TransactionLink::Withdrawal(withdrawal_id)),
        at,
    ));
    Ok(next)
}

/// Returns reserved funds to the available balance after a rejection or a
/// failed payout.
#[must_use]
pub fn release_reservation(
    wallet: &Wallet,
    amount: Money,
    withdrawal_id: WithdrawalId,
    at: Timestamp,
) -> LedgerOutcome {
    let mut next = wallet.next_revision(at);
    let (pending, clamp) = drain_pending(&next, amount);
    next.available_balance = next.available_balance + amount;
    next.pending_balance = pending;
    next.transactions.push(WalletTransaction::new(
        TransactionKind::Refund,
        amount,
        format!("Withdrawal {withdrawal_id} released"),
        Some(TransactionLink::Withdrawal(withdrawal_id)),
        at,
    ));
    LedgerOutcome {
        wallet: next,
        clamp,
    }
}

/// Settles a completed payout: the reservation leaves pending and the paid
/// amount is added to the lifetime withdrawn total.
#[must_use]
pub fn settle_withdrawal(
    wallet: &Wallet,
    reserved: Money,
    paid: Money,
    destination: &PayoutDestination,
    withdrawal_id: WithdrawalId,
    at: Timestamp,
) -> LedgerOutcome {
    let mut next = wallet.next_revision(at);
    let (pending, clamp) = drain_pending(&next, reserved);
    next.pending_balance = pending;
    next.total_withdrawn = next.total_withdrawn + paid;
    next.transactions.push(WalletTransaction::new(
        TransactionKind::Withdrawal,
        -paid,
        format!("Withdrawal paid to {destination}"),
        Some(TransactionLink::Withdrawal(withdrawal_id)),
        at,
    ));
    LedgerOutcome {
        wallet: next,
        clamp,
    }
}

fn drain_pending(wallet: &Wallet, amount: Money) -> (Money, Option<PendingClamp>) {
    let (pending, clamped) = wallet.pending_balance.saturating_sub(amount);
    let clamp = clamped.then_some(PendingClamp {
        requested: amount,
        held: wallet.pending_balance,
    });
    (pending, clamp)
}
