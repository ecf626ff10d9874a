//! Ledger-level assertions.

use consultant_wallet::domain::{Money, Wallet};

/// Both balance buckets are non-negative.
pub fn assert_balances_valid(wallet: &Wallet) {
    assert!(
        wallet.balances_are_valid(),
        "negative balance: available {}, pending {}",
        wallet.available_balance,
        wallet.pending_balance
    );
}

/// Every credited unit is either available, pending, paid out or taken as fee.
pub fn assert_conserved(wallet: &Wallet, fees_taken: Money) {
    assert_eq!(
        wallet.available_balance + wallet.pending_balance + wallet.total_withdrawn + fees_taken,
        wallet.total_earnings,
        "money was created or lost"
    );
}

pub fn assert_balances(wallet: &Wallet, available: i64, pending: i64) {
    assert_eq!(wallet.available_balance, Money::new(available), "available balance");
    assert_eq!(wallet.pending_balance, Money::new(pending), "pending balance");
}
