//! Earnings intake, balance queries and the transaction log bound.

use crate::common::*;
use consultant_wallet::application::ServiceError;
use consultant_wallet::domain::{ConsultantId, Money, TransactionKind, TransactionLink};
use consultant_wallet::infrastructure::WalletConfig;
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn first_credit_opens_the_wallet() {
    let ledger = Ledger::new();
    let consultant = ConsultantId::generate();
    let order = OrderFactory::named("order-42");

    let outcome = ledger
        .wallets
        .credit_earning(consultant, Money::new(2_500), order.clone())
        .await
        .unwrap();

    assert!(outcome.is_credited());
    let wallet = ledger.wallet(consultant).await;
    assert_balances(&wallet, 2_500, 0);
    assert_eq!(wallet.total_earnings, Money::new(2_500));
    assert_eq!(
        wallet.transactions.latest().and_then(|entry| entry.link.clone()),
        Some(TransactionLink::Order(order))
    );
    assert_eq!(ledger.store.wallet_count().await, 1);
}

#[rstest]
#[tokio::test]
async fn repeated_order_is_not_credited_twice() {
    let ledger = Ledger::new();
    let consultant = ConsultantId::generate();

    for _ in 0..3 {
        ledger
            .wallets
            .credit_earning(consultant, Money::new(1_000), OrderFactory::named("order-7"))
            .await
            .unwrap();
    }

    let wallet = ledger.wallet(consultant).await;
    assert_eq!(wallet.total_earnings, Money::new(1_000));
    assert_eq!(wallet.transactions.len(), 1);
}

#[rstest]
#[case(0)]
#[case(-100)]
#[tokio::test]
async fn non_positive_earnings_are_rejected(#[case] amount: i64) {
    let ledger = Ledger::new();

    let result = ledger
        .wallets
        .credit_earning(ConsultantId::generate(), Money::new(amount), OrderFactory::next())
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidAmount(_))));
}

#[rstest]
#[tokio::test]
async fn transaction_log_keeps_the_newest_entries() {
    let ledger = Ledger::new();
    let consultant = ConsultantId::generate();

    for unit in 1..=101 {
        ledger
            .wallets
            .credit_earning(
                consultant,
                Money::new(unit),
                OrderFactory::named(&format!("order-{unit}")),
            )
            .await
            .unwrap();
    }

    let wallet = ledger.wallet(consultant).await;
    assert_eq!(wallet.transactions.len(), 100);
    assert_eq!(wallet.transactions.oldest().map(|entry| entry.amount), Some(Money::new(2)));
    assert_eq!(wallet.transactions.latest().map(|entry| entry.amount), Some(Money::new(101)));
    assert_eq!(wallet.total_earnings, Money::new(101 * 102 / 2));
}

#[rstest]
#[tokio::test]
async fn log_capacity_follows_configuration() {
    let config = WalletConfig {
        transaction_log_capacity: 3,
        ..WalletConfig::default()
    };
    let ledger = Ledger::with_config(config);
    let consultant = ConsultantId::generate();

    for _ in 0..5 {
        ledger
            .wallets
            .credit_earning(consultant, Money::new(100), OrderFactory::next())
            .await
            .unwrap();
    }

    let recent = ledger.wallets.transactions(consultant, 10).await.unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|entry| entry.kind == TransactionKind::Earning));
}

#[rstest]
#[tokio::test]
async fn order_stays_credited_after_leaving_the_log() {
    let config = WalletConfig {
        transaction_log_capacity: 5,
        ..WalletConfig::default()
    };
    let ledger = Ledger::with_config(config);
    let consultant = ConsultantId::generate();
    let first = OrderFactory::named("order-first");

    ledger
        .wallets
        .credit_earning(consultant, Money::new(700), first.clone())
        .await
        .unwrap();
    for unit in 0..20 {
        ledger
            .wallets
            .credit_earning(
                consultant,
                Money::new(100),
                OrderFactory::named(&format!("order-{unit:04}")),
            )
            .await
            .unwrap();
    }

    let outcome = ledger
        .wallets
        .credit_earning(consultant, Money::new(700), first)
        .await
        .unwrap();

    assert!(!outcome.is_credited());
    assert_eq!(outcome.wallet().total_earnings, Money::new(700 + 20 * 100));
}

#[rstest]
#[tokio::test]
async fn wallet_size_stays_flat_as_orders_accumulate() {
    let config = WalletConfig {
        transaction_log_capacity: 10,
        ..WalletConfig::default()
    };
    let ledger = Ledger::with_config(config);
    let consultant = ConsultantId::generate();
    let mut sizes = Vec::new();

    for unit in 0..300 {
        ledger
            .wallets
            .credit_earning(
                consultant,
                Money::new(1),
                OrderFactory::named(&format!("order-{unit:04}")),
            )
            .await
            .unwrap();
        if unit == 49 || unit == 299 {
            let wallet = ledger.wallet(consultant).await;
            sizes.push(serde_json::to_vec(&wallet).unwrap().len());
        }
    }

    // counters and timestamps vary by a few digits; six times the orders must not show
    assert!(sizes[1] <= sizes[0] * 11 / 10, "wallet grew from {} to {} bytes", sizes[0], sizes[1]);
    assert_eq!(ledger.wallet(consultant).await.total_earnings, Money::new(300));
}
