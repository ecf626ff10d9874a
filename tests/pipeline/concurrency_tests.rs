//! Concurrent requests against the same wallet.

use std::sync::Arc;

use crate::common::*;
use consultant_wallet::application::ServiceError;
use consultant_wallet::domain::{MethodSelection, Money};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn two_requests_racing_for_the_same_funds() {
    let ledger = Arc::new(Ledger::new());
    let consultant = ledger.funded_consultant(3_000).await;

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move {
                ledger
                    .withdrawals
                    .request_withdrawal(
                        consultant,
                        Money::new(2_000),
                        MethodSelection::OneOff(DestinationFactory::bank()),
                    )
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    let mut insufficient = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(ServiceError::InsufficientBalance {
                requested,
                available,
            }) => {
                assert_eq!(requested, Money::new(2_000));
                assert_eq!(available, Money::new(1_000));
                insufficient += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!((successes, insufficient), (1, 1));
    assert_balances(&ledger.wallet(consultant).await, 1_000, 2_000);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_small_requests_never_overdraw() {
    let ledger = Arc::new(Ledger::new());
    let consultant = ledger.funded_consultant(20_000).await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move {
                ledger
                    .withdrawals
                    .request_withdrawal(
                        consultant,
                        Money::new(2_000),
                        MethodSelection::OneOff(DestinationFactory::ewallet()),
                    )
                    .await
            })
        })
        .collect();

    let mut accepted = 0_i64;
    let mut insufficient = 0_i64;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(ServiceError::InsufficientBalance { .. }) => insufficient += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let wallet = ledger.wallet(consultant).await;
    assert_eq!((accepted, insufficient), (10, 6));
    assert_balances_valid(&wallet);
    assert_balances(&wallet, 0, 20_000);
    assert_conserved(&wallet, Money::zero());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_rejections_release_once() {
    let ledger = Arc::new(Ledger::new());
    let consultant = ledger.funded_consultant(5_000).await;
    let request = ledger
        .withdrawals
        .request_withdrawal(
            consultant,
            Money::new(5_000),
            MethodSelection::OneOff(DestinationFactory::bank()),
        )
        .await
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move { ledger.withdrawals.reject(request.id, "duplicate").await })
        })
        .collect();

    let mut released = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            released += 1;
        }
    }

    assert_eq!(released, 1);
    assert_balances(&ledger.wallet(consultant).await, 5_000, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_credits_all_land() {
    let ledger = Arc::new(Ledger::new());
    let consultant = ledger.funded_consultant(0).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move {
                ledger
                    .wallets
                    .credit_earning(consultant, Money::new(500), OrderFactory::next())
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_credited());
    }

    let wallet = ledger.wallet(consultant).await;
    assert_eq!(wallet.total_earnings, Money::new(8 * 500));
    assert_eq!(wallet.available_balance, Money::new(8 * 500));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn heavy_credit_contention_never_gives_up() {
    let ledger = Arc::new(Ledger::new());
    let consultant = ledger.funded_consultant(0).await;

    for _ in 0..4 {
        let handles: Vec<_> = (0..256)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                tokio::spawn(async move {
                    ledger
                        .wallets
                        .credit_earning(consultant, Money::new(500), OrderFactory::next())
                        .await
                })
            })
            .collect();

        for handle in handles {
            match handle.await.unwrap() {
                Ok(outcome) => assert!(outcome.is_credited()),
                Err(error) => panic!("credit failed under contention: {error}"),
            }
        }
    }

    let wallet = ledger.wallet(consultant).await;
    assert_eq!(wallet.total_earnings, Money::new(4 * 256 * 500));
    assert_balances(&wallet, 4 * 256 * 500, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn same_order_racing_is_credited_once() {
    let ledger = Arc::new(Ledger::new());
    let consultant = ledger.funded_consultant(0).await;

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move {
                ledger
                    .wallets
                    .credit_earning(
                        consultant,
                        Money::new(900),
                        OrderFactory::named("order-shared"),
                    )
                    .await
            })
        })
        .collect();

    let mut credited = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_credited() {
            credited += 1;
        }
    }

    assert_eq!(credited, 1);
    assert_balances(&ledger.wallet(consultant).await, 900, 0);
}
