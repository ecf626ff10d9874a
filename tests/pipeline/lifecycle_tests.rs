//! Happy path and state machine enforcement.

use crate::common::*;
use consultant_wallet::application::ServiceError;
use consultant_wallet::domain::{
    MethodSelection, Money, TransactionKind, WithdrawalStatus,
};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn full_lifecycle_settles_net_amount() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;

    let request = ledger
        .withdrawals
        .request_withdrawal(
            consultant,
            Money::new(5_000),
            MethodSelection::OneOff(DestinationFactory::bank()),
        )
        .await
        .unwrap();
    assert_eq!(request.fee.platform_fee, Money::new(100));
    assert_eq!(request.fee.actual_amount_paid, Money::new(4_900));
    assert_balances(&ledger.wallet(consultant).await, 5_000, 5_000);

    let approved = ledger
        .withdrawals
        .approve(request.id, Some("ok".to_string()))
        .await
        .unwrap();
    assert_eq!(approved.status, WithdrawalStatus::Approved);
    assert!(approved.approved_at.is_some());

    let processing = ledger.withdrawals.start_processing(request.id).await.unwrap();
    assert!(processing.processed_at.is_some());

    let completed = ledger
        .withdrawals
        .complete(request.id, Some("PAY-1".to_string()))
        .await
        .unwrap();
    assert_eq!(completed.status, WithdrawalStatus::Completed);
    assert_eq!(completed.external_reference.as_deref(), Some("PAY-1"));
    assert!(completed.completed_at.is_some());

    let wallet = ledger.wallet(consultant).await;
    assert_balances(&wallet, 5_000, 0);
    assert_eq!(wallet.total_withdrawn, Money::new(4_900));
    assert_eq!(wallet.total_earnings, Money::new(10_000));
    assert_conserved(&wallet, Money::new(100));

    let kinds: Vec<TransactionKind> = wallet.transactions.iter().map(|entry| entry.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Earning,
            TransactionKind::Withdrawal,
            TransactionKind::Withdrawal,
        ]
    );
    assert_eq!(
        wallet.transactions.latest().map(|entry| entry.amount),
        Some(Money::new(-4_900))
    );
}

#[rstest]
#[tokio::test]
async fn processing_cannot_skip_approval() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;
    let request = ledger
        .withdrawals
        .request_withdrawal(
            consultant,
            Money::new(2_000),
            MethodSelection::OneOff(DestinationFactory::ewallet()),
        )
        .await
        .unwrap();

    let result = ledger.withdrawals.start_processing(request.id).await;

    assert_eq!(
        result,
        Err(ServiceError::InvalidStateTransition {
            current: WithdrawalStatus::Pending,
            attempted: WithdrawalStatus::Processing,
        })
    );
}

#[rstest]
#[tokio::test]
async fn completed_request_accepts_no_further_transition() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;
    let request = ledger
        .withdrawals
        .request_withdrawal(
            consultant,
            Money::new(3_000),
            MethodSelection::OneOff(DestinationFactory::crypto()),
        )
        .await
        .unwrap();
    ledger.withdrawals.approve(request.id, None).await.unwrap();
    ledger.withdrawals.start_processing(request.id).await.unwrap();
    let completed = ledger.withdrawals.complete(request.id, None).await.unwrap();

    assert!(matches!(
        ledger.withdrawals.reject(request.id, "too late").await,
        Err(ServiceError::InvalidStateTransition { .. })
    ));
    assert!(matches!(
        ledger.withdrawals.complete(request.id, None).await,
        Err(ServiceError::InvalidStateTransition { .. })
    ));
    assert_eq!(ledger.withdrawals.find(request.id).await.unwrap(), completed);

    let wallet = ledger.wallet(consultant).await;
    assert_eq!(wallet.total_withdrawn, Money::new(2_940));
}

#[rstest]
#[case(1_999, true)]
#[case(2_000, false)]
#[case(2_001, false)]
#[tokio::test]
async fn minimum_withdrawal_is_enforced(#[case] amount: i64, #[case] rejected: bool) {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;

    let result = ledger
        .withdrawals
        .request_withdrawal(
            consultant,
            Money::new(amount),
            MethodSelection::OneOff(DestinationFactory::bank()),
        )
        .await;

    if rejected {
        assert_eq!(
            result,
            Err(ServiceError::BelowMinimum {
                requested: Money::new(amount),
                minimum: Money::new(2_000),
            })
        );
        assert_balances(&ledger.wallet(consultant).await, 10_000, 0);
    } else {
        assert!(result.is_ok());
    }
}

#[rstest]
#[tokio::test]
async fn insufficient_balance_leaves_wallet_untouched() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(3_000).await;
    let before = ledger.wallet(consultant).await;

    let result = ledger
        .withdrawals
        .request_withdrawal(
            consultant,
            Money::new(5_000),
            MethodSelection::OneOff(DestinationFactory::bank()),
        )
        .await;

    assert_eq!(
        result,
        Err(ServiceError::InsufficientBalance {
            requested: Money::new(5_000),
            available: Money::new(3_000),
        })
    );
    assert_eq!(ledger.wallet(consultant).await, before);
    assert!(ledger.withdrawals.list_for_consultant(consultant).await.unwrap().is_empty());
}
