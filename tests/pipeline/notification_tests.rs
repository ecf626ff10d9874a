//! Events reach the notifier after each committed transition.

use std::sync::Arc;

use crate::common::*;
use consultant_wallet::application::{WalletService, WithdrawalService};
use consultant_wallet::domain::{ConsultantId, MethodSelection, Money};
use consultant_wallet::infrastructure::{
    EventPublisher, InMemoryLedgerStore, InMemoryNotifier, LedgerStore, WalletConfig,
};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn each_transition_notifies_once_in_order() {
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
    ledger.withdrawals.approve(request.id, None).await.unwrap();
    ledger.withdrawals.start_processing(request.id).await.unwrap();
    ledger.withdrawals.complete(request.id, None).await.unwrap();

    let delivered = ledger.notifications(4).await;

    assert_eq!(
        delivered,
        vec![
            "withdrawal.request_received",
            "withdrawal.approved",
            "withdrawal.processing",
            "withdrawal.completed",
        ]
    );
    let consultant_ids: Vec<String> = ledger
        .notifier
        .messages()
        .into_iter()
        .map(|message| message.consultant_id)
        .collect();
    assert!(consultant_ids.iter().all(|id| *id == consultant.to_string()));
}

#[rstest]
#[tokio::test]
async fn failed_operations_publish_nothing() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(1_000).await;

    let result = ledger
        .withdrawals
        .request_withdrawal(
            consultant,
            Money::new(2_000),
            MethodSelection::OneOff(DestinationFactory::bank()),
        )
        .await;

    assert!(result.is_err());
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(ledger.notifier.messages().is_empty());
}

#[rstest]
#[tokio::test]
async fn notifier_failure_does_not_roll_back() {
    let store: Arc<dyn LedgerStore> = Arc::new(InMemoryLedgerStore::new());
    let config = WalletConfig::default();
    let notifier = InMemoryNotifier::failing();
    let (publisher, _dispatcher) = EventPublisher::spawn(8, Arc::new(notifier));
    let wallets = WalletService::new(Arc::clone(&store), config.clone());
    let withdrawals = WithdrawalService::new(store, publisher, config);
    let consultant = ConsultantId::generate();
    wallets
        .credit_earning(consultant, Money::new(10_000), OrderFactory::next())
        .await
        .unwrap();

    let request = withdrawals
        .request_withdrawal(
            consultant,
            Money::new(5_000),
            MethodSelection::OneOff(DestinationFactory::ewallet()),
        )
        .await
        .unwrap();
    let cancelled = withdrawals.reject(request.id, "duplicate").await.unwrap();

    assert_eq!(withdrawals.find(request.id).await.unwrap(), cancelled);
    assert_balances(&wallets.balance(consultant).await.unwrap(), 10_000, 0);
}
