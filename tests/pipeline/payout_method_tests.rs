//! Saved payout methods and how withdrawals pick one.

use crate::common::*;
use consultant_wallet::application::ServiceError;
use consultant_wallet::domain::{MethodSelection, Money, PayoutDestination, PayoutMethodId};
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn default_method_is_snapshotted_on_request() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;
    let method_id = ledger
        .wallets
        .add_payout_method(consultant, DestinationFactory::bank(), false)
        .await
        .unwrap();

    let request = ledger
        .withdrawals
        .request_withdrawal(consultant, Money::new(2_000), MethodSelection::Default)
        .await
        .unwrap();

    // later edits to the saved methods do not touch the request
    ledger.wallets.remove_payout_method(consultant, method_id).await.unwrap();

    let stored = ledger.withdrawals.find(request.id).await.unwrap();
    assert_eq!(stored.method.method_id, Some(method_id));
    assert_eq!(stored.method.destination, DestinationFactory::bank());
}

#[rstest]
#[tokio::test]
async fn set_default_switches_the_default() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;
    ledger
        .wallets
        .add_payout_method(consultant, DestinationFactory::bank(), false)
        .await
        .unwrap();
    let ewallet = ledger
        .wallets
        .add_payout_method(consultant, DestinationFactory::ewallet(), false)
        .await
        .unwrap();

    ledger
        .wallets
        .set_default_payout_method(consultant, ewallet)
        .await
        .unwrap();

    let wallet = ledger.wallet(consultant).await;
    let defaults: Vec<PayoutMethodId> = wallet
        .payout_methods
        .iter()
        .filter(|method| method.is_default)
        .map(|method| method.id)
        .collect();
    assert_eq!(defaults, vec![ewallet]);
}

#[rstest]
#[tokio::test]
async fn removing_the_default_promotes_the_next_method() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;
    let bank = ledger
        .wallets
        .add_payout_method(consultant, DestinationFactory::bank(), false)
        .await
        .unwrap();
    let crypto = ledger
        .wallets
        .add_payout_method(consultant, DestinationFactory::crypto(), false)
        .await
        .unwrap();

    let removed = ledger.wallets.remove_payout_method(consultant, bank).await.unwrap();

    assert!(removed.is_default);
    let wallet = ledger.wallet(consultant).await;
    assert_eq!(
        wallet.payout_methods.default_method().map(|method| method.id),
        Some(crypto)
    );
}

#[rstest]
#[tokio::test]
async fn saved_selection_must_exist() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;
    let unknown = PayoutMethodId::generate();

    let result = ledger
        .withdrawals
        .request_withdrawal(consultant, Money::new(2_000), MethodSelection::Saved(unknown))
        .await;

    assert_eq!(result, Err(ServiceError::PayoutMethodNotFound(unknown)));
    assert_balances(&ledger.wallet(consultant).await, 10_000, 0);
}

#[rstest]
#[tokio::test]
async fn incomplete_destination_is_rejected() {
    let ledger = Ledger::new();
    let consultant = ledger.funded_consultant(10_000).await;
    let incomplete = PayoutDestination::EWallet {
        provider: "GCash".to_string(),
        account_identifier: "  ".to_string(),
    };

    let saved = ledger
        .wallets
        .add_payout_method(consultant, incomplete.clone(), true)
        .await;
    let one_off = ledger
        .withdrawals
        .request_withdrawal(consultant, Money::new(2_000), MethodSelection::OneOff(incomplete))
        .await;

    assert!(matches!(saved, Err(ServiceError::InvalidPayoutDestination(_))));
    assert!(matches!(one_off, Err(ServiceError::InvalidPayoutDestination(_))));
}
