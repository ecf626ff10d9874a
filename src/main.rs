//! Consultant wallet demo.
//!
//! Runs one withdrawal through the whole pipeline against the in-memory store
//! and logs every step. Configure with the `WALLET_*` environment variables
//! and `RUST_LOG`.

use std::sync::Arc;

use consultant_wallet::application::{ServiceError, WalletService, WithdrawalService};
use consultant_wallet::domain::{
    ConsultantId, MethodSelection, Money, OrderReference, PayoutDestination,
};
use consultant_wallet::infrastructure::{
    DEFAULT_FILTER, EventPublisher, InMemoryLedgerStore, LedgerStore, LoggingNotifier, WalletConfig,
    init_tracing,
};

#[tokio::main]
async fn main() {
    init_tracing(DEFAULT_FILTER);

    let config = match WalletConfig::from_env() {
        Ok(config) => {
            tracing::info!(
                minimum_withdrawal = %config.minimum_withdrawal,
                platform_fee_percent = %config.platform_fee_percent,
                "Configuration loaded"
            );
            config
        }
        Err(error) => {
            tracing::warn!("Failed to load configuration from environment: {error}");
            tracing::info!("Using default configuration");
            WalletConfig::default()
        }
    };

    let store: Arc<dyn LedgerStore> = Arc::new(InMemoryLedgerStore::new());
    let (publisher, dispatcher) =
        EventPublisher::spawn(config.notification_buffer, Arc::new(LoggingNotifier));
    let wallets = WalletService::new(Arc::clone(&store), config.clone());
    let withdrawals = WithdrawalService::new(store, publisher, config);

    match OrderReference::new("order-1001") {
        Ok(order) => {
            if let Err(error) = run(&wallets, &withdrawals, order).await {
                tracing::error!(kind = ?error.kind(), "demo failed: {error}");
            }
        }
        Err(error) => tracing::error!("invalid order reference: {error}"),
    }

    // dropping the last publisher lets the dispatcher drain and stop
    drop(withdrawals);
    if let Err(error) = dispatcher.await {
        tracing::error!("notification dispatcher panicked: {error}");
    }
}

async fn run(
    wallets: &WalletService,
    withdrawals: &WithdrawalService,
    order: OrderReference,
) -> Result<(), ServiceError> {
    let consultant = ConsultantId::generate();

    wallets
        .credit_earning(consultant, Money::new(10_000), order)
        .await?;
    wallets
        .add_payout_method(
            consultant,
            PayoutDestination::BankTransfer {
                bank_name: "BPI".to_string(),
                account_name: "Demo Consultant".to_string(),
                account_number: "0012345678".to_string(),
            },
            true,
        )
        .await?;

    let request = withdrawals
        .request_withdrawal(consultant, Money::new(5_000), MethodSelection::Default)
        .await?;
    withdrawals
        .approve(request.id, Some("identity verified".to_string()))
        .await?;
    withdrawals.start_processing(request.id).await?;
    withdrawals
        .complete(request.id, Some("PAYOUT-0001".to_string()))
        .await?;

    let wallet = wallets.balance(consultant).await?;
    tracing::info!(
        available = %wallet.available_balance,
        pending = %wallet.pending_balance,
        total_earnings = %wallet.total_earnings,
        total_withdrawn = %wallet.total_withdrawn,
        "final balance"
    );
    Ok(())
}
