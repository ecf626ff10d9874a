//! Test harness and data factories.

use std::sync::Arc;
use std::time::Duration;

use consultant_wallet::application::{WalletService, WithdrawalService};
use consultant_wallet::domain::{ConsultantId, Money, OrderReference, PayoutDestination, Wallet};
use consultant_wallet::infrastructure::{
    DEFAULT_FILTER, EventPublisher, InMemoryLedgerStore, InMemoryNotifier, LedgerStore,
    WalletConfig, init_tracing,
};
use tokio::task::JoinHandle;

/// Services wired to one in-memory store and a recording notifier.
pub struct Ledger {
    pub store: Arc<InMemoryLedgerStore>,
    pub wallets: WalletService,
    pub withdrawals: WithdrawalService,
    pub notifier: InMemoryNotifier,
    pub dispatcher: JoinHandle<()>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_config(WalletConfig::default())
    }

    pub fn with_config(config: WalletConfig) -> Self {
        init_tracing(DEFAULT_FILTER);

        let store = Arc::new(InMemoryLedgerStore::new());
        let shared: Arc<dyn LedgerStore> = store.clone();
        let notifier = InMemoryNotifier::new();
        let (publisher, dispatcher) =
            EventPublisher::spawn(config.notification_buffer, Arc::new(notifier.clone()));

        Self {
            store,
            wallets: WalletService::new(Arc::clone(&shared), config.clone()),
            withdrawals: WithdrawalService::new(shared, publisher, config),
            notifier,
            dispatcher,
        }
    }

    /// Opens a wallet for a new consultant holding `amount` of earnings.
    pub async fn funded_consultant(&self, amount: i64) -> ConsultantId {
        let consultant = ConsultantId::generate();
        if amount > 0 {
            self.wallets
                .credit_earning(consultant, Money::new(amount), OrderFactory::next())
                .await
                .unwrap();
        } else {
            self.wallets.balance(consultant).await.unwrap();
        }
        consultant
    }

    pub async fn wallet(&self, consultant: ConsultantId) -> Wallet {
        self.wallets.balance(consultant).await.unwrap()
    }

    /// Waits until the notifier has seen at least `count` messages.
    pub async fn notifications(&self, count: usize) -> Vec<String> {
        for _ in 0..200 {
            let delivered = self.notifier.event_types();
            if delivered.len() >= count {
                return delivered;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.notifier.event_types()
    }
}

pub struct OrderFactory;

impl OrderFactory {
    pub fn next() -> OrderReference {
        OrderReference::new(format!("order-{}", uuid::Uuid::now_v7())).unwrap()
    }

    pub fn named(reference: &str) -> OrderReference {
        OrderReference::new(reference).unwrap()
    }
}

pub struct DestinationFactory;

impl DestinationFactory {
    pub fn bank() -> PayoutDestination {
        PayoutDestination::BankTransfer {
            bank_name: "BPI".to_string(),
            account_name: "Dana Cruz".to_string(),
            account_number: "0012345678".to_string(),
        }
    }

    pub fn ewallet() -> PayoutDestination {
        PayoutDestination::EWallet {
            provider: "GCash".to_string(),
            account_identifier: "09171234567".to_string(),
        }
    }

    pub fn crypto() -> PayoutDestination {
        PayoutDestination::Crypto {
            network: "ethereum".to_string(),
            address: "0x52908400098527886E0F7030069857D2E4169EE7".to_string(),
        }
    }
}
