//! Transaction coordinator
//!
//! Owns the client-side state (account, loading flag, history, form, count)
//! and runs the user-facing operations against the wallet gateway. After a
//! confirmed submission the host is asked to reload, which rebuilds the
//! coordinator and re-runs [`TransactionCoordinator::initialize`].

use std::sync::Arc;

use primitive_types::U256;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::api::ethereum::{ApiError, TransactionRequest};
use crate::db::{self, LocalStorage};
use crate::host::Host;
use crate::models::{FormData, FormField, TransactionRecord};
use crate::services::gateway_service::{GatewayError, WalletGateway, WalletProvider};
use crate::utils::units::{parse_ether, to_quantity, AmountError};

/// Gas allowance for the native transfer (21000 units, 0.000021 of the coin at 1 gwei)
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;

pub const WALLET_MISSING_ALERT: &str = "Please install MetaMask";

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("Wallet request failed: {0}")]
    Wallet(#[source] ApiError),
    #[error("Ledger request failed: {0}")]
    Ledger(#[source] GatewayError),
    #[error("You don't have any transactions: {0}")]
    NoTransactions(#[source] GatewayError),
    #[error(transparent)]
    InvalidAmount(#[from] AmountError),
    #[error("A transaction is already being submitted")]
    SubmissionInFlight,
    /// The native transfer went through but the contract record did not
    #[error("Transfer {transfer_hash} was sent but its ledger record was not appended: {source}")]
    RecordNotAppended {
        transfer_hash: String,
        #[source]
        source: GatewayError,
    },
}

/// Snapshot of everything the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorState {
    pub current_account: String,
    pub is_loading: bool,
    pub transactions: Vec<TransactionRecord>,
    pub form_data: FormData,
    pub transaction_count: Option<u64>,
}

pub struct TransactionCoordinator {
    gateway: Arc<dyn WalletGateway>,
    storage: Arc<dyn LocalStorage>,
    host: Arc<dyn Host>,
    state: Mutex<CoordinatorState>,
}

fn count_to_u64(count: U256) -> u64 {
    if count.bits() > 64 {
        u64::MAX
    } else {
        count.low_u64()
    }
}

impl TransactionCoordinator {
    /// Fresh coordinator; the count is seeded from the local cache
    pub fn new(
        gateway: Arc<dyn WalletGateway>,
        storage: Arc<dyn LocalStorage>,
        host: Arc<dyn Host>,
    ) -> Self {
        let state = CoordinatorState {
            transaction_count: db::get_transaction_count(storage.as_ref()),
            ..Default::default()
        };

        Self {
            gateway,
            storage,
            host,
            state: Mutex::new(state),
        }
    }

    pub async fn snapshot(&self) -> CoordinatorState {
        self.state.lock().await.clone()
    }

    /// Wallet capability, or alert the user and return `None`
    fn wallet_or_alert(&self) -> Option<Arc<dyn WalletProvider>> {
        let wallet = self.gateway.wallet();
        if wallet.is_none() {
            warn!("No wallet available");
            self.host.alert(WALLET_MISSING_ALERT);
        }
        wallet
    }

    /// Startup sequence: wallet presence check, then count resync
    pub async fn initialize(&self) -> Result<(), CoordinatorError> {
        let connected = self.check_if_wallet_is_connected().await;
        let counted = self.check_if_transaction_exists().await;
        connected.and(counted)
    }

    pub async fn handle_change(&self, field: FormField, value: impl Into<String>) {
        self.state.lock().await.form_data.set(field, value.into());
    }

    /// Adopt an already authorized account without prompting, then load history
    pub async fn check_if_wallet_is_connected(&self) -> Result<(), CoordinatorError> {
        let Some(wallet) = self.wallet_or_alert() else {
            return Ok(());
        };

        let accounts = wallet.accounts().await.map_err(|e| {
            error!("Failed to list wallet accounts: {}", e);
            CoordinatorError::Wallet(e)
        })?;

        match accounts.into_iter().next() {
            Some(account) => {
                info!("Wallet already connected: {}", account);
                self.state.lock().await.current_account = account;
                self.get_all_transactions().await
            }
            None => {
                info!("No accounts found.");
                Ok(())
            }
        }
    }

    /// Refresh the cached count from the ledger
    pub async fn check_if_transaction_exists(&self) -> Result<(), CoordinatorError> {
        let ledger = match self.gateway.acquire_ledger_handle() {
            Ok(ledger) => ledger,
            Err(GatewayError::WalletNotInstalled) => {
                debug!("Skipping transaction count refresh, no wallet");
                return Ok(());
            }
            Err(e) => {
                error!("Failed to acquire ledger handle: {}", e);
                return Err(CoordinatorError::Ledger(e));
            }
        };

        let count = ledger.get_transaction_count().await.map_err(|e| {
            error!("Failed to read transaction count: {}", e);
            CoordinatorError::Ledger(e)
        })?;
        let count = count_to_u64(count);

        self.store_count(count);
        self.state.lock().await.transaction_count = Some(count);
        debug!("Ledger holds {} transactions", count);
        Ok(())
    }

    /// Ask the wallet to authorize this client and adopt the first account
    pub async fn connect_wallet(&self) -> Result<(), CoordinatorError> {
        let Some(wallet) = self.wallet_or_alert() else {
            return Ok(());
        };

        let accounts = wallet.request_accounts().await.map_err(|e| {
            error!("Wallet authorization failed: {}", e);
            CoordinatorError::Wallet(e)
        })?;

        match accounts.into_iter().next() {
            Some(account) => {
                info!("Connected account {}", account);
                self.state.lock().await.current_account = account;
            }
            None => warn!("Wallet approved the request but exposed no accounts"),
        }
        Ok(())
    }

    /// Replace the history with a freshly fetched projection of the ledger
    pub async fn get_all_transactions(&self) -> Result<(), CoordinatorError> {
        if self.wallet_or_alert().is_none() {
            return Ok(());
        }

        let ledger = self.gateway.acquire_ledger_handle().map_err(|e| {
            error!("Failed to acquire ledger handle: {}", e);
            CoordinatorError::NoTransactions(e)
        })?;

        let raw = ledger.list_transactions().await.map_err(|e| {
            error!("Failed to load transactions: {}", e);
            CoordinatorError::NoTransactions(e)
        })?;

        let transactions: Vec<TransactionRecord> = raw.iter().map(TransactionRecord::from).collect();
        debug!("Loaded {} transactions", transactions.len());
        self.state.lock().await.transactions = transactions;
        Ok(())
    }

    /// Submit the form: native transfer, ledger record, confirmation, reload
    pub async fn send_transaction(&self) -> Result<(), CoordinatorError> {
        let Some(wallet) = self.wallet_or_alert() else {
            return Ok(());
        };

        let (form, from) = {
            let mut state = self.state.lock().await;
            if state.is_loading {
                return Err(CoordinatorError::SubmissionInFlight);
            }
            state.is_loading = true;
            (state.form_data.clone(), state.current_account.clone())
        };

        let result = self.submit(wallet.as_ref(), &form, from).await;

        {
            let mut state = self.state.lock().await;
            state.is_loading = false;
            if let Ok(count) = &result {
                state.transaction_count = Some(*count);
            }
        }

        match result {
            Ok(count) => {
                info!("Transaction recorded, ledger now holds {} transactions", count);
                self.host.reload();
                Ok(())
            }
            Err(e) => {
                error!("Failed to send transaction: {}", e);
                Err(e)
            }
        }
    }

    async fn submit(
        &self,
        wallet: &dyn WalletProvider,
        form: &FormData,
        from: String,
    ) -> Result<u64, CoordinatorError> {
        let amount = parse_ether(&form.amount)?;
        let ledger = self
            .gateway
            .acquire_ledger_handle()
            .map_err(CoordinatorError::Ledger)?;

        let transfer_hash = wallet
            .send_transaction(TransactionRequest {
                from,
                to: form.address_to.clone(),
                gas: Some(to_quantity(U256::from(NATIVE_TRANSFER_GAS))),
                value: Some(to_quantity(amount)),
                data: None,
            })
            .await
            .map_err(CoordinatorError::Wallet)?;
        info!("Native transfer sent: {}", transfer_hash);

        let pending = match ledger
            .submit_transaction(&form.address_to, amount, &form.message, &form.keyword)
            .await
        {
            Ok(pending) => pending,
            Err(source) => {
                return Err(CoordinatorError::RecordNotAppended {
                    transfer_hash,
                    source,
                })
            }
        };

        info!("Loading - {}", pending.hash());
        if let Err(source) = pending.wait().await {
            return Err(CoordinatorError::RecordNotAppended {
                transfer_hash,
                source,
            });
        }
        info!("Success - {}", pending.hash());

        let count = ledger
            .get_transaction_count()
            .await
            .map_err(CoordinatorError::Ledger)?;
        let count = count_to_u64(count);
        self.store_count(count);
        Ok(count)
    }

    /// The cache is only a display hint, so write failures are not fatal
    fn store_count(&self, count: u64) {
        if let Err(e) = db::set_transaction_count(self.storage.as_ref(), count) {
            warn!("Failed to cache transaction count: {}", e);
        }
    }
}
