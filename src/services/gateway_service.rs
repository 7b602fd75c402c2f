//! Wallet gateway: turns the configured wallet endpoint into the capability
//! objects the coordinator works with.
//!
//! ```text
//! WalletGateway
//!     ├── wallet()                 → WalletProvider (accounts, authorization, native transfers)
//!     └── acquire_ledger_handle()  → LedgerHandle (contract reads and record appends)
//!                                        └── submit_transaction() → PendingReceipt
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use primitive_types::U256;
use thiserror::Error;
use tracing::{debug, info};

use crate::api::ethereum::abi::{self, AbiError};
use crate::api::ethereum::{ApiError, CallRequest, EthereumClient, TransactionReceipt, TransactionRequest};
use crate::config::Config;
use crate::models::RawTransaction;
use crate::utils::units::from_quantity;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("No wallet found")]
    WalletNotInstalled,
    #[error("Wallet has no authorized account to sign with")]
    NoSigner,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Contract codec error: {0}")]
    Abi(#[from] AbiError),
}

/// Account access and native transfers offered by the wallet itself
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized for this client, without prompting
    async fn accounts(&self) -> Result<Vec<String>, ApiError>;
    /// Ask the user to authorize this client
    async fn request_accounts(&self) -> Result<Vec<String>, ApiError>;
    /// Sign and broadcast a transaction, returning its hash
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<String, ApiError>;
}

/// A submitted contract transaction that has not been confirmed yet
#[async_trait]
pub trait PendingReceipt: Send + Sync {
    fn hash(&self) -> &str;
    /// Suspend until the transaction is mined
    async fn wait(&self) -> Result<TransactionReceipt, GatewayError>;
}

/// Signer-bound handle to the transactions contract
#[async_trait]
pub trait LedgerHandle: Send + Sync {
    async fn list_transactions(&self) -> Result<Vec<RawTransaction>, GatewayError>;
    async fn get_transaction_count(&self) -> Result<U256, GatewayError>;
    async fn submit_transaction(
        &self,
        to: &str,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<Box<dyn PendingReceipt>, GatewayError>;
}

pub trait WalletGateway: Send + Sync {
    /// `None` when no wallet is installed
    fn wallet(&self) -> Option<Arc<dyn WalletProvider>>;
    /// Fails with [`GatewayError::WalletNotInstalled`] when no wallet is installed
    fn acquire_ledger_handle(&self) -> Result<Arc<dyn LedgerHandle>, GatewayError>;
}

#[async_trait]
impl WalletProvider for EthereumClient {
    async fn accounts(&self) -> Result<Vec<String>, ApiError> {
        EthereumClient::accounts(self).await
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ApiError> {
        EthereumClient::request_accounts(self).await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<String, ApiError> {
        EthereumClient::send_transaction(self, &tx).await
    }
}

/// Gateway backed by a JSON-RPC wallet endpoint
pub struct JsonRpcGateway {
    client: Option<Arc<EthereumClient>>,
    contract_address: String,
    poll_interval: Duration,
}

impl JsonRpcGateway {
    pub fn new(client: Option<EthereumClient>, contract_address: String, poll_interval: Duration) -> Self {
        Self {
            client: client.map(Arc::new),
            contract_address,
            poll_interval,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.wallet_rpc_url.clone().map(EthereumClient::new),
            config.contract_address.clone(),
            config.receipt_poll_interval,
        )
    }
}

impl WalletGateway for JsonRpcGateway {
    fn wallet(&self) -> Option<Arc<dyn WalletProvider>> {
        self.client
            .clone()
            .map(|client| client as Arc<dyn WalletProvider>)
    }

    fn acquire_ledger_handle(&self) -> Result<Arc<dyn LedgerHandle>, GatewayError> {
        let client = self.client.clone().ok_or(GatewayError::WalletNotInstalled)?;
        Ok(Arc::new(TransactionsContract {
            client,
            address: self.contract_address.clone(),
            poll_interval: self.poll_interval,
        }))
    }
}

/// The deployed transactions contract, signing with the wallet's first account
pub struct TransactionsContract {
    client: Arc<EthereumClient>,
    address: String,
    poll_interval: Duration,
}

impl TransactionsContract {
    async fn signer(&self) -> Result<String, GatewayError> {
        self.client
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(GatewayError::NoSigner)
    }

    async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>, GatewayError> {
        let output = self
            .client
            .call(&CallRequest {
                from: None,
                to: self.address.clone(),
                data: abi::to_hex_data(&data),
            })
            .await?;
        Ok(abi::from_hex_data(&output)?)
    }
}

#[async_trait]
impl LedgerHandle for TransactionsContract {
    async fn list_transactions(&self) -> Result<Vec<RawTransaction>, GatewayError> {
        let output = self.call(abi::encode_call(abi::GET_ALL_TRANSACTIONS)).await?;
        Ok(abi::decode_transactions(&output)?)
    }

    async fn get_transaction_count(&self) -> Result<U256, GatewayError> {
        let output = self.call(abi::encode_call(abi::GET_TRANSACTION_COUNT)).await?;
        Ok(abi::decode_uint256(&output)?)
    }

    async fn submit_transaction(
        &self,
        to: &str,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<Box<dyn PendingReceipt>, GatewayError> {
        let receiver = abi::parse_address(to)?;
        let data = abi::encode_add_to_blockchain(&receiver, amount, message, keyword);
        let from = self.signer().await?;

        let hash = self
            .client
            .send_transaction(&TransactionRequest {
                from,
                to: self.address.clone(),
                data: Some(abi::to_hex_data(&data)),
                ..Default::default()
            })
            .await?;
        info!("Submitted addToBlockchain: {}", hash);

        Ok(Box::new(PendingTransaction {
            client: self.client.clone(),
            hash,
            poll_interval: self.poll_interval,
        }))
    }
}

/// Polls for a receipt until the transaction is mined; there is no timeout
pub struct PendingTransaction {
    client: Arc<EthereumClient>,
    hash: String,
    poll_interval: Duration,
}

#[async_trait]
impl PendingReceipt for PendingTransaction {
    fn hash(&self) -> &str {
        &self.hash
    }

    async fn wait(&self) -> Result<TransactionReceipt, GatewayError> {
        loop {
            match self.client.get_transaction_receipt(&self.hash).await? {
                Some(receipt) if receipt.block_number.is_some() => {
                    if !receipt.succeeded() {
                        return Err(ApiError::Reverted(self.hash.clone()).into());
                    }
                    if let Some(block) = receipt.block_number.as_deref().and_then(from_quantity) {
                        debug!("{} mined in block {}", self.hash, block);
                    }
                    return Ok(receipt);
                }
                _ => {
                    debug!("{} not mined yet, polling again in {:?}", self.hash, self.poll_interval);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_node, word};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CONTRACT: &str = "0x00000000000000000000000000000000000000c0";
    const SIGNER: &str = "0x00000000000000000000000000000000000000a1";
    const RECEIVER: &str = "0x00000000000000000000000000000000000000b2";

    fn gateway(url: String) -> JsonRpcGateway {
        JsonRpcGateway::new(
            Some(EthereumClient::new(url)),
            CONTRACT.to_string(),
            Duration::from_millis(5),
        )
    }

    fn calldata_selector(params: &Value) -> String {
        params[0]["data"].as_str().unwrap_or_default()[2..10].to_string()
    }

    #[test]
    fn test_missing_wallet() {
        let gateway = JsonRpcGateway::new(None, CONTRACT.to_string(), Duration::from_secs(1));
        assert!(gateway.wallet().is_none());
        assert!(matches!(
            gateway.acquire_ledger_handle(),
            Err(GatewayError::WalletNotInstalled)
        ));
    }

    #[tokio::test]
    async fn test_transaction_count() {
        let url = spawn_node(|method, params| match method {
            "eth_call" => {
                assert_eq!(params[0]["to"], CONTRACT);
                assert_eq!(
                    calldata_selector(params),
                    hex::encode(abi::selector(abi::GET_TRANSACTION_COUNT))
                );
                Ok(json!(format!("0x{}", word(5))))
            }
            other => Err(json!({"code": -32601, "message": format!("unexpected {}", other)})),
        })
        .await;

        let ledger = gateway(url).acquire_ledger_handle().unwrap();
        assert_eq!(ledger.get_transaction_count().await.unwrap(), U256::from(5u64));
    }

    #[tokio::test]
    async fn test_empty_transaction_list() {
        let url = spawn_node(|method, _| match method {
            "eth_call" => Ok(json!(format!("0x{}{}", word(32), word(0)))),
            other => Err(json!({"code": -32601, "message": format!("unexpected {}", other)})),
        })
        .await;

        let ledger = gateway(url).acquire_ledger_handle().unwrap();
        assert!(ledger.list_transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_and_wait_for_receipt() {
        let polls = Arc::new(AtomicUsize::new(0));
        let polls_seen = polls.clone();
        let url = spawn_node(move |method, params| match method {
            "eth_accounts" => Ok(json!([SIGNER])),
            "eth_sendTransaction" => {
                assert_eq!(params[0]["from"], SIGNER);
                assert_eq!(params[0]["to"], CONTRACT);
                assert_eq!(
                    calldata_selector(params),
                    hex::encode(abi::selector(abi::ADD_TO_BLOCKCHAIN))
                );
                Ok(json!("0xfeed"))
            }
            "eth_getTransactionReceipt" => {
                // Pending on the first poll
                if polls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(Value::Null)
                } else {
                    Ok(json!({
                        "transactionHash": "0xfeed",
                        "blockNumber": "0x10",
                        "status": "0x1"
                    }))
                }
            }
            other => Err(json!({"code": -32601, "message": format!("unexpected {}", other)})),
        })
        .await;

        let ledger = gateway(url).acquire_ledger_handle().unwrap();
        let pending = ledger
            .submit_transaction(RECEIVER, U256::exp10(18), "m", "k")
            .await
            .unwrap();
        assert_eq!(pending.hash(), "0xfeed");

        let receipt = pending.wait().await.unwrap();
        assert_eq!(receipt.block_number.as_deref(), Some("0x10"));
        assert_eq!(polls_seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reverted_receipt() {
        let url = spawn_node(|method, _| match method {
            "eth_accounts" => Ok(json!([SIGNER])),
            "eth_sendTransaction" => Ok(json!("0xdead")),
            "eth_getTransactionReceipt" => Ok(json!({
                "transactionHash": "0xdead",
                "blockNumber": "0x11",
                "status": "0x0"
            })),
            other => Err(json!({"code": -32601, "message": format!("unexpected {}", other)})),
        })
        .await;

        let ledger = gateway(url).acquire_ledger_handle().unwrap();
        let pending = ledger
            .submit_transaction(RECEIVER, U256::one(), "m", "k")
            .await
            .unwrap();
        assert!(matches!(
            pending.wait().await,
            Err(GatewayError::Api(ApiError::Reverted(_)))
        ));
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_receiver() {
        let url = spawn_node(|_, _| Ok(json!([SIGNER]))).await;
        let ledger = gateway(url).acquire_ledger_handle().unwrap();
        assert!(matches!(
            ledger.submit_transaction("0xDEF", U256::one(), "m", "k").await,
            Err(GatewayError::Abi(AbiError::InvalidAddress(_)))
        ));
    }

    #[tokio::test]
    async fn test_no_signer() {
        let url = spawn_node(|method, _| match method {
            "eth_accounts" => Ok(json!([])),
            other => Err(json!({"code": -32601, "message": format!("unexpected {}", other)})),
        })
        .await;
        let ledger = gateway(url).acquire_ledger_handle().unwrap();
        assert!(matches!(
            ledger.submit_transaction(RECEIVER, U256::one(), "m", "k").await,
            Err(GatewayError::NoSigner)
        ));
    }
}
