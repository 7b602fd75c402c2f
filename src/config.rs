use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::api::ethereum::abi;

const DEFAULT_CACHE_PATH: &str = ".ledger-transfer/storage.json";
const DEFAULT_RECEIPT_POLL_MS: u64 = 1000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set in .env file")]
    Missing(&'static str),
    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    /// Wallet JSON-RPC endpoint; `None` behaves like a browser without a wallet
    pub wallet_rpc_url: Option<String>,
    pub contract_address: String,
    pub cache_path: PathBuf,
    pub receipt_poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let wallet_rpc_url = lookup("WALLET_RPC_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let contract_address = lookup("CONTRACT_ADDRESS")
            .map(|address| address.trim().to_string())
            .ok_or(ConfigError::Missing("CONTRACT_ADDRESS"))?;
        abi::parse_address(&contract_address).map_err(|_| ConfigError::Invalid {
            name: "CONTRACT_ADDRESS",
            value: contract_address.clone(),
        })?;

        let cache_path = lookup("CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH));

        let receipt_poll_ms = match lookup("RECEIPT_POLL_MS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "RECEIPT_POLL_MS",
                value,
            })?,
            None => DEFAULT_RECEIPT_POLL_MS,
        };

        Ok(Config {
            wallet_rpc_url,
            contract_address,
            cache_path,
            receipt_poll_interval: Duration::from_millis(receipt_poll_ms),
        })
    }
}
