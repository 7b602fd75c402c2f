pub mod abi;
pub mod client;
pub mod models;

pub use client::EthereumClient;
pub use models::{ApiError, CallRequest, TransactionReceipt, TransactionRequest};
