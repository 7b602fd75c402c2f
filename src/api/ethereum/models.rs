use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Wallet error codes surfaced by EIP-1193 providers
pub mod codes {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const DISCONNECTED: i64 = 4900;
    pub const CHAIN_DISCONNECTED: i64 = 4901;
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

/// Error member of a JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Parameters for `eth_sendTransaction`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Parameters for `eth_call`
#[derive(Debug, Clone, Serialize)]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    pub data: String,
}

/// Subset of `eth_getTransactionReceipt` we care about
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
}

impl TransactionReceipt {
    /// Post-Byzantium receipts carry `0x1` on success and `0x0` on revert
    pub fn succeeded(&self) -> bool {
        !matches!(self.status.as_deref(), Some("0x0") | Some("0x00"))
    }
}

/// Error type for wallet and node operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The user dismissed the wallet prompt
    #[error("User rejected the request: {0}")]
    UserRejected(String),
    /// The requested account or method is not authorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The wallet is not connected to any chain
    #[error("Disconnected: {0}")]
    Disconnected(String),
    /// Any other JSON-RPC error object
    #[error("RPC Error ({code}): {message}")]
    Rpc { code: i64, message: String },
    /// The transaction was mined but reverted
    #[error("Transaction reverted: {0}")]
    Reverted(String),
    /// Non-success HTTP status
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}

impl From<RpcErrorObject> for ApiError {
    fn from(err: RpcErrorObject) -> Self {
        let message = crate::utils::extract_clean_error(&err.message);
        match err.code {
            codes::USER_REJECTED => ApiError::UserRejected(message),
            codes::UNAUTHORIZED | codes::UNSUPPORTED_METHOD => ApiError::Unauthorized(message),
            codes::DISCONNECTED | codes::CHAIN_DISCONNECTED => ApiError::Disconnected(message),
            code => ApiError::Rpc { code, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_mapping() {
        let rejected: ApiError = RpcErrorObject {
            code: 4001,
            message: "User denied transaction signature.".to_string(),
            data: None,
        }
        .into();
        assert!(matches!(rejected, ApiError::UserRejected(_)));

        let reverted: ApiError = RpcErrorObject {
            code: 3,
            message: "execution reverted: not enough funds".to_string(),
            data: None,
        }
        .into();
        match reverted {
            ApiError::Rpc { code, message } => {
                assert_eq!(code, 3);
                assert_eq!(message, "not enough funds");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_receipt_status() {
        let mut receipt = TransactionReceipt {
            transaction_hash: "0x01".to_string(),
            block_number: Some("0x10".to_string()),
            status: Some("0x1".to_string()),
            gas_used: None,
        };
        assert!(receipt.succeeded());

        receipt.status = Some("0x0".to_string());
        assert!(!receipt.succeeded());
    }

    #[test]
    fn test_transaction_request_skips_empty_fields() {
        let request = TransactionRequest {
            from: "0x01".to_string(),
            to: "0x02".to_string(),
            gas: Some("0x5208".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["gas"], "0x5208");
        assert!(json.get("value").is_none());
        assert!(json.get("data").is_none());
    }
}
