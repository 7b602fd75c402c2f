use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::models::{
    ApiError, CallRequest, JsonRpcRequest, JsonRpcResponse, TransactionReceipt, TransactionRequest,
};

/// JSON-RPC client for a wallet endpoint (accounts, signing, node reads)
pub struct EthereumClient {
    http_client: HttpClient,
    rpc_url: String,
    next_id: AtomicU64,
}

impl EthereumClient {
    /// Create a new client for the given endpoint
    pub fn new(rpc_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            rpc_url,
            next_id: AtomicU64::new(1),
        }
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        // Some providers answer JSON-RPC errors with a 4xx/5xx status
        if let Ok(parsed) = serde_json::from_str::<JsonRpcResponse>(&body_text) {
            if let Some(err) = parsed.error {
                return err.into();
            }
        }

        match status_code {
            401 | 403 => ApiError::Unauthorized(body_text),
            500..=599 => {
                warn!("Wallet endpoint error {}: {}", status_code, body_text);
                ApiError::HttpError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    /// Issue a single JSON-RPC call and decode its `result`
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ApiError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!("-> {} (id {})", method, id);

        let response = self
            .http_client
            .post(&self.rpc_url)
            .headers(Self::create_headers())
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let envelope = response
            .json::<JsonRpcResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))?;

        if let Some(err) = envelope.error {
            debug!("<- {} (id {}) error {}: {}", method, id, err.code, err.message);
            return Err(err.into());
        }

        serde_json::from_value(envelope.result.unwrap_or(Value::Null))
            .map_err(|e| ApiError::DeserializationError(format!("Unexpected {} result: {}", method, e)))
    }

    /// eth_accounts
    ///
    /// Lists the accounts the wallet has already authorized. Never prompts.
    pub async fn accounts(&self) -> Result<Vec<String>, ApiError> {
        self.request("eth_accounts", json!([])).await
    }

    /// eth_requestAccounts
    ///
    /// Asks the wallet to authorize this client. The wallet may prompt the user
    /// and the call suspends until they answer.
    pub async fn request_accounts(&self) -> Result<Vec<String>, ApiError> {
        self.request("eth_requestAccounts", json!([])).await
    }

    /// eth_sendTransaction
    ///
    /// # Returns
    /// * `Ok(String)` - Hash of the submitted transaction
    /// * `Err(ApiError)` - Rejection by the user or the node
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ApiError> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    /// eth_call against the latest block, returning the raw hex output
    pub async fn call(&self, call: &CallRequest) -> Result<String, ApiError> {
        self.request("eth_call", json!([call, "latest"])).await
    }

    /// eth_getTransactionReceipt; `None` while the transaction is pending
    pub async fn get_transaction_receipt(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionReceipt>, ApiError> {
        self.request("eth_getTransactionReceipt", json!([hash])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_node;

    #[tokio::test]
    async fn test_accounts() {
        let url = spawn_node(|method, _| match method {
            "eth_accounts" => Ok(json!(["0xabc", "0xdef"])),
            other => Err(json!({"code": -32601, "message": format!("unexpected {}", other)})),
        })
        .await;

        let client = EthereumClient::new(url);
        assert_eq!(client.accounts().await.unwrap(), vec!["0xabc", "0xdef"]);
    }

    #[tokio::test]
    async fn test_user_rejection_is_typed() {
        let url = spawn_node(|_, _| {
            Err(json!({"code": 4001, "message": "User rejected the request."}))
        })
        .await;

        let client = EthereumClient::new(url);
        assert!(matches!(
            client.request_accounts().await,
            Err(ApiError::UserRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_pending_receipt_is_none() {
        let url = spawn_node(|_, _| Ok(Value::Null)).await;
        let client = EthereumClient::new(url);
        assert!(client.get_transaction_receipt("0x01").await.unwrap().is_none());
    }
}
