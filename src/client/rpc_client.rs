// JSON-RPC client for read-only contract calls
use alloy_primitives::{Address, Bytes};
use reqwest::Client;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::AccountsError;

pub struct RpcClient {
    url: String,
    client: Client,
    request_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, AccountsError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AccountsError::Rpc(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            url,
            client,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `eth_call` against the latest block, returning the raw return data
    pub async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Bytes, AccountsError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                { "to": to, "data": Bytes::from(data) },
                "latest",
            ],
            "id": id,
        });

        let response = self.client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AccountsError::Rpc(format!("RPC request failed: {}", e)))?;

        let json: serde_json::Value = response.json().await
            .map_err(|e| AccountsError::Rpc(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = json.get("error") {
            return Err(AccountsError::Rpc(
                error["message"].as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let result = json["result"]
            .as_str()
            .ok_or_else(|| AccountsError::Rpc("Missing result".to_string()))?;
        result
            .parse::<Bytes>()
            .map_err(|e| AccountsError::Rpc(format!("Invalid hex in result: {}", e)))
    }
}
