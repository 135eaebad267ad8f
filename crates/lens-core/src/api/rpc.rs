//! JSON-RPC connector for EVM chains.
//!
//! Reads go through `eth_call`. Writes are signed locally as legacy
//! transactions, broadcast with `eth_sendRawTransaction`, and polled until a
//! receipt is available.

use std::time::Duration;

use alloy_consensus::transaction::RlpEcdsaEncodableTx;
use alloy_consensus::TxLegacy;
use alloy_network::TxSignerSync;
use alloy_primitives::bytes::BytesMut;
use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::connector::{ChainConnector, ContractCall};
use super::contracts::{SignatureExpired, SignatureInvalid};
use crate::types::{LogEntry, Receipt};
use crate::{Error, Result};

/// Default receipt polling: every 2 seconds for up to 2 minutes.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const RECEIPT_POLL_ATTEMPTS: u32 = 60;

/// JSON-RPC connector.
pub struct RpcConnector {
    rpc_url: String,
    http_client: reqwest::Client,
    sender: Option<PrivateKeySigner>,
    chain_id: OnceCell<u64>,
    poll_interval: Duration,
    poll_attempts: u32,
}

impl RpcConnector {
    /// Read-only connector.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            http_client: reqwest::Client::new(),
            sender: None,
            chain_id: OnceCell::new(),
            poll_interval: RECEIPT_POLL_INTERVAL,
            poll_attempts: RECEIPT_POLL_ATTEMPTS,
        }
    }

    /// Connector that signs and sends writes from `sender`.
    pub fn with_sender(rpc_url: impl Into<String>, sender: PrivateKeySigner) -> Self {
        Self {
            sender: Some(sender),
            ..Self::new(rpc_url)
        }
    }

    /// Validate `rpc_url` before building the connector.
    pub fn parse(rpc_url: &str, sender: Option<PrivateKeySigner>) -> Result<Self> {
        url::Url::parse(rpc_url).map_err(|e| Error::Config {
            message: format!("invalid RPC URL `{}`: {}", rpc_url, e),
        })?;
        let mut connector = Self::new(rpc_url);
        connector.sender = sender;
        Ok(connector)
    }

    /// Pin the chain id instead of asking the node.
    pub fn with_chain_id(self, chain_id: u64) -> Self {
        Self {
            chain_id: OnceCell::new_with(Some(chain_id)),
            ..self
        }
    }

    /// Override receipt polling.
    pub fn with_receipt_polling(mut self, interval: Duration, attempts: u32) -> Self {
        self.poll_interval = interval;
        self.poll_attempts = attempts;
        self
    }

    /// Address writes are sent from, if any.
    pub fn sender_address(&self) -> Option<Address> {
        self.sender.as_ref().map(|s| s.address())
    }

    async fn rpc_call<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Rpc {
                message: format!("{} failed: HTTP {}", method, response.status()),
                code: None,
            });
        }

        let body: JsonRpcResponse<T> = response.json().await?;
        if let Some(error) = body.error {
            return Err(error.into_error(method));
        }

        body.result.ok_or_else(|| Error::Rpc {
            message: format!("{} returned no result", method),
            code: None,
        })
    }

    fn sender(&self) -> Result<&PrivateKeySigner> {
        self.sender.as_ref().ok_or_else(|| Error::SigningUnavailable {
            message: "connector has no sender key for writes".to_string(),
        })
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        let hex: String = self
            .rpc_call(
                "eth_getTransactionCount",
                serde_json::json!([address, "pending"]),
            )
            .await?;
        parse_quantity(&hex)
    }

    async fn gas_price(&self) -> Result<u128> {
        let hex: String = self
            .rpc_call("eth_gasPrice", serde_json::json!([]))
            .await?;
        let price: u128 = parse_quantity_u256(&hex)?
            .try_into()
            .map_err(|_| Error::Rpc {
                message: "gas price out of range".to_string(),
                code: None,
            })?;
        // 1.2x for faster inclusion
        Ok(price + price / 5)
    }

    async fn estimate_gas(&self, from: Address, request: &ContractCall) -> Result<u64> {
        let hex: String = self
            .rpc_call(
                "eth_estimateGas",
                serde_json::json!([{
                    "from": from,
                    "to": request.to,
                    "data": request.calldata,
                }]),
            )
            .await?;
        let gas = parse_quantity(&hex)?;
        Ok(gas + gas / 5)
    }

    async fn send_raw(&self, tx: TxLegacy) -> Result<B256> {
        let raw = sign_legacy(self.sender()?, tx)?;
        self.rpc_call("eth_sendRawTransaction", serde_json::json!([raw]))
            .await
    }

    async fn wait_for_receipt(&self, tx_hash: B256, method: &str) -> Result<Receipt> {
        for _ in 0..self.poll_attempts {
            tokio::time::sleep(self.poll_interval).await;

            let receipt: Option<RpcReceipt> = self
                .rpc_call_nullable("eth_getTransactionReceipt", serde_json::json!([tx_hash]))
                .await?;

            if let Some(receipt) = receipt {
                let receipt = receipt.into_receipt()?;
                if !receipt.status {
                    return Err(Error::Transaction {
                        message: format!("{} reverted in {}", method, tx_hash),
                    });
                }
                return Ok(receipt);
            }
        }

        Err(Error::Transaction {
            message: format!(
                "{} not mined after {}s",
                tx_hash,
                self.poll_interval.as_secs() * u64::from(self.poll_attempts)
            ),
        })
    }

    /// Like `rpc_call` but a `null` result is not an error.
    async fn rpc_call_nullable<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let body: JsonRpcResponse<T> = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        match body.error {
            Some(error) => Err(error.into_error(method)),
            None => Ok(body.result),
        }
    }
}

impl std::fmt::Debug for RpcConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcConnector")
            .field("rpc_url", &self.rpc_url)
            .field("sender", &self.sender_address())
            .finish()
    }
}

#[async_trait]
impl ChainConnector for RpcConnector {
    async fn call(&self, request: ContractCall) -> Result<Bytes> {
        let mut tx = serde_json::json!({
            "to": request.to,
            "data": request.calldata,
        });
        if let Some(from) = self.sender_address() {
            tx["from"] = serde_json::json!(from);
        }

        debug!(to = %request.to, method = request.method, "eth_call");
        self.rpc_call("eth_call", serde_json::json!([tx, "latest"]))
            .await
    }

    async fn send(&self, request: ContractCall) -> Result<Receipt> {
        let from = self.sender()?.address();
        let chain_id = self.chain_id().await?;
        let nonce = self.transaction_count(from).await?;
        let gas_price = self.gas_price().await?;
        let gas_limit = self.estimate_gas(from, &request).await?;

        let tx = TxLegacy {
            chain_id: Some(chain_id),
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(request.to),
            value: U256::ZERO,
            input: request.calldata.clone(),
        };

        let tx_hash = self.send_raw(tx).await?;
        info!(
            tx_hash = %tx_hash,
            to = %request.to,
            method = request.method,
            "Transaction sent"
        );

        self.wait_for_receipt(tx_hash, request.method).await
    }

    async fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .get_or_try_init(|| async {
                let hex: String = self.rpc_call("eth_chainId", serde_json::json!([])).await?;
                parse_quantity(&hex)
            })
            .await
            .copied()
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl JsonRpcError {
    /// Map node errors onto crate errors. Hub signature rejections mean the
    /// nonce or deadline the signature was built with no longer holds.
    fn into_error(self, method: &str) -> Error {
        let revert_data = self
            .data
            .as_ref()
            .and_then(|d| d.as_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let stale = [SignatureInvalid::SELECTOR, SignatureExpired::SELECTOR]
            .iter()
            .any(|selector| revert_data.starts_with(&format!("0x{}", hex::encode(selector))))
            || self.message.contains("SignatureInvalid")
            || self.message.contains("SignatureExpired");

        if stale {
            warn!(method, error = %self.message, "Hub rejected signature");
            return Error::NonceStale {
                message: self.message,
            };
        }

        Error::Rpc {
            message: format!("{}: {}", method, self.message),
            code: Some(self.code),
        }
    }
}

/// Receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: B256,
    status: Option<String>,
    #[serde(default)]
    logs: Vec<RpcLog>,
}

#[derive(Debug, Deserialize)]
struct RpcLog {
    address: Address,
    topics: Vec<B256>,
    #[serde(default)]
    data: Bytes,
}

impl RpcReceipt {
    fn into_receipt(self) -> Result<Receipt> {
        let status = match self.status.as_deref() {
            Some(s) => parse_quantity(s)? == 1,
            None => true,
        };

        Ok(Receipt {
            transaction_hash: self.transaction_hash,
            status,
            logs: self
                .logs
                .into_iter()
                .map(|log| LogEntry {
                    address: log.address,
                    topics: log.topics,
                    data: log.data,
                })
                .collect(),
        })
    }
}

fn parse_quantity(hex: &str) -> Result<u64> {
    u64::from_str_radix(hex.trim_start_matches("0x"), 16).map_err(|e| Error::Rpc {
        message: format!("invalid quantity `{}`: {}", hex, e),
        code: None,
    })
}

fn parse_quantity_u256(hex: &str) -> Result<U256> {
    U256::from_str_radix(hex.trim_start_matches("0x"), 16).map_err(|e| Error::Rpc {
        message: format!("invalid quantity `{}`: {}", hex, e),
        code: None,
    })
}

/// Sign `tx` and return its RLP encoding, ready for `eth_sendRawTransaction`.
fn sign_legacy(signer: &PrivateKeySigner, mut tx: TxLegacy) -> Result<Bytes> {
    let signature = signer
        .sign_transaction_sync(&mut tx)
        .map_err(|e| Error::SigningUnavailable {
            message: format!("failed to sign transaction: {}", e),
        })?;

    let mut encoded = BytesMut::new();
    tx.rlp_encode_signed(&signature, &mut encoded);
    Ok(Bytes::from(encoded.freeze()))
}
