//! Transaction receipts as returned by a chain connector.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// A single emitted log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Contract that emitted the log.
    pub address: Address,
    /// topic[0] is the event signature hash, the rest are indexed parameters.
    pub topics: Vec<B256>,
    /// ABI-encoded non-indexed parameters.
    #[serde(default)]
    pub data: Bytes,
}

impl LogEntry {
    pub fn new(address: Address, topics: Vec<B256>) -> Self {
        Self {
            address,
            topics,
            data: Bytes::new(),
        }
    }

    /// The event signature hash, if the log is not anonymous.
    pub fn signature(&self) -> Option<B256> {
        self.topics.first().copied()
    }
}

/// Result of a submitted write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: B256,
    /// `true` when the transaction executed without reverting.
    pub status: bool,
    /// Logs in emission order.
    pub logs: Vec<LogEntry>,
}

impl Receipt {
    pub fn new(transaction_hash: B256, logs: Vec<LogEntry>) -> Self {
        Self {
            transaction_hash,
            status: true,
            logs,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status
    }
}
