//! In-memory connector with scripted responses, for tests and dry runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;

use super::connector::{ChainConnector, ContractCall};
use crate::types::Receipt;
use crate::{Error, Result};

type ReadHandler = Box<dyn Fn(&ContractCall) -> Result<Bytes> + Send + Sync>;
type WriteHandler = Box<dyn Fn(&ContractCall) -> Result<Receipt> + Send + Sync>;

/// Whether a recorded call was a read or a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMode {
    Read,
    Write,
}

/// A call observed by [`MemoryConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub mode: CallMode,
    pub call: ContractCall,
}

/// Connector answering from handlers registered per `(contract, selector)`.
///
/// Reads without a handler fail with an RPC error. Writes without a handler
/// succeed with an empty receipt.
pub struct MemoryConnector {
    chain_id: u64,
    reads: Mutex<HashMap<(Address, [u8; 4]), ReadHandler>>,
    writes: Mutex<HashMap<(Address, [u8; 4]), WriteHandler>>,
    calls: Mutex<Vec<RecordedCall>>,
    tx_counter: AtomicU64,
}

impl MemoryConnector {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            reads: Mutex::new(HashMap::new()),
            writes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            tx_counter: AtomicU64::new(1),
        }
    }

    /// Answer every `C` read on `to` with `value`.
    pub fn respond<C, T>(&self, to: Address, value: T) -> &Self
    where
        C: SolCall,
        T: SolValue + Send + Sync + 'static,
    {
        let encoded = Bytes::from(value.abi_encode());
        self.respond_raw::<C>(to, encoded)
    }

    /// Answer every `C` read on `to` with pre-encoded return data.
    pub fn respond_raw<C: SolCall>(&self, to: Address, data: Bytes) -> &Self {
        self.respond_with::<C, _>(to, move |_| Ok(data.clone()))
    }

    /// Answer `C` reads on `to` by running `handler`.
    pub fn respond_with<C, F>(&self, to: Address, handler: F) -> &Self
    where
        C: SolCall,
        F: Fn(&ContractCall) -> Result<Bytes> + Send + Sync + 'static,
    {
        lock(&self.reads).insert((to, C::SELECTOR), Box::new(handler));
        self
    }

    /// Handle `C` writes on `to` with `handler`.
    pub fn on_send<C, F>(&self, to: Address, handler: F) -> &Self
    where
        C: SolCall,
        F: Fn(&ContractCall) -> Result<Receipt> + Send + Sync + 'static,
    {
        lock(&self.writes).insert((to, C::SELECTOR), Box::new(handler));
        self
    }

    /// Every call seen so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Writes seen so far, in order.
    pub fn writes(&self) -> Vec<ContractCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.mode == CallMode::Write)
            .map(|c| c.call.clone())
            .collect()
    }

    /// Writes of `C`, in order.
    pub fn writes_of<C: SolCall>(&self) -> Vec<ContractCall> {
        self.writes().into_iter().filter(|c| c.is::<C>()).collect()
    }

    fn record(&self, mode: CallMode, call: &ContractCall) {
        lock(&self.calls).push(RecordedCall {
            mode,
            call: call.clone(),
        });
    }

    fn next_tx_hash(&self) -> B256 {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        B256::left_padding_from(&n.to_be_bytes())
    }
}

impl std::fmt::Debug for MemoryConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConnector")
            .field("chain_id", &self.chain_id)
            .field("calls", &lock(&self.calls).len())
            .finish()
    }
}

#[async_trait]
impl ChainConnector for MemoryConnector {
    async fn call(&self, request: ContractCall) -> Result<Bytes> {
        self.record(CallMode::Read, &request);

        let selector = request.selector().unwrap_or_default();
        let reads = lock(&self.reads);
        match reads.get(&(request.to, selector)) {
            Some(handler) => handler(&request),
            None => Err(Error::Rpc {
                message: format!("no response scripted for {} on {}", request.method, request.to),
                code: None,
            }),
        }
    }

    async fn send(&self, request: ContractCall) -> Result<Receipt> {
        self.record(CallMode::Write, &request);

        let selector = request.selector().unwrap_or_default();
        let scripted = {
            let writes = lock(&self.writes);
            writes
                .get(&(request.to, selector))
                .map(|handler| handler(&request))
        };

        let mut receipt = match scripted {
            Some(result) => result?,
            None => Receipt::new(B256::ZERO, Vec::new()),
        };
        if receipt.transaction_hash.is_zero() {
            receipt.transaction_hash = self.next_tx_hash();
        }
        if !receipt.status {
            return Err(Error::Transaction {
                message: format!("{} reverted", request.method),
            });
        }
        Ok(receipt)
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
