//! The chain transport seam.
//!
//! Everything in this crate talks to the chain through [`ChainConnector`]:
//! reads return raw ABI return data, writes return the mined [`Receipt`].
//! Retries, timeouts and key custody for transactions belong to the
//! implementation, not to callers.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;

use crate::types::Receipt;
use crate::Result;

/// A single contract invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Target contract.
    pub to: Address,
    /// Solidity signature of the method, kept for logs and errors.
    pub method: &'static str,
    /// Selector + ABI-encoded arguments.
    pub calldata: Bytes,
}

impl ContractCall {
    /// Encode a `sol!` call against `to`.
    pub fn new<C: SolCall>(to: Address, call: &C) -> Self {
        Self {
            to,
            method: C::SIGNATURE,
            calldata: Bytes::from(call.abi_encode()),
        }
    }

    /// The 4-byte function selector.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.calldata
            .get(..4)
            .and_then(|bytes| bytes.try_into().ok())
    }

    /// Whether this call invokes `C`.
    pub fn is<C: SolCall>(&self) -> bool {
        self.selector() == Some(C::SELECTOR)
    }

    /// Decode the arguments back into the `sol!` call type.
    pub fn decode<C: SolCall>(&self) -> Result<C> {
        Ok(C::abi_decode(&self.calldata)?)
    }
}

/// Transport for contract reads and writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainConnector: Send + Sync {
    /// Execute a read-only call and return the raw return data.
    async fn call(&self, request: ContractCall) -> Result<Bytes>;

    /// Submit a state-changing call and wait for its receipt.
    async fn send(&self, request: ContractCall) -> Result<Receipt>;

    /// Chain the connector is attached to.
    async fn chain_id(&self) -> Result<u64>;
}

/// Execute a read and decode a single return value.
pub async fn read<T, C>(connector: &C, to: Address, call: impl SolCall) -> Result<T>
where
    T: SolValue + From<<T::SolType as alloy_sol_types::SolType>::RustType>,
    C: ChainConnector + ?Sized,
{
    let data = connector.call(ContractCall::new(to, &call)).await?;
    Ok(T::abi_decode(&data)?)
}
