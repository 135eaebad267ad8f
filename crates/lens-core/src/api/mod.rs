//! Contract bindings and chain transports.

pub mod connector;
pub mod contracts;
pub mod memory;
pub mod rpc;

pub use connector::{read, ChainConnector, ContractCall};
pub use memory::{CallMode, MemoryConnector, RecordedCall};
pub use rpc::RpcConnector;
