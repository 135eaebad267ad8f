//! Error types for the Lens Hub signing subsystem.

use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

/// Step of a multi-call flow, attached to errors so callers can tell
/// which part of a write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    ResolveModule,
    FetchValidationData,
    ConditionalApproval,
    FetchNonce,
    Sign,
    Submit,
    ExtractResult,
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowStep::ResolveModule => "resolve module",
            FlowStep::FetchValidationData => "fetch validation data",
            FlowStep::ConditionalApproval => "conditional approval",
            FlowStep::FetchNonce => "fetch nonce",
            FlowStep::Sign => "sign",
            FlowStep::Submit => "submit",
            FlowStep::ExtractResult => "extract result",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("RPC error: {message}")]
    Rpc { message: String, code: Option<i64> },

    #[error("Transaction error: {message}")]
    Transaction { message: String },

    #[error("ABI error: {message}")]
    Abi { message: String },

    #[error("Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    #[error("Unknown module: {module}")]
    UnknownModule { module: Address },

    #[error("Signing unavailable: {message}")]
    SigningUnavailable { message: String },

    #[error("Signature nonce stale: {message}")]
    NonceStale { message: String },

    #[error("Event {event} not found in receipt (topic0 {signature})")]
    EventNotFound { event: &'static str, signature: B256 },

    #[error("Approval of {amount} {currency} for {spender} failed: {message}")]
    ApprovalFailed {
        currency: Address,
        spender: Address,
        amount: U256,
        message: String,
    },

    #[error("{step} failed: {source}")]
    Step {
        step: FlowStep,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the flow step it happened in.
    pub fn at(step: FlowStep) -> impl FnOnce(Error) -> Error {
        move |source| Error::Step {
            step,
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping any `Step` wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Step { source, .. } => source.root(),
            other => other,
        }
    }

    /// The flow step the error was raised in, if any.
    pub fn step(&self) -> Option<FlowStep> {
        match self {
            Error::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<alloy_sol_types::Error> for Error {
    fn from(e: alloy_sol_types::Error) -> Self {
        Error::Abi {
            message: e.to_string(),
        }
    }
}

impl From<alloy_dyn_abi::Error> for Error {
    fn from(e: alloy_dyn_abi::Error) -> Self {
        Error::Abi {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
