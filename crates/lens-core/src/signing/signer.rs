//! Typed-data signing against a key holder.
//!
//! The holder is an external collaborator (local key, browser wallet, KMS).
//! It returns a 65-byte hex signature; [`SignatureSigner`] checks it recovers
//! to the holder and splits it into the `(v, r, s, deadline)` tuple the hub
//! expects.

use alloy_primitives::{Address, Signature, B256, U256};
use async_trait::async_trait;
use tracing::debug;

use super::typed_data::TypedDataMessage;
use crate::api::contracts::EIP712Signature;
use crate::{Error, Result};

/// Something that can sign typed data for an address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HolderSigner: Send + Sync {
    /// Address the holder signs as.
    fn address(&self) -> Address;

    /// Sign `message` as `eth_signTypedData_v4` would and return the
    /// 0x-prefixed 65-byte signature.
    async fn sign_typed_data(&self, message: &TypedDataMessage) -> Result<String>;
}

/// Signature in the shape the hub's `*WithSig` entry points take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip712Signature {
    /// 27 or 28.
    pub v: u8,
    pub r: B256,
    pub s: B256,
    pub deadline: U256,
}

impl Eip712Signature {
    pub fn to_sol(&self) -> EIP712Signature {
        EIP712Signature {
            v: self.v,
            r: self.r,
            s: self.s,
            deadline: self.deadline,
        }
    }
}

/// Obtains and normalizes holder signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureSigner {
    expected: Option<Address>,
}

impl SignatureSigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept signatures from `signer`.
    pub fn expecting(signer: Address) -> Self {
        Self {
            expected: Some(signer),
        }
    }

    pub async fn sign(
        &self,
        holder: Option<&dyn HolderSigner>,
        message: &TypedDataMessage,
    ) -> Result<Eip712Signature> {
        let holder = holder.ok_or_else(|| unavailable("no key holder configured".to_string()))?;
        let address = holder.address();

        if let Some(expected) = self.expected {
            if expected != address {
                return Err(unavailable(format!(
                    "holder {} is not authorized to sign for {}",
                    address, expected
                )));
            }
        }

        let raw = holder.sign_typed_data(message).await?;
        let signature = parse_signature(&raw)?;

        let digest = message.signing_hash();
        let recovered = signature
            .recover_address_from_prehash(&digest)
            .map_err(|e| unavailable(format!("signature does not recover: {}", e)))?;
        if recovered != address {
            return Err(unavailable(format!(
                "signature recovers to {}, expected {}",
                recovered, address
            )));
        }

        debug!(
            signer = %address,
            primary_type = message.type_name(),
            nonce = %message.nonce(),
            "Signed typed data"
        );

        Ok(Eip712Signature {
            v: 27 + u8::from(signature.v()),
            r: B256::from(signature.r().to_be_bytes::<32>()),
            s: B256::from(signature.s().to_be_bytes::<32>()),
            deadline: message.deadline(),
        })
    }
}

fn parse_signature(raw: &str) -> Result<Signature> {
    let bytes = hex::decode(raw.trim().trim_start_matches("0x"))
        .map_err(|e| unavailable(format!("holder returned non-hex signature: {}", e)))?;
    if bytes.len() != 65 {
        return Err(unavailable(format!(
            "holder returned {} signature bytes, expected 65",
            bytes.len()
        )));
    }
    Signature::try_from(bytes.as_slice())
        .map_err(|e| unavailable(format!("malformed signature: {}", e)))
}

fn unavailable(message: String) -> Error {
    Error::SigningUnavailable { message }
}
