//! Local private-key holder.
//!
//! Loads a key from the environment or a hex string and signs typed-data
//! digests with it.

use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use anyhow::Context;
use async_trait::async_trait;
use std::str::FromStr;

use super::signer::HolderSigner;
use super::typed_data::TypedDataMessage;
use crate::Error;

/// A key holder backed by an in-process private key.
#[derive(Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
    address: Address,
}

impl LocalWallet {
    /// Load wallet from the `WALLET_PRIVATE_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set or
    /// if the private key format is invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let private_key = std::env::var("WALLET_PRIVATE_KEY")
            .context("WALLET_PRIVATE_KEY environment variable not set")?;

        Self::from_private_key(&private_key)
    }

    /// Create a wallet from a 64-character hex key, optionally 0x-prefixed.
    pub fn from_private_key(key: &str) -> anyhow::Result<Self> {
        let key_clean = key.trim().trim_start_matches("0x");

        let signer = PrivateKeySigner::from_str(key_clean)
            .context("Invalid private key format - expected 64 hex characters")?;

        Ok(Self::from_signer(signer))
    }

    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self { signer, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Underlying signer, e.g. to hand to [`crate::api::RpcConnector`]
    /// as the transaction sender.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

#[async_trait]
impl HolderSigner for LocalWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_typed_data(&self, message: &TypedDataMessage) -> crate::Result<String> {
        let signature = self
            .signer
            .sign_hash(&message.signing_hash())
            .await
            .map_err(|e| Error::SigningUnavailable {
                message: format!("failed to sign {}: {}", message.type_name(), e),
            })?;

        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the private key in debug output
        f.debug_struct("LocalWallet")
            .field("address", &self.address.to_string())
            .finish()
    }
}
