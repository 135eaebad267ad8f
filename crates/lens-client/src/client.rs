//! Client façade over one Lens Hub deployment.

use std::sync::Arc;

use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use anyhow::Context;
use lens_core::api::{ChainConnector, ContractCall, RpcConnector};
use lens_core::config::LensConfig;
use lens_core::modules::ModuleRegistry;
use lens_core::nonce::NonceTracker;
use lens_core::signing::{HolderSigner, LocalWallet, TypedDataBuilder, TypedDataDomain};
use lens_core::types::Receipt;
use lens_core::{Error, Result};
use tracing::{debug, info, warn};

/// Entry point for hub reads and writes.
///
/// Holds the connector, the optional key holder and the module registry
/// built from configuration. Cheap to share behind an `Arc`.
pub struct LensClient<C: ChainConnector> {
    connector: Arc<C>,
    holder: Option<Arc<dyn HolderSigner>>,
    config: LensConfig,
    registry: ModuleRegistry,
    typed_data: TypedDataBuilder,
    nonces: NonceTracker<C>,
}

impl<C: ChainConnector> LensClient<C> {
    /// Read-only client. Signed writes fail with `SigningUnavailable` until
    /// a holder is attached.
    pub fn new(config: LensConfig, connector: Arc<C>) -> Self {
        let registry = config.module_registry();
        let domain = TypedDataDomain::lens_hub(config.chain_id, config.lens_hub());
        let nonces = NonceTracker::new(Arc::clone(&connector), config.lens_hub());

        info!(
            network = ?config.network,
            chain_id = config.chain_id,
            lens_hub = %config.lens_hub(),
            modules = registry.len(),
            "Lens client initialized"
        );

        let missing = config.contracts.missing_modules();
        if registry.is_empty() {
            warn!(
                network = ?config.network,
                policy = ?config.unknown_module_policy,
                "No module addresses configured; every module payload falls back to the unknown-module policy"
            );
        } else if !missing.is_empty() {
            debug!(missing = ?missing, "Module kinds without a configured address");
        }

        Self {
            connector,
            holder: None,
            config,
            registry,
            typed_data: TypedDataBuilder::new(domain),
            nonces,
        }
    }

    /// Attach the key holder used for signatures and as the acting account.
    pub fn with_holder(mut self, holder: Arc<dyn HolderSigner>) -> Self {
        info!(holder = %holder.address(), "Key holder attached");
        self.holder = Some(holder);
        self
    }

    pub fn config(&self) -> &LensConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Mutable registry, for modules deployed after configuration was loaded.
    pub fn registry_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.registry
    }

    pub fn connector(&self) -> &Arc<C> {
        &self.connector
    }

    pub fn lens_hub(&self) -> Address {
        self.config.lens_hub()
    }

    pub(crate) fn holder(&self) -> Option<&dyn HolderSigner> {
        self.holder.as_deref()
    }

    /// Address of the attached holder.
    pub fn holder_address(&self) -> Result<Address> {
        self.holder
            .as_ref()
            .map(|h| h.address())
            .ok_or_else(|| Error::SigningUnavailable {
                message: "no key holder attached to the client".to_string(),
            })
    }

    pub(crate) fn typed_data(&self) -> &TypedDataBuilder {
        &self.typed_data
    }

    pub(crate) fn nonces(&self) -> &NonceTracker<C> {
        &self.nonces
    }

    /// Send a hub write and wait for the receipt.
    pub(crate) async fn send_to_hub<T: SolCall>(&self, call: &T) -> Result<Receipt> {
        self.send_to(self.lens_hub(), call).await
    }

    pub(crate) async fn send_to<T: SolCall>(
        &self,
        to: Address,
        call: &T,
    ) -> Result<Receipt> {
        let request = ContractCall::new(to, call);
        debug!(
            to = %to,
            method = request.method,
            bytes = request.calldata.len(),
            "Sending write"
        );

        let receipt = self.connector.send(request).await?;
        info!(
            tx_hash = %receipt.transaction_hash,
            method = T::SIGNATURE,
            logs = receipt.logs.len(),
            "Write confirmed"
        );
        Ok(receipt)
    }
}

impl LensClient<RpcConnector> {
    /// Client over JSON-RPC, configured from the environment.
    ///
    /// Reads `LENS_*` variables for the deployment and `WALLET_PRIVATE_KEY`
    /// for the holder, which also signs transactions.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = LensConfig::from_env().context("Failed to load Lens configuration")?;
        let wallet = LocalWallet::from_env()?;
        Self::from_config(config, Some(wallet))
    }

    /// Client over JSON-RPC for `config`.
    pub fn from_config(config: LensConfig, wallet: Option<LocalWallet>) -> anyhow::Result<Self> {
        let rpc_url = config
            .rpc_url
            .clone()
            .context("LENS_RPC_URL must be set to build an RPC client")?;

        let sender = wallet.as_ref().map(|w| w.signer().clone());
        let connector = RpcConnector::parse(&rpc_url, sender)
            .context("Invalid RPC configuration")?
            .with_chain_id(config.chain_id);

        let client = Self::new(config, Arc::new(connector));
        Ok(match wallet {
            Some(wallet) => client.with_holder(Arc::new(wallet)),
            None => client,
        })
    }
}

impl<C: ChainConnector> std::fmt::Debug for LensClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LensClient")
            .field("network", &self.config.network)
            .field("lens_hub", &self.config.lens_hub())
            .field("holder", &self.holder.as_ref().map(|h| h.address()))
            .field("modules", &self.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_client, test_config, TEST_PRIVATE_KEY};
    use lens_core::api::MemoryConnector;
    use lens_core::config::{LensContracts, LensNetwork};

    #[test]
    fn test_read_only_client_has_no_holder() {
        let client = LensClient::new(test_config(), Arc::new(MemoryConnector::new(80001)));
        assert!(matches!(
            client.holder_address().unwrap_err(),
            Error::SigningUnavailable { .. }
        ));
    }

    #[test]
    fn test_hub_only_client_has_no_modules() {
        let network = LensNetwork::PolygonMainnet;
        let config =
            LensConfig::for_network(network, LensContracts::with_hub(network.lens_hub_proxy()));
        let client = LensClient::new(config, Arc::new(MemoryConnector::new(137)));

        assert!(client.registry().is_empty());
        assert_eq!(client.config().contracts.missing_modules().len(), 8);
        assert_eq!(client.lens_hub(), network.lens_hub_proxy());
    }

    #[test]
    fn test_client_with_holder() {
        let (client, _) = test_client();
        let wallet = LocalWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(client.holder_address().unwrap(), wallet.address());
        assert_eq!(
            client.typed_data().domain().chain_id,
            alloy_primitives::U256::from(80001u64)
        );
        assert!(format!("{:?}", client).contains("LensClient"));
    }

    #[test]
    fn test_from_config_requires_rpc_url() {
        let config = LensConfig::for_network(
            LensNetwork::MumbaiTestnet,
            LensContracts::with_hub(LensNetwork::MumbaiTestnet.lens_hub_proxy()),
        );
        assert!(LensClient::from_config(config.clone(), None).is_err());

        let mut config = config;
        config.rpc_url = Some("https://rpc-mumbai.maticvigil.com".to_string());
        let wallet = LocalWallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let client = LensClient::from_config(config, Some(wallet.clone())).unwrap();
        assert_eq!(client.holder_address().unwrap(), wallet.address());
        assert_eq!(client.connector().sender_address(), Some(wallet.address()));
    }
}
