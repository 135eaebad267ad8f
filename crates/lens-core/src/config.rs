//! Configuration for the Lens Hub client.
//!
//! Network presets provide the chain id, hub proxy and indexer URL. Module
//! and proxy addresses are deployment specific and come from the environment
//! or a config file. A config without them still reads from the hub, but every
//! module is unknown to the registry; see [`LensContracts::missing_modules`].

use crate::modules::{ModuleKind, ModuleRegistry, UnknownModulePolicy};
use crate::{Error, Result};
use alloy_primitives::{address, Address};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Chain ID for Polygon mainnet.
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Chain ID for the Polygon Mumbai testnet.
pub const MUMBAI_CHAIN_ID: u64 = 80001;

/// Lens networks the client can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LensNetwork {
    #[default]
    PolygonMainnet,
    MumbaiTestnet,
    SandboxMumbaiTestnet,
}

impl LensNetwork {
    pub fn chain_id(&self) -> u64 {
        match self {
            LensNetwork::PolygonMainnet => POLYGON_CHAIN_ID,
            LensNetwork::MumbaiTestnet | LensNetwork::SandboxMumbaiTestnet => MUMBAI_CHAIN_ID,
        }
    }

    /// LensHub proxy deployment.
    pub fn lens_hub_proxy(&self) -> Address {
        match self {
            LensNetwork::PolygonMainnet => address!("db46d1dc155634fbc732f92e853b10b288ad5a1d"),
            LensNetwork::MumbaiTestnet => address!("60ae865ee4c725cd04353b5aab364553f56cef82"),
            LensNetwork::SandboxMumbaiTestnet => {
                address!("7582177f9e536ab0b6c721e11f383c326f2ad1d5")
            }
        }
    }

    /// Indexer API endpoint.
    pub fn api_url(&self) -> &'static str {
        match self {
            LensNetwork::PolygonMainnet => "https://api.lens.dev",
            LensNetwork::MumbaiTestnet => "https://api-mumbai.lens.dev",
            LensNetwork::SandboxMumbaiTestnet => "https://api-sandbox-mumbai.lens.dev",
        }
    }

    /// Testnets create profiles through the mock proxy, which skips the
    /// whitelist check.
    pub fn uses_mock_profile_proxy(&self) -> bool {
        !matches!(self, LensNetwork::PolygonMainnet)
    }
}

impl FromStr for LensNetwork {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polygon" | "polygon_mainnet" | "mainnet" => Ok(LensNetwork::PolygonMainnet),
            "mumbai" | "mumbai_testnet" => Ok(LensNetwork::MumbaiTestnet),
            "sandbox" | "sandbox_mumbai" | "sandbox_mumbai_testnet" => {
                Ok(LensNetwork::SandboxMumbaiTestnet)
            }
            other => Err(Error::Config {
                message: format!("unknown Lens network `{}`", other),
            }),
        }
    }
}

/// Contract addresses of one Lens deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LensContracts {
    pub lens_hub_proxy: Address,
    /// `ProfileCreationProxy`, used on mainnet.
    #[serde(default)]
    pub profile_creation_proxy: Option<Address>,
    /// `MockProfileCreationProxy`, used on testnets.
    #[serde(default)]
    pub mock_profile_creation_proxy: Option<Address>,
    #[serde(default)]
    pub free_collect_module: Option<Address>,
    #[serde(default)]
    pub fee_collect_module: Option<Address>,
    #[serde(default)]
    pub limited_fee_collect_module: Option<Address>,
    #[serde(default)]
    pub timed_fee_collect_module: Option<Address>,
    #[serde(default)]
    pub limited_timed_fee_collect_module: Option<Address>,
    #[serde(default)]
    pub revert_collect_module: Option<Address>,
    #[serde(default)]
    pub fee_follow_module: Option<Address>,
    #[serde(default)]
    pub revert_follow_module: Option<Address>,
}

impl LensContracts {
    /// Contracts with only the hub proxy set.
    pub fn with_hub(lens_hub_proxy: Address) -> Self {
        Self {
            lens_hub_proxy,
            profile_creation_proxy: None,
            mock_profile_creation_proxy: None,
            free_collect_module: None,
            fee_collect_module: None,
            limited_fee_collect_module: None,
            timed_fee_collect_module: None,
            limited_timed_fee_collect_module: None,
            revert_collect_module: None,
            fee_follow_module: None,
            revert_follow_module: None,
        }
    }

    /// Configured `(address, kind)` pairs for the module registry.
    pub fn module_entries(&self) -> Vec<(Address, ModuleKind)> {
        [
            (self.free_collect_module, ModuleKind::FreeCollect),
            (self.fee_collect_module, ModuleKind::FeeCollect),
            (self.limited_fee_collect_module, ModuleKind::LimitedFeeCollect),
            (self.timed_fee_collect_module, ModuleKind::TimedFeeCollect),
            (
                self.limited_timed_fee_collect_module,
                ModuleKind::LimitedTimedFeeCollect,
            ),
            (self.revert_collect_module, ModuleKind::RevertCollect),
            (self.fee_follow_module, ModuleKind::FeeFollow),
            (self.revert_follow_module, ModuleKind::RevertFollow),
        ]
        .into_iter()
        .filter_map(|(address, kind)| address.map(|a| (a, kind)))
        .collect()
    }

    /// Module kinds with no configured address.
    pub fn missing_modules(&self) -> Vec<ModuleKind> {
        let configured = self.module_entries();
        ModuleKind::ALL
            .into_iter()
            .filter(|kind| !configured.iter().any(|(_, k)| k == kind))
            .collect()
    }
}

/// Client configuration, injected into `LensClient` at construction.
#[derive(Debug, Clone)]
pub struct LensConfig {
    pub network: LensNetwork,
    /// JSON-RPC endpoint for the default connector.
    pub rpc_url: Option<String>,
    pub chain_id: u64,
    pub api_url: String,
    pub contracts: LensContracts,
    pub unknown_module_policy: UnknownModulePolicy,
}

/// File/environment layout accepted by [`LensConfig::from_file`].
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    network: LensNetwork,
    rpc_url: Option<String>,
    chain_id: Option<u64>,
    api_url: Option<String>,
    lens_hub_proxy: Option<Address>,
    #[serde(default)]
    unknown_module_policy: UnknownModulePolicy,
    #[serde(default)]
    modules: RawModules,
}

#[derive(Debug, Default, Deserialize)]
struct RawModules {
    profile_creation_proxy: Option<Address>,
    mock_profile_creation_proxy: Option<Address>,
    free_collect_module: Option<Address>,
    fee_collect_module: Option<Address>,
    limited_fee_collect_module: Option<Address>,
    timed_fee_collect_module: Option<Address>,
    limited_timed_fee_collect_module: Option<Address>,
    revert_collect_module: Option<Address>,
    fee_follow_module: Option<Address>,
    revert_follow_module: Option<Address>,
}

impl LensConfig {
    /// Defaults for `network` with the given contracts.
    pub fn for_network(network: LensNetwork, contracts: LensContracts) -> Self {
        Self {
            network,
            rpc_url: None,
            chain_id: network.chain_id(),
            api_url: network.api_url().to_string(),
            contracts,
            unknown_module_policy: UnknownModulePolicy::default(),
        }
    }

    /// Build the module registry for this deployment.
    pub fn module_registry(&self) -> ModuleRegistry {
        ModuleRegistry::from_entries(self.contracts.module_entries(), self.unknown_module_policy)
    }

    pub fn lens_hub(&self) -> Address {
        self.contracts.lens_hub_proxy
    }

    /// Proxy that mints profiles on this network: the mock proxy on testnets,
    /// `ProfileCreationProxy` on mainnet.
    pub fn profile_creation_proxy(&self) -> Result<Address> {
        let (proxy, name) = if self.network.uses_mock_profile_proxy() {
            (
                self.contracts.mock_profile_creation_proxy,
                "MockProfileCreationProxy",
            )
        } else {
            (self.contracts.profile_creation_proxy, "ProfileCreationProxy")
        };

        proxy.ok_or_else(|| Error::Config {
            message: format!("no {} configured for {:?}", name, self.network),
        })
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let network = match env::var("LENS_NETWORK") {
            Ok(value) => value.parse()?,
            Err(_) => LensNetwork::default(),
        };

        let contracts = LensContracts {
            lens_hub_proxy: env_address("LENS_HUB_PROXY")?
                .unwrap_or_else(|| network.lens_hub_proxy()),
            profile_creation_proxy: env_address("LENS_PROFILE_CREATION_PROXY")?,
            mock_profile_creation_proxy: env_address("LENS_MOCK_PROFILE_CREATION_PROXY")?,
            free_collect_module: env_address("LENS_FREE_COLLECT_MODULE")?,
            fee_collect_module: env_address("LENS_FEE_COLLECT_MODULE")?,
            limited_fee_collect_module: env_address("LENS_LIMITED_FEE_COLLECT_MODULE")?,
            timed_fee_collect_module: env_address("LENS_TIMED_FEE_COLLECT_MODULE")?,
            limited_timed_fee_collect_module: env_address(
                "LENS_LIMITED_TIMED_FEE_COLLECT_MODULE",
            )?,
            revert_collect_module: env_address("LENS_REVERT_COLLECT_MODULE")?,
            fee_follow_module: env_address("LENS_FEE_FOLLOW_MODULE")?,
            revert_follow_module: env_address("LENS_REVERT_FOLLOW_MODULE")?,
        };

        let mut config = Self::for_network(network, contracts);
        config.rpc_url = env::var("LENS_RPC_URL").ok();
        if let Some(chain_id) = env::var("LENS_CHAIN_ID")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.chain_id = chain_id;
        }
        if let Ok(api_url) = env::var("LENS_API_URL") {
            config.api_url = api_url;
        }
        if let Ok(policy) = env::var("LENS_UNKNOWN_MODULE_POLICY") {
            config.unknown_module_policy = policy.parse()?;
        }

        Ok(config)
    }

    /// Load configuration from a file (TOML/JSON/YAML by extension), with
    /// `LENS__`-prefixed environment variables layered on top.
    pub fn from_file(path: &str) -> Result<Self> {
        let raw: RawConfig = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("LENS").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(raw.into_config())
    }
}

impl RawConfig {
    fn into_config(self) -> LensConfig {
        let network = self.network;
        let modules = self.modules;
        let contracts = LensContracts {
            lens_hub_proxy: self
                .lens_hub_proxy
                .unwrap_or_else(|| network.lens_hub_proxy()),
            profile_creation_proxy: modules.profile_creation_proxy,
            mock_profile_creation_proxy: modules.mock_profile_creation_proxy,
            free_collect_module: modules.free_collect_module,
            fee_collect_module: modules.fee_collect_module,
            limited_fee_collect_module: modules.limited_fee_collect_module,
            timed_fee_collect_module: modules.timed_fee_collect_module,
            limited_timed_fee_collect_module: modules.limited_timed_fee_collect_module,
            revert_collect_module: modules.revert_collect_module,
            fee_follow_module: modules.fee_follow_module,
            revert_follow_module: modules.revert_follow_module,
        };

        LensConfig {
            network,
            rpc_url: self.rpc_url,
            chain_id: self.chain_id.unwrap_or_else(|| network.chain_id()),
            api_url: self
                .api_url
                .unwrap_or_else(|| network.api_url().to_string()),
            contracts,
            unknown_module_policy: self.unknown_module_policy,
        }
    }
}

fn env_address(name: &str) -> Result<Option<Address>> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse::<Address>()
                .map(Some)
                .map_err(|e| Error::Config {
                    message: format!("{} is not a valid address: {}", name, e),
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_presets() {
        assert_eq!(LensNetwork::PolygonMainnet.chain_id(), 137);
        assert_eq!(LensNetwork::SandboxMumbaiTestnet.chain_id(), 80001);
        assert_eq!(
            LensNetwork::MumbaiTestnet.api_url(),
            "https://api-mumbai.lens.dev"
        );
        assert!(!LensNetwork::PolygonMainnet.uses_mock_profile_proxy());
        assert!(LensNetwork::MumbaiTestnet.uses_mock_profile_proxy());
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!(
            "mumbai".parse::<LensNetwork>().unwrap(),
            LensNetwork::MumbaiTestnet
        );
        assert_eq!(
            "Polygon".parse::<LensNetwork>().unwrap(),
            LensNetwork::PolygonMainnet
        );
        assert!("goerli".parse::<LensNetwork>().is_err());
    }

    #[test]
    fn test_module_entries_skip_unset() {
        let mut contracts = LensContracts::with_hub(Address::repeat_byte(1));
        contracts.fee_collect_module = Some(Address::repeat_byte(2));
        contracts.revert_follow_module = Some(Address::repeat_byte(3));

        let entries = contracts.module_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&(Address::repeat_byte(2), ModuleKind::FeeCollect)));

        let config = LensConfig::for_network(LensNetwork::MumbaiTestnet, contracts);
        let registry = config.module_registry();
        assert_eq!(
            registry.resolve(&Address::repeat_byte(3)),
            Some(ModuleKind::RevertFollow)
        );
        assert_eq!(config.chain_id, MUMBAI_CHAIN_ID);
    }

    #[test]
    fn test_raw_config_defaults_from_network() {
        let raw: RawConfig = serde_json::from_value(serde_json::json!({
            "network": "sandbox_mumbai_testnet",
            "unknown_module_policy": "reject",
            "modules": {
                "fee_collect_module": "0x2222222222222222222222222222222222222222"
            }
        }))
        .unwrap();

        let config = raw.into_config();
        assert_eq!(config.network, LensNetwork::SandboxMumbaiTestnet);
        assert_eq!(
            config.lens_hub(),
            LensNetwork::SandboxMumbaiTestnet.lens_hub_proxy()
        );
        assert_eq!(config.unknown_module_policy, UnknownModulePolicy::Reject);
        assert_eq!(
            config.contracts.fee_collect_module,
            Some(Address::repeat_byte(0x22))
        );
    }

    #[test]
    fn test_profile_proxy_follows_network() {
        let mut contracts = LensContracts::with_hub(Address::repeat_byte(1));
        contracts.profile_creation_proxy = Some(Address::repeat_byte(0x61));
        contracts.mock_profile_creation_proxy = Some(Address::repeat_byte(0x62));

        let mainnet = LensConfig::for_network(LensNetwork::PolygonMainnet, contracts.clone());
        assert_eq!(
            mainnet.profile_creation_proxy().unwrap(),
            Address::repeat_byte(0x61)
        );
        let mumbai = LensConfig::for_network(LensNetwork::MumbaiTestnet, contracts.clone());
        assert_eq!(
            mumbai.profile_creation_proxy().unwrap(),
            Address::repeat_byte(0x62)
        );

        contracts.mock_profile_creation_proxy = None;
        let sandbox = LensConfig::for_network(LensNetwork::SandboxMumbaiTestnet, contracts);
        assert!(matches!(
            sandbox.profile_creation_proxy().unwrap_err(),
            Error::Config { .. }
        ));
    }

    #[test]
    fn test_hub_only_preset_reports_every_module_missing() {
        let config = LensConfig::for_network(
            LensNetwork::PolygonMainnet,
            LensContracts::with_hub(LensNetwork::PolygonMainnet.lens_hub_proxy()),
        );
        assert!(config.module_registry().is_empty());
        assert_eq!(config.contracts.missing_modules(), ModuleKind::ALL.to_vec());

        let mut contracts = config.contracts.clone();
        contracts.fee_collect_module = Some(Address::repeat_byte(2));
        let missing = contracts.missing_modules();
        assert_eq!(missing.len(), ModuleKind::ALL.len() - 1);
        assert!(!missing.contains(&ModuleKind::FeeCollect));
    }
}
