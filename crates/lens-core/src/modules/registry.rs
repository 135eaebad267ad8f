//! Address → module lookup table.

use std::collections::HashMap;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes};
use serde::Deserialize;
use tracing::{debug, warn};

use super::kind::{ModuleKind, PayloadKind};
use super::schema::ModuleSchema;
use crate::{Error, Result};

/// What to do when a payload is requested for an address the registry
/// does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownModulePolicy {
    /// Submit an empty payload. Matches what deployed clients have always done.
    #[default]
    EmptyPayload,
    /// Fail with [`Error::UnknownModule`].
    Reject,
}

impl std::str::FromStr for UnknownModulePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty_payload" | "empty" => Ok(UnknownModulePolicy::EmptyPayload),
            "reject" => Ok(UnknownModulePolicy::Reject),
            other => Err(Error::Config {
                message: format!("unknown module policy `{}`", other),
            }),
        }
    }
}

/// Registry of module addresses on the active network.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<Address, ModuleKind>,
    policy: UnknownModulePolicy,
}

impl ModuleRegistry {
    pub fn new(policy: UnknownModulePolicy) -> Self {
        Self {
            modules: HashMap::new(),
            policy,
        }
    }

    /// Build a registry from `(address, kind)` pairs.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Address, ModuleKind)>,
        policy: UnknownModulePolicy,
    ) -> Self {
        let mut registry = Self::new(policy);
        for (address, kind) in entries {
            registry.register(address, kind);
        }
        registry
    }

    /// Add or replace a module entry.
    pub fn register(&mut self, address: Address, kind: ModuleKind) -> &mut Self {
        if let Some(previous) = self.modules.insert(address, kind) {
            if previous != kind {
                warn!(module = %address, %previous, %kind, "Module address re-registered");
            }
        }
        self
    }

    pub fn policy(&self) -> UnknownModulePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Exact-match lookup.
    pub fn resolve(&self, module: &Address) -> Option<ModuleKind> {
        self.modules.get(module).copied()
    }

    /// Schema of `payload` for `module`, or `None` when the address is not registered.
    pub fn resolve_schema(&self, module: &Address, payload: PayloadKind) -> Option<ModuleSchema> {
        self.resolve(module).map(|kind| kind.schema(payload))
    }

    /// Address a module kind is deployed at on this network.
    pub fn address_of(&self, kind: ModuleKind) -> Option<Address> {
        self.modules
            .iter()
            .find(|(_, registered)| **registered == kind)
            .map(|(address, _)| *address)
    }

    /// Like [`ModuleRegistry::address_of`] but fails when the kind is not configured.
    pub fn require_address(&self, kind: ModuleKind) -> Result<Address> {
        self.address_of(kind).ok_or_else(|| Error::Config {
            message: format!("no address configured for {}", kind),
        })
    }

    /// Encode `params` for `module`, applying the unknown-module policy.
    ///
    /// The zero address (no module) always encodes as an empty payload.
    pub fn encode_for(
        &self,
        module: &Address,
        payload: PayloadKind,
        params: &[DynSolValue],
    ) -> Result<Bytes> {
        if module.is_zero() {
            return Ok(Bytes::new());
        }

        match self.resolve_schema(module, payload) {
            Some(schema) => {
                let encoded = schema.encode(params)?;
                debug!(
                    module = %module,
                    schema = %schema,
                    bytes = encoded.len(),
                    "Encoded module payload"
                );
                Ok(encoded)
            }
            None => self.unknown(module),
        }
    }

    /// Decode a payload previously encoded for `module`.
    pub fn decode_for(
        &self,
        module: &Address,
        payload: PayloadKind,
        data: &[u8],
    ) -> Result<Vec<DynSolValue>> {
        match self.resolve_schema(module, payload) {
            Some(schema) => schema.decode(data),
            None => Err(Error::UnknownModule { module: *module }),
        }
    }

    /// Outcome for an unregistered module under the configured policy.
    pub fn unknown(&self, module: &Address) -> Result<Bytes> {
        match self.policy {
            UnknownModulePolicy::EmptyPayload => {
                warn!(module = %module, "Unknown module, using empty payload");
                Ok(Bytes::new())
            }
            UnknownModulePolicy::Reject => Err(Error::UnknownModule { module: *module }),
        }
    }
}
