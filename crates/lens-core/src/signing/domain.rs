//! EIP-712 domain for the Lens Hub.
//!
//! Every `*WithSig` entry point on the hub verifies signatures against this
//! domain. All four fields are mandatory.

use std::borrow::Cow;

use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;

/// Domain name the hub registers in its EIP-712 constructor.
pub const LENS_HUB_NFT_NAME: &str = "Lens Protocol Profiles";

/// Domain version.
pub const LENS_HUB_DOMAIN_VERSION: &str = "1";

const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// EIP-712 domain bound to one hub deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDataDomain {
    pub name: String,
    pub version: String,
    pub chain_id: U256,
    pub verifying_contract: Address,
}

impl TypedDataDomain {
    /// Domain for the hub proxy at `lens_hub` on `chain_id`.
    pub fn lens_hub(chain_id: u64, lens_hub: Address) -> Self {
        Self::custom(LENS_HUB_NFT_NAME, LENS_HUB_DOMAIN_VERSION, chain_id, lens_hub)
    }

    pub fn custom(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id: U256::from(chain_id),
            verifying_contract,
        }
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> B256 {
        let encoded = (
            keccak256(DOMAIN_TYPE),
            keccak256(self.name.as_bytes()),
            keccak256(self.version.as_bytes()),
            self.chain_id,
            self.verifying_contract,
        )
            .abi_encode();

        keccak256(&encoded)
    }

    /// The same domain as an alloy [`alloy_sol_types::Eip712Domain`].
    pub fn to_alloy(&self) -> alloy_sol_types::Eip712Domain {
        alloy_sol_types::Eip712Domain::new(
            Some(Cow::Owned(self.name.clone())),
            Some(Cow::Owned(self.version.clone())),
            Some(self.chain_id),
            Some(self.verifying_contract),
            None,
        )
    }

    /// `domain` member of an `eth_signTypedData_v4` document.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "version": self.version,
            "chainId": self.chain_id.to_string(),
            "verifyingContract": self.verifying_contract.to_checksum(None),
        })
    }
}

/// `keccak256("\x19\x01" ++ domainSeparator ++ structHash)`.
pub fn typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let prefix = [0x19u8, 0x01];
    let data = (prefix, domain_separator, struct_hash).abi_encode_packed();
    keccak256(&data)
}
