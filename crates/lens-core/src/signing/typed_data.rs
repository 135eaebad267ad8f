//! EIP-712 messages for the hub's signature-authorized writes.
//!
//! The field lists below are part of the type hash. Their order must match
//! the structs the hub hashes on chain; tests pin them against the
//! `encodeType` strings of the `sol!` declarations.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolStruct};
use tracing::debug;

use super::domain::{typed_data_hash, TypedDataDomain};
use crate::types::NormalizedPost;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct PostWithSig {
        uint256 profileId;
        string contentURI;
        address collectModule;
        bytes collectModuleInitData;
        address referenceModule;
        bytes referenceModuleInitData;
        uint256 nonce;
        uint256 deadline;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CollectWithSig {
        uint256 profileId;
        uint256 pubId;
        bytes data;
        uint256 nonce;
        uint256 deadline;
    }
}

/// Ordered `(name, type)` pairs of an EIP-712 struct.
pub type FieldSpec = &'static [(&'static str, &'static str)];

pub const POST_WITH_SIG_FIELDS: FieldSpec = &[
    ("profileId", "uint256"),
    ("contentURI", "string"),
    ("collectModule", "address"),
    ("collectModuleInitData", "bytes"),
    ("referenceModule", "address"),
    ("referenceModuleInitData", "bytes"),
    ("nonce", "uint256"),
    ("deadline", "uint256"),
];

pub const COLLECT_WITH_SIG_FIELDS: FieldSpec = &[
    ("profileId", "uint256"),
    ("pubId", "uint256"),
    ("data", "bytes"),
    ("nonce", "uint256"),
    ("deadline", "uint256"),
];

const EIP712_DOMAIN_FIELDS: FieldSpec = &[
    ("name", "string"),
    ("version", "string"),
    ("chainId", "uint256"),
    ("verifyingContract", "address"),
];

/// `Name(type1 name1,type2 name2,...)`.
pub fn encode_type(type_name: &str, fields: FieldSpec) -> String {
    let members: Vec<String> = fields
        .iter()
        .map(|(name, ty)| format!("{} {}", ty, name))
        .collect();
    format!("{}({})", type_name, members.join(","))
}

/// A write the hub accepts with an EIP-712 signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedAction {
    Post(PostWithSig),
    Collect(CollectWithSig),
}

impl SignedAction {
    /// `PostWithSig` for a normalized post.
    pub fn post(post: &NormalizedPost, nonce: U256) -> Self {
        SignedAction::Post(PostWithSig {
            profileId: post.vars.profileId,
            contentURI: post.vars.contentURI.clone(),
            collectModule: post.vars.collectModule,
            collectModuleInitData: post.vars.collectModuleInitData.clone(),
            referenceModule: post.vars.referenceModule,
            referenceModuleInitData: post.vars.referenceModuleInitData.clone(),
            nonce,
            deadline: post.deadline,
        })
    }

    /// `CollectWithSig` with an already-encoded validate payload.
    pub fn collect(
        profile_id: U256,
        pub_id: U256,
        data: Bytes,
        nonce: U256,
        deadline: U256,
    ) -> Self {
        SignedAction::Collect(CollectWithSig {
            profileId: profile_id,
            pubId: pub_id,
            data,
            nonce,
            deadline,
        })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SignedAction::Post(_) => "PostWithSig",
            SignedAction::Collect(_) => "CollectWithSig",
        }
    }

    pub fn field_spec(&self) -> FieldSpec {
        match self {
            SignedAction::Post(_) => POST_WITH_SIG_FIELDS,
            SignedAction::Collect(_) => COLLECT_WITH_SIG_FIELDS,
        }
    }

    pub fn nonce(&self) -> U256 {
        match self {
            SignedAction::Post(post) => post.nonce,
            SignedAction::Collect(collect) => collect.nonce,
        }
    }

    pub fn deadline(&self) -> U256 {
        match self {
            SignedAction::Post(post) => post.deadline,
            SignedAction::Collect(collect) => collect.deadline,
        }
    }

    /// `hashStruct(message)`.
    pub fn struct_hash(&self) -> B256 {
        match self {
            SignedAction::Post(post) => post.eip712_hash_struct(),
            SignedAction::Collect(collect) => collect.eip712_hash_struct(),
        }
    }

    /// `message` member of an `eth_signTypedData_v4` document.
    pub fn value_json(&self) -> serde_json::Value {
        match self {
            SignedAction::Post(post) => serde_json::json!({
                "profileId": post.profileId.to_string(),
                "contentURI": post.contentURI,
                "collectModule": checksum(post.collectModule),
                "collectModuleInitData": post.collectModuleInitData,
                "referenceModule": checksum(post.referenceModule),
                "referenceModuleInitData": post.referenceModuleInitData,
                "nonce": post.nonce.to_string(),
                "deadline": post.deadline.to_string(),
            }),
            SignedAction::Collect(collect) => serde_json::json!({
                "profileId": collect.profileId.to_string(),
                "pubId": collect.pubId.to_string(),
                "data": collect.data,
                "nonce": collect.nonce.to_string(),
                "deadline": collect.deadline.to_string(),
            }),
        }
    }
}

fn checksum(address: Address) -> String {
    address.to_checksum(None)
}

fn fields_json(fields: FieldSpec) -> serde_json::Value {
    fields
        .iter()
        .map(|(name, ty)| serde_json::json!({ "name": name, "type": ty }))
        .collect()
}

/// Domain, types and value of one typed-data signature request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDataMessage {
    pub domain: TypedDataDomain,
    pub action: SignedAction,
}

impl TypedDataMessage {
    pub fn type_name(&self) -> &'static str {
        self.action.type_name()
    }

    pub fn field_spec(&self) -> FieldSpec {
        self.action.field_spec()
    }

    pub fn nonce(&self) -> U256 {
        self.action.nonce()
    }

    pub fn deadline(&self) -> U256 {
        self.action.deadline()
    }

    pub fn type_hash(&self) -> B256 {
        keccak256(encode_type(self.type_name(), self.field_spec()).as_bytes())
    }

    /// The 32-byte digest the holder signs.
    pub fn signing_hash(&self) -> B256 {
        typed_data_hash(self.domain.separator(), self.action.struct_hash())
    }

    /// Full `eth_signTypedData_v4` document.
    pub fn to_json(&self) -> serde_json::Value {
        let mut types = serde_json::Map::new();
        types.insert("EIP712Domain".to_string(), fields_json(EIP712_DOMAIN_FIELDS));
        types.insert(self.type_name().to_string(), fields_json(self.field_spec()));

        serde_json::json!({
            "types": types,
            "domain": self.domain.to_json(),
            "primaryType": self.type_name(),
            "message": self.action.value_json(),
        })
    }
}

/// Assembles typed-data messages for one hub domain.
#[derive(Debug, Clone)]
pub struct TypedDataBuilder {
    domain: TypedDataDomain,
}

impl TypedDataBuilder {
    pub fn new(domain: TypedDataDomain) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> &TypedDataDomain {
        &self.domain
    }

    pub fn build_message(&self, action: SignedAction) -> TypedDataMessage {
        debug!(
            primary_type = action.type_name(),
            nonce = %action.nonce(),
            deadline = %action.deadline(),
            "Built typed-data message"
        );
        TypedDataMessage {
            domain: self.domain.clone(),
            action,
        }
    }

    pub fn post_with_sig(&self, post: &NormalizedPost, nonce: U256) -> TypedDataMessage {
        self.build_message(SignedAction::post(post, nonce))
    }

    pub fn collect_with_sig(
        &self,
        profile_id: U256,
        pub_id: U256,
        data: Bytes,
        nonce: U256,
        deadline: U256,
    ) -> TypedDataMessage {
        self.build_message(SignedAction::collect(profile_id, pub_id, data, nonce, deadline))
    }
}
