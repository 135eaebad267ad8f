//! Caller-facing write requests.
//!
//! Requests carry optional fields. Each one is normalized exactly once into
//! the fully populated contract struct before anything is encoded or signed,
//! so defaults never diverge between the direct and signed paths.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::api::contracts::{CreateProfileData, PostData};

/// `followNFTURI` used when a profile is created without one.
pub const DEFAULT_FOLLOW_NFT_URI: &str = "https://github.com/dataverse-os";

/// Signature deadline used when none is given: never expires.
pub const DEFAULT_DEADLINE: U256 = U256::MAX;

/// A new publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub profile_id: U256,
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    pub collect_module: Address,
    #[serde(default)]
    pub collect_module_init_data: Option<Bytes>,
    #[serde(default)]
    pub reference_module: Option<Address>,
    #[serde(default)]
    pub reference_module_init_data: Option<Bytes>,
    #[serde(default)]
    pub deadline: Option<U256>,
}

/// A post with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPost {
    pub vars: PostData,
    pub deadline: U256,
}

impl PostRequest {
    pub fn new(profile_id: U256, content_uri: impl Into<String>, collect_module: Address) -> Self {
        Self {
            profile_id,
            content_uri: content_uri.into(),
            collect_module,
            collect_module_init_data: None,
            reference_module: None,
            reference_module_init_data: None,
            deadline: None,
        }
    }

    pub fn collect_module_init_data(mut self, data: Bytes) -> Self {
        self.collect_module_init_data = Some(data);
        self
    }

    pub fn reference_module(mut self, module: Address, init_data: Bytes) -> Self {
        self.reference_module = Some(module);
        self.reference_module_init_data = Some(init_data);
        self
    }

    pub fn deadline(mut self, deadline: U256) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn normalize(&self) -> NormalizedPost {
        NormalizedPost {
            vars: PostData {
                profileId: self.profile_id,
                contentURI: self.content_uri.clone(),
                collectModule: self.collect_module,
                collectModuleInitData: self.collect_module_init_data.clone().unwrap_or_default(),
                referenceModule: self.reference_module.unwrap_or(Address::ZERO),
                referenceModuleInitData: self
                    .reference_module_init_data
                    .clone()
                    .unwrap_or_default(),
            },
            deadline: self.deadline.unwrap_or(DEFAULT_DEADLINE),
        }
    }
}

/// Collect a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectRequest {
    pub profile_id: U256,
    pub pub_id: U256,
    /// Submit through `collectWithSig` instead of `collect`.
    #[serde(default)]
    pub with_sig: bool,
    #[serde(default)]
    pub deadline: Option<U256>,
}

/// A collect with every default applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedCollect {
    pub profile_id: U256,
    pub pub_id: U256,
    pub with_sig: bool,
    pub deadline: U256,
}

impl CollectRequest {
    pub fn new(profile_id: U256, pub_id: U256) -> Self {
        Self {
            profile_id,
            pub_id,
            with_sig: false,
            deadline: None,
        }
    }

    pub fn with_sig(mut self) -> Self {
        self.with_sig = true;
        self
    }

    pub fn deadline(mut self, deadline: U256) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn normalize(&self) -> NormalizedCollect {
        NormalizedCollect {
            profile_id: self.profile_id,
            pub_id: self.pub_id,
            with_sig: self.with_sig,
            deadline: self.deadline.unwrap_or(DEFAULT_DEADLINE),
        }
    }
}

/// Mint a new profile through the profile-creation proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    /// Profile owner. Defaults to the signing holder.
    #[serde(default)]
    pub to: Option<Address>,
    pub handle: String,
    #[serde(rename = "imageURI")]
    pub image_uri: String,
    #[serde(default)]
    pub follow_module: Option<Address>,
    #[serde(default)]
    pub follow_module_init_data: Option<Bytes>,
    #[serde(default, rename = "followNFTURI")]
    pub follow_nft_uri: Option<String>,
}

impl CreateProfileRequest {
    pub fn new(handle: impl Into<String>, image_uri: impl Into<String>) -> Self {
        Self {
            to: None,
            handle: handle.into(),
            image_uri: image_uri.into(),
            follow_module: None,
            follow_module_init_data: None,
            follow_nft_uri: None,
        }
    }

    pub fn to(mut self, owner: Address) -> Self {
        self.to = Some(owner);
        self
    }

    pub fn follow_module(mut self, module: Address, init_data: Bytes) -> Self {
        self.follow_module = Some(module);
        self.follow_module_init_data = Some(init_data);
        self
    }

    pub fn follow_nft_uri(mut self, uri: impl Into<String>) -> Self {
        self.follow_nft_uri = Some(uri.into());
        self
    }

    /// Fill defaults. `holder` becomes the owner when `to` is unset.
    pub fn normalize(&self, holder: Address) -> CreateProfileData {
        CreateProfileData {
            to: self.to.unwrap_or(holder),
            handle: self.handle.clone(),
            imageURI: self.image_uri.clone(),
            followModule: self.follow_module.unwrap_or(Address::ZERO),
            followModuleInitData: self.follow_module_init_data.clone().unwrap_or_default(),
            followNFTURI: self
                .follow_nft_uri
                .clone()
                .unwrap_or_else(|| DEFAULT_FOLLOW_NFT_URI.to_string()),
        }
    }
}

/// Replace a profile's follow module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowModuleRequest {
    /// `None` clears the follow module.
    #[serde(default)]
    pub follow_module: Option<Address>,
    #[serde(default)]
    pub follow_module_init_data: Option<Bytes>,
}

impl FollowModuleRequest {
    pub fn new(module: Address, init_data: Bytes) -> Self {
        Self {
            follow_module: Some(module),
            follow_module_init_data: Some(init_data),
        }
    }

    /// Request that removes the follow module.
    pub fn clear() -> Self {
        Self::default()
    }

    /// `(followModule, followModuleInitData)` with defaults applied.
    pub fn normalize(&self) -> (Address, Bytes) {
        (
            self.follow_module.unwrap_or(Address::ZERO),
            self.follow_module_init_data.clone().unwrap_or_default(),
        )
    }
}
