//! Domain events decoded from receipt logs.
//!
//! Events are located by topic[0] and their indexed fields are read
//! positionally from topics[1..]. Non-indexed data is not needed by any
//! caller and is not decoded.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolEvent;
use tracing::debug;

use crate::types::Receipt;
use crate::{Error, Result};

/// Canonical hub event declarations.
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        event ProfileCreated(
            uint256 indexed profileId,
            address indexed creator,
            address indexed to,
            string handle,
            string imageURI,
            address followModule,
            bytes followModuleReturnData,
            string followNFTURI,
            uint256 timestamp
        );

        event PostCreated(
            uint256 indexed profileId,
            uint256 indexed pubId,
            string contentURI,
            address collectModule,
            bytes collectModuleReturnData,
            address referenceModule,
            bytes referenceModuleReturnData,
            uint256 timestamp
        );

        event Collected(
            address indexed collector,
            uint256 indexed profileId,
            uint256 indexed pubId,
            uint256 rootProfileId,
            uint256 rootPubId,
            bytes collectModuleData,
            uint256 timestamp
        );
    }
}

pub const EVENT_SIG_PROFILE_CREATED: B256 = abi::ProfileCreated::SIGNATURE_HASH;
pub const EVENT_SIG_POST_CREATED: B256 = abi::PostCreated::SIGNATURE_HASH;
pub const EVENT_SIG_COLLECTED: B256 = abi::Collected::SIGNATURE_HASH;

/// Events the client extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ProfileCreated,
    PostCreated,
    Collected,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::ProfileCreated => "ProfileCreated",
            EventKind::PostCreated => "PostCreated",
            EventKind::Collected => "Collected",
        }
    }

    pub fn signature_hash(&self) -> B256 {
        match self {
            EventKind::ProfileCreated => EVENT_SIG_PROFILE_CREATED,
            EventKind::PostCreated => EVENT_SIG_POST_CREATED,
            EventKind::Collected => EVENT_SIG_COLLECTED,
        }
    }

    /// Number of indexed fields, i.e. topics after topic[0].
    pub fn indexed_fields(&self) -> usize {
        match self {
            EventKind::ProfileCreated | EventKind::Collected => 3,
            EventKind::PostCreated => 2,
        }
    }

    pub fn from_signature(signature: &B256) -> Option<Self> {
        [
            EventKind::ProfileCreated,
            EventKind::PostCreated,
            EventKind::Collected,
        ]
        .into_iter()
        .find(|kind| kind.signature_hash() == *signature)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An event located in a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// `None` when extracted by a signature this crate does not know.
    pub kind: Option<EventKind>,
    pub signature: B256,
    /// Emitting contract.
    pub address: Address,
    /// topics[1..] in declaration order.
    pub fields: Vec<B256>,
}

impl DecodedEvent {
    fn field(&self, index: usize) -> Result<B256> {
        self.fields.get(index).copied().ok_or_else(|| Error::Abi {
            message: format!(
                "{} has {} indexed fields, wanted field {}",
                self.kind.map(|k| k.name()).unwrap_or("event"),
                self.fields.len(),
                index
            ),
        })
    }

    pub fn uint(&self, index: usize) -> Result<U256> {
        Ok(U256::from_be_bytes(self.field(index)?.0))
    }

    pub fn address(&self, index: usize) -> Result<Address> {
        Ok(Address::from_word(self.field(index)?))
    }
}

/// `ProfileCreated(profileId, creator, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileCreatedEvent {
    pub profile_id: U256,
    pub creator: Address,
    pub to: Address,
}

/// `PostCreated(profileId, pubId)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostCreatedEvent {
    pub profile_id: U256,
    pub pub_id: U256,
}

/// `Collected(collector, profileId, pubId)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectedEvent {
    pub collector: Address,
    pub profile_id: U256,
    pub pub_id: U256,
}

impl TryFrom<&DecodedEvent> for ProfileCreatedEvent {
    type Error = Error;

    fn try_from(event: &DecodedEvent) -> Result<Self> {
        Ok(Self {
            profile_id: event.uint(0)?,
            creator: event.address(1)?,
            to: event.address(2)?,
        })
    }
}

impl TryFrom<&DecodedEvent> for PostCreatedEvent {
    type Error = Error;

    fn try_from(event: &DecodedEvent) -> Result<Self> {
        Ok(Self {
            profile_id: event.uint(0)?,
            pub_id: event.uint(1)?,
        })
    }
}

impl TryFrom<&DecodedEvent> for CollectedEvent {
    type Error = Error;

    fn try_from(event: &DecodedEvent) -> Result<Self> {
        Ok(Self {
            collector: event.address(0)?,
            profile_id: event.uint(1)?,
            pub_id: event.uint(2)?,
        })
    }
}

/// Scans receipts for hub events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventExtractor;

impl EventExtractor {
    /// First log whose topic[0] equals `signature`.
    pub fn extract(receipt: &Receipt, signature: B256) -> Result<DecodedEvent> {
        let kind = EventKind::from_signature(&signature);

        let log = receipt
            .logs
            .iter()
            .find(|log| log.signature() == Some(signature))
            .ok_or(Error::EventNotFound {
                event: kind.map(|k| k.name()).unwrap_or("event"),
                signature,
            })?;

        let fields = log.topics[1..].to_vec();
        if let Some(kind) = kind {
            if fields.len() < kind.indexed_fields() {
                return Err(Error::Abi {
                    message: format!(
                        "{} log carries {} indexed topics, expected {}",
                        kind,
                        fields.len(),
                        kind.indexed_fields()
                    ),
                });
            }
        }

        debug!(
            tx_hash = %receipt.transaction_hash,
            event = kind.map(|k| k.name()).unwrap_or("unknown"),
            address = %log.address,
            "Extracted event"
        );

        Ok(DecodedEvent {
            kind,
            signature,
            address: log.address,
            fields,
        })
    }

    pub fn profile_created(receipt: &Receipt) -> Result<ProfileCreatedEvent> {
        ProfileCreatedEvent::try_from(&Self::extract(receipt, EVENT_SIG_PROFILE_CREATED)?)
    }

    pub fn post_created(receipt: &Receipt) -> Result<PostCreatedEvent> {
        PostCreatedEvent::try_from(&Self::extract(receipt, EVENT_SIG_POST_CREATED)?)
    }

    pub fn collected(receipt: &Receipt) -> Result<CollectedEvent> {
        CollectedEvent::try_from(&Self::extract(receipt, EVENT_SIG_COLLECTED)?)
    }
}
