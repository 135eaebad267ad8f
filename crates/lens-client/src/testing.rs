//! Shared fixtures for unit tests.

use std::sync::Arc;

use alloy_primitives::{address, Address, B256, U256};
use lens_core::api::MemoryConnector;
use lens_core::config::{LensConfig, LensContracts, LensNetwork};
use lens_core::events::{EVENT_SIG_COLLECTED, EVENT_SIG_POST_CREATED, EVENT_SIG_PROFILE_CREATED};
use lens_core::signing::LocalWallet;
use lens_core::types::{LogEntry, Receipt};

use crate::LensClient;

// Well-known Anvil/Hardhat test key
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const HUB: Address = address!("6060606060606060606060606060606060606060");
pub const PROFILE_PROXY: Address = address!("6161616161616161616161616161616161616161");
pub const MOCK_PROFILE_PROXY: Address = address!("6262626262626262626262626262626262626262");
pub const FREE_COLLECT: Address = address!("a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1");
pub const FEE_COLLECT: Address = address!("a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2");
pub const LIMITED_TIMED_FEE_COLLECT: Address = address!("a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5");
pub const REVERT_COLLECT: Address = address!("a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6a6");
pub const FEE_FOLLOW: Address = address!("b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1b1");
pub const CURRENCY: Address = address!("cccccccccccccccccccccccccccccccccccccccc");

pub fn test_config() -> LensConfig {
    let mut contracts = LensContracts::with_hub(HUB);
    contracts.profile_creation_proxy = Some(PROFILE_PROXY);
    contracts.mock_profile_creation_proxy = Some(MOCK_PROFILE_PROXY);
    contracts.free_collect_module = Some(FREE_COLLECT);
    contracts.fee_collect_module = Some(FEE_COLLECT);
    contracts.limited_timed_fee_collect_module = Some(LIMITED_TIMED_FEE_COLLECT);
    contracts.revert_collect_module = Some(REVERT_COLLECT);
    contracts.fee_follow_module = Some(FEE_FOLLOW);
    LensConfig::for_network(LensNetwork::MumbaiTestnet, contracts)
}

pub fn wallet() -> LocalWallet {
    LocalWallet::from_private_key(TEST_PRIVATE_KEY).unwrap()
}

pub fn test_client() -> (LensClient<MemoryConnector>, Arc<MemoryConnector>) {
    let connector = Arc::new(MemoryConnector::new(80001));
    let client =
        LensClient::new(test_config(), Arc::clone(&connector)).with_holder(Arc::new(wallet()));
    (client, connector)
}

pub fn word(n: u64) -> B256 {
    B256::from(U256::from(n).to_be_bytes::<32>())
}

pub fn collected_receipt(collector: Address, profile_id: u64, pub_id: u64) -> Receipt {
    Receipt::new(
        B256::ZERO,
        vec![LogEntry::new(
            HUB,
            vec![
                EVENT_SIG_COLLECTED,
                collector.into_word(),
                word(profile_id),
                word(pub_id),
            ],
        )],
    )
}

pub fn post_created_receipt(profile_id: u64, pub_id: u64) -> Receipt {
    Receipt::new(
        B256::ZERO,
        vec![LogEntry::new(
            HUB,
            vec![EVENT_SIG_POST_CREATED, word(profile_id), word(pub_id)],
        )],
    )
}

pub fn profile_created_receipt(profile_id: u64, creator: Address, to: Address) -> Receipt {
    Receipt::new(
        B256::ZERO,
        vec![LogEntry::new(
            HUB,
            vec![
                EVENT_SIG_PROFILE_CREATED,
                word(profile_id),
                creator.into_word(),
                to.into_word(),
            ],
        )],
    )
}
