//! Read-only hub queries.

use alloy_primitives::{Address, U256};
use lens_core::api::contracts::{IERC721, ILensHub, ProfileStruct};
use lens_core::api::{read, ChainConnector};
use lens_core::Result;
use tracing::debug;

use crate::client::LensClient;

impl<C: ChainConnector> LensClient<C> {
    /// Current `sigNonces(signer)`.
    pub async fn sig_nonce(&self, signer: Address) -> Result<U256> {
        self.nonces().current_nonce(signer).await
    }

    pub async fn get_follow_module(&self, profile_id: U256) -> Result<Address> {
        self.hub_read(ILensHub::getFollowModuleCall {
            profileId: profile_id,
        })
        .await
    }

    pub async fn get_reference_module(&self, profile_id: U256, pub_id: U256) -> Result<Address> {
        self.hub_read(ILensHub::getReferenceModuleCall {
            profileId: profile_id,
            pubId: pub_id,
        })
        .await
    }

    /// Collect NFT of a publication; zero until the first collect deploys it.
    pub async fn get_collect_nft(&self, profile_id: U256, pub_id: U256) -> Result<Address> {
        self.hub_read(ILensHub::getCollectNFTCall {
            profileId: profile_id,
            pubId: pub_id,
        })
        .await
    }

    pub async fn get_profile_id_by_handle(&self, handle: &str) -> Result<U256> {
        self.hub_read(ILensHub::getProfileIdByHandleCall {
            handle: handle.to_string(),
        })
        .await
    }

    /// On-chain profile record. Unminted ids come back zeroed.
    pub async fn get_profile(&self, profile_id: U256) -> Result<ProfileStruct> {
        let profile: ProfileStruct = self
            .hub_read(ILensHub::getProfileCall {
                profileId: profile_id,
            })
            .await?;

        debug!(
            profile_id = %profile_id,
            handle = %profile.handle,
            pub_count = %profile.pubCount,
            "Fetched profile"
        );
        Ok(profile)
    }

    /// Whether `collector` holds the publication's collect NFT.
    pub async fn is_collected(
        &self,
        profile_id: U256,
        pub_id: U256,
        collector: Address,
    ) -> Result<bool> {
        let nft = self.get_collect_nft(profile_id, pub_id).await?;
        if nft.is_zero() {
            return Ok(false);
        }

        let balance: U256 = read(
            self.connector().as_ref(),
            nft,
            IERC721::balanceOfCall { owner: collector },
        )
        .await?;

        debug!(nft = %nft, collector = %collector, balance = %balance, "Collect NFT balance");
        Ok(balance > U256::ZERO)
    }

    pub async fn is_profile_creator_whitelisted(&self, creator: Address) -> Result<bool> {
        self.hub_read(ILensHub::isProfileCreatorWhitelistedCall {
            profileCreator: creator,
        })
        .await
    }

    pub async fn is_collect_module_whitelisted(&self, module: Address) -> Result<bool> {
        self.hub_read(ILensHub::isCollectModuleWhitelistedCall {
            collectModule: module,
        })
        .await
    }

    pub async fn is_follow_module_whitelisted(&self, module: Address) -> Result<bool> {
        self.hub_read(ILensHub::isFollowModuleWhitelistedCall {
            followModule: module,
        })
        .await
    }

    pub async fn is_reference_module_whitelisted(&self, module: Address) -> Result<bool> {
        self.hub_read(ILensHub::isReferenceModuleWhitelistedCall {
            referenceModule: module,
        })
        .await
    }

    async fn hub_read<T, Call>(&self, call: Call) -> Result<T>
    where
        T: alloy_sol_types::SolValue
            + From<<T::SolType as alloy_sol_types::SolType>::RustType>,
        Call: alloy_sol_types::SolCall + Send,
    {
        read(self.connector().as_ref(), self.lens_hub(), call).await
    }
}
