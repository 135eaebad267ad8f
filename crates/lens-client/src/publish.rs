//! Posts, profiles and follow modules.

use alloy_primitives::{Address, Bytes, B256, U256};
use lens_core::api::contracts::{IProfileCreationProxy, ILensHub, PostWithSigData};
use lens_core::api::ChainConnector;
use lens_core::events::{EventExtractor, PostCreatedEvent, ProfileCreatedEvent};
use lens_core::modules::{CollectModuleInit, FollowModuleInit, PayloadKind};
use lens_core::signing::SignatureSigner;
use lens_core::types::{
    CreateProfileRequest, FollowModuleRequest, NormalizedPost, PostRequest, Receipt,
};
use lens_core::{Error, FlowStep, Result};
use tracing::info;

use crate::client::LensClient;

/// Result of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOutcome {
    pub post: PostCreatedEvent,
    pub transaction_hash: B256,
}

impl<C: ChainConnector> LensClient<C> {
    /// Post request whose collect module is resolved from configuration and
    /// whose init data is encoded from `init`.
    pub fn post_request(
        &self,
        profile_id: U256,
        content_uri: impl Into<String>,
        init: &CollectModuleInit,
    ) -> Result<PostRequest> {
        let (module, data) = self.collect_module_init_data(init)?;
        Ok(PostRequest::new(profile_id, content_uri, module).collect_module_init_data(data))
    }

    /// Configured address and encoded init data for a collect module.
    pub fn collect_module_init_data(&self, init: &CollectModuleInit) -> Result<(Address, Bytes)> {
        let module = self.registry().require_address(init.kind())?;
        let data = self
            .registry()
            .encode_for(&module, PayloadKind::Init, &init.to_params())?;
        Ok((module, data))
    }

    /// Follow-module request with init data encoded from `init`.
    pub fn follow_module_request(&self, init: &FollowModuleInit) -> Result<FollowModuleRequest> {
        let module = self.registry().require_address(init.kind())?;
        let data = self
            .registry()
            .encode_for(&module, PayloadKind::Init, &init.to_params())?;
        Ok(FollowModuleRequest::new(module, data))
    }

    /// Post directly from the connector's sender.
    pub async fn post(&self, request: &PostRequest) -> Result<PostOutcome> {
        let post = request.normalize();
        self.log_post(&post, false);

        let receipt = self
            .send_to_hub(&ILensHub::postCall { vars: post.vars })
            .await
            .map_err(Error::at(FlowStep::Submit))?;

        post_outcome(&receipt)
    }

    /// Post through `postWithSig`, signed by the attached holder.
    pub async fn post_with_sig(&self, request: &PostRequest) -> Result<PostOutcome> {
        let post = request.normalize();
        self.log_post(&post, true);

        let signer = self.holder_address().map_err(Error::at(FlowStep::Sign))?;
        let nonce = self
            .nonces()
            .current_nonce(signer)
            .await
            .map_err(Error::at(FlowStep::FetchNonce))?;

        let message = self.typed_data().post_with_sig(&post, nonce);
        let sig = SignatureSigner::expecting(signer)
            .sign(self.holder(), &message)
            .await
            .map_err(Error::at(FlowStep::Sign))?;

        let vars = post.vars;
        let receipt = self
            .send_to_hub(&ILensHub::postWithSigCall {
                vars: PostWithSigData {
                    profileId: vars.profileId,
                    contentURI: vars.contentURI,
                    collectModule: vars.collectModule,
                    collectModuleInitData: vars.collectModuleInitData,
                    referenceModule: vars.referenceModule,
                    referenceModuleInitData: vars.referenceModuleInitData,
                    sig: sig.to_sol(),
                },
            })
            .await
            .map_err(Error::at(FlowStep::Submit))?;

        post_outcome(&receipt)
    }

    fn log_post(&self, post: &NormalizedPost, with_sig: bool) {
        info!(
            profile_id = %post.vars.profileId,
            content_uri = %post.vars.contentURI,
            collect_module = %post.vars.collectModule,
            kind = ?self.registry().resolve(&post.vars.collectModule),
            reference_module = %post.vars.referenceModule,
            with_sig,
            "Posting"
        );
    }

    /// Mint a profile through the profile-creation proxy.
    ///
    /// Mainnet routes through `ProfileCreationProxy`, testnets through
    /// `MockProfileCreationProxy`; both addresses come from configuration.
    pub async fn create_profile(
        &self,
        request: &CreateProfileRequest,
    ) -> Result<ProfileCreatedEvent> {
        let proxy = self.config().profile_creation_proxy()?;

        let owner = match request.to {
            Some(to) => to,
            None => self.holder_address()?,
        };
        let vars = request.normalize(owner);

        info!(
            handle = %vars.handle,
            to = %vars.to,
            proxy = %proxy,
            mock_proxy = self.config().network.uses_mock_profile_proxy(),
            "Creating profile"
        );

        let receipt = self
            .send_to(proxy, &IProfileCreationProxy::proxyCreateProfileCall { vars })
            .await
            .map_err(Error::at(FlowStep::Submit))?;

        let profile =
            EventExtractor::profile_created(&receipt).map_err(Error::at(FlowStep::ExtractResult))?;
        info!(profile_id = %profile.profile_id, to = %profile.to, "Profile created");
        Ok(profile)
    }

    pub async fn set_follow_module(
        &self,
        profile_id: U256,
        request: &FollowModuleRequest,
    ) -> Result<Receipt> {
        let (follow_module, init_data) = request.normalize();
        info!(
            profile_id = %profile_id,
            follow_module = %follow_module,
            kind = ?self.registry().resolve(&follow_module),
            "Setting follow module"
        );

        self.send_to_hub(&ILensHub::setFollowModuleCall {
            profileId: profile_id,
            followModule: follow_module,
            followModuleInitData: init_data,
        })
        .await
        .map_err(Error::at(FlowStep::Submit))
    }

    pub async fn set_default_profile(&self, profile_id: U256) -> Result<Receipt> {
        info!(profile_id = %profile_id, "Setting default profile");
        self.send_to_hub(&ILensHub::setDefaultProfileCall {
            profileId: profile_id,
        })
        .await
        .map_err(Error::at(FlowStep::Submit))
    }

    pub async fn burn_profile(&self, profile_id: U256) -> Result<Receipt> {
        info!(profile_id = %profile_id, "Burning profile");
        self.send_to_hub(&ILensHub::burnCall {
            tokenId: profile_id,
        })
        .await
        .map_err(Error::at(FlowStep::Submit))
    }
}

fn post_outcome(receipt: &Receipt) -> Result<PostOutcome> {
    let post =
        EventExtractor::post_created(receipt).map_err(Error::at(FlowStep::ExtractResult))?;
    info!(
        profile_id = %post.profile_id,
        pub_id = %post.pub_id,
        tx_hash = %receipt.transaction_hash,
        "Post created"
    );
    Ok(PostOutcome {
        post,
        transaction_hash: receipt.transaction_hash,
    })
}
