//! Collect flow.
//!
//! ```text
//! getCollectModule ─► getPublicationData ─► allowance/approve ─► [nonce ─► sign] ─► collect ─► Collected
//! ```
//!
//! Each step runs strictly after the previous one. Failures are wrapped in
//! [`Error::Step`] naming the step; an approval sent before a later failure
//! stays in place.

use alloy_primitives::{Address, Bytes, B256, U256};
use lens_core::api::contracts::{CollectWithSigData, IFeeCollectModule, ILensHub};
use lens_core::api::{read, ChainConnector, ContractCall};
use lens_core::events::{CollectedEvent, EventExtractor};
use lens_core::modules::{FeeQuote, PayloadKind};
use lens_core::signing::SignatureSigner;
use lens_core::types::{CollectRequest, NormalizedCollect};
use lens_core::{Error, FlowStep, Result};
use tracing::{debug, info};

use crate::client::LensClient;

/// Result of a collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOutcome {
    pub collected: CollectedEvent,
    pub transaction_hash: B256,
    /// Set when an approval had to be sent first.
    pub approval_tx: Option<B256>,
}

/// Validate payload and the fee behind it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationData {
    pub data: Bytes,
    pub fee: Option<FeeQuote>,
}

impl<C: ChainConnector> LensClient<C> {
    /// Collect a publication as the attached holder.
    pub async fn collect(&self, request: CollectRequest) -> Result<CollectOutcome> {
        let request = request.normalize();
        let collector = self.holder_address()?;

        let module = self
            .get_collect_module(request.profile_id, request.pub_id)
            .await
            .map_err(Error::at(FlowStep::ResolveModule))?;

        info!(
            profile_id = %request.profile_id,
            pub_id = %request.pub_id,
            module = %module,
            kind = ?self.registry().resolve(&module),
            with_sig = request.with_sig,
            "Collecting publication"
        );

        let validation = self
            .validation_data(module, request.profile_id, request.pub_id)
            .await
            .map_err(Error::at(FlowStep::FetchValidationData))?;

        let approval_tx = match validation.fee {
            Some(fee) => self
                .ensure_allowance(fee.currency, module, fee.amount, collector)
                .await
                .map_err(Error::at(FlowStep::ConditionalApproval))?,
            None => None,
        };

        let receipt = if request.with_sig {
            self.collect_with_sig(&request, collector, validation.data)
                .await?
        } else {
            self.send_to_hub(&ILensHub::collectCall {
                profileId: request.profile_id,
                pubId: request.pub_id,
                data: validation.data,
            })
            .await
            .map_err(Error::at(FlowStep::Submit))?
        };

        let collected =
            EventExtractor::collected(&receipt).map_err(Error::at(FlowStep::ExtractResult))?;

        info!(
            collector = %collected.collector,
            profile_id = %collected.profile_id,
            pub_id = %collected.pub_id,
            tx_hash = %receipt.transaction_hash,
            "Publication collected"
        );

        Ok(CollectOutcome {
            collected,
            transaction_hash: receipt.transaction_hash,
            approval_tx,
        })
    }

    async fn collect_with_sig(
        &self,
        request: &NormalizedCollect,
        collector: Address,
        data: Bytes,
    ) -> Result<lens_core::types::Receipt> {
        let nonce = self
            .nonces()
            .current_nonce(collector)
            .await
            .map_err(Error::at(FlowStep::FetchNonce))?;

        let message = self.typed_data().collect_with_sig(
            request.profile_id,
            request.pub_id,
            data.clone(),
            nonce,
            request.deadline,
        );

        let sig = SignatureSigner::expecting(collector)
            .sign(self.holder(), &message)
            .await
            .map_err(Error::at(FlowStep::Sign))?;

        self.send_to_hub(&ILensHub::collectWithSigCall {
            vars: CollectWithSigData {
                collector,
                profileId: request.profile_id,
                pubId: request.pub_id,
                data,
                sig: sig.to_sol(),
            },
        })
        .await
        .map_err(Error::at(FlowStep::Submit))
    }

    /// Validate payload `collect` must carry for a publication using `module`.
    ///
    /// Fee-charging modules get `(currency, amount)` read from the module's
    /// publication data. Known modules without fees get an empty payload;
    /// unknown modules follow the registry's policy.
    pub async fn validation_data(
        &self,
        module: Address,
        profile_id: U256,
        pub_id: U256,
    ) -> Result<ValidationData> {
        if module.is_zero() {
            return Ok(ValidationData {
                data: Bytes::new(),
                fee: None,
            });
        }

        let Some(kind) = self.registry().resolve(&module) else {
            return Ok(ValidationData {
                data: self.registry().unknown(&module)?,
                fee: None,
            });
        };

        if kind.publication_data_schema().is_none() {
            return Ok(ValidationData {
                data: Bytes::new(),
                fee: None,
            });
        }

        let fee = self.publication_fee(module, profile_id, pub_id).await?;
        let data = self
            .registry()
            .encode_for(&module, PayloadKind::Validate, &fee.to_params())?;

        debug!(
            module = %module,
            kind = %kind,
            currency = %fee.currency,
            amount = %fee.amount,
            "Built validate payload"
        );

        Ok(ValidationData {
            data,
            fee: Some(fee),
        })
    }

    /// Currency and amount a fee-charging collect module charges for a
    /// publication.
    pub async fn publication_fee(
        &self,
        module: Address,
        profile_id: U256,
        pub_id: U256,
    ) -> Result<FeeQuote> {
        let schema = self
            .registry()
            .resolve(&module)
            .and_then(|kind| kind.publication_data_schema())
            .ok_or(Error::UnknownModule { module })?;

        let raw = self
            .connector()
            .call(ContractCall::new(
                module,
                &IFeeCollectModule::getPublicationDataCall {
                    profileId: profile_id,
                    pubId: pub_id,
                },
            ))
            .await?;

        let values = schema.decode(&raw)?;
        FeeQuote::from_named(&schema, &values)
    }

    /// Collect module attached to a publication.
    pub async fn get_collect_module(&self, profile_id: U256, pub_id: U256) -> Result<Address> {
        read(
            self.connector().as_ref(),
            self.lens_hub(),
            ILensHub::getCollectModuleCall {
                profileId: profile_id,
                pubId: pub_id,
            },
        )
        .await
    }
}
