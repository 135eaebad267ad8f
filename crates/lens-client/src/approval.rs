//! Conditional ERC-20 approval for fee-charging modules.

use alloy_primitives::{Address, B256, U256};
use lens_core::api::contracts::IERC20;
use lens_core::api::{read, ChainConnector};
use lens_core::{Error, Result};
use tracing::{info, warn};

use crate::client::LensClient;

impl<C: ChainConnector> LensClient<C> {
    /// Make sure `spender` may pull `amount` of `currency` from `owner`.
    ///
    /// Issues a single `approve(spender, amount)` only when the current
    /// allowance is below `amount`. Returns the approval transaction hash
    /// when one was sent. Approvals are never rolled back.
    pub async fn ensure_allowance(
        &self,
        currency: Address,
        spender: Address,
        amount: U256,
        owner: Address,
    ) -> Result<Option<B256>> {
        let allowance: U256 = read(
            self.connector().as_ref(),
            currency,
            IERC20::allowanceCall { owner, spender },
        )
        .await?;

        if allowance >= amount {
            info!(
                currency = %currency,
                spender = %spender,
                allowance = %allowance,
                amount = %amount,
                "Allowance sufficient, skipping approval"
            );
            return Ok(None);
        }

        info!(
            currency = %currency,
            spender = %spender,
            allowance = %allowance,
            amount = %amount,
            "Approving spender"
        );

        let receipt = self
            .send_to(currency, &IERC20::approveCall { spender, amount })
            .await
            .map_err(|e| {
                warn!(currency = %currency, spender = %spender, error = %e, "Approval failed");
                Error::ApprovalFailed {
                    currency,
                    spender,
                    amount,
                    message: e.to_string(),
                }
            })?;

        Ok(Some(receipt.transaction_hash))
    }
}
