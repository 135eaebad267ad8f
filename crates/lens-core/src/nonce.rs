//! Signature nonces.
//!
//! The hub increments `sigNonces(signer)` on every accepted signature, so
//! the value is read fresh before each signature and never cached.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::api::connector::{read, ChainConnector};
use crate::api::contracts::ILensHub;
use crate::Result;

/// Reads signature nonces from the hub.
pub struct NonceTracker<C: ChainConnector + ?Sized> {
    connector: Arc<C>,
    lens_hub: Address,
}

impl<C: ChainConnector + ?Sized> NonceTracker<C> {
    pub fn new(connector: Arc<C>, lens_hub: Address) -> Self {
        Self {
            connector,
            lens_hub,
        }
    }

    pub async fn current_nonce(&self, signer: Address) -> Result<U256> {
        let nonce: U256 = read(
            self.connector.as_ref(),
            self.lens_hub,
            ILensHub::sigNoncesCall { signer },
        )
        .await?;

        debug!(signer = %signer, nonce = %nonce, "Read signature nonce");
        Ok(nonce)
    }
}

impl<C: ChainConnector + ?Sized> Clone for NonceTracker<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
            lens_hub: self.lens_hub,
        }
    }
}

impl<C: ChainConnector + ?Sized> std::fmt::Debug for NonceTracker<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceTracker")
            .field("lens_hub", &self.lens_hub)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::connector::MockChainConnector;
    use crate::Error;
    use alloy_primitives::Bytes;
    use alloy_sol_types::SolValue;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test]
    async fn test_nonce_is_read_every_time() {
        let counter = Arc::new(AtomicU64::new(4));
        let seen = Arc::clone(&counter);

        let mut connector = MockChainConnector::new();
        connector
            .expect_call()
            .times(2)
            .withf(|request| request.is::<ILensHub::sigNoncesCall>())
            .returning(move |_| {
                let n = seen.fetch_add(1, Ordering::SeqCst);
                Ok(Bytes::from(U256::from(n).abi_encode()))
            });

        let tracker = NonceTracker::new(Arc::new(connector), Address::repeat_byte(0x60));
        let signer = Address::repeat_byte(0x01);

        let first = tracker.current_nonce(signer).await.unwrap();
        let second = tracker.current_nonce(signer).await.unwrap();
        assert_eq!(first, U256::from(4u64));
        assert!(second > first);
        assert_eq!(counter.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_nonce_targets_signer_on_hub() {
        let hub = Address::repeat_byte(0x60);
        let signer = Address::repeat_byte(0x01);

        let mut connector = MockChainConnector::new();
        connector
            .expect_call()
            .withf(move |request| {
                request.to == hub
                    && request
                        .decode::<ILensHub::sigNoncesCall>()
                        .map(|call| call.signer == signer)
                        .unwrap_or(false)
            })
            .returning(|_| Ok(Bytes::from(U256::from(9u64).abi_encode())));

        let tracker = NonceTracker::new(Arc::new(connector), hub);
        assert_eq!(tracker.current_nonce(signer).await.unwrap(), U256::from(9u64));
    }

    #[tokio::test]
    async fn test_rpc_failure_propagates() {
        let mut connector = MockChainConnector::new();
        connector.expect_call().returning(|_| {
            Err(Error::Rpc {
                message: "connection refused".to_string(),
                code: None,
            })
        });

        let tracker = NonceTracker::new(Arc::new(connector), Address::repeat_byte(0x60));
        let err = tokio_test::assert_err!(tracker.current_nonce(Address::repeat_byte(0x01)).await);
        assert!(matches!(err, Error::Rpc { .. }));
    }
}
