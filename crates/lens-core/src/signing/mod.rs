//! EIP-712 signing for the hub's `*WithSig` entry points.
//!
//! # Architecture
//!
//! ```text
//! NonceTracker ── nonce ──┐
//!                         ▼
//! TypedDataBuilder ──► TypedDataMessage
//!                         │
//!                         ▼
//! SignatureSigner ── asks ──► HolderSigner (LocalWallet, ...)
//!       │
//!       ▼
//! Eip712Signature { v, r, s, deadline }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lens_core::signing::{LocalWallet, SignatureSigner, TypedDataBuilder, TypedDataDomain};
//!
//! let wallet = LocalWallet::from_env()?;
//! let builder = TypedDataBuilder::new(TypedDataDomain::lens_hub(137, hub));
//! let message = builder.post_with_sig(&request.normalize(), nonce);
//! let sig = SignatureSigner::expecting(wallet.address())
//!     .sign(Some(&wallet), &message)
//!     .await?;
//! ```

pub mod domain;
pub mod signer;
pub mod typed_data;
pub mod wallet;

pub use domain::{
    typed_data_hash, TypedDataDomain, LENS_HUB_DOMAIN_VERSION, LENS_HUB_NFT_NAME,
};
pub use signer::{Eip712Signature, HolderSigner, SignatureSigner};
pub use typed_data::{
    encode_type, CollectWithSig, FieldSpec, PostWithSig, SignedAction, TypedDataBuilder,
    TypedDataMessage, COLLECT_WITH_SIG_FIELDS, POST_WITH_SIG_FIELDS,
};
pub use wallet::LocalWallet;
