//! Lens Hub: off-chain authorization for the Lens Hub contract
//!
//! This is the root crate that hosts the integration tests and benchmarks.
//! For actual functionality, use the individual crates directly:
//!
//! - `lens-core`: module codecs, EIP-712 typed data, signing, nonces,
//!   event extraction and the chain connector seam
//! - `lens-client`: collect, post, profile and follow-module flows

pub use lens_client;
pub use lens_core;
