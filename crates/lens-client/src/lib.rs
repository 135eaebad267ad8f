//! Lens Client
//!
//! Collect, post, profile and follow-module flows against the Lens Hub,
//! built on the signing and module codecs in `lens-core`.

pub mod approval;
pub mod client;
pub mod collect;
pub mod publish;
pub mod queries;

#[cfg(test)]
mod testing;

pub use client::LensClient;
pub use collect::{CollectOutcome, ValidationData};
pub use publish::PostOutcome;
